use smbconf::smbconf_applier;
use smbconf::smbconf_request::SetParmsRequest;

// Reads {"section": ..., "parms": {name: value}} from stdin and runs
// `net conf setparm` once per parm. Exit status follows the first failure.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    std::process::exit(
        smbconf_applier::main_for::<SetParmsRequest>(
            "smbconf-set-parms",
            "Apply a batch of parameters to one section of the Samba registry",
        )
        .await,
    );
}

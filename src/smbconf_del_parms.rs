use smbconf::smbconf_applier;
use smbconf::smbconf_request::DelParmsRequest;

// Reads {"section": ..., "parms": [name, ...]} from stdin and runs
// `net conf delparm` once per name, in list order.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    std::process::exit(
        smbconf_applier::main_for::<DelParmsRequest>(
            "smbconf-del-parms",
            "Remove a batch of parameters from one section of the Samba registry",
        )
        .await,
    );
}

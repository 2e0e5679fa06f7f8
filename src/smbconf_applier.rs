use std::io::{self, Read, Write};

use clap::{Arg, Command};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{self, ToolConfig, EXIT_CONFIG};
use crate::smbconf_request::{parse_request, ConfVerb, ParmRequest};
use crate::smbconf_runner::{ConfRunner, NetConf};

pub const EXIT_MALFORMED_INPUT: i32 = 65;
pub const EXIT_TOOL_UNAVAILABLE: i32 = 1;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Malformed settings request: {0}")]
    MalformedInput(String),
    #[error("Error executing {tool} conf {verb}, is it installed?")]
    ToolUnavailable {
        tool: String,
        verb: ConfVerb,
        #[source]
        source: io::Error,
    },
    #[error("{verb} of {parm} in [{section}] exited with status {status}")]
    CommandFailed {
        verb: ConfVerb,
        section: String,
        parm: String,
        status: i32,
        stderr: Vec<u8>,
    },
}

impl ApplyError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ApplyError::MalformedInput(_) => EXIT_MALFORMED_INPUT,
            ApplyError::ToolUnavailable { .. } => EXIT_TOOL_UNAVAILABLE,
            ApplyError::CommandFailed { status, .. } => *status,
        }
    }

    /// Writes the user-facing diagnostic. A failed command's own stderr is passed through untouched.
    pub fn report(&self, err: &mut impl Write) -> io::Result<()> {
        match self {
            ApplyError::CommandFailed { stderr, .. } => err.write_all(stderr)?,
            other => writeln!(err, "{}", other)?,
        }
        err.flush()
    }
}

/// Applies every step of `request` in order and stops at the first failure.
/// Returns the number of invocations that succeeded.
pub async fn apply_request<Req, R>(request: &Req, runner: &mut R) -> Result<usize, ApplyError>
where
    Req: ParmRequest,
    R: ConfRunner + ?Sized,
{
    let verb = Req::VERB;
    let section = request.section();
    let steps = request.steps();

    for step in &steps {
        let args = step.args(verb, section);
        debug!("Running {} conf {} [{}] {}", runner.tool(), verb, section, step.parm);

        let invocation = match runner.run(&args).await {
            Ok(invocation) => invocation,
            Err(source) => {
                error!("Failed to start {}: {}", runner.tool(), source);
                return Err(ApplyError::ToolUnavailable {
                    tool: runner.tool().to_string(),
                    verb,
                    source,
                });
            }
        };

        if !invocation.success() {
            error!(
                "{} conf {} [{}] {} failed with status {}",
                runner.tool(),
                verb,
                section,
                step.parm,
                invocation.status
            );
            return Err(ApplyError::CommandFailed {
                verb,
                section: section.to_string(),
                parm: step.parm.to_string(),
                status: invocation.status,
                stderr: invocation.stderr,
            });
        }
    }

    info!("Applied {} {} operation(s) to [{}]", steps.len(), verb, section);
    Ok(steps.len())
}

/// Reads one request from `input`, applies it and returns the process exit code.
/// Diagnostics go to `err`; the success path writes nothing.
pub async fn run<Req, R>(input: impl Read, err: &mut impl Write, runner: &mut R) -> i32
where
    Req: ParmRequest,
    R: ConfRunner + ?Sized,
{
    let outcome = match parse_request::<Req>(input) {
        Ok(request) => apply_request(&request, runner).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => 0,
        Err(e) => {
            if let ApplyError::MalformedInput(ref msg) = e {
                error!("Rejected request: {}", msg);
            }
            if let Err(write_err) = e.report(err) {
                error!("Failed to write diagnostic: {}", write_err);
            }
            e.exit_code()
        }
    }
}

/// Shared entry point of the binaries: parses `--config`, installs logging and
/// applies one `Req` read from stdin against the real `net` tool.
/// Returns the process exit code.
pub async fn main_for<Req: ParmRequest>(name: &'static str, about: &'static str) -> i32 {
    let matches = Command::new(name)
        .about(about)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Optional KEY=VALUE config file (NET_BIN, LOG_LEVEL)"),
        )
        .get_matches();

    let tool_config = match matches.get_one::<String>("config") {
        Some(path) => match ToolConfig::load(path) {
            Ok(tool_config) => tool_config,
            Err(e) => {
                eprintln!("Failed to read config file {}: {}", path, e);
                return EXIT_CONFIG;
            }
        },
        None => ToolConfig::default(),
    };
    config::init_logging(&tool_config);
    debug!("Using {} for registry changes", tool_config.net_bin);

    let mut runner = NetConf::new(tool_config.net_bin);
    let stdin = std::io::stdin();
    let mut stderr = std::io::stderr();
    run::<Req, _>(stdin.lock(), &mut stderr, &mut runner).await
}

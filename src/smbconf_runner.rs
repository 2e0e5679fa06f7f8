use std::io;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

/// Outcome of one finished child process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: i32,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Process-execution boundary. An `Err` means the tool never ran.
#[async_trait]
pub trait ConfRunner: Send {
    /// Name shown in the tool-unavailable diagnostic.
    fn tool(&self) -> &str;

    async fn run(&mut self, args: &[&str]) -> io::Result<Invocation>;
}

/// Runs the real `net` binary, one child at a time, without a shell.
pub struct NetConf {
    bin: String,
}

impl NetConf {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl ConfRunner for NetConf {
    fn tool(&self) -> &str {
        &self.bin
    }

    async fn run(&mut self, args: &[&str]) -> io::Result<Invocation> {
        let output = Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(Invocation {
            stdout: output.stdout,
            stderr: output.stderr,
            status: exit_code(output.status),
        })
    }
}

// Signal deaths have no exit code; report them the way a shell does
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn exit_code_passes_through_status() {
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(2 << 8)), 2);
        assert_eq!(exit_code(ExitStatus::from_raw(255 << 8)), 255);
    }

    #[test]
    fn exit_code_maps_signals() {
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
    }

    #[tokio::test]
    async fn missing_binary_is_an_io_error() {
        let mut runner = NetConf::new("/nonexistent/smbconf/net");
        let err = runner.run(&["conf", "setparm", "global", "a", "b"]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn captures_output_and_status() {
        let mut runner = NetConf::new("sh");
        let invocation = runner
            .run(&["-c", "printf out; printf err >&2; exit 3"])
            .await
            .unwrap();
        assert_eq!(invocation.stdout, b"out");
        assert_eq!(invocation.stderr, b"err");
        assert_eq!(invocation.status, 3);
        assert!(!invocation.success());
    }
}

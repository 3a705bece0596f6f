//! Command execution seams.
//!
//! The orchestrator only talks to the outside world through these traits:
//! [`RemoteShell`] for the ssh control channel, [`RemoteProcess`] for the
//! background receiver, and [`LocalShell`] for local binaries. The system
//! implementations live in [`ssh`] and [`local`]; tests substitute fakes.

pub mod local;
pub mod ssh;

use std::path::Path;

use async_trait::async_trait;
use indicatif::ProgressBar;
use ncsend_core::Result;

pub use local::SystemShell;
pub use ssh::SshShell;

/// Line the remote shell prints right before it `exec`s the listener.
pub const READY_SENTINEL: &str = "NCSEND_READY";

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if killed by a signal
    pub status: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl CommandOutput {
    /// Successful exit with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed exit with the given code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the command exited with status 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }

    /// Human-readable exit status
    #[must_use]
    pub fn describe_status(&self) -> String {
        self.status
            .map_or_else(|| "a signal".to_owned(), |code| format!("status {code}"))
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// What the local sender reported once it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderExit {
    /// Exit status and stderr of the sender
    pub output: CommandOutput,
    /// Bytes written into the sender's stdin
    pub bytes_sent: u64,
}

/// The authenticated control channel to the destination host.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Identifier of the remote host, used in messages
    fn target(&self) -> &str;

    /// Run a shell command remotely and wait for it.
    async fn run(&self, command: &str) -> Result<CommandOutput>;

    /// Start a shell command remotely without waiting for it.
    ///
    /// The returned handle stays with the caller for readiness, exit status,
    /// and cleanup.
    async fn launch(&self, command: &str) -> Result<Box<dyn RemoteProcess>>;
}

/// A remote command started by [`RemoteShell::launch`].
#[async_trait]
pub trait RemoteProcess: Send {
    /// Wait until the command printed [`READY_SENTINEL`] and return the pid
    /// that followed it.
    ///
    /// Fails if the command exits before announcing itself.
    async fn ready(&mut self) -> Result<u32>;

    /// Wait for the command to exit; `None` if it was killed by a signal.
    async fn wait(&mut self) -> Result<Option<i32>>;

    /// Stop the command on the remote host and reap the local channel.
    async fn kill(&mut self) -> Result<()>;
}

/// Local process execution.
#[async_trait]
pub trait LocalShell: Send + Sync {
    /// Run a local program and wait for it.
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Start `program`, feed `source` into its stdin through `progress`,
    /// close stdin at EOF and wait for it to exit.
    async fn stream(
        &self,
        program: &str,
        args: &[String],
        source: &Path,
        progress: &ProgressBar,
    ) -> Result<SenderExit>;
}

/// Quote a word for a POSIX shell on the remote side.
pub fn quote(word: &str) -> String {
    shell_escape::unix::escape(word.into()).into_owned()
}

/// Pull the pid out of a sentinel line, if this is one.
pub fn parse_sentinel(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    if parts.next()? != READY_SENTINEL {
        return None;
    }
    parts.next()?.parse().ok()
}

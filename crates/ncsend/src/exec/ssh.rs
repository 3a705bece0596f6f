//! Remote execution through the system `ssh` client.

use std::process::Stdio;

use async_trait::async_trait;
use ncsend_core::{NcsendError, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{parse_sentinel, CommandOutput, RemoteProcess, RemoteShell};

/// ssh control channel to one target.
#[derive(Debug, Clone)]
pub struct SshShell {
    program: String,
    target: String,
    options: Vec<String>,
}

impl SshShell {
    /// Channel to `target` with extra ssh options (e.g. `-o BatchMode=yes`).
    pub fn new(target: impl Into<String>, options: Vec<String>) -> Self {
        Self::with_program("ssh", target, options)
    }

    /// Channel through another ssh-compatible client.
    ///
    /// The client is invoked as `<program> <options> <target> <command>`.
    pub fn with_program(
        program: impl Into<String>,
        target: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            program: program.into(),
            target: target.into(),
            options,
        }
    }

    fn command(&self, remote_command: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.options)
            .arg(&self.target)
            .arg(remote_command)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> NcsendError {
        if e.kind() == std::io::ErrorKind::NotFound {
            NcsendError::MissingDependency {
                tool: self.program.clone(),
                location: "this host".into(),
            }
        } else {
            NcsendError::io(format!("failed to start {}", self.program), e)
        }
    }
}

#[async_trait]
impl RemoteShell for SshShell {
    fn target(&self) -> &str {
        &self.target
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        debug!(host = %self.target, command, "ssh run");
        let output = self
            .command(command)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        Ok(output.into())
    }

    async fn launch(&self, command: &str) -> Result<Box<dyn RemoteProcess>> {
        debug!(host = %self.target, command, "ssh launch");
        let mut child = self
            .command(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NcsendError::TransferFailure("ssh stdout was not captured".into()))?;
        let stderr = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut text = String::new();
                if let Err(e) = pipe.read_to_string(&mut text).await {
                    debug!(error = %e, "could not read remote stderr");
                }
                text
            })
        });

        Ok(Box::new(SshProcess {
            shell: self.clone(),
            child,
            lines: BufReader::new(stdout).lines(),
            stderr,
            pid: None,
        }))
    }
}

/// Background receiver started over ssh.
struct SshProcess {
    shell: SshShell,
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
    pid: Option<u32>,
}

impl SshProcess {
    async fn stderr_text(&mut self) -> String {
        match self.stderr.take() {
            Some(handle) => handle.await.unwrap_or_default().trim().to_owned(),
            None => String::new(),
        }
    }
}

#[async_trait]
impl RemoteProcess for SshProcess {
    async fn ready(&mut self) -> Result<u32> {
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .map_err(|e| NcsendError::io("failed to read from ssh", e))?
        {
            if let Some(pid) = parse_sentinel(&line) {
                debug!(host = %self.shell.target, pid, "remote receiver announced");
                self.pid = Some(pid);
                return Ok(pid);
            }
            debug!(line = %line, "ignoring remote output");
        }

        let status = self
            .child
            .wait()
            .await
            .map_err(|e| NcsendError::io("failed to wait for ssh", e))?;
        let stderr = self.stderr_text().await;
        Err(NcsendError::ListenerNotReady(format!(
            "remote receiver exited with {status} before listening: {stderr}"
        )))
    }

    async fn wait(&mut self) -> Result<Option<i32>> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| NcsendError::io("failed to wait for ssh", e))?;
        if !status.success() {
            let stderr = self.stderr_text().await;
            if !stderr.is_empty() {
                warn!(host = %self.shell.target, stderr = %stderr, "remote receiver reported errors");
            }
        }
        Ok(status.code())
    }

    async fn kill(&mut self) -> Result<()> {
        if let Some(pid) = self.pid.take() {
            match self.shell.run(&format!("kill {pid} 2>/dev/null")).await {
                Ok(out) if out.success() => debug!(pid, "remote receiver killed"),
                Ok(out) => debug!(pid, status = ?out.status, "remote kill returned non-zero"),
                Err(e) => warn!(pid, error = %e, "could not kill remote receiver"),
            }
        }

        if let Err(e) = self.child.start_kill() {
            // InvalidInput means the channel already exited
            if e.kind() != std::io::ErrorKind::InvalidInput {
                return Err(NcsendError::io("failed to stop ssh", e));
            }
        }
        self.child
            .wait()
            .await
            .map_err(|e| NcsendError::io("failed to reap ssh", e))?;
        Ok(())
    }
}

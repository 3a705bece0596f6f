//! Local process execution with `tokio::process`.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use indicatif::ProgressBar;
use ncsend_core::{NcsendError, Result};
use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, LocalShell, SenderExit};

/// Runs programs on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

fn spawn_error(program: &str, e: std::io::Error) -> NcsendError {
    if e.kind() == std::io::ErrorKind::NotFound {
        NcsendError::MissingDependency {
            tool: program.to_owned(),
            location: "this host".into(),
        }
    } else {
        NcsendError::io(format!("failed to start {program}"), e)
    }
}

#[async_trait]
impl LocalShell for SystemShell {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(program, ?args, "local run");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(program, e))?;
        Ok(output.into())
    }

    async fn stream(
        &self,
        program: &str,
        args: &[String],
        source: &Path,
        progress: &ProgressBar,
    ) -> Result<SenderExit> {
        debug!(program, ?args, source = %source.display(), "starting sender");
        let file = tokio::fs::File::open(source)
            .await
            .map_err(|e| NcsendError::io(format!("cannot open {}", source.display()), e))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NcsendError::TransferFailure("sender stdin was not captured".into()))?;

        let mut reader = progress.wrap_async_read(file);
        let copied = tokio::io::copy(&mut reader, &mut stdin).await;
        // EOF on stdin is what makes nc close the connection
        drop(stdin);

        let output: CommandOutput = child
            .wait_with_output()
            .await
            .map_err(|e| NcsendError::io(format!("failed to wait for {program}"), e))?
            .into();
        progress.finish();

        match copied {
            Ok(bytes_sent) => Ok(SenderExit { output, bytes_sent }),
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                Err(NcsendError::TransferFailure(format!(
                    "{program} stopped reading after {} bytes ({}): {}",
                    progress.position(),
                    output.describe_status(),
                    output.stderr.trim()
                )))
            }
            Err(e) => Err(NcsendError::io("stream copy failed", e)),
        }
    }
}

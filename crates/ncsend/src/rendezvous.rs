//! Rendezvous between the remote receiver and the local sender.
//!
//! The receiver is launched over ssh and kept as a handle. Its shell prints
//! a sentinel line right before `exec`-ing netcat; once that line arrives
//! the coordinator still waits the fixed grace period so the listener has
//! bound its port, then starts the local sender. There is no handshake on
//! the data channel itself: completion is end-of-stream.
//!
//! Every failure or cancellation after the launch kills the receiver before
//! returning.

use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use ncsend_core::{NcDialect, NcsendError, Result, TransferRequest};
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TransferConfig;
use crate::exec::{quote, LocalShell, RemoteProcess, RemoteShell, READY_SENTINEL};

/// Dialects agreed for both ends of the data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectPair {
    /// Remote receiver
    pub listen: NcDialect,
    /// Local sender
    pub connect: NcDialect,
}

/// What the rendezvous observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendezvousReport {
    /// Bytes pushed into the sender
    pub bytes_sent: u64,
    /// Sender start to receiver exit
    pub elapsed: Duration,
    /// pid announced by the receiver
    pub receiver_pid: u32,
    /// Receiver exit status
    pub receiver_status: Option<i32>,
}

/// Shell line that announces readiness and becomes the listener.
pub fn receiver_script(nc: &str, args: &[String], remote_path: &str) -> String {
    format!(
        "printf '{READY_SENTINEL} %s\\n' \"$$\"; exec {} {} > {}",
        quote(nc),
        args.iter().map(|a| quote(a)).collect::<Vec<_>>().join(" "),
        quote(remote_path)
    )
}

/// Drives one receiver/sender pair.
pub struct Rendezvous<'a, R: ?Sized, L: ?Sized> {
    remote: &'a R,
    local: &'a L,
    config: &'a TransferConfig,
}

impl<'a, R, L> Rendezvous<'a, R, L>
where
    R: RemoteShell + ?Sized,
    L: LocalShell + ?Sized,
{
    /// Coordinator over the given collaborators
    pub const fn new(remote: &'a R, local: &'a L, config: &'a TransferConfig) -> Self {
        Self {
            remote,
            local,
            config,
        }
    }

    /// Start the receiver, wait for it, stream `source` through the sender.
    pub async fn run(
        &self,
        request: &TransferRequest,
        source: &Path,
        dialects: DialectPair,
        progress: &ProgressBar,
        cancel: &CancellationToken,
    ) -> Result<RendezvousReport> {
        let remote_path = request.remote_path();
        let script = receiver_script(
            &self.config.remote_nc,
            &dialects.listen.listen_args(request.port()),
            &remote_path,
        );
        info!(
            host = request.ssh_target(),
            port = request.port(),
            dialect = %dialects.listen,
            path = %remote_path,
            "starting remote receiver"
        );
        if cancel.is_cancelled() {
            return Err(NcsendError::Cancelled);
        }
        let mut receiver = self.remote.launch(&script).await?;

        let ready = tokio::select! {
            () = cancel.cancelled() => Err(NcsendError::Cancelled),
            ready = timeout(self.config.ready_timeout, receiver.ready()) => {
                ready.unwrap_or_else(|_| {
                    Err(NcsendError::ListenerNotReady(format!(
                        "no readiness signal within {:?}",
                        self.config.ready_timeout
                    )))
                })
            }
        };
        let receiver_pid = match ready {
            Ok(pid) => pid,
            Err(e) => return Err(abort(receiver.as_mut(), e).await),
        };

        debug!(grace = ?self.config.grace_period, "waiting for listener to bind");
        let grace = tokio::select! {
            () = cancel.cancelled() => Err(NcsendError::Cancelled),
            () = sleep(self.config.grace_period) => Ok(()),
        };
        if let Err(e) = grace {
            return Err(abort(receiver.as_mut(), e).await);
        }

        let args = dialects
            .connect
            .connect_args(request.dest_host(), request.port());
        info!(
            host = request.dest_host(),
            port = request.port(),
            dialect = %dialects.connect,
            "starting local sender"
        );
        let started = Instant::now();
        let sent = tokio::select! {
            () = cancel.cancelled() => Err(NcsendError::Cancelled),
            sent = self.local.stream(&self.config.local_nc, &args, source, progress) => sent,
        };
        let sent = match sent {
            Ok(sent) if sent.output.success() => sent,
            Ok(sent) => {
                let e = NcsendError::TransferFailure(format!(
                    "local {} exited with {}: {}",
                    self.config.local_nc,
                    sent.output.describe_status(),
                    sent.output.stderr.trim()
                ));
                return Err(abort(receiver.as_mut(), e).await);
            }
            Err(e) => return Err(abort(receiver.as_mut(), e).await),
        };
        debug!(bytes = sent.bytes_sent, "sender finished");

        let exit = tokio::select! {
            () = cancel.cancelled() => Err(NcsendError::Cancelled),
            exit = timeout(self.config.receiver_exit_timeout, receiver.wait()) => {
                exit.unwrap_or_else(|_| {
                    Err(NcsendError::TransferFailure(format!(
                        "remote receiver still running {:?} after the sender finished",
                        self.config.receiver_exit_timeout
                    )))
                })
            }
        };
        let receiver_status = match exit {
            Ok(Some(0)) => Some(0),
            Ok(Some(code)) => {
                return Err(NcsendError::TransferFailure(format!(
                    "remote receiver exited with status {code}"
                )))
            }
            Ok(None) => {
                return Err(NcsendError::TransferFailure(
                    "remote receiver was terminated by a signal".into(),
                ))
            }
            Err(e) => return Err(abort(receiver.as_mut(), e).await),
        };

        Ok(RendezvousReport {
            bytes_sent: sent.bytes_sent,
            elapsed: started.elapsed(),
            receiver_pid,
            receiver_status,
        })
    }
}

/// Kill the receiver and hand back the error that caused it.
async fn abort(receiver: &mut dyn RemoteProcess, cause: NcsendError) -> NcsendError {
    warn!(error = %cause, "stopping remote receiver");
    if let Err(e) = receiver.kill().await {
        warn!(error = %e, "remote receiver cleanup failed");
    }
    cause
}

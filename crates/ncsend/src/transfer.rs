//! The transfer sequence.
//!
//! Strictly ordered: local source check, remote preflight, dialect probes,
//! pre-transfer checksum, rendezvous, post-transfer checksum. The first
//! failure ends the run; nothing is retried. Every stage races the
//! cancellation token, so an interrupt ends the run at the stage it hits.

use std::future::Future;

use ncsend_core::{NcsendError, Result, TransferOutcome, TransferRequest};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::TransferConfig;
use crate::exec::{LocalShell, RemoteShell};
use crate::preflight::{check_remote, resolve_source};
use crate::probe::{probe_local, probe_remote};
use crate::progress::{silent_bar, transfer_bar};
use crate::rendezvous::{DialectPair, Rendezvous};
use crate::verify;

/// One-shot orchestrator over a control channel and the local host.
pub struct Transfer<'a, R: ?Sized, L: ?Sized> {
    remote: &'a R,
    local: &'a L,
    config: TransferConfig,
}

impl<'a, R, L> Transfer<'a, R, L>
where
    R: RemoteShell + ?Sized,
    L: LocalShell + ?Sized,
{
    /// Orchestrator with default configuration
    pub fn new(remote: &'a R, local: &'a L) -> Self {
        Self::with_config(remote, local, TransferConfig::default())
    }

    /// Orchestrator with custom configuration
    pub const fn with_config(remote: &'a R, local: &'a L, config: TransferConfig) -> Self {
        Self {
            remote,
            local,
            config,
        }
    }

    /// Configuration in use
    pub const fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Run the whole sequence once.
    #[instrument(skip_all, fields(source = %request.source().display(), host = request.ssh_target()))]
    pub async fn run(
        &self,
        request: &TransferRequest,
        cancel: &CancellationToken,
    ) -> Result<TransferOutcome> {
        let source = interruptible(cancel, resolve_source(request.source())).await?;

        interruptible(
            cancel,
            check_remote(
                self.remote,
                request.dest_dir(),
                &self.config.required_remote_tools(request.verify()),
            ),
        )
        .await?;

        let dialects = DialectPair {
            connect: interruptible(cancel, probe_local(self.local, &self.config.local_nc)).await?,
            listen: interruptible(cancel, probe_remote(self.remote, &self.config.remote_nc))
                .await?,
        };

        let local_digest = if request.verify() {
            Some(interruptible(cancel, verify::local_digest(&source.path)).await?)
        } else {
            None
        };

        let progress = if self.config.show_progress {
            transfer_bar(source.len)
        } else {
            silent_bar(source.len)
        };
        let report = Rendezvous::new(self.remote, self.local, &self.config)
            .run(request, &source.path, dialects, &progress, cancel)
            .await?;
        info!(
            bytes = report.bytes_sent,
            elapsed = ?report.elapsed,
            receiver_pid = report.receiver_pid,
            "transfer finished"
        );

        let checksums = match local_digest {
            Some(local) => {
                let remote_path = request.remote_path();
                let remote = interruptible(
                    cancel,
                    verify::remote_digest(
                        self.remote,
                        &self.config.remote_hash_command,
                        &remote_path,
                    ),
                )
                .await?;
                Some(verify::compare(&local, &remote, &remote_path)?)
            }
            None => None,
        };

        Ok(TransferOutcome {
            bytes_sent: report.bytes_sent,
            elapsed: report.elapsed,
            checksums,
            receiver_status: report.receiver_status,
        })
    }
}

/// Run one stage unless the token fires first.
async fn interruptible<T>(
    cancel: &CancellationToken,
    stage: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(NcsendError::Cancelled),
        result = stage => result,
    }
}

//! End-to-end integrity verification.
//!
//! Both sides use SHA-256. The local digest is computed in-process before
//! the transfer; the remote digest comes from the remote checksum command
//! afterwards. A mismatch is always fatal and the destination file is left
//! where it is.

use std::path::Path;

use ncsend_core::{ChecksumPair, NcsendError, Result};
use tracing::{debug, info};

use crate::exec::{quote, RemoteShell};
use crate::hash::{parse_sha256sum, sha256_file};

/// Digest of the local source.
pub async fn local_digest(path: &Path) -> Result<String> {
    let digest = sha256_file(path).await?;
    debug!(path = %path.display(), digest = %digest, "local checksum");
    Ok(digest)
}

/// Digest of the remote destination via `<hash_command> <path>`.
pub async fn remote_digest<R: RemoteShell + ?Sized>(
    remote: &R,
    hash_command: &str,
    remote_path: &str,
) -> Result<String> {
    let output = remote
        .run(&format!("{} {}", quote(hash_command), quote(remote_path)))
        .await?;
    if !output.success() {
        return Err(NcsendError::TransferFailure(format!(
            "{hash_command} on {} exited with {}: {}",
            remote.target(),
            output.describe_status(),
            output.stderr.trim()
        )));
    }
    let digest = parse_sha256sum(&output.stdout).ok_or_else(|| {
        NcsendError::TransferFailure(format!(
            "unexpected {hash_command} output: {}",
            output.stdout.trim()
        ))
    })?;
    debug!(path = remote_path, digest = %digest, "remote checksum");
    Ok(digest)
}

/// Compare the two digests, failing with both on mismatch.
pub fn compare(local: &str, remote: &str, remote_path: &str) -> Result<ChecksumPair> {
    let pair = ChecksumPair::new(local, remote);
    if pair.matches() {
        info!(digest = %pair.local, "checksums match");
        Ok(pair)
    } else {
        Err(NcsendError::IntegrityMismatch {
            remote_path: remote_path.to_owned(),
            local: pair.local,
            remote: pair.remote,
        })
    }
}

//! Result of a completed transfer.

use std::time::Duration;

/// Source and destination digests, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumPair {
    /// Digest of the local source, taken before the transfer
    pub local: String,
    /// Digest of the remote destination, taken after the transfer
    pub remote: String,
}

impl ChecksumPair {
    /// Pair two digests, normalizing both to lowercase.
    pub fn new(local: impl AsRef<str>, remote: impl AsRef<str>) -> Self {
        Self {
            local: local.as_ref().trim().to_ascii_lowercase(),
            remote: remote.as_ref().trim().to_ascii_lowercase(),
        }
    }

    /// Exact comparison of the normalized digests
    #[must_use]
    pub fn matches(&self) -> bool {
        self.local == self.remote
    }
}

/// End state of a successful run.
///
/// Failures are reported through [`crate::NcsendError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Bytes pushed into the local sender
    pub bytes_sent: u64,
    /// Wall time from sender start to receiver exit
    pub elapsed: Duration,
    /// Present only when verification was requested
    pub checksums: Option<ChecksumPair>,
    /// Exit status reported by the remote receiver, if it reported one
    pub receiver_status: Option<i32>,
}

impl TransferOutcome {
    /// Average throughput in bytes per second
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_sent as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns true if checksums were compared
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.checksums.is_some()
    }

    /// Process exit status for this outcome
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        0
    }
}

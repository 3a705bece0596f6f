use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for transfer operations
pub type Result<T> = std::result::Result<T, NcsendError>;

/// Errors that can end a transfer run.
///
/// Every variant is fatal. An unrecognised netcat dialect is not an error:
/// it degrades to [`crate::NcDialect::Unknown`] and is only logged.
#[derive(Error, Debug)]
pub enum NcsendError {
    /// A required external tool is not installed
    #[error("required tool `{tool}` not found on {location}")]
    MissingDependency {
        /// Binary name
        tool: String,
        /// Where the lookup happened ("this host" or the ssh target)
        location: String,
    },

    /// Arguments were missing or malformed
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    /// The no-op remote command failed
    #[error("cannot reach {target} over ssh: {detail}")]
    ConnectivityFailure {
        /// ssh target (user@host)
        target: String,
        /// stderr of the failed ssh call
        detail: String,
    },

    /// Remote destination directory is missing or not writable
    #[error("remote directory {dir} on {target} does not exist or is not writable")]
    DestinationUnwritable {
        /// ssh target (user@host)
        target: String,
        /// Destination directory
        dir: String,
    },

    /// Local source file does not exist or is not a regular file
    #[error("source file not found: {}", path.display())]
    SourceMissing {
        /// Path as given or as resolved
        path: PathBuf,
    },

    /// Post-transfer digest disagrees with the pre-transfer digest
    #[error("checksum mismatch for {remote_path}: local {local} != remote {remote}")]
    IntegrityMismatch {
        /// Destination path on the remote host
        remote_path: String,
        /// Digest of the local source
        local: String,
        /// Digest of the remote destination
        remote: String,
    },

    /// The remote listener never signalled readiness
    #[error("remote listener not ready: {0}")]
    ListenerNotReady(String),

    /// The stream copy failed on either side
    #[error("transfer failed: {0}")]
    TransferFailure(String),

    /// The run was interrupted
    #[error("transfer cancelled")]
    Cancelled,

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Local I/O failed
    #[error("{context}: {source}")]
    Io {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl NcsendError {
    /// Wrap an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        1
    }

    /// Returns true if the failure happened before any data was sent
    #[must_use]
    pub const fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency { .. }
                | Self::InvalidInvocation(_)
                | Self::ConnectivityFailure { .. }
                | Self::DestinationUnwritable { .. }
                | Self::SourceMissing { .. }
                | Self::Config(_)
        )
    }
}

//! Transfer timing and tool configuration.

use std::time::Duration;

/// Default netcat binary name on both sides.
pub const DEFAULT_NC: &str = "nc";

/// Default checksum command on the remote side.
pub const DEFAULT_HASH_COMMAND: &str = "sha256sum";

/// Knobs for one transfer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    /// Fixed delay between the receiver's readiness signal and the sender's connect
    pub grace_period: Duration,

    /// Upper bound on waiting for the receiver's readiness signal
    pub ready_timeout: Duration,

    /// Upper bound on waiting for the receiver to exit once the sender is done
    pub receiver_exit_timeout: Duration,

    /// netcat binary on this host
    pub local_nc: String,

    /// netcat binary on the remote host
    pub remote_nc: String,

    /// Checksum command on the remote host
    pub remote_hash_command: String,

    /// Draw the progress bar
    pub show_progress: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self {
            grace_period: Duration::from_secs(1),
            ready_timeout: Duration::from_secs(15),
            receiver_exit_timeout: Duration::from_secs(30),
            local_nc: DEFAULT_NC.to_owned(),
            remote_nc: DEFAULT_NC.to_owned(),
            remote_hash_command: DEFAULT_HASH_COMMAND.to_owned(),
            show_progress: true,
        }
    }

    /// Set the grace period
    #[must_use]
    pub fn grace_period(mut self, duration: Duration) -> Self {
        self.grace_period = duration;
        self
    }

    /// Set the readiness timeout
    #[must_use]
    pub fn ready_timeout(mut self, duration: Duration) -> Self {
        self.ready_timeout = duration;
        self
    }

    /// Set the receiver exit timeout
    #[must_use]
    pub fn receiver_exit_timeout(mut self, duration: Duration) -> Self {
        self.receiver_exit_timeout = duration;
        self
    }

    /// Set the local netcat binary
    #[must_use]
    pub fn local_nc(mut self, binary: impl Into<String>) -> Self {
        self.local_nc = binary.into();
        self
    }

    /// Set the remote netcat binary
    #[must_use]
    pub fn remote_nc(mut self, binary: impl Into<String>) -> Self {
        self.remote_nc = binary.into();
        self
    }

    /// Enable or disable the progress bar
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Binaries that must be installed locally before anything else runs
    #[must_use]
    pub fn required_local_tools(&self) -> Vec<&str> {
        vec!["ssh", self.local_nc.as_str()]
    }

    /// Binaries that must be installed on the remote host
    #[must_use]
    pub fn required_remote_tools(&self, verify: bool) -> Vec<&str> {
        let mut tools = vec![self.remote_nc.as_str()];
        if verify {
            tools.push(self.remote_hash_command.as_str());
        }
        tools
    }
}

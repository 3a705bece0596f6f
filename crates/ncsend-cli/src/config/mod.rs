//! Configuration management.
//!
//! Only tuning lives here; the transfer itself is always described by flags.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use ncsend::TransferConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "NCSEND_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay between the listener announcing itself and the sender connecting.
    pub grace_period_ms: u64,

    /// How long to wait for the listener to announce itself.
    pub ready_timeout_secs: u64,

    /// How long to wait for the listener to exit after the sender is done.
    pub receiver_exit_timeout_secs: u64,

    /// netcat binary on this host.
    pub local_nc: String,

    /// netcat binary on the remote host.
    pub remote_nc: String,

    /// Extra arguments passed to every ssh invocation.
    pub ssh_options: Vec<String>,

    /// Draw the progress bar.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        let transfer = TransferConfig::default();
        Self {
            grace_period_ms: duration_ms(transfer.grace_period),
            ready_timeout_secs: transfer.ready_timeout.as_secs(),
            receiver_exit_timeout_secs: transfer.receiver_exit_timeout.as_secs(),
            local_nc: transfer.local_nc,
            remote_nc: transfer.remote_nc,
            ssh_options: vec!["-o".into(), "BatchMode=yes".into()],
            progress: transfer.show_progress,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn duration_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("", "", "ncsend")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a specific file; missing means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Settings for the transfer engine.
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig::new()
            .grace_period(Duration::from_millis(self.grace_period_ms))
            .ready_timeout(Duration::from_secs(self.ready_timeout_secs))
            .receiver_exit_timeout(Duration::from_secs(self.receiver_exit_timeout_secs))
            .local_nc(self.local_nc.clone())
            .remote_nc(self.remote_nc.clone())
            .show_progress(self.progress)
    }
}

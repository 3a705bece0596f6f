//! Parameters of a single transfer run.

use std::path::{Path, PathBuf};

use crate::error::{NcsendError, Result};

/// One invocation's parameters.
///
/// Built once from command-line input and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    source: PathBuf,
    file_name: String,
    dest_host: String,
    dest_dir: String,
    port: u16,
    ssh_target: String,
    verify: bool,
    verbose: bool,
}

impl TransferRequest {
    /// Validate and build a request.
    ///
    /// Trailing slashes are stripped from `dest_dir` (a bare `/` is kept).
    pub fn new(
        source: impl Into<PathBuf>,
        dest_host: impl Into<String>,
        dest_dir: impl Into<String>,
        port: u16,
        ssh_target: impl Into<String>,
    ) -> Result<Self> {
        let source = source.into();
        let dest_host = dest_host.into();
        let ssh_target = ssh_target.into();
        let dest_dir = normalize_dir(&dest_dir.into())?;

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                NcsendError::InvalidInvocation(format!(
                    "source path has no usable file name: {}",
                    source.display()
                ))
            })?;

        if dest_host.trim().is_empty() {
            return Err(NcsendError::InvalidInvocation(
                "destination address is empty".into(),
            ));
        }
        if ssh_target.trim().is_empty() {
            return Err(NcsendError::InvalidInvocation("ssh target is empty".into()));
        }
        if port == 0 {
            return Err(NcsendError::InvalidInvocation(
                "destination port must be between 1 and 65535".into(),
            ));
        }

        Ok(Self {
            source,
            file_name,
            dest_host,
            dest_dir,
            port,
            ssh_target,
            verify: false,
            verbose: false,
        })
    }

    /// Enable post-transfer checksum verification
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Enable diagnostic output
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Source path as given on the command line
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Base name of the source, reused as the remote file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Address the local sender connects to
    pub fn dest_host(&self) -> &str {
        &self.dest_host
    }

    /// Remote destination directory without trailing slash
    pub fn dest_dir(&self) -> &str {
        &self.dest_dir
    }

    /// Data channel port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// ssh target for the control channel
    pub fn ssh_target(&self) -> &str {
        &self.ssh_target
    }

    /// Whether checksums are compared after the transfer
    pub const fn verify(&self) -> bool {
        self.verify
    }

    /// Whether diagnostics are enabled
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// `<dest_dir>/<file_name>`
    pub fn remote_path(&self) -> String {
        if self.dest_dir == "/" {
            format!("/{}", self.file_name)
        } else {
            format!("{}/{}", self.dest_dir, self.file_name)
        }
    }
}

fn normalize_dir(dir: &str) -> Result<String> {
    if dir.is_empty() {
        return Err(NcsendError::InvalidInvocation(
            "destination directory is empty".into(),
        ));
    }
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_owned())
    } else {
        Ok(trimmed.to_owned())
    }
}

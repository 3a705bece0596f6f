//! Checks that must pass before any data moves.

use std::path::{Path, PathBuf};

use ncsend_core::{NcsendError, Result};
use tracing::debug;

use crate::exec::{quote, RemoteShell};

/// Source file after canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Absolute path with symlinks resolved
    pub path: PathBuf,
    /// Size in bytes
    pub len: u64,
}

/// Fail on the first tool in `tools` that is not on `PATH`.
pub fn require_tools(tools: &[&str]) -> Result<()> {
    for tool in tools {
        match which::which(tool) {
            Ok(path) => debug!(tool, path = %path.display(), "found tool"),
            Err(_) => {
                return Err(NcsendError::MissingDependency {
                    tool: (*tool).to_owned(),
                    location: "this host".into(),
                })
            }
        }
    }
    Ok(())
}

/// Canonicalize the source path and check it is a regular file.
pub async fn resolve_source(path: &Path) -> Result<ResolvedSource> {
    let missing = || NcsendError::SourceMissing {
        path: path.to_path_buf(),
    };
    let canonical = tokio::fs::canonicalize(path).await.map_err(|_| missing())?;
    let meta = tokio::fs::metadata(&canonical).await.map_err(|_| missing())?;
    if !meta.is_file() {
        return Err(NcsendError::SourceMissing { path: canonical });
    }
    debug!(path = %canonical.display(), len = meta.len(), "source resolved");
    Ok(ResolvedSource {
        path: canonical,
        len: meta.len(),
    })
}

/// Reachability, destination writability and remote tools, in that order.
pub async fn check_remote<R: RemoteShell + ?Sized>(
    remote: &R,
    dest_dir: &str,
    tools: &[&str],
) -> Result<()> {
    let reach = remote.run("true").await?;
    if !reach.success() {
        return Err(NcsendError::ConnectivityFailure {
            target: remote.target().to_owned(),
            detail: if reach.stderr.trim().is_empty() {
                format!("ssh exited with {}", reach.describe_status())
            } else {
                reach.stderr.trim().to_owned()
            },
        });
    }
    debug!(host = remote.target(), "remote reachable");

    let dir = quote(dest_dir);
    let writable = remote
        .run(&format!("[ -d {dir} ] && [ -w {dir} ]"))
        .await?;
    if !writable.success() {
        return Err(NcsendError::DestinationUnwritable {
            target: remote.target().to_owned(),
            dir: dest_dir.to_owned(),
        });
    }
    debug!(dir = dest_dir, "remote directory writable");

    for tool in tools {
        let found = remote
            .run(&format!("command -v {} >/dev/null 2>&1", quote(tool)))
            .await?;
        if !found.success() {
            return Err(NcsendError::MissingDependency {
                tool: (*tool).to_owned(),
                location: remote.target().to_owned(),
            });
        }
    }

    Ok(())
}

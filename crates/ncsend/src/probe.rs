//! Capability probing: which netcat dialect does each side speak?

use ncsend_core::{NcDialect, Result, Role};
use tracing::{debug, warn};

use crate::exec::{quote, LocalShell, RemoteShell};

/// Classify the local sender's netcat.
pub async fn probe_local<L: LocalShell + ?Sized>(local: &L, binary: &str) -> Result<NcDialect> {
    // nc -h exits non-zero on several builds, only the text matters
    let output = local.run(binary, &["-h"]).await?;
    let dialect = NcDialect::classify(&output.combined(), Role::Connect);
    report(dialect, "local");
    Ok(dialect)
}

/// Classify the remote receiver's netcat over the control channel.
pub async fn probe_remote<R: RemoteShell + ?Sized>(remote: &R, binary: &str) -> Result<NcDialect> {
    let output = remote.run(&format!("{} -h 2>&1", quote(binary))).await?;
    let dialect = NcDialect::classify(&output.combined(), Role::Listen);
    report(dialect, remote.target());
    Ok(dialect)
}

fn report(dialect: NcDialect, side: &str) {
    if dialect.is_unknown() {
        warn!(
            side,
            role = ?dialect.role(),
            "could not identify netcat dialect, falling back to legacy flags"
        );
    } else {
        debug!(side, role = ?dialect.role(), %dialect, "netcat dialect detected");
    }
}

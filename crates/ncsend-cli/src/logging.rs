//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "NCSEND_LOG";

const VERBOSE_FILTER: &str = "ncsend=debug,ncsend_cli=debug,ncsend_core=debug";

/// Install the stderr subscriber.
///
/// Without `-v` (and without `NCSEND_LOG`) everything is filtered out; fatal
/// errors are printed separately and always show.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter(verbose));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::new(if verbose { VERBOSE_FILTER } else { "off" })
}

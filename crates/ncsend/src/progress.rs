//! Operator-facing progress for the data stream.
//!
//! The bar draws to stderr. The bytes themselves pass through
//! [`ProgressBar::wrap_async_read`] untouched.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {binary_bytes_per_sec} eta {eta}";

/// Byte-counting bar for a transfer of `len` bytes.
pub fn transfer_bar(len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr()).with_style(style)
}

/// A bar that counts but never draws.
pub fn silent_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::hidden();
    bar.set_length(len);
    bar
}

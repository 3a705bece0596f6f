//! Operator-facing status lines.

use colored::Colorize;
use indicatif::{HumanBytes, HumanDuration};
use ncsend_core::{NcsendError, TransferOutcome, TransferRequest};

/// Print the success summary.
pub fn print_outcome(request: &TransferRequest, outcome: &TransferOutcome) {
    println!(
        "{} Sent {} ({}) to {}:{} in {} ({}/s)",
        "✓".green().bold(),
        request.file_name().cyan(),
        HumanBytes(outcome.bytes_sent),
        request.ssh_target(),
        request.remote_path(),
        HumanDuration(outcome.elapsed),
        HumanBytes(throughput(outcome))
    );

    if let Some(checksums) = &outcome.checksums {
        println!(
            "{} Checksums match: {}",
            "✓".green().bold(),
            checksums.local.dimmed()
        );
    }

    if request.verbose() {
        if let Some(status) = outcome.receiver_status {
            eprintln!("{}", format!("remote receiver exited with status {status}").dimmed());
        }
    }
}

/// Print a fatal error and return the exit status to use.
pub fn print_error(err: &anyhow::Error) -> u8 {
    eprintln!("{} {:#}", "error:".red().bold(), err);

    match err.downcast_ref::<NcsendError>() {
        Some(NcsendError::IntegrityMismatch {
            remote_path,
            local,
            remote,
        }) => {
            eprintln!("  {} {}", "local: ".bold(), local.green());
            eprintln!("  {} {}", "remote:".bold(), remote.red());
            eprintln!("{}", format!("The file was left at {remote_path} for inspection.").dimmed());
            1
        }
        Some(NcsendError::MissingDependency { tool, .. }) => {
            eprintln!("{}", format!("Install `{tool}` and try again.").dimmed());
            1
        }
        Some(e) if e.is_preflight() => {
            eprintln!("{}", "Nothing was sent.".dimmed());
            e.exit_code()
        }
        Some(e) => e.exit_code(),
        None => 1,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn throughput(outcome: &TransferOutcome) -> u64 {
    outcome.throughput() as u64
}

//! CLI argument parsing and the transfer command.

pub mod args;

use std::process::ExitCode;

use anyhow::{Context, Result};
use args::Cli;
use clap::error::ErrorKind;
use clap::Parser;
use ncsend::{preflight, CancellationToken, SshShell, SystemShell, Transfer, TransferOutcome, TransferRequest};
use tracing::debug;

use crate::config::Config;
use crate::{logging, output};

/// Run the CLI application.
pub async fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    logging::init(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(output::print_error(&e)),
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = Config::load().context("could not load configuration")?;
    let transfer_config = config.transfer_config();

    // Nothing else runs until the local tools are known to exist
    preflight::require_tools(&transfer_config.required_local_tools())?;

    let request = TransferRequest::new(cli.file, cli.ip, cli.folder, cli.port, cli.ssh)?
        .with_verify(cli.checksum)
        .with_verbose(cli.verbose);
    debug!(?request, "parsed request");

    let remote = SshShell::new(request.ssh_target(), config.ssh_options.clone());
    let cancel = interrupt_token();

    let outcome: TransferOutcome = Transfer::with_config(&remote, &SystemShell, transfer_config)
        .run(&request, &cancel)
        .await?;

    output::print_outcome(&request, &outcome);
    Ok(())
}

/// Token cancelled on the first Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

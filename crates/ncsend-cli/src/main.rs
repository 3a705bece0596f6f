//! ncsend - push a file over netcat, orchestrated over ssh.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    ncsend_cli::run().await
}

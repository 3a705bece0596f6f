//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Push a file to a LAN host with netcat, orchestrated over ssh
///
/// ssh starts a listener on the destination, then the file is streamed to it
/// over a raw TCP connection. The data channel is not encrypted.
#[derive(Parser, Debug)]
#[command(name = "ncsend")]
#[command(author, version, about, long_about)]
#[command(override_usage = "ncsend [-v] [-a] -f <file> -i <ip> -p <port> -s <ssh-target> -d <folder>")]
pub struct Cli {
    /// Print diagnostics
    #[arg(short = 'v')]
    pub verbose: bool,

    /// File to send
    #[arg(short = 'f', value_name = "FILE")]
    pub file: PathBuf,

    /// Address the destination listens on
    #[arg(short = 'i', value_name = "IP")]
    pub ip: String,

    /// Port for the data channel
    #[arg(short = 'p', value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// ssh target for the control channel (user@host)
    #[arg(short = 's', value_name = "SSH_TARGET")]
    pub ssh: String,

    /// Destination folder on the remote host
    #[arg(short = 'd', value_name = "FOLDER")]
    pub folder: String,

    /// Compare SHA-256 checksums after the transfer
    #[arg(short = 'a')]
    pub checksum: bool,
}

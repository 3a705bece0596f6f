//! Netcat transfers orchestrated over ssh.
//!
//! ssh carries the control traffic: preflight checks, dialect probes, the
//! remote listener and checksums. The file itself goes over a raw netcat
//! stream with no framing.
//!
//! # Example
//!
//! ```rust,ignore
//! use ncsend::{SshShell, SystemShell, Transfer};
//! use ncsend_core::TransferRequest;
//! use tokio_util::sync::CancellationToken;
//!
//! let request = TransferRequest::new("backup.tar", "10.0.0.7", "/srv/in", 9000, "me@box")?
//!     .with_verify(true);
//! let remote = SshShell::new("me@box", vec![]);
//! let outcome = Transfer::new(&remote, &SystemShell)
//!     .run(&request, &CancellationToken::new())
//!     .await?;
//! println!("sent {} bytes", outcome.bytes_sent);
//! ```

#![doc(html_root_url = "https://docs.rs/ncsend/0.3.0")]

pub mod config;
pub mod exec;
pub mod hash;
pub mod preflight;
pub mod probe;
pub mod progress;
pub mod rendezvous;
pub mod transfer;
pub mod verify;

pub use config::TransferConfig;
pub use exec::{CommandOutput, LocalShell, RemoteProcess, RemoteShell, SenderExit, SshShell, SystemShell};
pub use transfer::Transfer;

// Re-export core types
pub use ncsend_core::*;
pub use tokio_util::sync::CancellationToken;

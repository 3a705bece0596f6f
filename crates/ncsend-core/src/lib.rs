//! Core types and errors for the ncsend transfer orchestrator.
//!
//! This crate holds the values passed between the transfer stages:
//!
//! - **Types**: [`TransferRequest`], [`NcDialect`], [`TransferOutcome`]
//! - **Errors**: every fatal condition as an [`NcsendError`]
//!
//! # Example
//!
//! ```rust
//! use ncsend_core::{NcDialect, Role, TransferRequest};
//!
//! let req = TransferRequest::new("backup.tar", "10.0.0.7", "/srv/in/", 9000, "me@box").unwrap();
//! assert_eq!(req.remote_path(), "/srv/in/backup.tar");
//!
//! let dialect = NcDialect::classify("-N  Shutdown the network socket after EOF", Role::Connect);
//! assert_eq!(dialect.connect_args("10.0.0.7", 9000), ["-N", "10.0.0.7", "9000"]);
//! ```

mod error;
pub mod types;

pub use error::{NcsendError, Result};
pub use types::*;

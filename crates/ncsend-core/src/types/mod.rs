//! Values threaded through a transfer run.

mod dialect;
mod outcome;
mod request;

pub use dialect::{NcDialect, Role, LEGACY_CLOSE_FLAG, MODERN_CLOSE_FLAG};
pub use outcome::{ChecksumPair, TransferOutcome};
pub use request::TransferRequest;

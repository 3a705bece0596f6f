//! # ncsend-cli
//!
//! Command-line front end for the ncsend transfer orchestrator.
//!
//! ## Features
//!
//! - **Fixed flag surface**: `-f -i -p -s -d` required, `-v` and `-a` optional
//! - **Integrity check**: `-a` compares SHA-256 on both ends
//! - **Config file**: timing and binary names in `config.toml`
//! - **Clean interrupts**: Ctrl-C stops the remote listener

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;

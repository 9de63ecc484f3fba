//! Startup and setup errors shared by scout crates
//!
//! Runtime failures of the listing and detail services have their own
//! types in `scout_fetch::clients`; this enum only covers what stops a
//! process from starting.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Config file unreadable or unparseable, or a value out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Log filter rejected or subscriber already installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// A dependency (e.g. the HTTP stack) could not be constructed
    #[error("Internal error: {0}")]
    Internal(String),
}

//! # Scout Common Library
//!
//! Shared code for the scout crates:
//! - Error and result types
//! - TOML configuration model and file discovery
//! - Logging initialisation
//! - Human-readable elapsed time formatting

pub mod config;
pub mod error;
pub mod human_time;
pub mod logging;

pub use error::{Error, Result};

//! Collaborator interfaces for the listing and detail services
//!
//! The pipeline only sees these traits; [`http::HttpClient`] implements
//! both against a JSON-over-HTTP service.

pub mod http;

pub use http::{HttpClient, HttpClientConfig};

use crate::model::{Cursor, DetailRecord, ListingPage};
use thiserror::Error;

/// Listing call errors
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Detail call errors
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Body was null or could not be decoded into a record
    #[error("Malformed detail payload: {0}")]
    Malformed(String),
}

/// Paginated identifier listing
#[async_trait::async_trait]
pub trait ListingClient: Send + Sync {
    /// Fetch one page; `None` requests the first page
    async fn list(&self, cursor: Option<&Cursor>) -> Result<ListingPage, ListingError>;
}

/// Per-identifier detail lookup
#[async_trait::async_trait]
pub trait DetailClient: Send + Sync {
    async fn detail(&self, id: &str) -> Result<DetailRecord, DetailError>;
}

/// Validity predicate applied to every fetched record
pub trait Validator: Send + Sync {
    fn is_valid(&self, record: &DetailRecord) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&DetailRecord) -> bool + Send + Sync,
{
    fn is_valid(&self, record: &DetailRecord) -> bool {
        self(record)
    }
}

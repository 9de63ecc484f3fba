//! scout-fetch library interface
//!
//! Paginated discovery feeding a parallel detail fetcher and a bounded
//! top-K selector:
//!
//! ```text
//! ListingClient → Paginator → BatchQueue → DetailWorkerPool → TopKSelector → snapshot
//! ```

pub mod batch_queue;
pub mod clients;
pub mod config;
pub mod model;
pub mod paginator;
pub mod pipeline;
pub mod selector;
pub mod stats;
pub mod validate;
pub mod worker_pool;

pub use crate::config::{AppConfig, Args, OutputFormat, PipelineConfig};
pub use crate::model::{Batch, Cursor, DetailRecord, ListingPage};
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::selector::{OfferOutcome, TopKSelector};
pub use crate::stats::{PaginationEnd, RunSummary};

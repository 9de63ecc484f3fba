//! Per-run counters
//!
//! Shared by the paginator and every detail worker; updated with relaxed
//! atomics and frozen into a [`RunSummary`] once the run ends.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How pagination stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PaginationEnd {
    /// Listing returned a page without a next cursor
    Exhausted,
    /// A listing call failed; later pages were never requested
    Failed { page: usize, error: String },
    /// Run was cancelled before the last page
    Cancelled,
}

impl PaginationEnd {
    /// True when the listing may have had more pages than were fetched
    pub fn is_truncated(&self) -> bool {
        !matches!(self, PaginationEnd::Exhausted)
    }
}

/// Live counters for one pipeline run
#[derive(Debug, Default)]
pub struct RunStats {
    pages_fetched: AtomicUsize,
    ids_listed: AtomicUsize,
    listing_failures: AtomicUsize,
    details_fetched: AtomicUsize,
    detail_failures: AtomicUsize,
    malformed_details: AtomicUsize,
    invalid_records: AtomicUsize,
    records_accepted: AtomicUsize,
    records_evicted: AtomicUsize,
    ids_skipped: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_fetched(&self, ids: usize) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.ids_listed.fetch_add(ids, Ordering::Relaxed);
    }

    pub fn listing_failed(&self) {
        self.listing_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn detail_fetched(&self) {
        self.details_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn detail_failed(&self) {
        self.detail_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn detail_malformed(&self) {
        self.malformed_details.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid(&self) {
        self.invalid_records.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accepted(&self) {
        self.records_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evicted(&self) {
        self.records_evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn id_skipped(&self) {
        self.ids_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A whole queued batch was abandoned unprocessed
    pub fn batch_skipped(&self, ids: usize) {
        self.ids_skipped.fetch_add(ids, Ordering::Relaxed);
    }

    /// Freeze the counters
    pub fn summarize(&self, pagination: PaginationEnd, cancelled: bool) -> RunSummary {
        RunSummary {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            ids_listed: self.ids_listed.load(Ordering::Relaxed),
            listing_failures: self.listing_failures.load(Ordering::Relaxed),
            details_fetched: self.details_fetched.load(Ordering::Relaxed),
            detail_failures: self.detail_failures.load(Ordering::Relaxed),
            malformed_details: self.malformed_details.load(Ordering::Relaxed),
            invalid_records: self.invalid_records.load(Ordering::Relaxed),
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            records_evicted: self.records_evicted.load(Ordering::Relaxed),
            ids_skipped: self.ids_skipped.load(Ordering::Relaxed),
            pagination,
            cancelled,
        }
    }
}

/// Error and progress summary returned alongside the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Listing calls that returned a page
    pub pages_fetched: usize,
    /// Identifiers across all fetched pages
    pub ids_listed: usize,
    /// Listing calls that failed
    pub listing_failures: usize,
    /// Detail calls that returned a record
    pub details_fetched: usize,
    /// Detail calls that failed in transport or with an error status
    pub detail_failures: usize,
    /// Detail responses that could not be decoded
    pub malformed_details: usize,
    /// Records rejected by the validity predicate
    pub invalid_records: usize,
    /// Records that entered the top-K set (including later evictions)
    pub records_accepted: usize,
    /// Records pushed out of the top-K set by better ones
    pub records_evicted: usize,
    /// Identifiers never fetched because the run was cancelled
    pub ids_skipped: usize,
    pub pagination: PaginationEnd,
    pub cancelled: bool,
}

impl RunSummary {
    /// True when no page or identifier was lost to an error or cancellation
    pub fn is_complete(&self) -> bool {
        !self.cancelled
            && !self.pagination.is_truncated()
            && self.listing_failures == 0
            && self.detail_failures == 0
            && self.malformed_details == 0
            && self.ids_skipped == 0
    }
}

//! Parallel detail fetching for one batch
//!
//! Every identifier in the batch is fetched concurrently (up to
//! `max_concurrency` at a time, or all at once when unset). Failed and
//! malformed fetches are logged and dropped; fetched records that pass the
//! validity predicate are offered to the selector.
//!
//! [`DetailWorkerPool::process_batch`] returns only after every identifier
//! has been attempted, so the caller may pop the batch afterwards.

use crate::clients::{DetailClient, DetailError, Validator};
use crate::model::{Batch, DetailRecord};
use crate::selector::{OfferOutcome, TopKSelector};
use crate::stats::RunStats;
use futures::stream::{self, StreamExt};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What happened to a single identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdOutcome {
    Accepted,
    Rejected,
    Invalid,
    Failed,
    Malformed,
    Skipped,
}

/// Per-batch tallies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub sequence: usize,
    pub attempted: usize,
    /// Records entering the selector
    pub accepted: usize,
    /// Valid records not better than the current worst
    pub rejected: usize,
    pub invalid: usize,
    pub failed: usize,
    pub malformed: usize,
    /// Identifiers not fetched because the run was cancelled
    pub skipped: usize,
}

impl BatchOutcome {
    fn tally(sequence: usize, outcomes: &[IdOutcome]) -> Self {
        let mut tally = BatchOutcome {
            sequence,
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                IdOutcome::Accepted => tally.accepted += 1,
                IdOutcome::Rejected => tally.rejected += 1,
                IdOutcome::Invalid => tally.invalid += 1,
                IdOutcome::Failed => tally.failed += 1,
                IdOutcome::Malformed => tally.malformed += 1,
                IdOutcome::Skipped => tally.skipped += 1,
            }
        }
        tally.attempted = outcomes.len() - tally.skipped;
        tally
    }
}

pub struct DetailWorkerPool {
    client: Arc<dyn DetailClient>,
    validator: Arc<dyn Validator>,
    selector: Arc<TopKSelector<DetailRecord>>,
    stats: Arc<RunStats>,
    max_concurrency: Option<NonZeroUsize>,
}

impl DetailWorkerPool {
    pub fn new(
        client: Arc<dyn DetailClient>,
        validator: Arc<dyn Validator>,
        selector: Arc<TopKSelector<DetailRecord>>,
        stats: Arc<RunStats>,
        max_concurrency: Option<NonZeroUsize>,
    ) -> Self {
        Self {
            client,
            validator,
            selector,
            stats,
            max_concurrency,
        }
    }

    /// Fetch, validate and offer every identifier of `batch`
    pub async fn process_batch(&self, batch: &Batch, cancel: &CancellationToken) -> BatchOutcome {
        let width = self
            .max_concurrency
            .map(NonZeroUsize::get)
            .unwrap_or(batch.ids.len())
            .max(1);

        debug!(
            page = batch.sequence,
            ids = batch.ids.len(),
            width,
            "Fetching batch details"
        );

        let outcomes: Vec<IdOutcome> = stream::iter(batch.ids.iter())
            .map(|id| self.process_id(id, cancel))
            .buffer_unordered(width)
            .collect()
            .await;

        BatchOutcome::tally(batch.sequence, &outcomes)
    }

    async fn process_id(&self, id: &str, cancel: &CancellationToken) -> IdOutcome {
        if cancel.is_cancelled() {
            self.stats.id_skipped();
            return IdOutcome::Skipped;
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.client.detail(id) => Some(result),
        };

        let record = match result {
            None => {
                self.stats.id_skipped();
                return IdOutcome::Skipped;
            }
            Some(Ok(record)) => record,
            Some(Err(DetailError::Malformed(reason))) => {
                self.stats.detail_malformed();
                warn!(id = %id, reason = %reason, "Dropping malformed detail payload");
                return IdOutcome::Malformed;
            }
            Some(Err(e)) => {
                self.stats.detail_failed();
                warn!(id = %id, error = %e, "Detail fetch failed");
                return IdOutcome::Failed;
            }
        };
        self.stats.detail_fetched();

        if !self.validator.is_valid(&record) {
            self.stats.record_invalid();
            debug!(id = %id, number = %record.number, "Dropping invalid record");
            return IdOutcome::Invalid;
        }

        match self.selector.offer(record) {
            OfferOutcome::Inserted => {
                self.stats.record_accepted();
                IdOutcome::Accepted
            }
            OfferOutcome::Replaced { evicted } => {
                self.stats.record_accepted();
                self.stats.record_evicted();
                debug!(id = %id, evicted = %evicted.id, "Record displaced current worst");
                IdOutcome::Accepted
            }
            OfferOutcome::Rejected => IdOutcome::Rejected,
        }
    }
}

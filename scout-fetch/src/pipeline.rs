//! Pipeline driver
//!
//! Starts the paginator on its own task and drains the batch queue on the
//! caller's task: wait for the front batch, process it to completion, pop
//! it, repeat until the producer is done and the queue is empty. Batches
//! never overlap, so every detail fetch of batch N finishes before any
//! fetch of batch N+1 starts.

use crate::batch_queue::{BatchQueue, QueueSignal};
use crate::clients::{DetailClient, HttpClient, ListingClient, Validator};
use crate::config::{AppConfig, PipelineConfig};
use crate::model::DetailRecord;
use crate::paginator::Paginator;
use crate::selector::TopKSelector;
use crate::stats::{PaginationEnd, RunStats, RunSummary};
use crate::validate::PhoneNumberValidator;
use crate::worker_pool::DetailWorkerPool;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Final result of one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Top-K records ordered by name
    pub records: Vec<DetailRecord>,
    pub summary: RunSummary,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

pub struct Pipeline {
    config: PipelineConfig,
    listing: Arc<dyn ListingClient>,
    details: Arc<dyn DetailClient>,
    validator: Arc<dyn Validator>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        listing: Arc<dyn ListingClient>,
        details: Arc<dyn DetailClient>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        Self {
            config,
            listing,
            details,
            validator,
        }
    }

    /// HTTP collaborators with phone number validation
    pub fn over_http(config: &AppConfig) -> scout_common::Result<Self> {
        let client = Arc::new(HttpClient::new(&config.http)?);
        Ok(Self::new(
            config.pipeline.clone(),
            client.clone(),
            client,
            Arc::new(PhoneNumberValidator),
        ))
    }

    /// Run pagination and detail fetching to completion
    ///
    /// Cancelling `cancel` (or hitting the configured deadline) stops
    /// pagination, abandons in-flight fetches and returns whatever the
    /// selector holds at that point.
    pub async fn run(&self, cancel: CancellationToken) -> PipelineOutput {
        let start = Instant::now();
        let cancel = cancel.child_token();

        let deadline = self.config.deadline.map(|deadline| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!(deadline = ?deadline, "Deadline reached, cancelling run");
                cancel.cancel();
            })
        });

        let stats = Arc::new(RunStats::new());
        let queue = Arc::new(BatchQueue::new());
        let selector = Arc::new(TopKSelector::new(self.config.result_count));
        let pool = DetailWorkerPool::new(
            Arc::clone(&self.details),
            Arc::clone(&self.validator),
            Arc::clone(&selector),
            Arc::clone(&stats),
            self.config.max_concurrency,
        );

        info!(
            k = self.config.result_count.get(),
            max_concurrency = ?self.config.max_concurrency,
            "Starting pipeline"
        );

        let paginator = Paginator::new(
            Arc::clone(&self.listing),
            Arc::clone(&stats),
            cancel.clone(),
        );
        let producer = tokio::spawn(paginator.run(Arc::clone(&queue)));

        let mut interrupted = false;
        loop {
            let signal = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                signal = queue.next_ready() => Some(signal),
            };

            let batch = match signal {
                Some(QueueSignal::Ready(batch)) => batch,
                Some(QueueSignal::Drained) => break,
                None => {
                    interrupted = true;
                    break;
                }
            };

            let outcome = pool.process_batch(&batch, &cancel).await;
            info!(
                page = outcome.sequence,
                attempted = outcome.attempted,
                accepted = outcome.accepted,
                invalid = outcome.invalid,
                failed = outcome.failed + outcome.malformed,
                held = selector.len(),
                "Batch complete"
            );

            let popped = queue.pop_front();
            debug_assert!(popped.is_some_and(|p| Arc::ptr_eq(&p, &batch)));

            if cancel.is_cancelled() {
                interrupted = true;
                break;
            }
        }

        let pagination = match producer.await {
            Ok(end) => end,
            Err(e) => {
                error!(error = %e, "Paginator task failed");
                PaginationEnd::Failed {
                    page: 0,
                    error: e.to_string(),
                }
            }
        };
        if let Some(deadline) = deadline {
            deadline.abort();
        }

        if interrupted {
            while let Some(batch) = queue.pop_front() {
                debug!(
                    page = batch.sequence,
                    ids = batch.ids.len(),
                    "Abandoning queued batch"
                );
                stats.batch_skipped(batch.ids.len());
            }
        }

        let cancelled = interrupted || pagination == PaginationEnd::Cancelled;
        let summary = stats.summarize(pagination, cancelled);
        let records = selector.snapshot();
        let elapsed = start.elapsed();

        info!(
            records = records.len(),
            pages = summary.pages_fetched,
            ids = summary.ids_listed,
            listing_failures = summary.listing_failures,
            detail_failures = summary.detail_failures,
            malformed = summary.malformed_details,
            invalid = summary.invalid_records,
            cancelled = summary.cancelled,
            elapsed_ms = elapsed.as_millis() as u64,
            "Pipeline finished"
        );

        PipelineOutput {
            records,
            summary,
            elapsed,
        }
    }
}

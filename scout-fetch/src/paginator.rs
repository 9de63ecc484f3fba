//! Sequential pagination producer
//!
//! Each listing call needs the cursor returned by the previous one, so
//! pages are fetched strictly one after another. [`Paginator::run`] pushes
//! every page onto the [`BatchQueue`] and marks the queue done exactly once.

use crate::batch_queue::BatchQueue;
use crate::clients::{ListingClient, ListingError};
use crate::model::{Batch, Cursor};
use crate::stats::{PaginationEnd, RunStats};
use async_stream::stream;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A listing call that failed, with the page number it was fetching
#[derive(Debug)]
pub struct PageFailure {
    pub page: usize,
    pub error: ListingError,
}

/// Marks the queue done when dropped, including on unwind, so the drain
/// loop never waits on a producer that is gone
struct DoneGuard(Arc<BatchQueue>);

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.0.mark_done();
    }
}

pub struct Paginator {
    client: Arc<dyn ListingClient>,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
}

impl Paginator {
    pub fn new(
        client: Arc<dyn ListingClient>,
        stats: Arc<RunStats>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            stats,
            cancel,
        }
    }

    /// Lazy, finite sequence of pages starting from the first page
    ///
    /// Ends after the page without a next cursor, after the first failure
    /// (which is yielded), or when cancelled (nothing further is yielded).
    pub fn into_pages(self) -> impl Stream<Item = Result<Batch, PageFailure>> + Send + 'static {
        let Paginator { client, cancel, .. } = self;

        stream! {
            let mut cursor: Option<Cursor> = None;
            let mut sequence = 0usize;

            loop {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = client.list(cursor.as_ref()) => Some(result),
                };
                let result = match result {
                    Some(result) => result,
                    None => break,
                };

                match result {
                    Ok(page) => {
                        let batch = Batch::new(sequence, page);
                        sequence += 1;
                        cursor = batch.next.clone();
                        let terminal = batch.is_terminal();
                        yield Ok(batch);
                        if terminal {
                            break;
                        }
                    }
                    Err(error) => {
                        yield Err(PageFailure { page: sequence, error });
                        break;
                    }
                }
            }
        }
    }

    /// Drive pagination to the end, feeding `queue`
    pub async fn run(self, queue: Arc<BatchQueue>) -> PaginationEnd {
        let stats = Arc::clone(&self.stats);
        let done = DoneGuard(Arc::clone(&queue));
        let pages = self.into_pages();
        tokio::pin!(pages);

        let mut end = PaginationEnd::Cancelled;

        while let Some(page) = pages.next().await {
            match page {
                Ok(batch) => {
                    stats.page_fetched(batch.ids.len());
                    debug!(
                        page = batch.sequence,
                        ids = batch.ids.len(),
                        next = ?batch.next.as_ref().map(Cursor::as_str),
                        "Listing page fetched"
                    );
                    if batch.is_terminal() {
                        end = PaginationEnd::Exhausted;
                    }
                    queue.enqueue(batch);
                }
                Err(failure) => {
                    stats.listing_failed();
                    warn!(
                        page = failure.page,
                        error = %failure.error,
                        "Listing call failed, stopping pagination"
                    );
                    end = PaginationEnd::Failed {
                        page: failure.page,
                        error: failure.error.to_string(),
                    };
                }
            }
        }

        drop(done);
        info!(end = ?end, "Pagination finished");
        end
    }
}

//! FIFO of pending batches between the paginator and the drain loop
//!
//! Queue contents and the producer's completion flag live under one mutex.
//! The consumer suspends on a [`Notify`] instead of spinning; the length is
//! mirrored in an atomic so [`BatchQueue::is_empty`] never takes the lock.
//!
//! Protocol: the consumer peeks the front batch, processes it to
//! completion, then pops it. The queue does not enforce that order.

use crate::model::Batch;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct QueueState {
    batches: VecDeque<Arc<Batch>>,
    done: bool,
}

/// What the consumer should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSignal {
    /// Front batch, still in the queue
    Ready(Arc<Batch>),
    /// Producer is done and every batch has been popped
    Drained,
}

#[derive(Debug, Default)]
pub struct BatchQueue {
    state: Mutex<QueueState>,
    len: AtomicUsize,
    wakeup: Notify,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a batch and wake the consumer
    pub fn enqueue(&self, batch: Batch) {
        {
            let mut state = self.state();
            state.batches.push_back(Arc::new(batch));
            self.len.store(state.batches.len(), Ordering::Release);
        }
        self.wakeup.notify_one();
    }

    pub fn peek_front(&self) -> Option<Arc<Batch>> {
        self.state().batches.front().cloned()
    }

    /// Remove the front batch once its work is finished
    pub fn pop_front(&self) -> Option<Arc<Batch>> {
        let mut state = self.state();
        let front = state.batches.pop_front();
        self.len.store(state.batches.len(), Ordering::Release);
        front
    }

    /// Lock-free emptiness hint; may be momentarily stale
    pub fn is_empty(&self) -> bool {
        self.len.load(Ordering::Acquire) == 0
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Producer will enqueue nothing further. Idempotent.
    pub fn mark_done(&self) {
        {
            let mut state = self.state();
            state.done = true;
        }
        self.wakeup.notify_one();
    }

    pub fn is_done(&self) -> bool {
        self.state().done
    }

    /// Non-blocking check of both conditions under the lock
    pub fn poll_ready(&self) -> Option<QueueSignal> {
        let state = self.state();
        match state.batches.front() {
            Some(front) => Some(QueueSignal::Ready(Arc::clone(front))),
            None if state.done => Some(QueueSignal::Drained),
            None => None,
        }
    }

    /// Wait until a batch is at the front or the queue is drained
    ///
    /// Single-consumer: `notify_one` stores a permit when nobody is waiting,
    /// so a wakeup between the check and the await is not lost.
    pub async fn next_ready(&self) -> QueueSignal {
        loop {
            if let Some(signal) = self.poll_ready() {
                return signal;
            }
            self.wakeup.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListingPage;
    use std::time::Duration;

    fn batch(sequence: usize, ids: &[&str]) -> Batch {
        Batch::new(
            sequence,
            ListingPage {
                ids: ids.iter().map(|s| s.to_string()).collect(),
                next: None,
            },
        )
    }

    #[test]
    fn test_fifo_peek_then_pop() {
        let queue = BatchQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.peek_front(), None);

        queue.enqueue(batch(0, &["1", "2"]));
        queue.enqueue(batch(1, &["3"]));
        assert_eq!(queue.len(), 2);

        let front = queue.peek_front().unwrap();
        assert_eq!(front.sequence, 0);
        assert_eq!(queue.len(), 2, "peek must not remove");

        let popped = queue.pop_front().unwrap();
        assert!(Arc::ptr_eq(&front, &popped));
        assert_eq!(queue.peek_front().unwrap().sequence, 1);
        queue.pop_front();
        assert!(queue.is_empty());
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn test_drained_requires_done_and_empty() {
        let queue = BatchQueue::new();
        assert_eq!(queue.poll_ready(), None);

        queue.enqueue(batch(0, &["1"]));
        queue.mark_done();
        assert!(matches!(queue.poll_ready(), Some(QueueSignal::Ready(_))));

        queue.pop_front();
        assert_eq!(queue.poll_ready(), Some(QueueSignal::Drained));

        queue.mark_done();
        assert!(queue.is_done());
    }

    #[tokio::test]
    async fn test_next_ready_wakes_on_enqueue() {
        let queue = Arc::new(BatchQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.next_ready().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.enqueue(batch(4, &["x"]));

        let signal = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("consumer should wake")
            .unwrap();
        match signal {
            QueueSignal::Ready(front) => assert_eq!(front.sequence, 4),
            QueueSignal::Drained => panic!("queue was not drained"),
        }
    }

    #[tokio::test]
    async fn test_next_ready_wakes_on_done() {
        let queue = Arc::new(BatchQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.next_ready().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.mark_done();

        let signal = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("consumer should wake")
            .unwrap();
        assert_eq!(signal, QueueSignal::Drained);
    }
}

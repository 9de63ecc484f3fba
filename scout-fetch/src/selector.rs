//! Bounded top-K selector
//!
//! Holds at most K records, kept ascending by rank key so the current worst
//! member is always the last element. All access goes through [`offer`] and
//! [`snapshot`]; a single mutex serialises membership changes.
//!
//! Ties: when a candidate's rank key equals the worst member's, the
//! candidate is rejected, so whichever tied record arrived first keeps the
//! slot. Arrival order between concurrent workers is not defined, so the
//! retained record among equal rank keys is not deterministic.
//!
//! [`offer`]: TopKSelector::offer
//! [`snapshot`]: TopKSelector::snapshot

use crate::model::Ranked;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of a single [`TopKSelector::offer`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome<T> {
    /// Set had room; record added
    Inserted,
    /// Set was full; record displaced the worst member
    Replaced { evicted: T },
    /// Set was full and record was not better than the worst member
    Rejected,
}

/// Thread-safe bounded collection of the K best-ranked records seen so far
#[derive(Debug)]
pub struct TopKSelector<T> {
    capacity: NonZeroUsize,
    members: Mutex<Vec<T>>,
}

impl<T: Ranked + Clone> TopKSelector<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            members: Mutex::new(Vec::with_capacity(capacity.get())),
        }
    }

    /// K
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn members(&self) -> MutexGuard<'_, Vec<T>> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still holds a consistent set.
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offer a candidate record
    pub fn offer(&self, record: T) -> OfferOutcome<T> {
        let mut members = self.members();
        let k = self.capacity.get();

        let outcome = if members.len() < k {
            insert_sorted(&mut members, record);
            OfferOutcome::Inserted
        } else {
            match members.last() {
                Some(worst) if record.rank_key() < worst.rank_key() => {
                    let evicted = members.pop();
                    insert_sorted(&mut members, record);
                    match evicted {
                        Some(evicted) => OfferOutcome::Replaced { evicted },
                        None => OfferOutcome::Inserted,
                    }
                }
                _ => OfferOutcome::Rejected,
            }
        };

        assert!(
            members.len() <= k,
            "top-K selector holds {} records, capacity {}",
            members.len(),
            k
        );

        outcome
    }

    /// Current members ordered by display key ascending
    ///
    /// Members sharing a display key are ordered by rank key. Meant to be
    /// called once the pipeline has finished; calling it earlier returns a
    /// consistent but partial view.
    pub fn snapshot(&self) -> Vec<T> {
        let mut snapshot = self.members().clone();
        snapshot.sort_by(|a, b| {
            a.display_key()
                .cmp(b.display_key())
                .then_with(|| a.rank_key().cmp(&b.rank_key()))
        });
        snapshot
    }

    /// Current members ordered by rank key ascending
    pub fn ranked(&self) -> Vec<T> {
        self.members().clone()
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members().len() >= self.capacity.get()
    }

    /// Rank key of the current worst member
    pub fn worst_rank(&self) -> Option<T::Rank> {
        self.members().last().map(Ranked::rank_key)
    }
}

/// Insert after every member with a rank key <= the record's
fn insert_sorted<T: Ranked>(members: &mut Vec<T>, record: T) {
    let key = record.rank_key();
    let pos = members.partition_point(|m| m.rank_key() <= key);
    members.insert(pos, record);
}

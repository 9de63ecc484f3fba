//! Pipeline data model
//!
//! - [`Cursor`]: opaque pagination token
//! - [`Batch`]: one page of identifiers plus the next cursor
//! - [`DetailRecord`]: one entity's full data
//! - [`Ranked`]: ordering keys used by the top-K selector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque continuation token returned by the listing service
///
/// Never interpreted by the pipeline: it is only handed back to the next
/// listing call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a raw token. Empty or whitespace-only tokens mean "no more pages".
    pub fn from_token(token: Option<String>) -> Option<Self> {
        token.filter(|t| !t.trim().is_empty()).map(Cursor)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One listing response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Identifiers in listing order
    pub ids: Vec<String>,
    /// Cursor for the following page; `None` ends pagination
    pub next: Option<Cursor>,
}

/// A page of identifiers queued for detail fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Zero-based page number, assigned by the paginator
    pub sequence: usize,
    /// Identifiers in listing order
    pub ids: Vec<String>,
    /// Cursor used to fetch the following page
    pub next: Option<Cursor>,
}

impl Batch {
    pub fn new(sequence: usize, page: ListingPage) -> Self {
        Self {
            sequence,
            ids: page.ids,
            next: page.next,
        }
    }

    /// True for the last page of a listing
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}

/// Full details for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Entity identifier
    pub id: String,
    /// Display name, used for presentation order
    pub name: String,
    /// Rank key: smaller is better
    pub age: u32,
    /// Phone number as supplied by the service, checked by the validity predicate
    pub number: String,
}

impl fmt::Display for DetailRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {} {}", self.name, self.age, self.id, self.number)
    }
}

/// Ordering keys used by [`crate::selector::TopKSelector`]
pub trait Ranked {
    /// Key deciding top-K membership; ascending is better
    type Rank: Ord + Copy + fmt::Debug;

    fn rank_key(&self) -> Self::Rank;

    /// Key used to order the final snapshot
    fn display_key(&self) -> &str;
}

impl Ranked for DetailRecord {
    type Rank = u32;

    fn rank_key(&self) -> u32 {
        self.age
    }

    fn display_key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_means_no_more_pages() {
        assert_eq!(Cursor::from_token(None), None);
        assert_eq!(Cursor::from_token(Some(String::new())), None);
        assert_eq!(Cursor::from_token(Some("  ".to_string())), None);
        assert_eq!(
            Cursor::from_token(Some("t2".to_string())).map(|c| c.to_string()),
            Some("t2".to_string())
        );
    }

    #[test]
    fn test_batch_terminal() {
        let page = ListingPage {
            ids: vec!["1".to_string()],
            next: None,
        };
        let batch = Batch::new(3, page);
        assert!(batch.is_terminal());
        assert_eq!(batch.sequence, 3);
    }

    #[test]
    fn test_record_display() {
        let record = DetailRecord {
            id: "42".to_string(),
            name: "Ada".to_string(),
            age: 36,
            number: "(555) 234-5678".to_string(),
        };
        assert_eq!(record.to_string(), "Ada (36) 42 (555) 234-5678");
        assert_eq!(record.rank_key(), 36);
        assert_eq!(record.display_key(), "Ada");
    }
}

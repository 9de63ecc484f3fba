//! Fake collaborators for pipeline tests
//!
//! Both fakes append to a shared event log so tests can check how listing
//! and detail calls interleaved.

#![allow(dead_code)]

use scout_fetch::clients::{DetailClient, DetailError, ListingClient, ListingError};
use scout_fetch::{Cursor, DetailRecord, ListingPage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VALID_NUMBER: &str = "(234) 567-8901";
pub const INVALID_NUMBER: &str = "555-01";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ListStart(Option<String>),
    ListEnd(Option<String>),
    DetailStart(String),
    DetailEnd(String),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn person(id: &str, name: &str, age: u32, number: &str) -> DetailRecord {
    DetailRecord {
        id: id.to_string(),
        name: name.to_string(),
        age,
        number: number.to_string(),
    }
}

/// Listing keyed by the cursor it is called with
pub struct FakeListing {
    pages: HashMap<Option<String>, Result<ListingPage, String>>,
    delay: Duration,
    log: EventLog,
}

impl FakeListing {
    pub fn new(log: EventLog) -> Self {
        Self {
            pages: HashMap::new(),
            delay: Duration::ZERO,
            log,
        }
    }

    /// Page served for `cursor`, pointing at `next`
    pub fn page(mut self, cursor: Option<&str>, ids: &[&str], next: Option<&str>) -> Self {
        self.pages.insert(
            cursor.map(str::to_string),
            Ok(ListingPage {
                ids: ids.iter().map(|s| s.to_string()).collect(),
                next: Cursor::from_token(next.map(str::to_string)),
            }),
        );
        self
    }

    pub fn failing(mut self, cursor: Option<&str>, error: &str) -> Self {
        self.pages
            .insert(cursor.map(str::to_string), Err(error.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl ListingClient for FakeListing {
    async fn list(&self, cursor: Option<&Cursor>) -> Result<ListingPage, ListingError> {
        let key = cursor.map(|c| c.as_str().to_string());
        self.log.lock().unwrap().push(Event::ListStart(key.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.lock().unwrap().push(Event::ListEnd(key.clone()));

        match self.pages.get(&key) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(e)) => Err(ListingError::Network(e.clone())),
            None => Err(ListingError::Api(404, format!("no page for {:?}", key))),
        }
    }
}

enum DetailBehaviour {
    Record(DetailRecord),
    Fail(String),
    Malformed,
}

/// Detail lookup with per-identifier delay
pub struct FakeDetails {
    entries: HashMap<String, (DetailBehaviour, Duration)>,
    default_delay: Duration,
    log: EventLog,
}

impl FakeDetails {
    pub fn new(log: EventLog) -> Self {
        Self {
            entries: HashMap::new(),
            default_delay: Duration::ZERO,
            log,
        }
    }

    pub fn record(mut self, record: DetailRecord) -> Self {
        let delay = self.default_delay;
        self.entries
            .insert(record.id.clone(), (DetailBehaviour::Record(record), delay));
        self
    }

    pub fn record_after(mut self, record: DetailRecord, delay: Duration) -> Self {
        self.entries
            .insert(record.id.clone(), (DetailBehaviour::Record(record), delay));
        self
    }

    pub fn failing(mut self, id: &str, error: &str) -> Self {
        let delay = self.default_delay;
        self.entries.insert(
            id.to_string(),
            (DetailBehaviour::Fail(error.to_string()), delay),
        );
        self
    }

    pub fn malformed(mut self, id: &str) -> Self {
        let delay = self.default_delay;
        self.entries
            .insert(id.to_string(), (DetailBehaviour::Malformed, delay));
        self
    }

    /// Delay applied to entries added after this call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl DetailClient for FakeDetails {
    async fn detail(&self, id: &str) -> Result<DetailRecord, DetailError> {
        self.log
            .lock()
            .unwrap()
            .push(Event::DetailStart(id.to_string()));

        let entry = self.entries.get(id);
        let delay = entry.map(|(_, d)| *d).unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.log
            .lock()
            .unwrap()
            .push(Event::DetailEnd(id.to_string()));

        match entry {
            Some((DetailBehaviour::Record(record), _)) => Ok(record.clone()),
            Some((DetailBehaviour::Fail(e), _)) => Err(DetailError::Network(e.clone())),
            Some((DetailBehaviour::Malformed, _)) => {
                Err(DetailError::Malformed("expected value at line 1".to_string()))
            }
            None => Err(DetailError::NotFound(id.to_string())),
        }
    }
}

/// Position of the first event matching `pred`
pub fn position(log: &[Event], pred: impl Fn(&Event) -> bool) -> Option<usize> {
    log.iter().position(pred)
}

/// Position of the last event matching `pred`
pub fn last_position(log: &[Event], pred: impl Fn(&Event) -> bool) -> Option<usize> {
    log.iter().rposition(pred)
}

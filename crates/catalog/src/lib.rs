use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod course;
pub mod draft;
pub mod registration;
pub mod search;
pub mod seed;

pub use course::DateCourse;
pub use draft::{DraftError, EventCategory, EventDraft, ImageUpload, NewEvent};
pub use registration::{RegistrationError, register};
pub use search::{SearchResult, search_events};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: String,
    /// Human-readable date/time label, e.g. "Today, 14:00 - 16:00".
    pub when: String,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// `None` means unlimited.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub registered: u32,
    pub lat: f64,
    pub lng: f64,
}

impl Event {
    /// Remaining places, `None` when capacity is unlimited.
    pub fn spots_left(&self) -> Option<u32> {
        self.capacity.map(|c| c.saturating_sub(self.registered))
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == Some(0)
    }

    /// Registered / capacity in `[0, 1]`; 0 for unlimited events.
    pub fn fill_ratio(&self) -> f64 {
        match self.capacity {
            Some(0) => 1.0,
            Some(c) => (self.registered as f64 / c as f64).min(1.0),
            None => 0.0,
        }
    }
}

/// A stop of a date course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub minutes: u32,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    /// "45 min", "1 hour", "1.5 hours".
    pub fn time_spent_label(&self) -> String {
        if self.minutes < 60 {
            return format!("{} min", self.minutes);
        }
        if self.minutes == 60 {
            "1 hour".to_string()
        } else if self.minutes % 60 == 0 {
            format!("{} hours", self.minutes / 60)
        } else {
            format!("{:.1} hours", self.minutes as f64 / 60.0)
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub events: BTreeMap<String, Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(String),
    Corrupt(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "event {id} not found"),
            CatalogError::Corrupt(msg) => write!(f, "catalog snapshot corrupt: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

pub trait CatalogStore {
    fn list(&self) -> Result<Vec<Event>, CatalogError>;
    fn get(&self, id: &str) -> Result<Option<Event>, CatalogError>;
    fn upsert(&mut self, event: Event) -> Result<(), CatalogError>;
    fn delete(&mut self, id: &str) -> Result<bool, CatalogError>;
}

/// Like [`CatalogStore::get`], but a missing event is an error.
pub fn require_event<S: CatalogStore + ?Sized>(store: &S, id: &str) -> Result<Event, CatalogError> {
    store.get(id)?.ok_or_else(|| CatalogError::NotFound(id.to_string()))
}

/// Content-derived id: the first 12 hex digits of the blake3 hash.
pub fn content_id(bytes: &[u8]) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex.as_str()[..12].to_string()
}

/// Event store kept in a `BTreeMap`, so listing order is stable (by id).
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    snapshot: CatalogSnapshot,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut store = Self::new();
        for e in events {
            store.snapshot.events.insert(e.id.clone(), e);
        }
        store
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(&self.snapshot).map_err(|e| CatalogError::Corrupt(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let snapshot = serde_json::from_str::<CatalogSnapshot>(json)
            .map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        Ok(Self { snapshot })
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn list(&self) -> Result<Vec<Event>, CatalogError> {
        Ok(self.snapshot.events.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<Event>, CatalogError> {
        Ok(self.snapshot.events.get(id).cloned())
    }

    fn upsert(&mut self, event: Event) -> Result<(), CatalogError> {
        self.snapshot.events.insert(event.id.clone(), event);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, CatalogError> {
        Ok(self.snapshot.events.remove(id).is_some())
    }
}

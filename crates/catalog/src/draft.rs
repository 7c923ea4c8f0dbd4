use base64::Engine as _;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Event, content_id};

/// Format of the start/end inputs (what a `datetime-local` field submits).
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
pub const DEFAULT_CAPACITY: u32 = 30;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Music,
    Art,
    Food,
    Sports,
    Workshop,
    #[default]
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Music,
        EventCategory::Art,
        EventCategory::Food,
        EventCategory::Sports,
        EventCategory::Workshop,
        EventCategory::Other,
    ];

    pub fn value(self) -> &'static str {
        match self {
            EventCategory::Music => "music",
            EventCategory::Art => "art",
            EventCategory::Food => "food",
            EventCategory::Sports => "sports",
            EventCategory::Workshop => "workshop",
            EventCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Music => "Music",
            EventCategory::Art => "Art",
            EventCategory::Food => "Food & Drink",
            EventCategory::Sports => "Sports",
            EventCategory::Workshop => "Workshop",
            EventCategory::Other => "Other",
        }
    }
}

impl std::str::FromStr for EventCategory {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EventCategory::ALL
            .into_iter()
            .find(|c| c.value().eq_ignore_ascii_case(s))
            .ok_or_else(|| DraftError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// `data:<mime>;base64,<payload>`, usable directly as an image source.
    pub fn data_url(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{payload}", self.mime)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    MissingField(&'static str),
    InvalidDate { field: &'static str, value: String },
    EndBeforeStart,
    UnknownCategory(String),
    InvalidImage(String),
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::MissingField(field) => write!(f, "{field} is required"),
            DraftError::InvalidDate { field, value } => {
                write!(f, "{field} must look like YYYY-MM-DDTHH:MM, got {value:?}")
            }
            DraftError::EndBeforeStart => write!(f, "end date is before start date"),
            DraftError::UnknownCategory(c) => write!(f, "unknown category {c:?}"),
            DraftError::InvalidImage(mime) => write!(f, "not an image: {mime}"),
        }
    }
}

impl std::error::Error for DraftError {}

/// Unvalidated input of the "create event" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageUpload>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub category: EventCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data_url: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, DraftError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(DraftError::MissingField(field));
    }
    Ok(v.to_string())
}

fn parse_datetime(value: &str, field: &'static str) -> Result<NaiveDateTime, DraftError> {
    NaiveDateTime::parse_from_str(value, DATETIME_INPUT_FORMAT).map_err(|_| {
        DraftError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

impl EventDraft {
    pub fn validate(&self) -> Result<NewEvent, DraftError> {
        let title = required(&self.title, "title")?;
        let description = required(&self.description, "description")?;
        let location = required(&self.location, "location")?;
        let start_raw = required(&self.start, "start")?;
        let end_raw = required(&self.end, "end")?;

        let start = parse_datetime(&start_raw, "start")?;
        let end = parse_datetime(&end_raw, "end")?;
        if end < start {
            return Err(DraftError::EndBeforeStart);
        }

        let category = if self.category.trim().is_empty() {
            EventCategory::default()
        } else {
            self.category.parse::<EventCategory>()?
        };

        let image_data_url = match &self.image {
            Some(img) if !img.mime.starts_with("image/") => {
                return Err(DraftError::InvalidImage(img.mime.clone()));
            }
            Some(img) => Some(img.data_url()),
            None => None,
        };

        let id = content_id(format!("{title}\0{location}\0{start_raw}").as_bytes());
        Ok(NewEvent {
            id,
            title,
            description,
            location,
            start,
            end,
            category,
            image_data_url,
        })
    }
}

impl NewEvent {
    /// "June 15, 2023, 14:00 - 16:00"; the end date is spelled out only when
    /// it differs from the start date.
    pub fn when_label(&self) -> String {
        let day = "%B %-d, %Y";
        if self.start.date() == self.end.date() {
            format!(
                "{}, {} - {}",
                self.start.format(day),
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )
        } else {
            let full = "%B %-d, %Y, %H:%M";
            format!("{} - {}", self.start.format(full), self.end.format(full))
        }
    }

    /// Catalog entry for this event at the given coordinate.
    pub fn into_event(self, lat: f64, lng: f64) -> Event {
        let when = self.when_label();
        Event {
            id: self.id,
            title: self.title,
            description: Some(self.description),
            location: self.location,
            when,
            category: self.category.label().to_string(),
            image_url: self.image_data_url.unwrap_or_default(),
            organizer: None,
            price: None,
            capacity: Some(DEFAULT_CAPACITY),
            registered: 0,
            lat,
            lng,
        }
    }
}

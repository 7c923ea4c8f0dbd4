use foundation::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Opaque, caller-supplied entity id. Only unique within one entity list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One point of interest shown both on the map and in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedEntity {
    pub id: EntityId,
    pub position: LatLng,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
}

impl LocatedEntity {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64, title: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            position: LatLng::new(lat, lng),
            title: title.into(),
            description: None,
            category: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

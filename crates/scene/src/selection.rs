use runtime::observable::{Observable, SubscriberId};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Where a selection write came from. Consumers react differently per origin:
/// the list does not scroll for its own clicks, the map does not fly for
/// marker clicks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrigin {
    Marker,
    List,
    #[default]
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub id: Option<EntityId>,
    pub origin: SelectionOrigin,
}

/// The single shared "selected entity" value.
///
/// Writes are last-write-wins and never validated against the entity list:
/// an unknown id is a legal selection that simply matches nothing.
#[derive(Debug, Default, Clone)]
pub struct SelectionBridge {
    value: Observable<Selection>,
}

impl SelectionBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&EntityId> {
        self.value.get().id.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        self.value.get()
    }

    pub fn select(&mut self, id: EntityId, origin: SelectionOrigin) -> u64 {
        self.value.set(Selection {
            id: Some(id),
            origin,
        })
    }

    pub fn subscribe(&mut self) -> SubscriberId {
        self.value.subscribe()
    }

    pub fn take_change(&mut self, sub: SubscriberId) -> Option<Selection> {
        self.value.take_change(sub).cloned()
    }
}

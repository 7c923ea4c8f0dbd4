use std::collections::HashMap;

use foundation::geo::LatLng;

use crate::entity::{EntityId, LocatedEntity};

/// The current, ordered list of located entities.
///
/// The list is only ever replaced wholesale. Each replacement bumps the
/// generation so derived layers can tell whether they are stale.
#[derive(Debug, Default, Clone)]
pub struct EntitySet {
    generation: u64,
    entities: Vec<LocatedEntity>,
    by_id: HashMap<EntityId, usize>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities(entities: Vec<LocatedEntity>) -> Self {
        let mut set = Self::new();
        set.replace(entities);
        set
    }

    /// Replaces the whole list and returns the new generation.
    ///
    /// With duplicate ids the first occurrence wins for lookups; every
    /// occurrence is still kept in iteration order.
    pub fn replace(&mut self, entities: Vec<LocatedEntity>) -> u64 {
        self.by_id.clear();
        for (idx, e) in entities.iter().enumerate() {
            self.by_id.entry(e.id.clone()).or_insert(idx);
        }
        self.entities = entities;
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&LocatedEntity> {
        self.by_id.get(id).map(|idx| &self.entities[*idx])
    }

    pub fn position_of(&self, id: &EntityId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocatedEntity> + '_ {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[LocatedEntity] {
        &self.entities
    }

    /// Coordinates in list order.
    pub fn coordinates(&self) -> Vec<LatLng> {
        self.entities.iter().map(|e| e.position).collect()
    }
}

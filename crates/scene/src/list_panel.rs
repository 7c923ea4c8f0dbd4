use serde::Serialize;

use crate::entity::EntityId;
use crate::selection::Selection;
use crate::world::EntitySet;

/// Element id prefix the cards are addressable by.
pub const CARD_ELEMENT_PREFIX: &str = "event-";

pub fn card_element_id(id: &EntityId) -> String {
    format!("{CARD_ELEMENT_PREFIX}{id}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: EntityId,
    pub element_id: String,
    pub title: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBlock {
    Nearest,
    Start,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub element_id: String,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Scrollable list of entity cards.
///
/// The highlighted card is derived from the selected id on every read, so a
/// selection that matches no card simply highlights nothing.
#[derive(Debug, Default, Clone)]
pub struct ListPanel {
    cards: Vec<Card>,
    selected: Option<EntityId>,
    scrolls: Vec<ScrollRequest>,
}

impl ListPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, entities: &EntitySet) {
        self.cards = entities
            .iter()
            .map(|e| Card {
                id: e.id.clone(),
                element_id: card_element_id(&e.id),
                title: e.title.clone(),
                category: e.category.clone(),
                description: e.description.clone(),
            })
            .collect();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: &EntityId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn apply_selection(&mut self, selection: &Selection) {
        self.selected = selection.id.clone();
    }

    pub fn highlighted(&self) -> Option<&Card> {
        self.selected.as_ref().and_then(|id| self.card(id))
    }

    /// Scrolls the card for `id` into view, if such a card exists right now.
    ///
    /// The lookup happens at call time rather than when the scroll was
    /// requested, so a list re-render in between is honored.
    pub fn scroll_into_view(&mut self, id: &EntityId) -> Option<ScrollRequest> {
        let card = self.card(id)?;
        let req = ScrollRequest {
            element_id: card.element_id.clone(),
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Nearest,
        };
        self.scrolls.push(req.clone());
        Some(req)
    }

    pub fn scroll_history(&self) -> &[ScrollRequest] {
        &self.scrolls
    }
}

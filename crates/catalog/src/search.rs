use serde::Serialize;

use crate::Event;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub events: Vec<Event>,
    /// True when nothing matched and every event is shown instead.
    pub fell_back: bool,
}

/// Case-insensitive substring match on title, location or category.
///
/// An empty query matches everything. A query that matches nothing falls
/// back to the full list, so the page never shows an empty map.
pub fn search_events(events: &[Event], query: &str) -> SearchResult {
    let query = query.trim().to_string();
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return SearchResult {
            query,
            events: events.to_vec(),
            fell_back: false,
        };
    }

    let matches: Vec<Event> = events
        .iter()
        .filter(|e| {
            [&e.title, &e.location, &e.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        SearchResult {
            query,
            events: events.to_vec(),
            fell_back: true,
        }
    } else {
        SearchResult {
            query,
            events: matches,
            fell_back: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::search_events;
    use crate::seed::demo_events;
    use pretty_assertions::assert_eq;

    fn ids(events: &[crate::Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn matches_title_location_and_category_ignoring_case() {
        let all = demo_events();
        assert_eq!(ids(&search_events(&all, "JAZZ").events), vec!["2"]);
        assert_eq!(ids(&search_events(&all, "central park").events), vec!["3"]);
        assert_eq!(ids(&search_events(&all, "  conference ").events), vec!["4"]);
    }

    #[test]
    fn empty_query_returns_everything() {
        let r = search_events(&demo_events(), "   ");
        assert_eq!(r.events.len(), 4);
        assert!(!r.fell_back);
    }

    #[test]
    fn no_match_falls_back_to_all() {
        let r = search_events(&demo_events(), "karaoke");
        assert_eq!(r.events.len(), 4);
        assert!(r.fell_back);
        assert_eq!(r.query, "karaoke");
    }
}

use catalog::{DateCourse, Event, Place, SearchResult, search_events};
use foundation::time::Millis;
use runtime::event_bus::Stamped;
use scene::LocatedEntity;
use serde::Serialize;
use tracing::info;
use viewer::{
    FALLBACK_CENTER, HeadlessBackend, MapListSync, SyncEvent, SyncSnapshot, ViewState,
    ViewerConfig,
};

/// Map marker and list card for a catalog event. The location doubles as
/// the popup body.
pub fn event_entity(event: &Event) -> LocatedEntity {
    LocatedEntity::new(event.id.as_str(), event.lat, event.lng, event.title.as_str())
        .with_description(event.location.as_str())
        .with_category(event.category.as_str())
}

pub fn place_entity(place: &Place) -> LocatedEntity {
    LocatedEntity::new(place.id.as_str(), place.lat, place.lng, place.name.as_str())
        .with_category(place.category.as_str())
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageKind {
    Home,
    Search(String),
    Course,
}

impl PageKind {
    pub fn name(&self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Search(_) => "search",
            PageKind::Course => "course",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageReport {
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSummary>,
    pub snapshot: SyncSnapshot,
    pub events: Vec<Stamped<SyncEvent>>,
}

#[derive(Debug, Serialize)]
pub struct SearchSummary {
    pub query: String,
    pub matches: usize,
    pub fell_back: bool,
}

impl From<&SearchResult> for SearchSummary {
    fn from(r: &SearchResult) -> Self {
        Self {
            query: r.query.clone(),
            matches: r.events.len(),
            fell_back: r.fell_back,
        }
    }
}

/// One screen of the app: a map/list pair over some entities.
pub struct Page {
    pub kind: PageKind,
    pub sync: MapListSync<HeadlessBackend>,
    catalog: Vec<Event>,
    search: Option<SearchResult>,
    course: Option<DateCourse>,
}

impl Page {
    pub fn open(kind: PageKind, config: &ViewerConfig, catalog: Vec<Event>, places: Vec<Place>) -> Self {
        let zoom = match kind {
            PageKind::Course => 14.0,
            PageKind::Home | PageKind::Search(_) => 13.0,
        };
        let config = config
            .clone()
            .with_initial_view(ViewState::new(FALLBACK_CENTER, zoom));
        let mut sync = MapListSync::new(HeadlessBackend::new(), config);
        let page_name = kind.name();
        sync.set_on_marker_click(move |id| {
            info!(page = page_name, "marker {id} clicked");
            Ok(())
        });

        let mut page = Self {
            kind: kind.clone(),
            sync,
            catalog,
            search: None,
            course: None,
        };
        match kind {
            PageKind::Home => {
                let entities = page.catalog.iter().map(event_entity).collect();
                page.sync.set_entities(entities);
            }
            PageKind::Search(query) => page.set_query(&query),
            PageKind::Course => {
                page.sync.set_route_enabled(true);
                page.sync
                    .set_entities(places.iter().map(place_entity).collect());
                page.course = Some(DateCourse::new(places));
            }
        }
        page
    }

    /// Re-runs the search with `query` and shows its result.
    pub fn set_query(&mut self, query: &str) {
        let result = search_events(&self.catalog, query);
        info!(
            query = result.query.as_str(),
            fell_back = result.fell_back,
            "search matched {} events",
            result.events.len()
        );
        self.sync
            .set_entities(result.events.iter().map(event_entity).collect());
        self.search = Some(result);
    }

    /// Lets every pending timer fire.
    pub fn settle(&mut self) {
        let horizon = self.sync.config().resize_debounce_ms
            + self.sync.config().restore_delay_ms
            + self.sync.config().scroll_delay_ms
            + self.sync.config().init_retry_ms * u64::from(self.sync.config().max_init_attempts);
        self.sync.advance_by(Millis(horizon));
    }

    pub fn report(&mut self) -> PageReport {
        PageReport {
            page: self.kind.name(),
            summary: self.course.as_ref().map(DateCourse::summary),
            search: self.search.as_ref().map(SearchSummary::from),
            snapshot: self.sync.snapshot(),
            events: self.sync.drain_events(),
        }
    }
}

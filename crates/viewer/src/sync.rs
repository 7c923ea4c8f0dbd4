//! The map/list synchronization controller.
//!
//! [`MapListSync`] owns every piece of the component: the map surface, the
//! derived marker and route layers, the list panel, the shared selection and
//! the resize reconciler. All input arrives through its methods (clicks,
//! size changes, new entity lists) and all delayed work sits in one keyed
//! timer queue that runs when the caller advances the virtual clock.
//!
//! Nothing here blocks and nothing propagates a failure to the caller after
//! a successful mount: backend errors are logged, callback errors are logged
//! and published as [`SyncEvent::CallbackFailed`].

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use foundation::geo::SurfaceSize;
use foundation::time::Millis;
use layers::markers::{MarkerLayer, MarkerSpec};
use layers::route::{PolylineSpec, RouteOverlay};
use layers::{LayerId, SyncReport};
use runtime::event_bus::{EventBus, Stamped};
use runtime::observable::SubscriberId;
use runtime::timers::TimerQueue;
use scene::list_panel::{Card, ListPanel, ScrollRequest};
use scene::selection::{Selection, SelectionBridge, SelectionOrigin};
use scene::{EntityId, EntitySet, LocatedEntity};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::backend::MapBackend;
use crate::config::ViewerConfig;
use crate::error::CallbackError;
use crate::resize::ResizeReconciler;
use crate::surface::MapSurface;
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapStatus {
    Loading,
    Ready,
    /// The map could not be created; `message` replaces it on screen.
    Unavailable { message: String },
    Unmounted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TimerKey {
    Resize,
    Restore,
    Scroll,
    Init,
}

#[derive(Debug, Clone, PartialEq)]
enum SyncTask {
    ResizeSettled,
    RestoreView,
    ScrollIntoView(EntityId),
    RetryInit,
}

/// Notification for the embedding shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    Ready { view: ViewState },
    InitFailed { attempt: u32, error: String },
    Unavailable { message: String },
    EntitiesChanged { count: usize, markers: usize },
    MarkerClicked { id: EntityId },
    SelectionChanged { id: EntityId, origin: SelectionOrigin },
    FlewTo { id: EntityId, view: ViewState },
    FitBounds { view: ViewState },
    ScrolledIntoView { element_id: String },
    ResizeInvalidated { size: SurfaceSize },
    ViewRestored { view: ViewState },
    RouteChanged { drawn: bool },
    CallbackFailed { callback: String, error: String },
    TornDown,
}

pub type ReadyCallback = Box<dyn FnMut(ViewState) -> Result<(), CallbackError>>;
pub type MarkerClickCallback = Box<dyn FnMut(&EntityId) -> Result<(), CallbackError>>;

/// Serializable picture of everything the component currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSnapshot {
    pub now: Millis,
    pub status: MapStatus,
    pub view: ViewState,
    pub size: SurfaceSize,
    pub markers: Vec<MarkerSpec>,
    pub route: Option<PolylineSpec>,
    pub selection: Selection,
    pub highlighted: Option<EntityId>,
    pub cards: Vec<Card>,
    pub scrolls: Vec<ScrollRequest>,
    pub resize_cycles: u64,
    pub pending_timers: usize,
}

pub struct MapListSync<B: MapBackend> {
    config: ViewerConfig,
    now: Millis,
    status: MapStatus,
    surface: MapSurface<B>,
    surface_size: SurfaceSize,
    init_attempts: u32,
    entities: EntitySet,
    markers: MarkerLayer,
    route: RouteOverlay,
    list: ListPanel,
    selection: SelectionBridge,
    map_sub: SubscriberId,
    list_sub: SubscriberId,
    resize: ResizeReconciler,
    timers: TimerQueue<TimerKey, SyncTask>,
    events: EventBus<SyncEvent>,
    on_ready: Option<ReadyCallback>,
    on_marker_click: Option<MarkerClickCallback>,
}

impl<B: MapBackend> MapListSync<B> {
    pub fn new(backend: B, config: ViewerConfig) -> Self {
        let surface = MapSurface::new(backend, config.initial_view, config.zoom);
        let route = RouteOverlay::new(config.route_style.clone());
        let mut selection = SelectionBridge::new();
        let map_sub = selection.subscribe();
        let list_sub = selection.subscribe();
        Self {
            config,
            now: Millis::ZERO,
            status: MapStatus::Loading,
            surface,
            surface_size: SurfaceSize::zero(),
            init_attempts: 0,
            entities: EntitySet::new(),
            markers: MarkerLayer::new(),
            route,
            list: ListPanel::new(),
            selection,
            map_sub,
            list_sub,
            resize: ResizeReconciler::new(),
            timers: TimerQueue::new(),
            events: EventBus::new(),
            on_ready: None,
            on_marker_click: None,
        }
    }

    pub fn set_on_ready(&mut self, cb: impl FnMut(ViewState) -> Result<(), CallbackError> + 'static) {
        self.on_ready = Some(Box::new(cb));
    }

    pub fn set_on_marker_click(
        &mut self,
        cb: impl FnMut(&EntityId) -> Result<(), CallbackError> + 'static,
    ) {
        self.on_marker_click = Some(Box::new(cb));
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == MapStatus::Ready
    }

    pub fn view(&self) -> ViewState {
        self.surface.view()
    }

    pub fn surface(&self) -> &MapSurface<B> {
        &self.surface
    }

    pub fn backend(&self) -> &B {
        self.surface.backend()
    }

    /// Direct backend access, e.g. to simulate a user drag. Follow up with
    /// [`MapListSync::user_moved`].
    pub fn backend_mut(&mut self) -> &mut B {
        self.surface.backend_mut()
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn route(&self) -> &RouteOverlay {
        &self.route
    }

    pub fn list(&self) -> &ListPanel {
        &self.list
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn resize_cycles(&self) -> u64 {
        self.resize.cycles()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn events(&self) -> &[Stamped<SyncEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<SyncEvent>> {
        self.events.drain()
    }

    /// Binds the map to a surface of `size`.
    ///
    /// A failed attempt is retried on the clock until `max_init_attempts` is
    /// reached, after which the status turns [`MapStatus::Unavailable`].
    /// Mounting again while loading or unavailable starts a fresh retry cycle.
    pub fn mount(&mut self, size: SurfaceSize) {
        match self.status {
            MapStatus::Ready => return,
            MapStatus::Unmounted => {
                warn!("mount after unmount ignored");
                return;
            }
            MapStatus::Loading | MapStatus::Unavailable { .. } => {}
        }
        self.status = MapStatus::Loading;
        self.surface_size = size;
        self.init_attempts = 0;
        self.timers.cancel_key(&TimerKey::Init);
        self.try_init();
    }

    fn try_init(&mut self) {
        if self.status != MapStatus::Loading {
            return;
        }
        self.init_attempts += 1;
        let attempt = self.init_attempts;
        let result = self.surface.initialize(
            self.surface_size,
            &self.config.tiles,
            self.config.zoom_control,
        );
        match result {
            Ok(()) => {
                self.timers.cancel_key(&TimerKey::Init);
                self.status = MapStatus::Ready;
                self.redraw_overlays();
                self.fit_to_entities();
                let view = self.surface.view();
                info!(attempt, "map ready with {} markers", self.markers.len());
                self.emit(SyncEvent::Ready { view });
                let outcome = self
                    .on_ready
                    .as_mut()
                    .map(|cb| run_callback(|| cb(view)));
                self.report_callback("on_ready", outcome);
            }
            Err(e) => {
                warn!(attempt, "map initialization failed: {e}");
                self.emit(SyncEvent::InitFailed {
                    attempt,
                    error: e.to_string(),
                });
                if attempt < self.config.max_init_attempts {
                    let due = self.now.after(self.config.init_retry());
                    self.timers
                        .schedule_keyed(TimerKey::Init, due, SyncTask::RetryInit);
                } else {
                    let message = self.config.unavailable_message.clone();
                    error!("giving up on map after {attempt} attempts");
                    self.status = MapStatus::Unavailable {
                        message: message.clone(),
                    };
                    self.emit(SyncEvent::Unavailable { message });
                }
            }
        }
    }

    /// The container changed size. Before the map is ready this only updates
    /// the size the next init attempt uses.
    pub fn set_container_size(&mut self, size: SurfaceSize) {
        self.surface_size = size;
        if !self.is_ready() {
            return;
        }
        self.resize.on_resize(Some(size));
        self.schedule_resize();
    }

    /// The window changed size; the container keeps its last known size but
    /// the rendering buffer is re-validated anyway.
    pub fn window_resize(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.resize.on_resize(None);
        self.schedule_resize();
    }

    fn schedule_resize(&mut self) {
        let due = self.now.after(self.config.resize_debounce());
        self.timers
            .schedule_keyed(TimerKey::Resize, due, SyncTask::ResizeSettled);
    }

    /// Replaces the entity list and re-renders everything derived from it.
    pub fn set_entities(&mut self, entities: Vec<LocatedEntity>) {
        let generation = self.entities.replace(entities);
        self.list.render(&self.entities);
        debug!(generation, "entity list replaced ({})", self.entities.len());
        if self.is_ready() {
            self.redraw_overlays();
            self.fit_to_entities();
        }
        self.emit(SyncEvent::EntitiesChanged {
            count: self.entities.len(),
            markers: self.markers.len(),
        });
    }

    pub fn set_route_enabled(&mut self, enabled: bool) {
        self.route.set_enabled(enabled);
        if self.is_ready() {
            let report = self.route.sync(self.surface.backend_mut(), &self.entities);
            log_report("route", &report);
        }
        let drawn = self.route.is_drawn();
        self.emit(SyncEvent::RouteChanged { drawn });
    }

    fn redraw_overlays(&mut self) {
        let markers = self.markers.sync(self.surface.backend_mut(), &self.entities);
        log_report("markers", &markers);
        let route = self.route.sync(self.surface.backend_mut(), &self.entities);
        log_report("route", &route);
    }

    /// Fits the view to every entity. An empty list leaves the view alone.
    fn fit_to_entities(&mut self) -> Option<ViewState> {
        if self.entities.is_empty() {
            return None;
        }
        self.explicit_move();
        let points = self.entities.coordinates();
        let view = self.surface.fit_bounds(&points, self.config.fit_padding)?;
        self.emit(SyncEvent::FitBounds { view });
        Some(view)
    }

    /// "Show all on map".
    pub fn show_all(&mut self) -> Option<ViewState> {
        if !self.is_ready() {
            return None;
        }
        self.fit_to_entities()
    }

    /// A marker was clicked on the map.
    pub fn click_marker(&mut self, id: &EntityId) {
        self.emit(SyncEvent::MarkerClicked { id: id.clone() });
        let outcome = self
            .on_marker_click
            .as_mut()
            .map(|cb| run_callback(|| cb(id)));
        self.report_callback("on_marker_click", outcome);
        self.write_selection(id.clone(), SelectionOrigin::Marker);
    }

    /// Routes a backend click on a drawn marker. Returns false for handles
    /// that are not markers of this layer.
    pub fn click_marker_layer(&mut self, layer: LayerId) -> bool {
        match self.markers.entity_for(layer).cloned() {
            Some(id) => {
                self.click_marker(&id);
                true
            }
            None => false,
        }
    }

    /// A card was clicked in the list.
    pub fn click_card(&mut self, id: &EntityId) {
        self.write_selection(id.clone(), SelectionOrigin::List);
    }

    /// Selection written by something other than the map or the list.
    pub fn select(&mut self, id: &EntityId) {
        self.write_selection(id.clone(), SelectionOrigin::External);
    }

    fn write_selection(&mut self, id: EntityId, origin: SelectionOrigin) {
        self.selection.select(id.clone(), origin);
        self.emit(SyncEvent::SelectionChanged { id, origin });
        self.react_map();
        self.react_list();
    }

    fn react_map(&mut self) {
        let Some(sel) = self.selection.take_change(self.map_sub) else {
            return;
        };
        if sel.origin == SelectionOrigin::Marker || !self.is_ready() {
            return;
        }
        let Some(id) = sel.id else { return };
        let Some(target) = self.entities.get(&id).map(|e| e.position) else {
            debug!("selected id {id} is not in the entity list");
            return;
        };
        self.explicit_move();
        let view = self.surface.fly_to(
            target,
            self.config.focus_zoom,
            self.config.fly_duration_s,
        );
        self.emit(SyncEvent::FlewTo { id, view });
    }

    fn react_list(&mut self) {
        let Some(sel) = self.selection.take_change(self.list_sub) else {
            return;
        };
        self.list.apply_selection(&sel);
        if sel.origin == SelectionOrigin::List {
            return;
        }
        if let Some(id) = sel.id
            && self.list.card(&id).is_some()
        {
            let due = self.now.after(self.config.scroll_delay());
            self.timers
                .schedule_keyed(TimerKey::Scroll, due, SyncTask::ScrollIntoView(id));
        }
    }

    /// The user panned or zoomed the map directly.
    pub fn user_moved(&mut self) {
        self.explicit_move();
        self.surface.observe_backend_view();
    }

    /// Any explicit view move supersedes a pending resize restore.
    fn explicit_move(&mut self) {
        if self.timers.cancel_key(&TimerKey::Restore) {
            debug!("pending view restore superseded");
        }
        self.resize.cancel_restore();
    }

    /// Advances the virtual clock to `now`, running every timer due on the
    /// way in due order. Time never moves backwards.
    pub fn advance_to(&mut self, now: Millis) {
        while let Some(due) = self.timers.next_due()
            && due <= now
        {
            self.now = self.now.max(due);
            let Some((_, task)) = self.timers.pop_due(due) else {
                break;
            };
            self.run(task);
        }
        self.now = self.now.max(now);
    }

    pub fn advance_by(&mut self, delta: Millis) {
        self.advance_to(self.now.after(delta));
    }

    fn run(&mut self, task: SyncTask) {
        match task {
            SyncTask::RetryInit => self.try_init(),
            SyncTask::ResizeSettled => {
                if self.resize.begin(&mut self.surface).is_some() {
                    let size = self.surface.size();
                    self.emit(SyncEvent::ResizeInvalidated { size });
                    let due = self.now.after(self.config.restore_delay());
                    self.timers
                        .schedule_keyed(TimerKey::Restore, due, SyncTask::RestoreView);
                }
            }
            SyncTask::RestoreView => {
                if let Some(view) = self.resize.finish(&mut self.surface) {
                    self.emit(SyncEvent::ViewRestored { view });
                }
            }
            SyncTask::ScrollIntoView(id) => {
                // Looked up again: the list may have changed since scheduling.
                if let Some(req) = self.list.scroll_into_view(&id) {
                    self.emit(SyncEvent::ScrolledIntoView {
                        element_id: req.element_id,
                    });
                }
            }
        }
    }

    /// Tears everything down. Idempotent; pending timers are dropped.
    pub fn unmount(&mut self) {
        if self.status == MapStatus::Unmounted {
            return;
        }
        let dropped = self.timers.clear();
        if dropped > 0 {
            debug!("dropped {dropped} pending timers on unmount");
        }
        let mut report = self.markers.clear(self.surface.backend_mut());
        report.merge(self.route.clear(self.surface.backend_mut()));
        log_report("unmount", &report);
        self.surface.teardown();
        self.status = MapStatus::Unmounted;
        self.emit(SyncEvent::TornDown);
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            now: self.now,
            status: self.status.clone(),
            view: self.surface.view(),
            size: self.surface.size(),
            markers: self.markers.markers().cloned().collect(),
            route: self.route.line().cloned(),
            selection: self.selection.selection().clone(),
            highlighted: self.list.highlighted().map(|c| c.id.clone()),
            cards: self.list.cards().to_vec(),
            scrolls: self.list.scroll_history().to_vec(),
            resize_cycles: self.resize.cycles(),
            pending_timers: self.timers.len(),
        }
    }

    fn emit(&mut self, event: SyncEvent) {
        self.events.emit(self.now, event);
    }

    fn report_callback(&mut self, name: &str, outcome: Option<Result<(), CallbackError>>) {
        if let Some(Err(e)) = outcome {
            error!("{name} callback failed: {e}");
            self.emit(SyncEvent::CallbackFailed {
                callback: name.to_string(),
                error: e.to_string(),
            });
        }
    }
}

/// Runs a user callback, turning a panic into an error.
fn run_callback<F>(f: F) -> Result<(), CallbackError>
where
    F: FnOnce() -> Result<(), CallbackError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic) => Err(CallbackError::new(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

fn log_report(what: &str, report: &SyncReport) {
    for e in &report.errors {
        warn!("{what}: {e}");
    }
}

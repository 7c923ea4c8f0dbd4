use foundation::geo::SurfaceSize;
use foundation::time::Millis;
use scene::EntityId;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::pages::{Page, PageKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPage {
    #[default]
    Home,
    Search,
    Course,
}

/// A recorded UI session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub page: ScriptPage,
    #[serde(default)]
    pub query: String,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn page_kind(&self) -> PageKind {
        match self.page {
            ScriptPage::Home => PageKind::Home,
            ScriptPage::Search => PageKind::Search(self.query.clone()),
            ScriptPage::Course => PageKind::Course,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Mount { width: f64, height: f64 },
    ClickMarker { id: EntityId },
    ClickCard { id: EntityId },
    Select { id: EntityId },
    Resize { width: f64, height: f64 },
    WindowResize,
    Advance { ms: u64 },
    Route { enabled: bool },
    ShowAll,
    SetQuery { query: String },
    /// User drag on the map, in pixels.
    Drag { dx: f64, dy: f64 },
    Unmount,
}

pub fn run_steps(page: &mut Page, steps: &[Step]) {
    for (i, step) in steps.iter().enumerate() {
        debug!(step = i, at = %page.sync.now(), "{step:?}");
        match step {
            Step::Mount { width, height } => page.sync.mount(SurfaceSize::new(*width, *height)),
            Step::ClickMarker { id } => page.sync.click_marker(id),
            Step::ClickCard { id } => page.sync.click_card(id),
            Step::Select { id } => page.sync.select(id),
            Step::Resize { width, height } => page
                .sync
                .set_container_size(SurfaceSize::new(*width, *height)),
            Step::WindowResize => page.sync.window_resize(),
            Step::Advance { ms } => page.sync.advance_by(Millis(*ms)),
            Step::Route { enabled } => page.sync.set_route_enabled(*enabled),
            Step::ShowAll => {
                if page.sync.show_all().is_none() {
                    warn!("show_all: nothing to fit");
                }
            }
            Step::SetQuery { query } => page.set_query(query),
            Step::Drag { dx, dy } => {
                if page.sync.backend_mut().drag_by(*dx, *dy).is_some() {
                    page.sync.user_moved();
                }
            }
            Step::Unmount => page.sync.unmount(),
        }
    }
}

use std::collections::BTreeMap;

use foundation::geo::SurfaceSize;
use foundation::math::{Vec2, project, unproject};
use layers::markers::MarkerSpec;
use layers::raster::RasterLayer;
use layers::route::PolylineSpec;
use layers::{DrawError, LayerId, OverlayCanvas};
use serde::Serialize;

use crate::backend::{ControlPosition, MapBackend};
use crate::view::{ViewState, ZoomOptions};

/// One call the headless backend received, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BackendCall {
    Attach { size: SurfaceSize },
    SetView { view: ViewState, animate: bool },
    FlyTo { view: ViewState, duration_s: f64 },
    InvalidateSize { size: SurfaceSize },
    Detach,
}

/// Map backend that draws nothing and remembers everything.
///
/// Besides tests, it backs the CLI. Two switches simulate real-world
/// library behavior: `fail_attach` makes context creation fail, and
/// `shift_on_resize` keeps the top-left corner fixed on resize (so the
/// center drifts), which is what tiled web map libraries do when told the
/// container changed size without panning.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    attached: bool,
    size: Option<SurfaceSize>,
    view: Option<ViewState>,
    next_layer: u64,
    tiles: Option<(LayerId, RasterLayer)>,
    zoom_control: Option<ControlPosition>,
    markers: BTreeMap<LayerId, MarkerSpec>,
    polylines: BTreeMap<LayerId, PolylineSpec>,
    calls: Vec<BackendCall>,
    pub fail_attach: bool,
    pub shift_on_resize: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shifting_on_resize() -> Self {
        Self {
            shift_on_resize: true,
            ..Self::default()
        }
    }

    /// Backend whose rendering context can never be created.
    pub fn failing() -> Self {
        Self {
            fail_attach: true,
            ..Self::default()
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    pub fn markers(&self) -> impl Iterator<Item = (LayerId, &MarkerSpec)> + '_ {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn polylines(&self) -> impl Iterator<Item = &PolylineSpec> + '_ {
        self.polylines.values()
    }

    pub fn polyline_count(&self) -> usize {
        self.polylines.len()
    }

    pub fn tiles(&self) -> Option<&RasterLayer> {
        self.tiles.as_ref().map(|(_, t)| t)
    }

    pub fn zoom_control(&self) -> Option<ControlPosition> {
        self.zoom_control
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Simulates the user dragging the map by a pixel offset.
    pub fn drag_by(&mut self, dx: f64, dy: f64) -> Option<ViewState> {
        let view = self.view?;
        let c = project(view.center, view.zoom);
        let moved = ViewState::new(
            unproject(c + Vec2::new(dx, dy), view.zoom),
            view.zoom,
        );
        self.view = Some(moved);
        Some(moved)
    }

    fn alloc_layer(&mut self) -> Result<LayerId, DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        self.next_layer += 1;
        Ok(LayerId(self.next_layer))
    }
}

impl OverlayCanvas for HeadlessBackend {
    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<LayerId, DrawError> {
        let id = self.alloc_layer()?;
        self.markers.insert(id, marker.clone());
        Ok(id)
    }

    fn add_polyline(&mut self, line: &PolylineSpec) -> Result<LayerId, DrawError> {
        let id = self.alloc_layer()?;
        self.polylines.insert(id, line.clone());
        Ok(id)
    }

    fn remove_layer(&mut self, id: LayerId) -> Result<(), DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        let removed = self.markers.remove(&id).is_some()
            || self.polylines.remove(&id).is_some()
            || self.tiles.take_if(|(t, _)| *t == id).is_some();
        if removed {
            Ok(())
        } else {
            Err(DrawError::UnknownLayer(id))
        }
    }
}

impl MapBackend for HeadlessBackend {
    fn attach(&mut self, size: SurfaceSize, _zoom: &ZoomOptions) -> Result<(), DrawError> {
        if self.fail_attach {
            return Err(DrawError::Backend("rendering context unavailable".to_string()));
        }
        if !size.has_area() {
            return Err(DrawError::Backend("container has no size".to_string()));
        }
        self.attached = true;
        self.size = Some(size);
        self.calls.push(BackendCall::Attach { size });
        Ok(())
    }

    fn add_tile_layer(&mut self, tiles: &RasterLayer) -> Result<LayerId, DrawError> {
        let id = self.alloc_layer()?;
        self.tiles = Some((id, tiles.clone()));
        Ok(id)
    }

    fn add_zoom_control(&mut self, position: ControlPosition) -> Result<(), DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        self.zoom_control = Some(position);
        Ok(())
    }

    fn set_view(&mut self, view: ViewState, animate: bool) -> Result<(), DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        self.view = Some(view);
        self.calls.push(BackendCall::SetView { view, animate });
        Ok(())
    }

    fn fly_to(&mut self, view: ViewState, duration_s: f64) -> Result<(), DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        self.view = Some(view);
        self.calls.push(BackendCall::FlyTo { view, duration_s });
        Ok(())
    }

    fn view(&self) -> Option<ViewState> {
        if self.attached { self.view } else { None }
    }

    fn invalidate_size(&mut self, size: SurfaceSize) -> Result<(), DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        let old = self.size.replace(size);
        if self.shift_on_resize
            && let (Some(old), Some(view)) = (old, self.view)
        {
            // Top-left stays put, so the center moves by half the size delta.
            let c = project(view.center, view.zoom);
            let delta = Vec2::new(
                (size.width - old.width) * 0.5,
                (size.height - old.height) * 0.5,
            );
            self.view = Some(ViewState::new(unproject(c + delta, view.zoom), view.zoom));
        }
        self.calls.push(BackendCall::InvalidateSize { size });
        Ok(())
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.markers.clear();
        self.polylines.clear();
        self.tiles = None;
        self.zoom_control = None;
        self.view = None;
        self.calls.push(BackendCall::Detach);
    }
}

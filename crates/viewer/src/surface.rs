use foundation::bounds::LatLngBounds;
use foundation::geo::{LatLng, SurfaceSize};
use layers::LayerId;
use layers::raster::RasterLayer;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::{ControlPosition, MapBackend};
use crate::error::MapError;
use crate::view::{ViewState, ZoomOptions, view_for_bounds};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceState {
    Detached,
    Ready,
    TornDown,
}

/// Owner of the map's rendering context and viewport.
///
/// The surface is the only writer of [`ViewState`]. Moves requested before
/// the context exists are remembered and applied when it comes up.
#[derive(Debug)]
pub struct MapSurface<B: MapBackend> {
    backend: B,
    state: SurfaceState,
    view: ViewState,
    pending_view: Option<ViewState>,
    size: SurfaceSize,
    zoom: ZoomOptions,
    tile_layer: Option<LayerId>,
}

impl<B: MapBackend> MapSurface<B> {
    pub fn new(backend: B, initial_view: ViewState, zoom: ZoomOptions) -> Self {
        Self {
            backend,
            state: SurfaceState::Detached,
            view: initial_view,
            pending_view: None,
            size: SurfaceSize::zero(),
            zoom,
            tile_layer: None,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn zoom_options(&self) -> &ZoomOptions {
        &self.zoom
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access for drawing overlays.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Binds the rendering context to a surface of `size`.
    ///
    /// On error the backend is detached again, so a later retry starts clean.
    pub fn initialize(
        &mut self,
        size: SurfaceSize,
        tiles: &RasterLayer,
        control: ControlPosition,
    ) -> Result<(), MapError> {
        match self.state {
            SurfaceState::Ready => return Ok(()),
            SurfaceState::TornDown => return Err(MapError::TornDown),
            SurfaceState::Detached => {}
        }
        if !size.has_area() {
            return Err(MapError::SurfaceNotSized {
                width: size.width,
                height: size.height,
            });
        }

        if let Err(e) = self.bind(size, tiles, control) {
            self.tile_layer = None;
            self.backend.detach();
            return Err(e);
        }

        self.size = size;
        self.state = SurfaceState::Ready;
        if let Some(v) = self.pending_view.take() {
            self.view = v;
        }
        let view = self.view;
        self.push_view(view, false);
        info!(
            "map initialized at ({:.4}, {:.4}) z{:.1}, {}x{}",
            view.center.lat, view.center.lng, view.zoom, size.width, size.height
        );
        Ok(())
    }

    fn bind(
        &mut self,
        size: SurfaceSize,
        tiles: &RasterLayer,
        control: ControlPosition,
    ) -> Result<(), MapError> {
        self.backend.attach(size, &self.zoom)?;
        self.tile_layer = Some(self.backend.add_tile_layer(tiles)?);
        self.backend.add_zoom_control(control)?;
        Ok(())
    }

    /// Moves the viewport. Before initialization the move is kept as pending.
    pub fn set_view(&mut self, view: ViewState, animate: bool) {
        let view = ViewState::new(view.center, self.zoom.clamp(view.zoom));
        self.view = view;
        if !self.is_ready() {
            debug!("set_view before map is ready; deferring");
            self.pending_view = Some(view);
            return;
        }
        self.push_view(view, animate);
    }

    fn push_view(&mut self, view: ViewState, animate: bool) {
        if let Err(e) = self.backend.set_view(view, animate) {
            warn!("set_view failed: {e}");
        }
    }

    /// Fits the view to `points` padded by `padding` (fraction of the span).
    ///
    /// Returns the applied view, or `None` when there was nothing to fit or
    /// the surface is not ready.
    pub fn fit_bounds(&mut self, points: &[LatLng], padding: f64) -> Option<ViewState> {
        let bounds = LatLngBounds::from_points(points.iter().copied())?;
        if !self.is_ready() {
            debug!("fit_bounds before map is ready; skipped");
            return None;
        }
        let view = view_for_bounds(&bounds.pad(padding), self.size, &self.zoom);
        self.set_view(view, true);
        Some(view)
    }

    /// Animated move to a single point. The view takes the target right away;
    /// the animation itself is not awaited.
    pub fn fly_to(&mut self, point: LatLng, zoom: f64, duration_s: f64) -> ViewState {
        let view = ViewState::new(point, self.zoom.clamp(zoom));
        if !self.is_ready() {
            self.set_view(view, false);
            return view;
        }
        self.view = view;
        if let Err(e) = self.backend.fly_to(view, duration_s) {
            warn!("fly_to failed: {e}");
        }
        view
    }

    /// Records a move the user made directly on the map.
    pub fn observe_backend_view(&mut self) {
        if let Some(v) = self.backend.view() {
            self.view = v;
        }
    }

    pub fn invalidate_size(&mut self, size: SurfaceSize) {
        self.size = size;
        if !self.is_ready() {
            return;
        }
        if let Err(e) = self.backend.invalidate_size(size) {
            warn!("invalidate_size failed: {e}");
        }
    }

    /// Releases the rendering context. Idempotent, and safe after a failed
    /// initialization.
    pub fn teardown(&mut self) {
        if self.state == SurfaceState::TornDown {
            return;
        }
        if let Some(id) = self.tile_layer.take()
            && let Err(e) = self.backend.remove_layer(id)
        {
            debug!("tile layer removal during teardown: {e}");
        }
        self.backend.detach();
        self.pending_view = None;
        self.state = SurfaceState::TornDown;
        info!("map torn down");
    }
}

use foundation::geo::SurfaceSize;
use layers::raster::RasterLayer;
use layers::{DrawError, LayerId, OverlayCanvas};
use serde::{Deserialize, Serialize};

use crate::view::{ViewState, ZoomOptions};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Seam between the sync core and a concrete map library.
///
/// Implementations wrap one rendering context bound to one drawable surface.
/// Every method may fail; the core logs such failures and carries on.
pub trait MapBackend: OverlayCanvas {
    /// Creates the rendering context on a surface of `size`.
    fn attach(&mut self, size: SurfaceSize, zoom: &ZoomOptions) -> Result<(), DrawError>;

    fn add_tile_layer(&mut self, tiles: &RasterLayer) -> Result<LayerId, DrawError>;

    fn add_zoom_control(&mut self, position: ControlPosition) -> Result<(), DrawError>;

    fn set_view(&mut self, view: ViewState, animate: bool) -> Result<(), DrawError>;

    /// Starts an animated transition. Returns immediately.
    fn fly_to(&mut self, view: ViewState, duration_s: f64) -> Result<(), DrawError>;

    /// The view the backend is currently showing, if attached.
    fn view(&self) -> Option<ViewState>;

    /// Re-validates the rendering buffer after the surface changed size.
    ///
    /// Backends are allowed to move the view as a side effect.
    fn invalidate_size(&mut self, size: SurfaceSize) -> Result<(), DrawError>;

    /// Destroys the rendering context and everything drawn on it. Must be
    /// safe to call repeatedly and on a backend that never attached.
    fn detach(&mut self);
}

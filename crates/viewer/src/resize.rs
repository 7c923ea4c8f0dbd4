use foundation::geo::SurfaceSize;
use tracing::debug;

use crate::backend::MapBackend;
use crate::surface::MapSurface;
use crate::view::ViewState;

/// Capture → invalidate → restore around a surface size change.
///
/// Debouncing is the caller's job (it owns the clock); the reconciler only
/// remembers the latest size and the view it has to put back.
#[derive(Debug, Default)]
pub struct ResizeReconciler {
    pending_size: Option<SurfaceSize>,
    captured: Option<ViewState>,
    cycles: u64,
}

impl ResizeReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a size change. `None` means "size unknown, re-read it".
    pub fn on_resize(&mut self, size: Option<SurfaceSize>) {
        if let Some(size) = size {
            self.pending_size = Some(size);
        }
    }

    pub fn pending_size(&self) -> Option<SurfaceSize> {
        self.pending_size
    }

    pub fn captured(&self) -> Option<ViewState> {
        self.captured
    }

    /// Completed restore steps so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// First half of a cycle: remembers the view, then invalidates the
    /// backend at the latest known size. Returns the captured view.
    pub fn begin<B: MapBackend>(&mut self, surface: &mut MapSurface<B>) -> Option<ViewState> {
        if !surface.is_ready() {
            return None;
        }
        let size = self.pending_size.take().unwrap_or(surface.size());
        let view = surface.view();
        self.captured = Some(view);
        surface.invalidate_size(size);
        debug!("resize: invalidated at {}x{}", size.width, size.height);
        Some(view)
    }

    /// Second half: puts the captured view back without animation.
    pub fn finish<B: MapBackend>(&mut self, surface: &mut MapSurface<B>) -> Option<ViewState> {
        let view = self.captured.take()?;
        if !surface.is_ready() {
            return None;
        }
        surface.set_view(view, false);
        self.cycles += 1;
        Some(view)
    }

    /// Drops the captured view; an explicit move superseded it.
    pub fn cancel_restore(&mut self) -> bool {
        self.captured.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::ResizeReconciler;
    use crate::backend::{ControlPosition, MapBackend};
    use crate::headless::HeadlessBackend;
    use crate::surface::MapSurface;
    use crate::view::{ViewState, ZoomOptions};
    use foundation::geo::SurfaceSize;
    use layers::raster::RasterLayer;

    fn ready_surface() -> MapSurface<HeadlessBackend> {
        let mut s = MapSurface::new(
            HeadlessBackend::shifting_on_resize(),
            ViewState::default(),
            ZoomOptions::default(),
        );
        s.initialize(
            SurfaceSize::new(400.0, 300.0),
            &RasterLayer::openstreetmap(),
            ControlPosition::TopRight,
        )
        .unwrap();
        s
    }

    #[test]
    fn cycle_restores_view_on_distorting_backend() {
        let mut s = ready_surface();
        let before = s.view();
        let mut r = ResizeReconciler::new();

        r.on_resize(Some(SurfaceSize::new(900.0, 700.0)));
        r.begin(&mut s).unwrap();
        assert!(!s.backend().view().unwrap().approx_eq(&before, 1e-9));

        r.finish(&mut s).unwrap();
        assert!(s.backend().view().unwrap().approx_eq(&before, 1e-9));
        assert_eq!(s.size(), SurfaceSize::new(900.0, 700.0));
        assert_eq!(r.cycles(), 1);
    }

    #[test]
    fn cancelled_restore_does_nothing() {
        let mut s = ready_surface();
        let mut r = ResizeReconciler::new();
        r.on_resize(Some(SurfaceSize::new(500.0, 300.0)));
        r.begin(&mut s);
        assert!(r.cancel_restore());
        assert!(r.finish(&mut s).is_none());
        assert_eq!(r.cycles(), 0);
    }

    #[test]
    fn not_ready_surface_is_left_alone() {
        let mut s = MapSurface::new(
            HeadlessBackend::new(),
            ViewState::default(),
            ZoomOptions::default(),
        );
        let mut r = ResizeReconciler::new();
        r.on_resize(Some(SurfaceSize::new(500.0, 300.0)));
        assert!(r.begin(&mut s).is_none());
        assert_eq!(r.pending_size(), Some(SurfaceSize::new(500.0, 300.0)));
    }
}

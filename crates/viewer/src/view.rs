use foundation::bounds::LatLngBounds;
use foundation::geo::{LatLng, SurfaceSize};
use foundation::math::{project, unproject};
use serde::{Deserialize, Serialize};

/// Default center used when nothing else is known (Seoul City Hall).
pub const FALLBACK_CENTER: LatLng = LatLng::new(37.5665, 126.9780);
pub const FALLBACK_ZOOM: f64 = 13.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: LatLng,
    pub zoom: f64,
}

impl ViewState {
    pub const fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }

    pub fn approx_eq(&self, other: &ViewState, eps: f64) -> bool {
        self.center.approx_eq(other.center, eps) && (self.zoom - other.zoom).abs() <= eps
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(FALLBACK_CENTER, FALLBACK_ZOOM)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom levels produced by fitting are snapped down to multiples of this.
    pub zoom_snap: f64,
    /// Step of one zoom-control click.
    pub zoom_delta: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0.0,
            max_zoom: 19.0,
            zoom_snap: 0.1,
            zoom_delta: 0.5,
        }
    }
}

impl ZoomOptions {
    /// Clamps into `min_zoom..=max_zoom`. Never panics: with inverted bounds
    /// `max_zoom` wins, and a NaN input resolves to `min_zoom`.
    pub fn clamp(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Both bounds finite and `min_zoom <= max_zoom`.
    pub fn is_valid(&self) -> bool {
        self.min_zoom.is_finite() && self.max_zoom.is_finite() && self.min_zoom <= self.max_zoom
    }

    fn snap_down(&self, zoom: f64) -> f64 {
        if self.zoom_snap <= 0.0 || !zoom.is_finite() {
            return zoom;
        }
        // The epsilon keeps exact multiples (e.g. 15.0) from flooring to 14.9.
        (zoom / self.zoom_snap + 1e-9).floor() * self.zoom_snap
    }
}

/// Largest zoom at which `bounds` fits inside `size`.
///
/// Degenerate bounds (a single point) fit at any zoom, so they resolve to the
/// maximum.
pub fn bounds_zoom(bounds: &LatLngBounds, size: SurfaceSize, opts: &ZoomOptions) -> f64 {
    let nw = project(bounds.north_west(), 0.0);
    let se = project(bounds.south_east(), 0.0);
    let span_x = (se.x - nw.x).abs();
    let span_y = (se.y - nw.y).abs();

    let fit_x = if span_x > 0.0 { size.width / span_x } else { f64::INFINITY };
    let fit_y = if span_y > 0.0 { size.height / span_y } else { f64::INFINITY };
    let scale = fit_x.min(fit_y);
    if scale.is_infinite() {
        return opts.max_zoom;
    }

    opts.clamp(opts.snap_down(scale.log2()))
}

/// View that shows all of `bounds` on a surface of `size`.
pub fn view_for_bounds(bounds: &LatLngBounds, size: SurfaceSize, opts: &ZoomOptions) -> ViewState {
    let zoom = bounds_zoom(bounds, size, opts);
    let nw = project(bounds.north_west(), zoom);
    let se = project(bounds.south_east(), zoom);
    ViewState::new(unproject(nw.midpoint(se), zoom), zoom)
}

#[cfg(test)]
mod tests {
    use super::{ViewState, ZoomOptions, bounds_zoom, view_for_bounds};
    use foundation::bounds::LatLngBounds;
    use foundation::geo::{LatLng, SurfaceSize};
    use foundation::math::project;

    fn seoul_pair() -> LatLngBounds {
        LatLngBounds::from_points([
            LatLng::new(37.5665, 126.9780),
            LatLng::new(37.5730, 126.9768),
        ])
        .unwrap()
    }

    #[test]
    fn fitted_bounds_are_visible() {
        let size = SurfaceSize::new(400.0, 300.0);
        let opts = ZoomOptions::default();
        let b = seoul_pair().pad(0.1);
        let view = view_for_bounds(&b, size, &opts);

        let c = project(view.center, view.zoom);
        for corner in [b.north_west(), b.south_east()] {
            let p = project(corner, view.zoom);
            assert!((p.x - c.x).abs() <= size.width / 2.0 + 1e-6);
            assert!((p.y - c.y).abs() <= size.height / 2.0 + 1e-6);
        }
        assert!(b.contains(view.center));
    }

    #[test]
    fn zoom_is_snapped_down() {
        let opts = ZoomOptions::default();
        let z = bounds_zoom(&seoul_pair(), SurfaceSize::new(400.0, 300.0), &opts);
        let steps = z / opts.zoom_snap;
        assert!((steps - steps.round()).abs() < 1e-6, "{z}");
    }

    #[test]
    fn single_point_uses_max_zoom() {
        let p = LatLng::new(37.5665, 126.9780);
        let b = LatLngBounds::new(p, p);
        let opts = ZoomOptions::default();
        let view = view_for_bounds(&b, SurfaceSize::new(400.0, 300.0), &opts);
        assert_eq!(view.zoom, opts.max_zoom);
        assert!(view.center.approx_eq(p, 1e-9));
    }

    #[test]
    fn larger_surface_never_zooms_out() {
        let opts = ZoomOptions::default();
        let small = bounds_zoom(&seoul_pair(), SurfaceSize::new(200.0, 200.0), &opts);
        let large = bounds_zoom(&seoul_pair(), SurfaceSize::new(800.0, 800.0), &opts);
        assert!(large >= small);
    }

    #[test]
    fn nan_zoom_clamps_to_min() {
        assert_eq!(ZoomOptions::default().clamp(f64::NAN), 0.0);
    }

    #[test]
    fn inverted_range_clamps_without_panicking() {
        let opts = ZoomOptions {
            min_zoom: 18.0,
            max_zoom: 3.0,
            ..ZoomOptions::default()
        };
        assert!(!opts.is_valid());
        assert_eq!(opts.clamp(10.0), 3.0);
        let z = bounds_zoom(&seoul_pair(), SurfaceSize::new(400.0, 600.0), &opts);
        assert_eq!(z, 3.0);
        assert!(ZoomOptions::default().is_valid());
    }

    #[test]
    fn view_approx_eq() {
        let a = ViewState::default();
        let mut b = a;
        b.zoom += 1e-12;
        assert!(a.approx_eq(&b, 1e-9));
    }
}

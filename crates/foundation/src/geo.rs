use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
///
/// No validation happens here: non-finite or out-of-range values are carried
/// through untouched and it is up to the renderer what to make of them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Component-wise comparison with an absolute tolerance in degrees.
    pub fn approx_eq(&self, other: LatLng, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lng - other.lng).abs() <= eps
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Pixel dimensions of a drawable surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// A surface is drawable only when both dimensions are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{LatLng, SurfaceSize};

    #[test]
    fn approx_eq_uses_absolute_tolerance() {
        let a = LatLng::new(37.5665, 126.9780);
        assert!(a.approx_eq(LatLng::new(37.5665 + 1e-10, 126.9780), 1e-9));
        assert!(!a.approx_eq(LatLng::new(37.5666, 126.9780), 1e-9));
    }

    #[test]
    fn zero_sized_surface_has_no_area() {
        assert!(!SurfaceSize::zero().has_area());
        assert!(!SurfaceSize::new(320.0, 0.0).has_area());
        assert!(SurfaceSize::new(320.0, 240.0).has_area());
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!LatLng::new(f64::NAN, 0.0).is_finite());
    }
}

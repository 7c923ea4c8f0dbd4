use super::geodesy::WGS84_A;
use super::vec::Vec2;
use crate::geo::LatLng;

/// Latitude beyond which Web Mercator is clipped.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Edge length of one map tile in pixels at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Pixel scale factor for a (possibly fractional) zoom level.
pub fn zoom_scale(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Inverse of [`zoom_scale`].
pub fn scale_zoom(scale: f64) -> f64 {
    (scale / TILE_SIZE).log2()
}

/// Spherical Mercator projection into meters.
pub fn project_meters(p: LatLng) -> Vec2 {
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = WGS84_A * p.lng.to_radians();
    let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat * 0.5).tan().ln();
    Vec2::new(x, y)
}

pub fn unproject_meters(m: Vec2) -> LatLng {
    let lng = (m.x / WGS84_A).to_degrees();
    let lat = (2.0 * (m.y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LatLng::new(lat, lng)
}

/// Projects to global pixel coordinates at `zoom` (origin at the north-west
/// corner of the world, y grows south).
pub fn project(p: LatLng, zoom: f64) -> Vec2 {
    let m = project_meters(p);
    let k = 0.5 / (std::f64::consts::PI * WGS84_A);
    let s = zoom_scale(zoom);
    Vec2::new(s * (k * m.x + 0.5), s * (-k * m.y + 0.5))
}

pub fn unproject(px: Vec2, zoom: f64) -> LatLng {
    let k = 0.5 / (std::f64::consts::PI * WGS84_A);
    let s = zoom_scale(zoom);
    let mx = (px.x / s - 0.5) / k;
    let my = (px.y / s - 0.5) / -k;
    unproject_meters(Vec2::new(mx, my))
}

use crate::geo::LatLng;

/// WGS84 semi-major axis (meters). Also the sphere radius used by Web Mercator.
pub const WGS84_A: f64 = 6_378_137.0;

/// Great-circle distance on a sphere of radius [`WGS84_A`], in meters.
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng * 0.5).sin().powi(2);
    2.0 * WGS84_A * h.sqrt().min(1.0).asin()
}

/// Total length of an ordered path, in meters.
pub fn path_length_m(points: &[LatLng]) -> f64 {
    points.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

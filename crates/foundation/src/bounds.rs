use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// Axis-aligned geographic bounding box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Minimal box covering `points`, or `None` when there are no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// Grows the box by `ratio` of its span on every side.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buf = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_buf = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Self::new(
            LatLng::new(self.south_west.lat - lat_buf, self.south_west.lng - lng_buf),
            LatLng::new(self.north_east.lat + lat_buf, self.north_east.lng + lng_buf),
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::LatLngBounds;
    use crate::geo::LatLng;

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn covers_all_points() {
        let pts = [
            LatLng::new(37.5665, 126.9780),
            LatLng::new(37.5730, 126.9768),
            LatLng::new(37.5758, 126.9734),
        ];
        let b = LatLngBounds::from_points(pts).unwrap();
        assert_eq!(b.south_west, LatLng::new(37.5665, 126.9734));
        assert_eq!(b.north_east, LatLng::new(37.5758, 126.9780));
        assert!(pts.iter().all(|p| b.contains(*p)));
    }

    #[test]
    fn pad_grows_each_side_by_fraction_of_span() {
        let b = LatLngBounds::new(LatLng::new(0.0, 10.0), LatLng::new(10.0, 30.0));
        let p = b.pad(0.1);
        assert_eq!(p.south_west, LatLng::new(-1.0, 8.0));
        assert_eq!(p.north_east, LatLng::new(11.0, 32.0));
    }
}

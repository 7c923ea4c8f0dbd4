use serde::Serialize;

use crate::Place;

/// An ordered itinerary. The order is the visiting order; nothing is
/// optimized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateCourse {
    pub stops: Vec<Place>,
}

impl DateCourse {
    pub fn new(stops: Vec<Place>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn total_minutes(&self) -> u32 {
        self.stops.iter().map(|p| p.minutes).sum()
    }

    /// Whole hours, rounded down, never below one.
    pub fn approx_hours(&self) -> u32 {
        (self.total_minutes() / 60).max(1)
    }

    pub fn summary(&self) -> String {
        let hours = self.approx_hours();
        let stops = self.len();
        format!(
            "Total time: ~{hours} {} • {stops} {}",
            if hours == 1 { "hour" } else { "hours" },
            if stops == 1 { "stop" } else { "stops" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::DateCourse;
    use crate::seed::demo_places;

    #[test]
    fn demo_course_summary() {
        let course = DateCourse::new(demo_places());
        assert_eq!(course.total_minutes(), 285);
        assert_eq!(course.summary(), "Total time: ~4 hours • 4 stops");
    }

    #[test]
    fn short_course_says_one_hour() {
        let mut places = demo_places();
        places.truncate(1);
        let course = DateCourse::new(places);
        assert_eq!(course.summary(), "Total time: ~1 hour • 1 stop");
    }
}

use foundation::geo::LatLng;
use foundation::math::path_length_m;
use scene::EntitySet;
use serde::Serialize;

use crate::layer::{LayerId, OverlayCanvas, SyncReport};
use crate::symbology::LineStyle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolylineSpec {
    pub points: Vec<LatLng>,
    pub style: LineStyle,
}

impl PolylineSpec {
    pub fn length_m(&self) -> f64 {
        path_length_m(&self.points)
    }
}

/// Optional line through the entities, in the order the caller listed them.
///
/// This is not a computed path: the order is whatever the entity source
/// supplied.
#[derive(Debug, Default)]
pub struct RouteOverlay {
    enabled: bool,
    style: LineStyle,
    line: Option<(LayerId, PolylineSpec)>,
}

impl RouteOverlay {
    pub fn new(style: LineStyle) -> Self {
        Self {
            enabled: false,
            style,
            line: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn line(&self) -> Option<&PolylineSpec> {
        self.line.as_ref().map(|(_, l)| l)
    }

    pub fn is_drawn(&self) -> bool {
        self.line.is_some()
    }

    /// Removes any existing line, then draws a new one iff enabled and at
    /// least two entities are present.
    pub fn sync<C: OverlayCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        entities: &EntitySet,
    ) -> SyncReport {
        let mut report = self.clear(canvas);
        if !self.enabled || entities.len() < 2 {
            return report;
        }

        let spec = PolylineSpec {
            points: entities.coordinates(),
            style: self.style.clone(),
        };
        match canvas.add_polyline(&spec) {
            Ok(id) => {
                self.line = Some((id, spec));
                report.added += 1;
            }
            Err(e) => report.errors.push(e),
        }
        report
    }

    pub fn clear<C: OverlayCanvas + ?Sized>(&mut self, canvas: &mut C) -> SyncReport {
        let mut report = SyncReport::default();
        if let Some((id, _)) = self.line.take() {
            match canvas.remove_layer(id) {
                Ok(()) => report.removed += 1,
                Err(e) => report.errors.push(e),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::RouteOverlay;
    use crate::layer::testing::RecordingCanvas;
    use crate::symbology::LineStyle;
    use foundation::geo::LatLng;
    use pretty_assertions::assert_eq;
    use scene::{EntitySet, LocatedEntity};

    fn pair() -> EntitySet {
        EntitySet::from_entities(vec![
            LocatedEntity::new("1", 37.5665, 126.9780, "a"),
            LocatedEntity::new("2", 37.5730, 126.9768, "b"),
        ])
    }

    #[test]
    fn draws_one_line_through_entities_in_order() {
        let mut canvas = RecordingCanvas::default();
        let mut route = RouteOverlay::new(LineStyle::route());
        route.set_enabled(true);
        route.sync(&mut canvas, &pair());

        assert_eq!(canvas.lines.len(), 1);
        let line = route.line().unwrap();
        assert_eq!(
            line.points,
            vec![LatLng::new(37.5665, 126.9780), LatLng::new(37.5730, 126.9768)]
        );
        assert!(line.style.is_dashed());
        assert!(line.length_m() > 0.0);
    }

    #[test]
    fn disabled_or_short_lists_draw_nothing() {
        let mut canvas = RecordingCanvas::default();
        let mut route = RouteOverlay::new(LineStyle::route());
        route.sync(&mut canvas, &pair());
        assert!(!route.is_drawn());

        route.set_enabled(true);
        let single = EntitySet::from_entities(vec![LocatedEntity::new("1", 0.0, 0.0, "a")]);
        route.sync(&mut canvas, &single);
        assert!(!route.is_drawn());
        assert!(canvas.lines.is_empty());
    }

    #[test]
    fn toggling_off_removes_line() {
        let mut canvas = RecordingCanvas::default();
        let mut route = RouteOverlay::new(LineStyle::route());
        route.set_enabled(true);
        route.sync(&mut canvas, &pair());
        assert!(route.is_drawn());

        route.set_enabled(false);
        let report = route.sync(&mut canvas, &pair());
        assert_eq!(report.removed, 1);
        assert!(!route.is_drawn());
        assert!(canvas.lines.is_empty());
    }

    #[test]
    fn resync_replaces_instead_of_stacking() {
        let mut canvas = RecordingCanvas::default();
        let mut route = RouteOverlay::new(LineStyle::route());
        route.set_enabled(true);
        route.sync(&mut canvas, &pair());
        route.sync(&mut canvas, &pair());
        assert_eq!(canvas.lines.len(), 1);
    }
}

use foundation::geo::LatLng;
use scene::{EntityId, EntitySet, LocatedEntity};
use serde::Serialize;

use crate::layer::{LayerId, OverlayCanvas, SyncReport};
use crate::symbology::MarkerIcon;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub body: String,
}

impl Popup {
    /// Popup markup: bold title, line break, body. Both parts are escaped.
    pub fn to_html(&self) -> String {
        format!("<b>{}</b><br>{}", escape_html(&self.title), escape_html(&self.body))
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Everything a backend needs to draw one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    /// Entity written to the selection when the marker is clicked.
    pub entity: EntityId,
    pub position: LatLng,
    pub popup: Popup,
    #[serde(skip)]
    pub icon: MarkerIcon,
}

impl MarkerSpec {
    pub fn for_entity(entity: &LocatedEntity) -> Self {
        Self {
            entity: entity.id.clone(),
            position: entity.position,
            popup: Popup {
                title: entity.title.clone(),
                body: entity.description.clone().unwrap_or_default(),
            },
            icon: MarkerIcon::default(),
        }
    }
}

/// One marker per entity, rebuilt from scratch on every entity-list change.
///
/// Marker identity is not preserved across syncs; the lists are small and
/// a full clear keeps the 1:1 invariant trivially true.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<(LayerId, MarkerSpec)>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> + '_ {
        self.markers.iter().map(|(_, m)| m)
    }

    /// Entity bound to a drawn marker; used to route backend click events.
    pub fn entity_for(&self, layer: LayerId) -> Option<&EntityId> {
        self.markers
            .iter()
            .find(|(id, _)| *id == layer)
            .map(|(_, m)| &m.entity)
    }

    pub fn layer_for(&self, entity: &EntityId) -> Option<LayerId> {
        self.markers
            .iter()
            .find(|(_, m)| &m.entity == entity)
            .map(|(id, _)| *id)
    }

    /// Removes every drawn marker, then draws one per entity in list order.
    pub fn sync<C: OverlayCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        entities: &EntitySet,
    ) -> SyncReport {
        let mut report = self.clear(canvas);
        for entity in entities.iter() {
            let spec = MarkerSpec::for_entity(entity);
            match canvas.add_marker(&spec) {
                Ok(id) => {
                    self.markers.push((id, spec));
                    report.added += 1;
                }
                Err(e) => report.errors.push(e),
            }
        }
        report
    }

    pub fn clear<C: OverlayCanvas + ?Sized>(&mut self, canvas: &mut C) -> SyncReport {
        let mut report = SyncReport::default();
        for (id, _) in self.markers.drain(..) {
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
    use super::{MarkerLayer, Popup};
    use crate::layer::testing::RecordingCanvas;
    use foundation::geo::LatLng;
    use scene::{EntityId, EntitySet, LocatedEntity};

    fn entities() -> EntitySet {
        EntitySet::from_entities(vec![
            LocatedEntity::new("1", 37.5665, 126.9780, "Community Art Workshop")
                .with_description("Community Center, Room 201"),
            LocatedEntity::new("2", 37.5730, 126.9768, "Jazz Night at Blue Note"),
            LocatedEntity::new("3", 37.5758, 126.9734, "Weekend Farmers Market"),
        ])
    }

    #[test]
    fn one_marker_per_entity_at_its_coordinate() {
        let set = entities();
        let mut canvas = RecordingCanvas::default();
        let mut layer = MarkerLayer::new();

        let report = layer.sync(&mut canvas, &set);
        assert!(report.is_clean());
        assert_eq!(report.added, 3);
        assert_eq!(canvas.markers.len(), 3);

        let drawn: Vec<LatLng> = layer.markers().map(|m| m.position).collect();
        assert_eq!(drawn, set.coordinates());
    }

    #[test]
    fn repeated_sync_does_not_duplicate() {
        let set = entities();
        let mut canvas = RecordingCanvas::default();
        let mut layer = MarkerLayer::new();

        layer.sync(&mut canvas, &set);
        let report = layer.sync(&mut canvas, &set);
        assert_eq!(report.removed, 3);
        assert_eq!(layer.len(), 3);
        assert_eq!(canvas.markers.len(), 3);
    }

    #[test]
    fn empty_list_clears_everything() {
        let mut canvas = RecordingCanvas::default();
        let mut layer = MarkerLayer::new();
        layer.sync(&mut canvas, &entities());
        layer.sync(&mut canvas, &EntitySet::new());
        assert!(layer.is_empty());
        assert!(canvas.markers.is_empty());
    }

    #[test]
    fn click_routing_maps_layer_to_entity() {
        let mut canvas = RecordingCanvas::default();
        let mut layer = MarkerLayer::new();
        layer.sync(&mut canvas, &entities());

        let id = EntityId::new("2");
        let handle = layer.layer_for(&id).unwrap();
        assert_eq!(layer.entity_for(handle), Some(&id));
    }

    #[test]
    fn failed_draws_are_reported_not_fatal() {
        let mut canvas = RecordingCanvas {
            fail_markers: true,
            ..Default::default()
        };
        let mut layer = MarkerLayer::new();
        let report = layer.sync(&mut canvas, &entities());
        assert_eq!(report.errors.len(), 3);
        assert!(layer.is_empty());
    }

    #[test]
    fn popup_escapes_markup() {
        let p = Popup {
            title: "Tom & Jerry".to_string(),
            body: "<script>".to_string(),
        };
        assert_eq!(p.to_html(), "<b>Tom &amp; Jerry</b><br>&lt;script&gt;");
    }
}

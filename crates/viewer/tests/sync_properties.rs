use foundation::geo::{LatLng, SurfaceSize};
use foundation::time::Millis;
use pretty_assertions::assert_eq;
use scene::{EntityId, LocatedEntity};
use viewer::{HeadlessBackend, MapBackend, MapListSync, MapStatus, SyncEvent, ViewState, ViewerConfig};

fn pair() -> Vec<LocatedEntity> {
    vec![
        LocatedEntity::new("1", 37.5665, 126.9780, "Community Art Workshop"),
        LocatedEntity::new("2", 37.5730, 126.9768, "Jazz Night at Blue Note"),
    ]
}

fn four() -> Vec<LocatedEntity> {
    let mut v = pair();
    v.push(LocatedEntity::new("3", 37.5758, 126.9734, "Weekend Farmers Market"));
    v.push(LocatedEntity::new("4", 37.5700, 126.9775, "Tech Conference 2023"));
    v
}

fn mounted(backend: HeadlessBackend) -> MapListSync<HeadlessBackend> {
    let mut sync = MapListSync::new(backend, ViewerConfig::default());
    sync.mount(SurfaceSize::new(375.0, 400.0));
    assert_eq!(sync.status(), &MapStatus::Ready);
    sync
}

#[test]
fn markers_match_entities_one_to_one() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(four());

    let expected: Vec<LatLng> = four().iter().map(|e| e.position).collect();
    let drawn: Vec<LatLng> = sync.markers().markers().map(|m| m.position).collect();
    assert_eq!(drawn, expected);
    assert_eq!(sync.backend().marker_count(), 4);

    let mut on_backend: Vec<LatLng> = sync.backend().markers().map(|(_, m)| m.position).collect();
    on_backend.sort_by(|a, b| a.lat.total_cmp(&b.lat));
    let mut sorted = expected.clone();
    sorted.sort_by(|a, b| a.lat.total_cmp(&b.lat));
    assert_eq!(on_backend, sorted);
}

#[test]
fn same_list_twice_keeps_one_marker_per_entity() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(four());
    sync.set_entities(four());
    assert_eq!(sync.markers().len(), 4);
    assert_eq!(sync.backend().marker_count(), 4);
}

#[test]
fn non_empty_list_fits_every_marker_into_view() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(four());
    let view = sync.view();
    assert!(view.zoom > 13.0 && view.zoom <= 19.0, "{view:?}");
    assert!(
        sync.events()
            .iter()
            .any(|e| matches!(e.event, SyncEvent::FitBounds { .. }))
    );
}

#[test]
fn empty_list_draws_nothing_and_keeps_view() {
    let mut sync = mounted(HeadlessBackend::new());
    let before = sync.view();
    sync.set_route_enabled(true);
    sync.set_entities(Vec::new());

    assert_eq!(sync.backend().marker_count(), 0);
    assert_eq!(sync.backend().polyline_count(), 0);
    assert_eq!(sync.view(), before);
    assert_eq!(sync.show_all(), None);
}

#[test]
fn fit_over_no_points_is_a_no_op() {
    let mut sync = mounted(HeadlessBackend::new());
    let before = sync.view();
    assert_eq!(sync.show_all(), None);
    assert_eq!(sync.view(), before);
}

#[test]
fn unknown_selection_is_harmless() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(four());
    let before = sync.view();

    sync.select(&EntityId::new("404"));
    sync.advance_by(Millis(500));

    assert_eq!(sync.selection().id, Some(EntityId::new("404")));
    assert!(sync.list().highlighted().is_none());
    assert!(sync.list().scroll_history().is_empty());
    assert_eq!(sync.view(), before);
}

#[test]
fn external_selection_flies_and_scrolls() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(four());
    sync.select(&EntityId::new("3"));
    sync.advance_by(Millis(50));

    assert_eq!(
        sync.view(),
        ViewState::new(LatLng::new(37.5758, 126.9734), 15.0)
    );
    assert_eq!(sync.list().scroll_history().len(), 1);
    assert_eq!(sync.list().scroll_history()[0].element_id, "event-3");
}

#[test]
fn resize_restores_view_on_distorting_backend() {
    let mut sync = mounted(HeadlessBackend::shifting_on_resize());
    sync.set_entities(four());
    let before = sync.view();

    sync.set_container_size(SurfaceSize::new(420.0, 400.0));
    sync.advance_by(Millis(40));
    sync.set_container_size(SurfaceSize::new(768.0, 900.0));
    sync.advance_by(Millis(150));

    // Invalidated once, after the burst settled; not restored yet.
    let invalidations = sync
        .events()
        .iter()
        .filter(|e| matches!(e.event, SyncEvent::ResizeInvalidated { .. }))
        .count();
    assert_eq!(invalidations, 1);
    assert!(!sync.backend().view().unwrap().approx_eq(&before, 1e-9));

    sync.advance_by(Millis(50));
    let after = sync.backend().view().unwrap();
    assert!(after.approx_eq(&before, 1e-9), "{before:?} vs {after:?}");
    assert!(sync.view().approx_eq(&before, 1e-9));
    assert_eq!(sync.resize_cycles(), 1);
    assert_eq!(sync.backend().size(), Some(SurfaceSize::new(768.0, 900.0)));
}

#[test]
fn window_resize_also_restores() {
    let mut sync = mounted(HeadlessBackend::shifting_on_resize());
    sync.set_entities(pair());
    let before = sync.view();
    sync.window_resize();
    sync.advance_by(Millis(200));
    assert!(sync.backend().view().unwrap().approx_eq(&before, 1e-9));
    assert_eq!(sync.resize_cycles(), 1);
}

#[test]
fn explicit_move_supersedes_pending_restore() {
    let mut sync = mounted(HeadlessBackend::shifting_on_resize());
    sync.set_entities(four());
    sync.set_container_size(SurfaceSize::new(600.0, 400.0));
    sync.advance_by(Millis(150));

    sync.click_card(&EntityId::new("2"));
    sync.advance_by(Millis(100));

    assert_eq!(sync.resize_cycles(), 0);
    assert_eq!(
        sync.view(),
        ViewState::new(LatLng::new(37.5730, 126.9768), 15.0)
    );
}

#[test]
fn route_drawn_iff_enabled_with_two_or_more() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_route_enabled(true);
    sync.set_entities(vec![pair().remove(0)]);
    assert_eq!(sync.backend().polyline_count(), 0);

    sync.set_entities(four());
    assert_eq!(sync.backend().polyline_count(), 1);

    sync.set_route_enabled(false);
    assert_eq!(sync.backend().polyline_count(), 0);
    assert!(!sync.route().is_drawn());
}

#[test]
fn two_point_route_scenario() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(pair());
    sync.set_route_enabled(true);

    let lines: Vec<_> = sync.backend().polylines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].points,
        vec![LatLng::new(37.5665, 126.9780), LatLng::new(37.5730, 126.9768)]
    );
    assert_eq!(lines[0].style.color, "#3b82f6");

    sync.set_route_enabled(false);
    assert_eq!(sync.backend().polyline_count(), 0);
    assert_eq!(sync.backend().marker_count(), 2);
}

#[test]
fn snapshot_serializes() {
    let mut sync = mounted(HeadlessBackend::new());
    sync.set_entities(pair());
    sync.click_marker(&EntityId::new("1"));
    sync.advance_by(Millis(50));

    let snap = sync.snapshot();
    assert_eq!(snap.markers.len(), 2);
    assert_eq!(snap.highlighted, Some(EntityId::new("1")));
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["status"]["status"], "ready");
    assert_eq!(json["scrolls"][0]["element_id"], "event-1");
}

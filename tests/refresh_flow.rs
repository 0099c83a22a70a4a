//! Refresh + interaction flow over the public API: a drag survives the
//! periodic refetch, gestures compose with the view transform, and the
//! search filter tracks snapshots.

use bevy::math::Vec2;

use netmap::core::gesture::{Gesture, GestureAction};
use netmap::core::model::{Device, DeviceStatus};
use netmap::core::positions::PositionStore;
use netmap::core::search::match_devices;
use netmap::core::viewport::ViewTransform;

fn device(id: i64, hostname: &str, location: Option<&str>) -> Device {
    Device {
        id,
        hostname: hostname.to_string(),
        ip_address: format!("192.168.1.{id}"),
        device_type: "switch".to_string(),
        location_name: location.map(str::to_string),
        status: DeviceStatus::Up,
        cpu_usage: Some(10.0),
        memory_usage: Some(25.0),
    }
}

#[test]
fn dragged_position_survives_periodic_refresh() {
    let devices = vec![
        device(1, "sw-a", Some("DC1")),
        device(2, "sw-b", Some("DC1")),
        device(3, "sw-c", None),
    ];
    let mut store = PositionStore::default();
    store.refresh(&devices, 1280.0, 720.0);

    // Operator drags device 2 somewhere deliberate.
    let view = ViewTransform::default();
    let mut gesture = Gesture::default();
    let start = store.get(2).unwrap();
    gesture.press(Some((2, start)), view.to_screen_space(start), &view);
    let Some(GestureAction::MoveNode { id, to }) =
        gesture.pointer_move(Vec2::new(900.0, 650.0), &view)
    else {
        panic!("expected a node move");
    };
    store.set(id, to);
    assert_eq!(gesture.release(), None, "a drag must not navigate");

    // Two more polls arrive; the drag holds.
    store.refresh(&devices, 1280.0, 720.0);
    store.refresh(&devices, 1280.0, 720.0);
    assert_eq!(store.get(2), Some(to));

    // Untouched devices keep their layout slots too.
    let fresh = {
        let mut s = PositionStore::default();
        s.refresh(&devices, 1280.0, 720.0);
        s
    };
    assert_eq!(store.get(1), fresh.get(1));
    assert_eq!(store.get(3), fresh.get(3));
}

#[test]
fn refresh_mid_drag_does_not_snap_the_node_back() {
    let devices = vec![device(1, "sw-a", Some("DC1")), device(2, "sw-b", Some("DC1"))];
    let mut store = PositionStore::default();
    store.refresh(&devices, 1280.0, 720.0);

    let view = ViewTransform::default();
    let mut gesture = Gesture::default();
    let start = store.get(1).unwrap();
    gesture.press(Some((1, start)), view.to_screen_space(start), &view);

    // First half of the drag...
    if let Some(GestureAction::MoveNode { id, to }) =
        gesture.pointer_move(view.to_screen_space(start + Vec2::new(40.0, 0.0)), &view)
    {
        store.set(id, to);
    }
    // ...a poll lands while the button is still down...
    store.refresh(&devices, 1280.0, 720.0);
    assert_eq!(store.get(1), Some(start + Vec2::new(40.0, 0.0)));

    // ...and the gesture keeps going from where it was.
    if let Some(GestureAction::MoveNode { id, to }) =
        gesture.pointer_move(view.to_screen_space(start + Vec2::new(80.0, 10.0)), &view)
    {
        store.set(id, to);
    }
    assert_eq!(store.get(1), Some(start + Vec2::new(80.0, 10.0)));
}

#[test]
fn drag_under_zoom_and_pan_stays_in_model_space() {
    let mut view = ViewTransform::default();
    view.zoom_by(-5.0); // zoom in to 1.5
    view.pan_by(200.0, -120.0);

    let node_model = Vec2::new(400.0, 300.0);
    let mut store = PositionStore::default();
    store.set(9, node_model);

    // Grab 6 screen px right of center, drag 30 screen px further.
    let grab_screen = view.to_screen_space(node_model) + Vec2::new(6.0, 0.0);
    let mut gesture = Gesture::default();
    gesture.press(Some((9, node_model)), grab_screen, &view);
    let Some(GestureAction::MoveNode { to, .. }) =
        gesture.pointer_move(grab_screen + Vec2::new(30.0, 0.0), &view)
    else {
        panic!("expected a node move");
    };
    // 30 screen px at zoom 1.5 is 20 model units; the grab offset holds.
    assert!((to - (node_model + Vec2::new(20.0, 0.0))).length() < 1e-3);
}

#[test]
fn pan_gesture_moves_view_not_nodes() {
    let mut view = ViewTransform::default();
    let mut gesture = Gesture::default();
    gesture.press(None, Vec2::new(100.0, 100.0), &view);
    let Some(GestureAction::SetPan(pan)) =
        gesture.pointer_move(Vec2::new(160.0, 70.0), &view)
    else {
        panic!("expected a pan");
    };
    view.pan = pan;
    assert_eq!(view.pan, Vec2::new(60.0, -30.0));
    // A model point's screen position shifts by exactly the pan delta.
    assert_eq!(view.to_screen_space(Vec2::ZERO), Vec2::new(60.0, -30.0));
    assert_eq!(gesture.release(), None);
}

#[test]
fn search_filter_tracks_snapshot_contents() {
    let devices = vec![
        device(1, "edge-sw", Some("DC1")),
        device(2, "core-sw", Some("DC1")),
        device(3, "edge-rtr", None),
    ];
    let matched = match_devices("edge", &devices);
    assert_eq!(matched.len(), 2);
    assert!(matched.contains(&1) && matched.contains(&3));

    // Device 3 disappears on the next poll; matches follow the data.
    let matched = match_devices("edge", &devices[..2]);
    assert_eq!(matched.len(), 1);
    assert!(matched.contains(&1));

    let by_ip = match_devices("192.168.1.2", &devices);
    assert_eq!(by_ip.len(), 1);
    assert!(by_ip.contains(&2));
}

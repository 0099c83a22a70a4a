//! Pointer systems: feed Bevy mouse events into the gesture state
//! machine, track hover, and emit click navigation.

use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow};

use crate::core::config::NetmapConfig;
use crate::core::gesture::GestureAction;
use crate::core::model::NodeId;
use crate::core::positions::PositionStore;
use crate::core::resources::{ActiveGesture, HoveredDevice, StatusMessage, Topology};
use crate::core::viewport::ViewTransform;
use crate::render::scene::NODE_HIT_HALF;

/// Fired when a motionless click lands on a device; the handler resolves
/// the device-detail view. One-way call, nothing comes back to the core.
#[derive(Message)]
pub struct DeviceNavigation {
    pub id: NodeId,
}

/// Topmost device whose hit box contains the model-space point.
fn device_at(
    topology: &Topology,
    store: &PositionStore,
    model_pos: Vec2,
) -> Option<(NodeId, Vec2)> {
    for (id, pos) in store.iter() {
        if !topology.graph.device_by_id.contains_key(&id) {
            continue;
        }
        if (model_pos.x - pos.x).abs() <= NODE_HIT_HALF.x
            && (model_pos.y - pos.y).abs() <= NODE_HIT_HALF.y
        {
            return Some((id, pos));
        }
    }
    None
}

/// Pointer-down: a hit on a device starts a drag, empty canvas starts a
/// pan.
pub fn pointer_press_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    view: Res<ViewTransform>,
    topology: Res<Topology>,
    store: Res<PositionStore>,
    mut gesture: ResMut<ActiveGesture>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = window_q.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let hit = device_at(&topology, &store, view.to_model_space(cursor));
    gesture.0.press(hit, cursor, &view);
}

/// Pointer motion: drive the active gesture (drag writes through the
/// position store, pan overwrites the view offset) or, when idle, track
/// hover. The gesture keys off cursor-moved events only, so a press with
/// no motion stays a click; and because the gesture state is kept until
/// release, the pointer can leave and re-enter the window without losing
/// a drag or pan.
pub fn pointer_motion_system(
    mut moves: MessageReader<CursorMoved>,
    topology: Res<Topology>,
    mut view: ResMut<ViewTransform>,
    mut store: ResMut<PositionStore>,
    mut gesture: ResMut<ActiveGesture>,
    mut hovered: ResMut<HoveredDevice>,
) {
    let Some(last) = moves.read().last() else {
        return;
    };
    let cursor = last.position;

    if gesture.0.is_idle() {
        hovered.0 = device_at(&topology, &store, view.to_model_space(cursor)).map(|(id, _)| id);
        return;
    }
    hovered.0 = None;

    let action = gesture.0.pointer_move(cursor, &view);
    match action {
        Some(GestureAction::MoveNode { id, to }) => store.set(id, to),
        Some(GestureAction::SetPan(pan)) => view.pan = pan,
        None => {}
    }
}

/// Pointer-up ends the gesture; a motionless node click becomes a
/// navigation request.
pub fn pointer_release_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut gesture: ResMut<ActiveGesture>,
    mut navigations: MessageWriter<DeviceNavigation>,
) {
    if !mouse_buttons.just_released(MouseButton::Left) {
        return;
    }
    if let Some(id) = gesture.0.release() {
        navigations.write(DeviceNavigation { id });
    }
}

/// Hover is cleared immediately when the pointer leaves the window.
pub fn pointer_leave_system(
    mut left: MessageReader<CursorLeft>,
    mut hovered: ResMut<HoveredDevice>,
) {
    if left.read().last().is_some() {
        hovered.0 = None;
    }
}

/// Resolve a navigation request against the configured detail-URL
/// template. The collaborator boundary ends here: the URL is reported,
/// nothing is awaited.
pub fn handle_navigation_system(
    mut navigations: MessageReader<DeviceNavigation>,
    config: Res<NetmapConfig>,
    topology: Res<Topology>,
    mut status: ResMut<StatusMessage>,
) {
    for nav in navigations.read() {
        let url = config.detail_url(nav.id);
        let hostname = topology
            .graph
            .device_by_id
            .get(&nav.id)
            .map(|d| d.hostname.as_str())
            .unwrap_or("?");
        info!("[NAV] {} -> {}", hostname, url);
        status.set(format!("{hostname}: {url}"), config.status_message_duration);
    }
}

//! Camera control: zoom input and the view-transform → camera sync.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::components::MainCamera;
use crate::core::viewport::ViewTransform;

/// Scroll-wheel zoom. Scroll up zooms in; the view transform clamps the
/// result to its [0.2, 3.0] range.
pub fn camera_zoom_system(
    mut mouse_wheel: MessageReader<bevy::input::mouse::MouseWheel>,
    mut view: ResMut<ViewTransform>,
) {
    for event in mouse_wheel.read() {
        let delta = match event.unit {
            bevy::input::mouse::MouseScrollUnit::Line => event.y,
            bevy::input::mouse::MouseScrollUnit::Pixel => event.y * 0.05,
        };
        view.zoom_by(-delta);
    }
}

/// Keyboard zoom: `=` / `+` to zoom in, `-` to zoom out. Each press is
/// one discrete step through the same clamped range.
pub fn camera_zoom_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut view: ResMut<ViewTransform>,
) {
    let zoom_in = keys.just_pressed(KeyCode::Equal) || keys.just_pressed(KeyCode::NumpadAdd);
    let zoom_out = keys.just_pressed(KeyCode::Minus) || keys.just_pressed(KeyCode::NumpadSubtract);
    if zoom_in {
        view.zoom_by(-1.0);
    }
    if zoom_out {
        view.zoom_by(1.0);
    }
}

/// Derive the orthographic camera from the view transform so that a
/// model point m lands on screen at `m * zoom + pan` (screen space is
/// the window's logical pixels, y-down, origin top-left; world space
/// flips y). Runs after all input systems so picking and rendering see
/// the same frame's transform.
pub fn sync_camera_system(
    view: Res<ViewTransform>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut camera_q: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Ok(window) = window_q.single() else {
        return;
    };
    let Ok((mut transform, mut projection)) = camera_q.single_mut() else {
        return;
    };
    let Projection::Orthographic(ortho) = projection.as_mut() else {
        return;
    };
    ortho.scale = 1.0 / view.zoom;
    transform.translation.x = (window.width() * 0.5 - view.pan.x) / view.zoom;
    transform.translation.y = (view.pan.y - window.height() * 0.5) / view.zoom;
}

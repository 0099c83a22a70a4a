//! Screen ↔ model coordinate mapping.
//!
//! Model space is the layout's coordinate system (y-down, origin at the
//! canvas top-left), independent of zoom and pan. Screen space is the
//! window's logical pixel space with the same orientation, so
//! `screen = model * zoom + pan`. The Bevy camera is derived from this
//! transform each frame (`input::camera::sync_camera_system`); any 2-D
//! renderer exposing point transforms could drive it the same way.

use bevy::prelude::*;

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom change per unit of `zoom_by` delta.
const ZOOM_SENSITIVITY: f32 = 0.1;

/// Process-wide view state. Lives for the app's lifetime; reset only by
/// explicit user action.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Vec2::ZERO }
    }
}

impl ViewTransform {
    /// Adjust zoom by a wheel/button delta. Positive delta zooms out,
    /// negative zooms in; the result is clamped to [0.2, 3.0]. Zoom is
    /// anchored at the transform origin, not the cursor — a deliberate
    /// simplification.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom - delta * ZOOM_SENSITIVITY).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Unconditional translation update.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Inverse affine transform: pointer-event screen coordinates into
    /// model space. Dragging computes deltas here so they live in the
    /// same space as stored positions.
    pub fn to_model_space(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }

    pub fn to_screen_space(&self, model: Vec2) -> Vec2 {
        model * self.zoom + self.pan
    }

    /// Pan so that `model` sits at the center of a viewport of the given
    /// logical size. Used by the jump-to-device finder.
    pub fn center_on(&mut self, model: Vec2, viewport: Vec2) {
        self.pan = viewport * 0.5 - model * self.zoom;
    }
}

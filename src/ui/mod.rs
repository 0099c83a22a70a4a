//! Immediate-mode UI overlays via bevy_egui.

pub mod fuzzy;
pub mod overlay;

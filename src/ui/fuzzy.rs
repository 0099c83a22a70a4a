//! Fuzzy finder overlay — press `/` to jump to a device by name or IP.
//!
//! Uses `fuzzy-matcher` (skim algorithm) for scoring. Results are ranked
//! and selecting one centers the view on that device. This is separate
//! from the toolbar search box, which is a plain substring filter that
//! fades the scene.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::core::model::NodeId;
use crate::core::positions::PositionStore;
use crate::core::resources::Topology;
use crate::core::viewport::ViewTransform;

/// Resource controlling the fuzzy finder overlay state.
#[derive(Resource, Default)]
pub struct FuzzyFinderState {
    pub is_open: bool,
    pub query: String,
    pub needs_focus: bool,
}

/// Toggle the finder with `/`. Gated behind "egui is not consuming
/// keyboard input" at the schedule level so typing in the search box
/// never opens it.
pub fn fuzzy_toggle_system(keys: Res<ButtonInput<KeyCode>>, mut finder: ResMut<FuzzyFinderState>) {
    if keys.just_pressed(KeyCode::Slash) {
        finder.is_open = !finder.is_open;
        if finder.is_open {
            finder.query.clear();
            finder.needs_focus = true;
        }
    }
}

/// The egui overlay that renders the fuzzy finder window.
pub fn fuzzy_finder_ui_system(
    mut contexts: EguiContexts,
    mut finder: ResMut<FuzzyFinderState>,
    mut view: ResMut<ViewTransform>,
    topology: Res<Topology>,
    store: Res<PositionStore>,
    window_q: Query<&Window, With<PrimaryWindow>>,
) {
    if !finder.is_open {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    // Collect and score all devices.
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(NodeId, String, i64)> = Vec::new();
    for device in topology.graph.device_by_id.values() {
        let haystack = format!("{} {}", device.hostname, device.ip_address);
        if finder.query.is_empty() {
            scored.push((device.id, haystack, 0));
        } else if let Some(score) = matcher.fuzzy_match(&haystack, &finder.query) {
            scored.push((device.id, haystack, score));
        }
    }
    scored.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
    scored.truncate(15);

    let mut should_close = false;
    let mut jump_target: Option<NodeId> = None;

    egui::Window::new("Find device")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
        .default_width(400.0)
        .show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut finder.query)
                    .hint_text("Jump to device...")
                    .desired_width(f32::INFINITY),
            );
            if finder.needs_focus {
                response.request_focus();
                finder.needs_focus = false;
            }

            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            let esc = ui.input(|i| i.key_pressed(egui::Key::Escape));
            if esc {
                should_close = true;
                return;
            }

            ui.add_space(4.0);

            for (id, label, _score) in &scored {
                if ui.selectable_label(false, label).clicked() || (enter && jump_target.is_none()) {
                    jump_target = Some(*id);
                    should_close = true;
                }
            }

            if scored.is_empty() && !finder.query.is_empty() {
                ui.label(
                    egui::RichText::new("No matches")
                        .color(egui::Color32::GRAY)
                        .italics(),
                );
            }
        });

    if should_close {
        finder.is_open = false;
    }

    if let Some(id) = jump_target {
        if let Some(model_pos) = store.get(id) {
            let viewport = window_q
                .single()
                .map(|w| Vec2::new(w.width(), w.height()))
                .unwrap_or(Vec2::new(1280.0, 720.0));
            view.center_on(model_pos, viewport);
            info!("[FUZZY] centered on device {id}");
        }
    }
}

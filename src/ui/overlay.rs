//! Toolbar, status bar, legend, and the empty/error overlays.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::core::config::NetmapConfig;
use crate::core::model::DeviceStatus;
use crate::core::resources::{
    FetchPhase, HoveredDevice, SearchState, StatusMessage, Topology,
};
use crate::core::viewport::ViewTransform;
use crate::net::{PollCommand, PollCommands};

/// Legend visibility, toggled from the toolbar.
#[derive(Resource)]
pub struct LegendState {
    pub is_open: bool,
}

impl Default for LegendState {
    fn default() -> Self {
        Self { is_open: true }
    }
}

fn status_color32(status: DeviceStatus) -> egui::Color32 {
    match status {
        DeviceStatus::Up => egui::Color32::from_rgb(64, 184, 89),
        DeviceStatus::Down => egui::Color32::from_rgb(217, 64, 56),
        DeviceStatus::Degraded => egui::Color32::from_rgb(242, 153, 38),
        DeviceStatus::Unknown => egui::Color32::from_rgb(140, 145, 153),
    }
}

/// Top bar: live search box, zoom controls, refresh/discover triggers.
pub fn ui_top_bar_system(
    mut contexts: EguiContexts,
    mut search: ResMut<SearchState>,
    mut view: ResMut<ViewTransform>,
    mut legend: ResMut<LegendState>,
    mut status: ResMut<StatusMessage>,
    config: Res<NetmapConfig>,
    commands: Res<PollCommands>,
    topology: Res<Topology>,
    phase: Res<FetchPhase>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::top("top_bar")
        .default_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search");
                // Edit a copy so the resource's change tick only moves
                // on real keystrokes (match recompute keys off it).
                let mut query = search.query.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut query)
                        .hint_text("hostname or IP...")
                        .desired_width(220.0),
                );
                if response.changed() {
                    search.query = query;
                }
                if !search.query.is_empty() && ui.small_button("✕").clicked() {
                    search.query.clear();
                }

                ui.separator();

                if ui.button("−").on_hover_text("Zoom out").clicked() {
                    view.zoom_by(1.0);
                }
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    view.zoom_by(-1.0);
                }
                if ui.button("Reset View").clicked() {
                    view.reset();
                }
                ui.label(
                    egui::RichText::new(format!("{:.0}%", view.zoom * 100.0))
                        .color(egui::Color32::GRAY),
                );

                ui.separator();

                if ui.button("Refresh").clicked() {
                    if commands.0.send(PollCommand::Refresh).is_ok() {
                        status.set("Refreshing...", config.status_message_duration);
                    }
                }
                if ui.button("Discover").clicked()
                    && commands.0.send(PollCommand::Discover).is_err()
                {
                    status.set("Poller is not running", config.status_message_duration);
                }
                if ui.button("Legend").clicked() {
                    legend.is_open = !legend.is_open;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let summary = match &*phase {
                        FetchPhase::Connecting => "connecting...".to_string(),
                        FetchPhase::Failed(_) => "backend unreachable".to_string(),
                        FetchPhase::Live => format!(
                            "{} devices, {} links",
                            topology.graph.device_count(),
                            topology.graph.links.len()
                        ),
                    };
                    ui.label(egui::RichText::new(summary).color(egui::Color32::DARK_GRAY));
                });
            });
        });
}

/// Bottom bar: transient status text on the left, hover details on the
/// right (status, CPU, memory).
pub fn ui_bottom_bar_system(
    mut contexts: EguiContexts,
    status: Res<StatusMessage>,
    hovered: Res<HoveredDevice>,
    topology: Res<Topology>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::bottom("bottom_bar")
        .default_height(26.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if status.timer > 0.0 {
                    ui.label(&status.text);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let Some(device) =
                        hovered.0.and_then(|id| topology.graph.device_by_id.get(&id))
                    else {
                        return;
                    };
                    let gauge = |v: Option<f32>| match v {
                        Some(pct) => format!("{pct:.0}%"),
                        None => "–".to_string(),
                    };
                    ui.label(format!(
                        "cpu {}  mem {}",
                        gauge(device.cpu_usage),
                        gauge(device.memory_usage)
                    ));
                    ui.colored_label(status_color32(device.status), "●");
                    ui.label(
                        egui::RichText::new(format!(
                            "{}  {}  [{}]",
                            device.hostname, device.ip_address, device.device_type
                        ))
                        .strong(),
                    );
                });
            });
        });
}

/// Centered overlay for the three non-scene states: still connecting,
/// fetch failed, and an empty inventory. Distinct texts — an operator
/// must be able to tell "backend down" from "no devices".
pub fn ui_empty_state_system(
    mut contexts: EguiContexts,
    phase: Res<FetchPhase>,
    topology: Res<Topology>,
) {
    let message = match &*phase {
        FetchPhase::Connecting => Some(("Connecting to backend...", egui::Color32::GRAY)),
        FetchPhase::Failed(err) => Some((err.as_str(), egui::Color32::from_rgb(217, 64, 56))),
        FetchPhase::Live if topology.graph.is_empty() => {
            Some(("No devices discovered yet", egui::Color32::GRAY))
        }
        FetchPhase::Live => None,
    };
    let Some((text, color)) = message else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Area::new(egui::Id::new("empty_state"))
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let heading = if matches!(&*phase, FetchPhase::Failed(_)) {
                "Topology unavailable"
            } else {
                "Topology"
            };
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(heading).heading());
                ui.label(egui::RichText::new(text).color(color));
            });
        });
}

/// Shape/color legend in the lower-right corner.
pub fn ui_legend_system(mut contexts: EguiContexts, legend: Res<LegendState>) {
    if !legend.is_open {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Legend")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -40.0))
        .show(ctx, |ui| {
            for (status, label) in [
                (DeviceStatus::Up, "up"),
                (DeviceStatus::Down, "down"),
                (DeviceStatus::Degraded, "degraded"),
                (DeviceStatus::Unknown, "unknown"),
            ] {
                ui.horizontal(|ui| {
                    ui.colored_label(status_color32(status), "●");
                    ui.label(label);
                });
            }
            ui.separator();
            ui.label("── discovered (LLDP)");
            ui.label("╴ ╴ manual");
            ui.separator();
            ui.label("● router/core/spine   ◆ firewall");
            ui.label("■ switch tiers   ⬟ server");
        });
}

/// Count the transient status message down each frame.
pub fn status_message_tick_system(time: Res<Time>, mut status: ResMut<StatusMessage>) {
    if status.timer > 0.0 {
        status.timer -= time.delta_secs();
    }
}

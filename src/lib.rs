//! Netmap — interactive network-topology visualizer. Library for testing and reuse.

pub mod core;
pub mod input;
pub mod net;
pub mod render;
pub mod ui;

use std::sync::Mutex;
use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{
    input::{egui_wants_any_keyboard_input, egui_wants_any_pointer_input},
    EguiPlugin,
};

use crate::core::components::MainCamera;
use crate::core::positions::PositionStore;
use crate::core::resources::{
    ActiveGesture, FetchPhase, HoveredDevice, Regions, SearchMatches, SearchState, StatusMessage,
    Topology,
};
use crate::core::viewport::ViewTransform;

use input::camera::{camera_zoom_keys_system, camera_zoom_system, sync_camera_system};
use input::pointer::{
    handle_navigation_system, pointer_leave_system, pointer_motion_system, pointer_press_system,
    pointer_release_system, DeviceNavigation,
};

use net::{apply_poll_updates_system, spawn_poll_thread, HttpTopologySource};

use render::regions::draw_regions_system;
use render::scene::{
    apply_search_fade_system, draw_hover_system, draw_links_system, setup_shape_meshes,
    sync_node_transforms_system, sync_scene_system, update_search_matches_system,
};

use ui::fuzzy::{fuzzy_finder_ui_system, fuzzy_toggle_system, FuzzyFinderState};
use ui::overlay::{
    status_message_tick_system, ui_bottom_bar_system, ui_empty_state_system, ui_legend_system,
    ui_top_bar_system, LegendState,
};

/// Build and run the Netmap app.
pub fn run() {
    let config = crate::core::config::load_config();

    let source = HttpTopologySource::new(config.api_base_url.clone());
    let (poll_commands, poll_updates) = spawn_poll_thread(
        source,
        Duration::from_secs(config.poll_interval_secs),
        Duration::from_secs(config.rediscover_delay_secs),
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Netmap".to_string(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(config.bg_color()))
        .insert_resource(config)
        .add_plugins(EguiPlugin::default())
        .init_resource::<Topology>()
        .init_resource::<Regions>()
        .init_resource::<FetchPhase>()
        .init_resource::<PositionStore>()
        .init_resource::<ViewTransform>()
        .init_resource::<ActiveGesture>()
        .init_resource::<HoveredDevice>()
        .init_resource::<SearchState>()
        .init_resource::<SearchMatches>()
        .init_resource::<StatusMessage>()
        .init_resource::<LegendState>()
        .init_resource::<FuzzyFinderState>()
        .insert_resource(net::PollCommands(poll_commands))
        .insert_resource(net::PollReceiver(Mutex::new(poll_updates)))
        .add_message::<DeviceNavigation>()
        .add_systems(Startup, (setup_canvas, setup_shape_meshes))
        .add_systems(
            Update,
            (
                // Snapshot ingest, match refresh, then entity rebuild,
                // in one frame.
                (
                    apply_poll_updates_system,
                    update_search_matches_system,
                    sync_scene_system,
                )
                    .chain(),
                camera_zoom_system,
                camera_zoom_keys_system.run_if(not(egui_wants_any_keyboard_input)),
                (
                    pointer_press_system.run_if(not(egui_wants_any_pointer_input)),
                    pointer_motion_system,
                    pointer_release_system,
                    pointer_leave_system,
                )
                    .chain(),
                handle_navigation_system,
                fuzzy_toggle_system.run_if(not(egui_wants_any_keyboard_input)),
                status_message_tick_system,
            ),
        )
        .add_systems(
            Update,
            (
                apply_search_fade_system,
                sync_node_transforms_system,
                draw_regions_system,
                draw_links_system,
                draw_hover_system,
            ),
        )
        .add_systems(PostUpdate, sync_camera_system)
        .add_systems(bevy_egui::EguiPrimaryContextPass, ui_top_bar_system)
        .add_systems(bevy_egui::EguiPrimaryContextPass, ui_bottom_bar_system)
        .add_systems(bevy_egui::EguiPrimaryContextPass, ui_empty_state_system)
        .add_systems(bevy_egui::EguiPrimaryContextPass, ui_legend_system)
        .add_systems(bevy_egui::EguiPrimaryContextPass, fuzzy_finder_ui_system)
        .run();
}

fn setup_canvas(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}

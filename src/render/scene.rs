//! Device scene: entity sync from snapshots, link gizmos, search fade,
//! hover ring.
//!
//! Device entities are cheap enough to rebuild wholesale on every
//! applied snapshot — identity lives in the device id and the position
//! store, so a rebuild never loses an operator's layout. Model space is
//! y-down; world space flips y once, here.

use bevy::prelude::*;

use crate::core::components::{DeviceLabel, DeviceNode, DeviceShape, RegionLabel};
use crate::core::layout::{classify_tier, Tier};
use crate::core::model::DeviceStatus;
use crate::core::positions::PositionStore;
use crate::core::resources::{HoveredDevice, Regions, SearchMatches, SearchState, Topology};
use crate::core::search::{self, FADED_ALPHA};

/// Half-extents of a device's pointer hit box in model space (covers the
/// shape plus its labels).
pub const NODE_HIT_HALF: Vec2 = Vec2::new(52.0, 34.0);

/// Radius of the tier shapes.
const SHAPE_RADIUS: f32 = 22.0;

const LINK_COLOR: Color = Color::srgb(0.36, 0.44, 0.58);
const HOVER_COLOR: Color = Color::srgb(0.95, 0.85, 0.30);
const HOSTNAME_COLOR: Color = Color::srgb(0.88, 0.90, 0.94);
const IP_COLOR: Color = Color::srgb(0.55, 0.60, 0.68);

/// Dash pattern for manually-entered links, in world units.
const DASH_LEN: f32 = 12.0;
const DASH_GAP: f32 = 8.0;

/// Model space is y-down, Bevy world is y-up.
pub fn model_to_world(model: Vec2) -> Vec2 {
    Vec2::new(model.x, -model.y)
}

/// Status → fill color. Operators rely on this mapping.
pub fn status_color(status: DeviceStatus) -> Color {
    match status {
        DeviceStatus::Up => Color::srgb(0.25, 0.72, 0.35),
        DeviceStatus::Down => Color::srgb(0.85, 0.25, 0.22),
        DeviceStatus::Degraded => Color::srgb(0.95, 0.60, 0.15),
        DeviceStatus::Unknown => Color::srgb(0.55, 0.57, 0.60),
    }
}

/// Shared shape meshes, one per silhouette, built once at startup.
#[derive(Resource)]
pub struct ShapeMeshes {
    circle: Handle<Mesh>,
    diamond: Handle<Mesh>,
    rect: Handle<Mesh>,
    pentagon: Handle<Mesh>,
}

impl ShapeMeshes {
    /// Tier → silhouette. Routing tiers are circles, firewalls diamonds,
    /// switching tiers rectangles, servers pentagons.
    fn for_tier(&self, tier: Tier) -> Handle<Mesh> {
        match tier {
            Tier::Spine | Tier::Core | Tier::Router => self.circle.clone(),
            Tier::Firewall => self.diamond.clone(),
            Tier::Server => self.pentagon.clone(),
            Tier::Leaf | Tier::Distribution | Tier::Switch | Tier::Tor | Tier::Access
            | Tier::Other => self.rect.clone(),
        }
    }
}

pub fn setup_shape_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(ShapeMeshes {
        circle: meshes.add(Circle::new(SHAPE_RADIUS)),
        // A 4-sided regular polygon renders vertex-up: a diamond.
        diamond: meshes.add(RegularPolygon::new(SHAPE_RADIUS * 1.15, 4)),
        rect: meshes.add(Rectangle::new(SHAPE_RADIUS * 2.2, SHAPE_RADIUS * 1.5)),
        pentagon: meshes.add(RegularPolygon::new(SHAPE_RADIUS * 1.1, 5)),
    })
}

/// Rebuild device and region-label entities whenever a new snapshot
/// generation lands. Positions come from the store (already merged), so
/// dragged devices stay where the operator left them. The current search
/// fade is applied at spawn so a refresh mid-search doesn't flash
/// unfaded nodes.
pub fn sync_scene_system(
    mut commands: Commands,
    topology: Res<Topology>,
    store: Res<PositionStore>,
    regions: Res<Regions>,
    search: Res<SearchState>,
    matches: Res<SearchMatches>,
    shapes: Res<ShapeMeshes>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut last_generation: Local<u64>,
    node_q: Query<Entity, With<DeviceNode>>,
    region_label_q: Query<Entity, With<RegionLabel>>,
) {
    if topology.generation == *last_generation {
        return;
    }
    *last_generation = topology.generation;

    for entity in node_q.iter().chain(region_label_q.iter()) {
        commands.entity(entity).despawn();
    }

    let filtering = !search.query.trim().is_empty();
    for device in topology.graph.device_by_id.values() {
        let Some(model_pos) = store.get(device.id) else {
            continue;
        };
        let world = model_to_world(model_pos);
        let tier = classify_tier(&device.device_type);
        let alpha = if !filtering || matches.0.contains(&device.id) { 1.0 } else { FADED_ALPHA };
        let material =
            materials.add(ColorMaterial::from_color(status_color(device.status).with_alpha(alpha)));

        commands
            .spawn((
                Transform::from_xyz(world.x, world.y, 1.0),
                Visibility::default(),
                DeviceNode { id: device.id },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh2d(shapes.for_tier(tier)),
                    MeshMaterial2d(material),
                    Transform::from_xyz(0.0, 0.0, 0.0),
                    DeviceShape,
                ));
                parent.spawn((
                    Text2d::new(device.hostname.clone()),
                    TextFont { font_size: 13.0, ..default() },
                    TextColor(HOSTNAME_COLOR.with_alpha(alpha)),
                    Transform::from_xyz(0.0, -(SHAPE_RADIUS + 14.0), 0.1),
                    DeviceLabel,
                ));
                parent.spawn((
                    Text2d::new(device.ip_address.clone()),
                    TextFont { font_size: 10.0, ..default() },
                    TextColor(IP_COLOR.with_alpha(alpha)),
                    Transform::from_xyz(0.0, -(SHAPE_RADIUS + 28.0), 0.1),
                    DeviceLabel,
                ));
            });
    }

    for region in &regions.0 {
        let header = model_to_world(Vec2::new(region.x + region.w * 0.5, region.y + 18.0));
        commands.spawn((
            Text2d::new(region.label.clone()),
            TextFont { font_size: 15.0, ..default() },
            TextColor(Color::srgb(0.62, 0.68, 0.80)),
            Transform::from_xyz(header.x, header.y, 0.5),
            RegionLabel,
        ));
    }

    info!("[SCENE] rebuilt generation {}", topology.generation);
}

/// Keep device roots at their stored positions. Runs every frame; drags
/// write the store and this carries them to the scene.
pub fn sync_node_transforms_system(
    store: Res<PositionStore>,
    mut node_q: Query<(&DeviceNode, &mut Transform)>,
) {
    for (node, mut transform) in &mut node_q {
        if let Some(model_pos) = store.get(node.id) {
            let world = model_to_world(model_pos);
            transform.translation.x = world.x;
            transform.translation.y = world.y;
        }
    }
}

/// Recompute the matched-id set when the query or the snapshot changes.
pub fn update_search_matches_system(
    search: Res<SearchState>,
    topology: Res<Topology>,
    mut matches: ResMut<SearchMatches>,
    mut last_generation: Local<u64>,
) {
    if !search.is_changed() && topology.generation == *last_generation {
        return;
    }
    *last_generation = topology.generation;
    matches.0 = search::match_devices(&search.query, topology.graph.device_by_id.values());
}

/// Fade everything outside the matched set while a query is active.
pub fn apply_search_fade_system(
    search: Res<SearchState>,
    matches: Res<SearchMatches>,
    topology: Res<Topology>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    node_q: Query<(&DeviceNode, &Children)>,
    shape_q: Query<&MeshMaterial2d<ColorMaterial>, With<DeviceShape>>,
    mut label_q: Query<&mut TextColor, With<DeviceLabel>>,
) {
    if !matches.is_changed() {
        return;
    }
    let filtering = !search.query.trim().is_empty();

    for (node, children) in &node_q {
        let alpha = if !filtering || matches.0.contains(&node.id) { 1.0 } else { FADED_ALPHA };
        let status = topology
            .graph
            .device_by_id
            .get(&node.id)
            .map(|d| d.status)
            .unwrap_or(DeviceStatus::Unknown);
        for child in children {
            if let Ok(handle) = shape_q.get(*child) {
                if let Some(material) = materials.get_mut(&handle.0) {
                    material.color = status_color(status).with_alpha(alpha);
                }
            }
            if let Ok(mut text_color) = label_q.get_mut(*child) {
                text_color.0 = text_color.0.with_alpha(alpha);
            }
        }
    }
}

/// Draw links between stored endpoint positions: solid for discovered
/// (LLDP) links, dashed for manual ones; faded when either endpoint is
/// outside the matched set.
pub fn draw_links_system(
    mut gizmos: Gizmos,
    topology: Res<Topology>,
    store: Res<PositionStore>,
    search: Res<SearchState>,
    matches: Res<SearchMatches>,
) {
    let filtering = !search.query.trim().is_empty();
    for link in &topology.graph.links {
        let (Some(a), Some(b)) = (store.get(link.source), store.get(link.target)) else {
            continue;
        };
        let a = model_to_world(a);
        let b = model_to_world(b);
        let alpha = if filtering && !search::link_matched(link, &matches.0) {
            FADED_ALPHA
        } else {
            1.0
        };
        let color = LINK_COLOR.with_alpha(alpha);
        if link.link_type.is_dashed() {
            draw_dashed_line(&mut gizmos, a, b, color);
        } else {
            gizmos.line_2d(a, b, color);
        }
    }
}

fn draw_dashed_line(gizmos: &mut Gizmos, a: Vec2, b: Vec2, color: Color) {
    let total = a.distance(b);
    if total < f32::EPSILON {
        return;
    }
    let dir = (b - a) / total;
    let step = DASH_LEN + DASH_GAP;
    let mut t = 0.0;
    while t < total {
        let end = (t + DASH_LEN).min(total);
        gizmos.line_2d(a + dir * t, a + dir * end, color);
        t += step;
    }
}

/// Ring around the hovered device, plus emphasis on its links.
pub fn draw_hover_system(
    mut gizmos: Gizmos,
    hovered: Res<HoveredDevice>,
    topology: Res<Topology>,
    store: Res<PositionStore>,
) {
    let Some(id) = hovered.0 else {
        return;
    };
    let Some(model_pos) = store.get(id) else {
        return;
    };
    gizmos.circle_2d(
        Isometry2d::from_translation(model_to_world(model_pos)),
        SHAPE_RADIUS + 8.0,
        HOVER_COLOR,
    );

    let Some(indices) = topology.graph.links_by_endpoint.get(&id) else {
        return;
    };
    for &idx in indices {
        let link = &topology.graph.links[idx];
        let (Some(a), Some(b)) = (store.get(link.source), store.get(link.target)) else {
            continue;
        };
        gizmos.line_2d(model_to_world(a), model_to_world(b), HOVER_COLOR.with_alpha(0.6));
    }
}

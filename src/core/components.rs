//! ECS components for the topology scene.

use bevy::prelude::*;

use crate::core::model::NodeId;

/// Marker — the one orthographic camera the view transform drives.
#[derive(Component)]
pub struct MainCamera;

/// Root entity of one rendered device. Respawned on every snapshot;
/// identity lives in the id, not the entity.
#[derive(Component)]
pub struct DeviceNode {
    pub id: NodeId,
}

/// The status-colored shape child of a device node.
#[derive(Component)]
pub struct DeviceShape;

/// Hostname/IP text child of a device node.
#[derive(Component)]
pub struct DeviceLabel;

/// Text label child spawned for one location region.
#[derive(Component)]
pub struct RegionLabel;

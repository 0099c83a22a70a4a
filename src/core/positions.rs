//! Per-device model-space positions, surviving data refresh.
//!
//! The layout engine proposes defaults; the operator's drags overwrite
//! them. `merge` is what makes a drag durable across the periodic
//! refetch: an existing position always wins over a freshly computed
//! one, and ids that left the snapshot are garbage-collected.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::core::layout::{self, Region};
use crate::core::model::{Device, NodeId};

#[derive(Resource, Debug, Clone, Default)]
pub struct PositionStore {
    positions: HashMap<NodeId, Vec2>,
}

impl PositionStore {
    pub fn get(&self, id: NodeId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// Write-through from an active drag gesture.
    pub fn set(&mut self, id: NodeId, position: Vec2) {
        self.positions.insert(id, position);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Vec2)> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }

    /// For every current id: keep the existing position if present, else
    /// take the fresh one. Every key not in `current_ids` is dropped.
    /// A position written mid-drag counts as "existing" here, so a
    /// refresh landing during a gesture never snaps the node back.
    pub fn merge(&mut self, fresh: &HashMap<NodeId, Vec2>, current_ids: &HashSet<NodeId>) {
        self.positions.retain(|id, _| current_ids.contains(id));
        for id in current_ids {
            if !self.positions.contains_key(id) {
                if let Some(pos) = fresh.get(id) {
                    self.positions.insert(*id, *pos);
                }
            }
        }
    }

    /// One refresh pass: lay out the snapshot, merge the defaults under
    /// any existing positions, and hand back the freshly computed
    /// regions. After this every device in `devices` has exactly one
    /// position and no stale ids remain.
    pub fn refresh(&mut self, devices: &[Device], canvas_w: f32, canvas_h: f32) -> Vec<Region> {
        let result = layout::layout(devices, canvas_w, canvas_h);
        let current_ids: HashSet<NodeId> = devices.iter().map(|d| d.id).collect();
        self.merge(&result.positions, &current_ids);
        result.regions
    }
}

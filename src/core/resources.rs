//! Shared resources for the topology scene.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::core::gesture::Gesture;
use crate::core::layout::Region;
use crate::core::model::{NodeId, TopologyGraph};

/// The current normalized snapshot. `generation` bumps on every applied
/// refresh so scene-sync systems know when to rebuild entities.
#[derive(Resource, Default)]
pub struct Topology {
    pub graph: TopologyGraph,
    pub generation: u64,
}

/// Location regions from the latest layout pass. Fully recomputed each
/// refresh, never merged.
#[derive(Resource, Default)]
pub struct Regions(pub Vec<Region>);

/// Where the data feed currently stands, for the empty/error overlays.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub enum FetchPhase {
    /// No snapshot received yet.
    #[default]
    Connecting,
    /// At least one snapshot applied; the scene reflects it.
    Live,
    /// Last fetch failed; the scene is cleared rather than kept stale.
    Failed(String),
}

/// The active pointer gesture. Exactly one per app.
#[derive(Resource, Default)]
pub struct ActiveGesture(pub Gesture);

/// Device currently under the pointer (no button held). Drives the
/// hover ring and the info panel; cleared on pointer-leave.
#[derive(Resource, Default)]
pub struct HoveredDevice(pub Option<NodeId>);

/// Live search box contents.
#[derive(Resource, Default)]
pub struct SearchState {
    pub query: String,
}

/// Derived from `SearchState` + the current snapshot: ids whose hostname
/// or IP contains the query. Everything else fades while a query is set.
#[derive(Resource, Default)]
pub struct SearchMatches(pub HashSet<NodeId>);

/// Transient status / error message displayed in the bottom bar.
/// `timer` counts down in seconds; the message is visible while `timer > 0`.
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: String,
    pub timer: f32,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>, duration: f32) {
        self.text = text.into();
        self.timer = duration;
    }
}

//! Deterministic topology layout: devices grouped by physical location,
//! stacked into tier rows inside each group, groups shelf-packed across
//! the canvas.
//!
//! This is a pure function of (devices, canvas size) — no stored state,
//! re-run whenever the node composition changes. Manual drag positions
//! are layered on top by the position store, never here.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::core::model::{Device, NodeId};

/// Horizontal distance between node cell centers within a tier row.
pub const NODE_SPACING_X: f32 = 150.0;
/// Vertical distance between tier rows within a group.
pub const TIER_SPACING_Y: f32 = 110.0;
/// Inner padding between a region border and its node cells.
const REGION_PADDING: f32 = 30.0;
/// Space reserved at the top of a region for its label.
const REGION_HEADER_H: f32 = 34.0;
/// Gap between packed regions, horizontally and between bands.
const REGION_GAP: f32 = 50.0;
/// Margin kept free around the canvas border.
const CANVAS_MARGIN: f32 = 40.0;

/// Group key for devices with no location data.
pub const UNASSIGNED_KEY: &str = "__unassigned__";
/// Display label for the unassigned group.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Coarse network-role classification derived from `device_type`.
/// Variant order is the vertical stacking order, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Spine,
    Core,
    Router,
    Firewall,
    Leaf,
    Distribution,
    Switch,
    Tor,
    Access,
    Server,
    Other,
}

/// Keyword table, checked in order — the first matching substring wins,
/// so `"distribution-switch"` classifies as `Distribution`, not `Switch`.
const TIER_KEYWORDS: &[(&str, Tier)] = &[
    ("spine", Tier::Spine),
    ("core", Tier::Core),
    ("router", Tier::Router),
    ("firewall", Tier::Firewall),
    ("leaf", Tier::Leaf),
    ("distribution", Tier::Distribution),
    ("switch", Tier::Switch),
    ("tor", Tier::Tor),
    ("access", Tier::Access),
    ("server", Tier::Server),
];

/// Classify a device type string. Case-insensitive substring match
/// against the ordered keyword table; no match falls into `Other`
/// rather than being dropped.
pub fn classify_tier(device_type: &str) -> Tier {
    let lowered = device_type.to_lowercase();
    for (keyword, tier) in TIER_KEYWORDS {
        if lowered.contains(keyword) {
            return *tier;
        }
    }
    Tier::Other
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Spine => "spine",
            Tier::Core => "core",
            Tier::Router => "router",
            Tier::Firewall => "firewall",
            Tier::Leaf => "leaf",
            Tier::Distribution => "distribution",
            Tier::Switch => "switch",
            Tier::Tor => "tor",
            Tier::Access => "access",
            Tier::Server => "server",
            Tier::Other => "other",
        }
    }
}

/// Bounding rectangle of one location group in model space.
/// Recomputed in full on every layout pass, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub key: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Region {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Output of one layout pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub positions: HashMap<NodeId, Vec2>,
    pub regions: Vec<Region>,
}

/// Tier rows for one set of devices: rows ordered by `Tier`, members
/// ordered by (hostname, id) so repeated runs are identical.
fn tier_rows<'a>(devices: &[&'a Device]) -> Vec<(Tier, Vec<&'a Device>)> {
    let mut by_tier: HashMap<Tier, Vec<&Device>> = HashMap::new();
    for &device in devices {
        by_tier.entry(classify_tier(&device.device_type)).or_default().push(device);
    }
    let mut rows: Vec<(Tier, Vec<&Device>)> = by_tier.into_iter().collect();
    rows.sort_by_key(|(tier, _)| *tier);
    for (_, members) in rows.iter_mut() {
        members.sort_by(|a, b| a.hostname.cmp(&b.hostname).then(a.id.cmp(&b.id)));
    }
    rows
}

/// Compute default positions and location regions for a snapshot.
///
/// Devices with no `location_name` fall into a single sentinel group
/// which always packs last. If that sentinel is the *only* group (no
/// location data exists at all), region computation is skipped and the
/// whole canvas becomes one flat tiered layout.
pub fn layout(devices: &[Device], canvas_w: f32, canvas_h: f32) -> LayoutResult {
    if devices.is_empty() {
        return LayoutResult::default();
    }

    let mut groups: HashMap<&str, Vec<&Device>> = HashMap::new();
    for device in devices {
        let key = device.location_name.as_deref().unwrap_or(UNASSIGNED_KEY);
        groups.entry(key).or_default().push(device);
    }

    if groups.len() == 1 && groups.contains_key(UNASSIGNED_KEY) {
        return flat_layout(devices, canvas_w, canvas_h);
    }

    // Alphabetical by label, unassigned always last.
    let mut ordered: Vec<(&str, Vec<&Device>)> = groups.into_iter().collect();
    ordered.sort_by(|(a, _), (b, _)| {
        let a_last = *a == UNASSIGNED_KEY;
        let b_last = *b == UNASSIGNED_KEY;
        a_last.cmp(&b_last).then_with(|| a.cmp(b))
    });

    let mut positions = HashMap::new();
    let mut regions = Vec::with_capacity(ordered.len());

    // Greedy shelf packing: left to right, wrap to a new band when the
    // next box would run past the available width. Not an area-optimal
    // packing — visual predictability wins over density here.
    let avail_right = canvas_w - CANVAS_MARGIN;
    let mut cursor_x = CANVAS_MARGIN;
    let mut cursor_y = CANVAS_MARGIN;
    let mut band_h = 0.0f32;

    for (key, members) in ordered {
        let rows = tier_rows(&members);
        let max_row_len = rows.iter().map(|(_, m)| m.len()).max().unwrap_or(0);
        let content_w = max_row_len as f32 * NODE_SPACING_X;
        let content_h = rows.len() as f32 * TIER_SPACING_Y;
        let region_w = content_w + 2.0 * REGION_PADDING;
        let region_h = REGION_HEADER_H + content_h + REGION_PADDING;

        if cursor_x > CANVAS_MARGIN && cursor_x + region_w > avail_right {
            cursor_x = CANVAS_MARGIN;
            cursor_y += band_h + REGION_GAP;
            band_h = 0.0;
        }

        let region = Region {
            key: key.to_string(),
            label: if key == UNASSIGNED_KEY { UNASSIGNED_LABEL.to_string() } else { key.to_string() },
            x: cursor_x,
            y: cursor_y,
            w: region_w,
            h: region_h,
        };

        for (row_idx, (_, row)) in rows.iter().enumerate() {
            // Rows shorter than the widest one are centered inside it.
            let row_w = row.len() as f32 * NODE_SPACING_X;
            let row_x0 = region.x + REGION_PADDING + (content_w - row_w) * 0.5;
            let y = region.y + REGION_HEADER_H + (row_idx as f32 + 0.5) * TIER_SPACING_Y;
            for (col, device) in row.iter().enumerate() {
                let x = row_x0 + (col as f32 + 0.5) * NODE_SPACING_X;
                positions.insert(device.id, Vec2::new(x, y));
            }
        }

        band_h = band_h.max(region_h);
        cursor_x += region_w + REGION_GAP;
        regions.push(region);
    }

    LayoutResult { positions, regions }
}

/// Degenerate case: no location data anywhere. Tier rows spread evenly
/// across the full canvas, no regions emitted.
fn flat_layout(devices: &[Device], canvas_w: f32, canvas_h: f32) -> LayoutResult {
    let refs: Vec<&Device> = devices.iter().collect();
    let rows = tier_rows(&refs);
    let row_count = rows.len();

    let mut positions = HashMap::new();
    for (row_idx, (_, row)) in rows.iter().enumerate() {
        let y = if row_count == 1 {
            canvas_h * 0.5
        } else {
            CANVAS_MARGIN
                + (canvas_h - 2.0 * CANVAS_MARGIN) * row_idx as f32 / (row_count - 1) as f32
        };
        for (col, device) in row.iter().enumerate() {
            // Single-node row sits at horizontal center; the spread
            // formula below would divide by zero.
            let x = if row.len() == 1 {
                canvas_w * 0.5
            } else {
                CANVAS_MARGIN
                    + (canvas_w - 2.0 * CANVAS_MARGIN) * col as f32 / (row.len() - 1) as f32
            };
            positions.insert(device.id, Vec2::new(x, y));
        }
    }

    LayoutResult { positions, regions: Vec::new() }
}

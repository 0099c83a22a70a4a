//! Topology data model: devices, links, and the normalized graph built
//! from a raw snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable device identity across refreshes.
pub type NodeId = i64;

/// Operational status reported by the monitoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Up,
    Down,
    Degraded,
    /// Anything the backend reports that we don't recognize.
    #[serde(other)]
    Unknown,
}

/// How a link was entered into the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Discovered via LLDP adjacency. Rendered solid.
    Lldp,
    /// Entered by an operator. Rendered dashed.
    Manual,
}

impl LinkType {
    pub fn is_dashed(self) -> bool {
        matches!(self, LinkType::Manual)
    }
}

/// A device in the topology graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: NodeId,
    pub hostname: String,
    pub ip_address: String,
    pub device_type: String,
    pub location_name: Option<String>,
    pub status: DeviceStatus,
    pub cpu_usage: Option<f32>,
    pub memory_usage: Option<f32>,
}

/// A connection between two devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub source: NodeId,
    pub target: NodeId,
    pub source_if: Option<String>,
    pub target_if: Option<String>,
    pub link_type: LinkType,
}

/// Raw wire format of the topology endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<Device>,
    pub edges: Vec<Link>,
}

/// Normalized lookup structures over one snapshot. Links whose endpoints
/// are not both in the device set are dropped here — a transient state
/// during partial discovery, not an error.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    pub device_by_id: HashMap<NodeId, Device>,
    pub links: Vec<Link>,
    /// Device id → indices into `links` touching that device.
    pub links_by_endpoint: HashMap<NodeId, Vec<usize>>,
}

impl TopologyGraph {
    /// Normalize a raw snapshot. O(n + e), no mutation of inputs beyond
    /// taking ownership.
    pub fn build(nodes: Vec<Device>, edges: Vec<Link>) -> Self {
        let device_by_id: HashMap<NodeId, Device> =
            nodes.into_iter().map(|d| (d.id, d)).collect();

        let mut links = Vec::with_capacity(edges.len());
        let mut links_by_endpoint: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for link in edges {
            if !device_by_id.contains_key(&link.source)
                || !device_by_id.contains_key(&link.target)
            {
                continue;
            }
            let idx = links.len();
            links_by_endpoint.entry(link.source).or_default().push(idx);
            links_by_endpoint.entry(link.target).or_default().push(idx);
            links.push(link);
        }

        Self { device_by_id, links, links_by_endpoint }
    }

    pub fn device_count(&self) -> usize {
        self.device_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.device_by_id.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_device(id: NodeId, hostname: &str, device_type: &str) -> Device {
    Device {
        id,
        hostname: hostname.to_string(),
        ip_address: format!("10.0.0.{id}"),
        device_type: device_type.to_string(),
        location_name: None,
        status: DeviceStatus::Up,
        cpu_usage: None,
        memory_usage: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: i64, source: NodeId, target: NodeId) -> Link {
        Link {
            id,
            source,
            target,
            source_if: None,
            target_if: None,
            link_type: LinkType::Lldp,
        }
    }

    #[test]
    fn build_indexes_devices_by_id() {
        let graph = TopologyGraph::build(
            vec![test_device(1, "sw1", "switch"), test_device(2, "sw2", "switch")],
            vec![link(10, 1, 2)],
        );
        assert_eq!(graph.device_count(), 2);
        assert_eq!(graph.device_by_id[&1].hostname, "sw1");
        assert_eq!(graph.links.len(), 1);
    }

    #[test]
    fn dangling_links_are_dropped() {
        let graph = TopologyGraph::build(
            vec![test_device(1, "sw1", "switch")],
            vec![link(10, 1, 99), link(11, 98, 1), link(12, 1, 1)],
        );
        // Only the self-consistent link survives.
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].id, 12);
    }

    #[test]
    fn links_by_endpoint_covers_both_sides() {
        let graph = TopologyGraph::build(
            vec![
                test_device(1, "a", "router"),
                test_device(2, "b", "switch"),
                test_device(3, "c", "server"),
            ],
            vec![link(10, 1, 2), link(11, 2, 3)],
        );
        assert_eq!(graph.links_by_endpoint[&2].len(), 2);
        assert_eq!(graph.links_by_endpoint[&1], vec![0]);
        assert_eq!(graph.links_by_endpoint[&3], vec![1]);
    }

    #[test]
    fn unknown_status_string_decodes_as_unknown() {
        let json = r#"{
            "id": 7, "hostname": "edge1", "ip_address": "10.0.0.7",
            "device_type": "router", "location_name": null,
            "status": "flapping", "cpu_usage": null, "memory_usage": null
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.status, DeviceStatus::Unknown);
    }

    #[test]
    fn empty_snapshot_builds_empty_graph() {
        let graph = TopologyGraph::build(Vec::new(), Vec::new());
        assert!(graph.is_empty());
        assert!(graph.links.is_empty());
    }
}

//! End-to-end layout properties over the public API.

use netmap::core::layout::{layout, UNASSIGNED_LABEL};
use netmap::core::model::{Device, DeviceStatus, Link, LinkType, TopologyGraph};

fn device(id: i64, hostname: &str, device_type: &str, location: Option<&str>) -> Device {
    Device {
        id,
        hostname: hostname.to_string(),
        ip_address: format!("10.0.0.{id}"),
        device_type: device_type.to_string(),
        location_name: location.map(str::to_string),
        status: DeviceStatus::Up,
        cpu_usage: None,
        memory_usage: None,
    }
}

fn link(id: i64, source: i64, target: i64, link_type: LinkType) -> Link {
    Link {
        id,
        source,
        target,
        source_if: None,
        target_if: None,
        link_type,
    }
}

/// A mid-size campus: three sites plus some unplaced gear.
fn campus() -> Vec<Device> {
    let mut devices = Vec::new();
    let mut id = 0;
    for site in ["Berlin", "Frankfurt", "Munich"] {
        for (device_type, count) in [("core-router", 2), ("distribution-switch", 3), ("access-switch", 6), ("server", 4)] {
            for n in 0..count {
                id += 1;
                devices.push(device(id, &format!("{site}-{device_type}-{n}"), device_type, Some(site)));
            }
        }
    }
    for n in 0..5 {
        id += 1;
        devices.push(device(id, &format!("stray-{n}"), "server", None));
    }
    devices
}

#[test]
fn layout_is_deterministic_across_invocations() {
    let devices = campus();
    let first = layout(&devices, 1920.0, 1080.0);
    let second = layout(&devices, 1920.0, 1080.0);
    assert_eq!(first.positions, second.positions);
    assert_eq!(first.regions, second.regions);
}

#[test]
fn every_device_sits_inside_its_region() {
    let devices = campus();
    let result = layout(&devices, 1920.0, 1080.0);
    assert_eq!(result.regions.len(), 4);

    for d in &devices {
        let region = match &d.location_name {
            Some(site) => result.regions.iter().find(|r| &r.key == site).unwrap(),
            None => result.regions.iter().find(|r| r.label == UNASSIGNED_LABEL).unwrap(),
        };
        assert!(
            region.contains(result.positions[&d.id]),
            "{} at {:?} escaped region {}",
            d.hostname,
            result.positions[&d.id],
            region.label
        );
    }
}

#[test]
fn regions_never_overlap() {
    let devices = campus();
    let result = layout(&devices, 1200.0, 2400.0);
    for (i, a) in result.regions.iter().enumerate() {
        for b in result.regions.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "{} overlaps {}", a.label, b.label);
        }
    }
}

#[test]
fn three_node_scenario_matches_operator_expectations() {
    // A (DC1, spine) above B (DC1, leaf); C unplaced; A–B discovered,
    // B–C manual.
    let devices = vec![
        device(1, "A", "spine", Some("DC1")),
        device(2, "B", "leaf", Some("DC1")),
        device(3, "C", "server", None),
    ];
    let edges = vec![link(10, 1, 2, LinkType::Lldp), link(11, 2, 3, LinkType::Manual)];

    let result = layout(&devices, 1280.0, 720.0);
    let labels: Vec<&str> = result.regions.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["DC1", UNASSIGNED_LABEL]);

    let dc1 = &result.regions[0];
    let unassigned = &result.regions[1];
    // Model space is y-down: spine row above leaf row.
    assert!(result.positions[&1].y < result.positions[&2].y);
    assert!(dc1.contains(result.positions[&1]));
    assert!(dc1.contains(result.positions[&2]));
    assert!(unassigned.contains(result.positions[&3]));

    let graph = TopologyGraph::build(devices, edges);
    assert_eq!(graph.links.len(), 2);
    let ab = graph.links.iter().find(|l| l.id == 10).unwrap();
    let bc = graph.links.iter().find(|l| l.id == 11).unwrap();
    assert!(!ab.link_type.is_dashed(), "discovered links render solid");
    assert!(bc.link_type.is_dashed(), "manual links render dashed");
}

#[test]
fn canvas_size_only_shifts_the_flat_layout() {
    // Flat (no-location) layouts scale with the canvas but keep order.
    let devices = vec![
        device(1, "spine1", "spine", None),
        device(2, "leaf1", "leaf", None),
        device(3, "leaf2", "leaf", None),
    ];
    let small = layout(&devices, 800.0, 600.0);
    let large = layout(&devices, 1600.0, 1200.0);
    assert!(small.regions.is_empty() && large.regions.is_empty());
    for result in [&small, &large] {
        assert!(result.positions[&1].y < result.positions[&2].y);
        assert!(result.positions[&2].x < result.positions[&3].x);
        assert_eq!(result.positions[&2].y, result.positions[&3].y);
    }
    assert!(large.positions[&3].x > small.positions[&3].x);
}

#[test]
fn single_location_still_produces_a_region() {
    // One named site plus nothing unassigned: grouped path, one region.
    let devices = vec![
        device(1, "r1", "router", Some("DC1")),
        device(2, "s1", "switch", Some("DC1")),
    ];
    let result = layout(&devices, 1280.0, 720.0);
    assert_eq!(result.regions.len(), 1);
    assert_eq!(result.regions[0].label, "DC1");
    for pos in result.positions.values() {
        assert!(result.regions[0].contains(*pos));
    }
}

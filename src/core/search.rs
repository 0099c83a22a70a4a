//! Search filter: which devices match the live query, and how the rest
//! of the scene fades.

use std::collections::HashSet;

use crate::core::model::{Device, Link, NodeId};

/// Opacity for devices and links outside the matched set while a query
/// is active.
pub const FADED_ALPHA: f32 = 0.15;

/// Case-insensitive substring match against hostname and IP address.
/// An empty query matches everything (no fade).
pub fn match_devices<'a>(
    query: &str,
    devices: impl IntoIterator<Item = &'a Device>,
) -> HashSet<NodeId> {
    let needle = query.trim().to_lowercase();
    devices
        .into_iter()
        .filter(|d| {
            needle.is_empty()
                || d.hostname.to_lowercase().contains(&needle)
                || d.ip_address.to_lowercase().contains(&needle)
        })
        .map(|d| d.id)
        .collect()
}

/// A link stays fully visible only while both endpoints are matched.
pub fn link_matched(link: &Link, matched: &HashSet<NodeId>) -> bool {
    matched.contains(&link.source) && matched.contains(&link.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{test_device, LinkType};

    fn fleet() -> Vec<Device> {
        let mut devices = vec![
            test_device(1, "core-sw-01", "switch"),
            test_device(2, "edge-rtr-01", "router"),
            test_device(3, "db-host", "server"),
        ];
        devices[0].ip_address = "10.0.0.5".to_string();
        devices[1].ip_address = "10.0.1.5".to_string();
        devices[2].ip_address = "192.168.4.20".to_string();
        devices
    }

    #[test]
    fn ip_substring_matches_exactly_those_devices() {
        let devices = fleet();
        let matched = match_devices("10.0.0.5", &devices);
        assert_eq!(matched, HashSet::from([1]));
    }

    #[test]
    fn empty_query_matches_all() {
        let devices = fleet();
        let matched = match_devices("", &devices);
        assert_eq!(matched.len(), devices.len());
    }

    #[test]
    fn hostname_match_is_case_insensitive() {
        let devices = fleet();
        assert_eq!(match_devices("CORE-SW", &devices), HashSet::from([1]));
        assert_eq!(match_devices("rtr", &devices), HashSet::from([2]));
    }

    #[test]
    fn no_match_yields_empty_set() {
        let devices = fleet();
        assert!(match_devices("does-not-exist", &devices).is_empty());
    }

    #[test]
    fn link_needs_both_endpoints_matched() {
        let link = Link {
            id: 1,
            source: 1,
            target: 2,
            source_if: None,
            target_if: None,
            link_type: LinkType::Lldp,
        };
        assert!(link_matched(&link, &HashSet::from([1, 2])));
        assert!(!link_matched(&link, &HashSet::from([1])));
        assert!(!link_matched(&link, &HashSet::new()));
    }
}

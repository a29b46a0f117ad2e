//! Bridge port classification into uplink, trunk and access groups.
//!
//! Only physical ports (names starting with the vocabulary's prefix, `ether` by
//! default) take part. A port whose PVID is the trunk PVID carries tagged
//! traffic and is a trunk; anything else is an access port.
//!
//! Trunks are then ordered by their numeric suffix (`ether2` < `ether10`) and
//! the highest-numbered ones are promoted to uplinks: two when there are more
//! than `uplink_pair_threshold` trunks, otherwise one.

use std::collections::BTreeSet;

use routeros_model::Record;
use serde::Serialize;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::vocabulary::PortRules;

/// PVID RouterOS applies when a bridge port does not report one.
pub const DEFAULT_PVID: &str = "1";

/// Disjoint, ordered groups of physical interface names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortGroups {
    pub uplink: Vec<String>,
    pub trunk: Vec<String>,
    pub access: Vec<String>,
}

impl PortGroups {
    pub fn is_empty(&self) -> bool {
        self.uplink.is_empty() && self.trunk.is_empty() && self.access.is_empty()
    }
}

/// Partition bridge ports into port groups.
///
/// Access ports keep their input order. Trunks with a numeric suffix come out
/// sorted by it; a trunk without one is never promoted, trails the sorted trunks
/// and raises an `unparseable_port_suffix` diagnostic. An interface listed more
/// than once is classified by its first occurrence.
pub fn classify_ports(ports: &[Record], rules: &PortRules) -> (PortGroups, Vec<Diagnostic>) {
    let mut seen = BTreeSet::new();
    let mut trunks = Vec::new();
    let mut access = Vec::new();

    for port in ports {
        let interface = port.get("interface");
        if !interface.starts_with(rules.prefix.as_str()) || !seen.insert(interface) {
            continue;
        }
        if port.get_or("pvid", DEFAULT_PVID) == rules.trunk_pvid {
            trunks.push(interface);
        } else {
            access.push(interface.to_string());
        }
    }

    let mut diagnostics = Vec::new();
    let mut numbered = Vec::new();
    let mut unnumbered = Vec::new();
    for interface in trunks {
        match port_number(interface, &rules.prefix) {
            Some(number) => numbered.push((number, interface)),
            None => {
                diagnostics.push(Diagnostic::unparseable_port_suffix(interface));
                unnumbered.push(interface);
            }
        }
    }
    numbered.sort_by_key(|(number, _)| *number);

    let uplink_count = match numbered.len() {
        0 => 0,
        n if n > rules.uplink_pair_threshold => 2,
        _ => 1,
    }
    .min(numbered.len());
    let split = numbered.len() - uplink_count;

    let uplink: Vec<String> = numbered[split..]
        .iter()
        .map(|(_, name)| (*name).to_string())
        .collect();
    let trunk: Vec<String> = numbered[..split]
        .iter()
        .map(|(_, name)| *name)
        .chain(unnumbered)
        .map(str::to_string)
        .collect();

    debug!(?uplink, ?trunk, ?access, "classified bridge ports");
    (
        PortGroups {
            uplink,
            trunk,
            access,
        },
        diagnostics,
    )
}

/// Integer suffix after the port prefix (`ether10` -> 10).
fn port_number(interface: &str, prefix: &str) -> Option<u32> {
    interface.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use routeros_model::Record;

    use super::{classify_ports, PortGroups};
    use crate::diagnostics::DiagnosticCode;
    use crate::vocabulary::PortRules;

    fn port(interface: &str, pvid: Option<&str>) -> Record {
        let record = Record::new().with("bridge", "br-vcf").with("interface", interface);
        match pvid {
            Some(pvid) => record.with("pvid", pvid),
            None => record,
        }
    }

    fn trunks(names: &[&str]) -> Vec<Record> {
        names.iter().map(|n| port(n, Some("1"))).collect()
    }

    fn classify(ports: &[Record]) -> PortGroups {
        classify_ports(ports, &PortRules::default()).0
    }

    #[test]
    fn more_than_three_trunks_promote_last_two() {
        let groups = classify(&trunks(&["ether1", "ether2", "ether3", "ether4", "ether5"]));
        assert_eq!(groups.uplink, vec!["ether4", "ether5"]);
        assert_eq!(groups.trunk, vec!["ether1", "ether2", "ether3"]);
    }

    #[test]
    fn two_trunks_promote_only_the_highest() {
        let groups = classify(&trunks(&["ether1", "ether2"]));
        assert_eq!(groups.uplink, vec!["ether2"]);
        assert_eq!(groups.trunk, vec!["ether1"]);
    }

    #[test]
    fn single_trunk_becomes_uplink() {
        let groups = classify(&trunks(&["ether7"]));
        assert_eq!(groups.uplink, vec!["ether7"]);
        assert!(groups.trunk.is_empty());
    }

    #[test]
    fn exactly_three_trunks_promote_one() {
        let groups = classify(&trunks(&["ether3", "ether1", "ether2"]));
        assert_eq!(groups.uplink, vec!["ether3"]);
        assert_eq!(groups.trunk, vec!["ether1", "ether2"]);
    }

    #[test]
    fn ordering_is_numeric_not_lexicographic() {
        let groups = classify(&trunks(&["ether10", "ether9", "ether2", "ether1"]));
        assert_eq!(groups.uplink, vec!["ether9", "ether10"]);
        assert_eq!(groups.trunk, vec!["ether1", "ether2"]);
    }

    #[test]
    fn missing_pvid_defaults_to_trunk() {
        let groups = classify(&[port("ether3", None), port("ether4", Some("20"))]);
        assert_eq!(groups.uplink, vec!["ether3"]);
        assert_eq!(groups.access, vec!["ether4"]);
    }

    #[test]
    fn non_physical_ports_are_ignored() {
        let groups = classify(&[
            port("sfp-sfpplus1", Some("1")),
            port("bond0", Some("100")),
            port("wlan1", None),
        ]);
        assert!(groups.is_empty());
    }

    #[test]
    fn access_ports_keep_input_order() {
        let groups = classify(&[
            port("ether8", Some("100")),
            port("ether2", Some("100")),
            port("ether5", Some("30")),
        ]);
        assert_eq!(groups.access, vec!["ether8", "ether2", "ether5"]);
        assert!(groups.uplink.is_empty());
    }

    #[test]
    fn unparseable_suffix_is_reported_and_never_promoted() {
        let (groups, diagnostics) = classify_ports(
            &trunks(&["ether1", "ether-mgmt", "ether2"]),
            &PortRules::default(),
        );
        assert_eq!(groups.uplink, vec!["ether2"]);
        assert_eq!(groups.trunk, vec!["ether1", "ether-mgmt"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnparseablePortSuffix);
    }

    #[test]
    fn groups_are_disjoint_and_cover_every_physical_port() {
        let ports = vec![
            port("ether1", Some("1")),
            port("ether2", None),
            port("ether3", Some("100")),
            port("ether4", Some("1")),
            port("ether5", Some("1")),
            port("ether6", Some("200")),
            port("ether7", Some("1")),
            port("ether1", Some("300")),
            port("bridge-lo", Some("1")),
            port("ether-x", Some("1")),
        ];
        let groups = classify(&ports);

        let all: Vec<&String> = groups
            .uplink
            .iter()
            .chain(&groups.trunk)
            .chain(&groups.access)
            .collect();
        let unique: BTreeSet<&str> = all.iter().map(|s| s.as_str()).collect();
        assert_eq!(all.len(), unique.len());

        let expected: BTreeSet<&str> = ports
            .iter()
            .map(|p| p.get("interface"))
            .filter(|name| name.starts_with("ether"))
            .collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn custom_prefix_and_threshold() {
        let rules = PortRules {
            prefix: "sfp".to_string(),
            trunk_pvid: "1".to_string(),
            uplink_pair_threshold: 1,
        };
        let (groups, _) = classify_ports(&trunks(&["sfp1", "sfp2", "ether1"]), &rules);
        assert_eq!(groups.uplink, vec!["sfp1", "sfp2"]);
        assert!(groups.trunk.is_empty());
    }

    #[test]
    fn zero_threshold_never_promotes_more_trunks_than_exist() {
        let rules = PortRules {
            uplink_pair_threshold: 0,
            ..PortRules::default()
        };
        let (groups, _) = classify_ports(&trunks(&["ether1"]), &rules);
        assert_eq!(groups.uplink, vec!["ether1"]);
        assert!(groups.trunk.is_empty());

        let (groups, _) = classify_ports(&trunks(&["ether2", "ether1"]), &rules);
        assert_eq!(groups.uplink, vec!["ether1", "ether2"]);
        assert!(groups.trunk.is_empty());
    }
}

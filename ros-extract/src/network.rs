//! Network prefixes for role VLANs.
//!
//! ## Known limitation
//!
//! [`derive_network`] zeroes the last octet and keeps the original prefix
//! length, i.e. it always assumes a /24 host/network split. For other prefix
//! lengths the result is not the real network address (`10.20.30.5/16` gives
//! `10.20.30.0/16`). Downstream provisioning files depend on this exact output,
//! so it is kept as-is.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use routeros_model::Record;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::roles::{Role, RoleAssignment};

/// Prefix of VLAN interface names that addresses are mapped through (`vlan100`).
pub const VLAN_INTERFACE_PREFIX: &str = "vlan";

/// Reasons an address cannot be turned into a network prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("expected A.B.C.D/N, found no prefix length")]
    MissingPrefix,
    #[error("'{0}' is not an IPv4 address")]
    InvalidAddress(String),
    #[error("'{0}' is not a prefix length between 0 and 32")]
    InvalidPrefixLength(String),
}

/// Replace the last octet of a CIDR host address with `0`, keeping `/N` verbatim.
pub fn derive_network(address_cidr: &str) -> Result<String, NetworkError> {
    let (host, prefix) = address_cidr
        .trim()
        .split_once('/')
        .ok_or(NetworkError::MissingPrefix)?;
    let addr: Ipv4Addr = host
        .parse()
        .map_err(|_| NetworkError::InvalidAddress(host.to_string()))?;
    match prefix.parse::<u8>() {
        Ok(len) if len <= 32 => {}
        _ => return Err(NetworkError::InvalidPrefixLength(prefix.to_string())),
    }

    let [a, b, c, _] = addr.octets();
    Ok(format!("{a}.{b}.{c}.0/{prefix}"))
}

/// Role token to the network prefix of that role's VLAN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NetworkAssignment {
    networks: BTreeMap<Role, String>,
}

impl NetworkAssignment {
    pub fn network(&self, role: Role) -> Option<&str> {
        self.networks.get(&role).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        self.networks.iter().map(|(role, net)| (*role, net.as_str()))
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// Map addresses on `vlan<N>` interfaces to the role owning VLAN `<N>`.
///
/// Addresses on any other interface, or on a VLAN without a role, are ignored.
/// Malformed addresses are skipped with a diagnostic. When two addresses land
/// on the same role the later one is kept and the replacement is reported.
pub fn assign_networks(
    addresses: &[Record],
    roles: &RoleAssignment,
) -> (NetworkAssignment, Vec<Diagnostic>) {
    let mut assignment = NetworkAssignment::default();
    let mut diagnostics = Vec::new();

    for record in addresses {
        let interface = record.get("interface");
        let address = record.get("address");
        let Some(vlan_id) = vlan_interface_id(interface) else {
            continue;
        };
        if address.is_empty() {
            continue;
        }
        let Some(role) = roles.role_for_vlan(vlan_id) else {
            continue;
        };

        let network = match derive_network(address) {
            Ok(network) => network,
            Err(err) => {
                diagnostics.push(Diagnostic::malformed_address(
                    interface,
                    address,
                    &err.to_string(),
                ));
                continue;
            }
        };

        debug!(role = %role, network = %network, interface, "network derived");
        if let Some(previous) = assignment.networks.insert(role, network.clone()) {
            if previous != network {
                diagnostics.push(Diagnostic::network_overwritten(role, &previous, &network));
            }
        }
    }

    (assignment, diagnostics)
}

/// `vlan100` -> `100`; anything that is not `vlan` followed by digits -> `None`.
fn vlan_interface_id(interface: &str) -> Option<&str> {
    let id = interface.strip_prefix(VLAN_INTERFACE_PREFIX)?;
    (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then_some(id)
}

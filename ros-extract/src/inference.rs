use routeros_model::{tables, RawConfig};
use serde::Serialize;
use tracing::warn;

use crate::diagnostics::Diagnostic;
use crate::network::{assign_networks, NetworkAssignment};
use crate::ports::{classify_ports, PortGroups};
use crate::roles::{classify_roles, RoleAssignment};
use crate::vocabulary::Vocabulary;

/// Everything inferred from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inference {
    pub roles: RoleAssignment,
    pub networks: NetworkAssignment,
    pub ports: PortGroups,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the role and port classifiers, then derive role networks.
///
/// Every diagnostic is logged at `warn` as well as returned.
pub fn infer(config: &RawConfig, vocabulary: &Vocabulary) -> Inference {
    let (roles, mut diagnostics) = classify_roles(config.table(tables::VLANS), &vocabulary.roles);
    let (ports, port_diagnostics) =
        classify_ports(config.table(tables::BRIDGE_PORTS), &vocabulary.ports);
    let (networks, network_diagnostics) = assign_networks(config.table(tables::ADDRESSES), &roles);

    diagnostics.extend(port_diagnostics);
    diagnostics.extend(network_diagnostics);
    for diagnostic in &diagnostics {
        warn!(code = %diagnostic.code, "{}", diagnostic.message);
    }

    Inference {
        roles,
        networks,
        ports,
        diagnostics,
    }
}

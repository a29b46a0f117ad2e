//! Non-fatal findings raised while inferring roles, networks and port groups.
//!
//! Inference never guesses silently: whenever the heuristics had to drop or
//! override something, a [`Diagnostic`] records it so the caller can log it,
//! print it, or refuse the run under `--strict`.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A later VLAN matched a role an earlier VLAN already holds.
    RoleConflict,
    /// A trunk port name has no numeric suffix to order it by.
    UnparseablePortSuffix,
    /// A VLAN interface address is not `A.B.C.D/N`.
    MalformedAddress,
    /// Two addresses resolved to the same role.
    NetworkOverwritten,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::RoleConflict => "role_conflict",
            DiagnosticCode::UnparseablePortSuffix => "unparseable_port_suffix",
            DiagnosticCode::MalformedAddress => "malformed_address",
            DiagnosticCode::NetworkOverwritten => "network_overwritten",
        }
    }
}

impl Display for DiagnosticCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn role_conflict(role: Role, kept_vlan: &str, ignored_vlan: &str) -> Self {
        Self {
            code: DiagnosticCode::RoleConflict,
            message: format!(
                "VLAN {ignored_vlan} also matches role '{role}', keeping VLAN {kept_vlan}"
            ),
        }
    }

    pub fn unparseable_port_suffix(interface: &str) -> Self {
        Self {
            code: DiagnosticCode::UnparseablePortSuffix,
            message: format!(
                "trunk port '{interface}' has no numeric suffix; left as trunk, not considered for uplink"
            ),
        }
    }

    pub fn malformed_address(interface: &str, address: &str, reason: &str) -> Self {
        Self {
            code: DiagnosticCode::MalformedAddress,
            message: format!("address '{address}' on {interface} skipped: {reason}"),
        }
    }

    pub fn network_overwritten(role: Role, previous: &str, current: &str) -> Self {
        Self {
            code: DiagnosticCode::NetworkOverwritten,
            message: format!("role '{role}' network {previous} replaced by {current}"),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

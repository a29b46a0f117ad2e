//! VLAN role classification.
//!
//! Each VLAN's lower-cased name and comment are tested against the vocabulary's
//! keyword groups in priority order; the first group with a hit decides the
//! VLAN's single role.
//!
//! ## Known limitation
//!
//! Roles are first-match-wins in VLAN input order. When a later VLAN matches a
//! role that is already claimed, it is ignored for that role and a
//! `role_conflict` diagnostic is raised; the earlier VLAN keeps the role.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use routeros_model::Record;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::vocabulary::RoleRule;

/// Semantic network roles. Declaration order is the output order everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Mgmt,
    Vmotion,
    Vsan,
    Tep,
    EdgeTep,
    Vm,
    Nfs,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Mgmt,
        Role::Vmotion,
        Role::Vsan,
        Role::Tep,
        Role::EdgeTep,
        Role::Vm,
        Role::Nfs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Mgmt => "mgmt",
            Role::Vmotion => "vmotion",
            Role::Vsan => "vsan",
            Role::Tep => "tep",
            Role::EdgeTep => "edge_tep",
            Role::Vm => "vm",
            Role::Nfs => "nfs",
        }
    }

    /// Prefix used for this role's environment keys (`EDGE_TEP_VLAN_ID`, ...).
    pub fn env_prefix(self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role token to the `vlan-id` that claimed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleAssignment {
    claims: BTreeMap<Role, String>,
}

impl RoleAssignment {
    pub fn vlan_id(&self, role: Role) -> Option<&str> {
        self.claims.get(&role).map(String::as_str)
    }

    /// The role held by a VLAN id, checking roles in their fixed order.
    pub fn role_for_vlan(&self, vlan_id: &str) -> Option<Role> {
        self.claims
            .iter()
            .find(|(_, id)| id.as_str() == vlan_id)
            .map(|(role, _)| *role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        self.claims.iter().map(|(role, id)| (*role, id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Assign roles to VLAN records, in input order.
pub fn classify_roles(vlans: &[Record], rules: &[RoleRule]) -> (RoleAssignment, Vec<Diagnostic>) {
    let mut assignment = RoleAssignment::default();
    let mut diagnostics = Vec::new();

    for vlan in vlans {
        let vlan_id = vlan.get("vlan-id");
        let name = vlan.get("name").to_lowercase();
        let comment = vlan.get("comment").to_lowercase();

        let Some(role) = match_role(rules, &name, &comment) else {
            debug!(vlan_id, name = %name, "VLAN left unclassified");
            continue;
        };

        if let Some(kept) = assignment.vlan_id(role) {
            diagnostics.push(Diagnostic::role_conflict(role, kept, vlan_id));
            continue;
        }

        debug!(vlan_id, role = %role, "VLAN role assigned");
        assignment.claims.insert(role, vlan_id.to_string());
    }

    (assignment, diagnostics)
}

fn match_role(rules: &[RoleRule], name: &str, comment: &str) -> Option<Role> {
    let mentions = |keyword: &str| name.contains(keyword) || comment.contains(keyword);

    let rule = rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| mentions(k)))?;

    match &rule.qualifier {
        Some(qualifier) if mentions(&qualifier.keyword) => Some(qualifier.role),
        _ => Some(rule.role),
    }
}

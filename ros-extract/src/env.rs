//! Provisioning environment file rendering.
//!
//! Produces `KEY="value"` lines for the VCF provisioning script from the
//! inferred roles, networks and port groups plus a few raw fields. The four
//! core VLAN keys always appear, falling back to lab defaults; everything else
//! only appears when it was actually found.

use routeros_model::{tables, RawConfig};

use crate::network::NetworkAssignment;
use crate::ports::PortGroups;
use crate::provenance::Provenance;
use crate::roles::{Role, RoleAssignment};

pub const ENV_TITLE: &str = "MikroTik Configuration Environment File";

/// VLAN ids written when the matching role was not inferred.
pub const DEFAULT_VLAN_IDS: [(Role, &str); 4] = [
    (Role::Mgmt, "100"),
    (Role::Vmotion, "101"),
    (Role::Vsan, "102"),
    (Role::Tep, "103"),
];
/// Roles whose VLAN id is only written when inferred.
pub const OPTIONAL_VLAN_ROLES: [Role; 3] = [Role::EdgeTep, Role::Vm, Role::Nfs];
pub const DEFAULT_BRIDGE_NAME: &str = "br-vcf";
pub const BRIDGE_VLAN_FILTERING: &str = "yes";
pub const DEFAULT_DNS_SERVERS: &str = "8.8.8.8,8.8.4.4";
pub const DEFAULT_SNMP_ENABLED: &str = "no";
pub const DEFAULT_SNMP_COMMUNITY: &str = "public";
pub const DEFAULT_SNMP_LOCATION: &str = "Datacenter";
/// Access ports surfaced as management access ports.
pub const MGMT_ACCESS_PORT_LIMIT: usize = 2;

/// How the provisioning script should reach the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub host: String,
    pub username: String,
}

/// A titled group of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSection {
    pub title: &'static str,
    pub entries: Vec<(String, String)>,
}

impl EnvSection {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            entries: Vec::new(),
        }
    }

    fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }
}

/// Rendered environment document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDocument {
    pub header: Vec<String>,
    pub sections: Vec<EnvSection>,
}

impl EnvDocument {
    /// All key/value pairs in document order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .flat_map(|section| section.entries.iter())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// File contents. Sections without entries are left out.
    pub fn to_text(&self) -> String {
        let mut out = self.header.clone();
        out.push(String::new());
        for section in self.sections.iter().filter(|s| !s.entries.is_empty()) {
            out.push(format!("# {}", section.title));
            for (key, value) in &section.entries {
                out.push(format!("{key}={}", shell_quote(value)));
            }
            out.push(String::new());
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

/// Render the environment document.
pub fn render_env(
    config: &RawConfig,
    roles: &RoleAssignment,
    networks: &NetworkAssignment,
    ports: &PortGroups,
    connection: &Connection,
    provenance: &Provenance,
) -> EnvDocument {
    EnvDocument {
        header: provenance.comment_lines(ENV_TITLE),
        sections: vec![
            connection_section(connection),
            vlan_section(roles),
            network_section(networks),
            bridge_section(config),
            interface_section(ports),
            dns_section(config),
            snmp_section(config),
        ],
    }
}

fn connection_section(connection: &Connection) -> EnvSection {
    let mut section = EnvSection::new("MikroTik Connection Settings");
    section.set("MIKROTIK_IP", connection.host.as_str());
    section.set("MIKROTIK_USER", connection.username.as_str());
    // Never written to disk; the provisioning script prompts for it.
    section.set("MIKROTIK_PASSWORD", "");
    section
}

fn vlan_section(roles: &RoleAssignment) -> EnvSection {
    let mut section = EnvSection::new("VCF VLAN Configuration");
    for (role, default) in DEFAULT_VLAN_IDS {
        let vlan_id = roles.vlan_id(role).unwrap_or(default);
        section.set(vlan_key(role), vlan_id);
    }
    for role in OPTIONAL_VLAN_ROLES {
        if let Some(vlan_id) = roles.vlan_id(role) {
            section.set(vlan_key(role), vlan_id);
        }
    }
    section
}

fn network_section(networks: &NetworkAssignment) -> EnvSection {
    let mut section = EnvSection::new("Network Configuration");
    for role in Role::ALL {
        if let Some(network) = networks.network(role) {
            section.set(format!("{}_NETWORK", role.env_prefix()), network);
        }
    }
    section
}

fn bridge_section(config: &RawConfig) -> EnvSection {
    let name = config
        .first(tables::BRIDGES)
        .map_or(DEFAULT_BRIDGE_NAME, |bridge| {
            bridge.get_or("name", DEFAULT_BRIDGE_NAME)
        });
    let mut section = EnvSection::new("Bridge Configuration");
    section.set("BRIDGE_NAME", name);
    section.set("BRIDGE_VLAN_FILTERING", BRIDGE_VLAN_FILTERING);
    section
}

fn interface_section(ports: &PortGroups) -> EnvSection {
    let mut section = EnvSection::new("Interface Configuration");
    if !ports.uplink.is_empty() {
        section.set("UPLINK_INTERFACES", ports.uplink.join(","));
    }
    if !ports.trunk.is_empty() {
        section.set("TRUNK_INTERFACES", ports.trunk.join(","));
    }
    if !ports.access.is_empty() {
        let limit = ports.access.len().min(MGMT_ACCESS_PORT_LIMIT);
        section.set("MGMT_ACCESS_PORTS", ports.access[..limit].join(","));
    }
    section
}

fn dns_section(config: &RawConfig) -> EnvSection {
    let servers = config
        .first(tables::DNS)
        .map_or(DEFAULT_DNS_SERVERS, |dns| {
            dns.get_or("servers", DEFAULT_DNS_SERVERS)
        });
    let mut section = EnvSection::new("DNS Configuration");
    section.set("DNS_SERVERS", servers);
    section
}

fn snmp_section(config: &RawConfig) -> EnvSection {
    let snmp = config.first(tables::SNMP);
    let enabled = snmp.map_or(DEFAULT_SNMP_ENABLED, |s| {
        s.get_or("enabled", DEFAULT_SNMP_ENABLED)
    });
    let location = snmp.map_or(DEFAULT_SNMP_LOCATION, |s| {
        s.get_or("location", DEFAULT_SNMP_LOCATION)
    });
    let community = config
        .first(tables::SNMP_COMMUNITIES)
        .map_or(DEFAULT_SNMP_COMMUNITY, |c| {
            c.get_or("name", DEFAULT_SNMP_COMMUNITY)
        });

    let mut section = EnvSection::new("SNMP Configuration");
    section.set("ENABLE_SNMP", enabled);
    section.set("SNMP_COMMUNITY", community);
    section.set("SNMP_LOCATION", location);
    section
}

fn vlan_key(role: Role) -> String {
    format!("{}_VLAN_ID", role.env_prefix())
}

/// Double-quote a value so the file can be sourced by a POSIX shell.
fn shell_quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

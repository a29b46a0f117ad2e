//! RouterOS script rendering.
//!
//! The raw snapshot is replayed as `add`/`set` directives, one labeled section
//! per menu, in a fixed order:
//!
//! identity, bridges, bridge ports, VLAN interfaces, bridge VLANs, IP addresses,
//! routes, DNS, DHCP pools, DHCP server networks, DHCP servers, services,
//! firewall filter rules, SNMP.
//!
//! A section is only written when its table has records (DNS, identity and SNMP
//! additionally need the relevant field set). Records keep their snapshot order.
//! Runtime state that RouterOS recreates by itself (dynamic routes and rules) is
//! never written.

use routeros_model::{tables, RawConfig, Record, TableRef};

use crate::ports::DEFAULT_PVID;
use crate::provenance::Provenance;

pub const SCRIPT_TITLE: &str = "MikroTik RouterOS Configuration Script";

/// Bridge STP mode RouterOS uses when none is configured.
pub const DEFAULT_PROTOCOL_MODE: &str = "none";
/// SNMP community name that needs no rename.
pub const DEFAULT_SNMP_COMMUNITY: &str = "public";
const BRIDGE_COMMENT: &str = "Extracted bridge";

struct Section {
    title: &'static str,
    lines: Vec<String>,
}

/// Render the whole script as lines (without trailing newlines).
pub fn render_script(config: &RawConfig, provenance: &Provenance) -> Vec<String> {
    let mut out = provenance.comment_lines(SCRIPT_TITLE);
    out.push(String::new());

    let sections = [
        identity(config),
        table_section(config, tables::BRIDGES, "Bridge Configuration", bridge),
        table_section(config, tables::BRIDGE_PORTS, "Bridge Port Configuration", bridge_port),
        table_section(config, tables::VLANS, "VLAN Interface Configuration", vlan),
        table_section(config, tables::BRIDGE_VLANS, "Bridge VLAN Configuration", bridge_vlan),
        table_section(config, tables::ADDRESSES, "IP Address Configuration", address),
        table_section(config, tables::ROUTES, "Route Configuration", route),
        dns(config),
        table_section(config, tables::POOLS, "DHCP Pool Configuration", pool),
        table_section(
            config,
            tables::DHCP_NETWORKS,
            "DHCP Server Network Configuration",
            dhcp_network,
        ),
        table_section(config, tables::DHCP_SERVERS, "DHCP Server Configuration", dhcp_server),
        table_section(config, tables::SERVICES, "Service Configuration", service),
        table_section(config, tables::FIREWALL_FILTER, "Firewall Filter Rules", filter_rule),
        snmp(config),
    ];

    for section in sections.into_iter().flatten() {
        out.push(format!("# {}", section.title));
        out.extend(section.lines);
        out.push(String::new());
    }
    out
}

/// Join rendered lines into the file contents.
pub fn to_text(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn table_section(
    config: &RawConfig,
    table: TableRef,
    title: &'static str,
    directive: fn(&Record) -> Option<String>,
) -> Option<Section> {
    let records = config.table(table);
    if records.is_empty() {
        return None;
    }
    Some(Section {
        title,
        lines: records.iter().filter_map(directive).collect(),
    })
}

fn identity(config: &RawConfig) -> Option<Section> {
    let name = config
        .first(tables::IDENTITY)
        .map(|identity| identity.get("name"))
        .filter(|name| !name.is_empty())?;
    Some(Section {
        title: "System Identity",
        lines: vec![Directive::new("/system identity set")
            .quoted("name", name)
            .build()],
    })
}

fn bridge(bridge: &Record) -> Option<String> {
    let protocol_mode = bridge.get_or("protocol-mode", DEFAULT_PROTOCOL_MODE);
    let vlan_filtering = bridge.get("vlan-filtering");
    Some(
        Directive::new("/interface bridge add")
            .arg("name", bridge.get("name"))
            .arg_when(
                !matches!(protocol_mode, "" | DEFAULT_PROTOCOL_MODE),
                "protocol-mode",
                protocol_mode,
            )
            .arg_when(vlan_filtering == "yes", "vlan-filtering", vlan_filtering)
            .quoted("comment", BRIDGE_COMMENT)
            .build(),
    )
}

fn bridge_port(port: &Record) -> Option<String> {
    let pvid = port.get("pvid");
    Some(
        Directive::new("/interface bridge port add")
            .arg("bridge", port.get("bridge"))
            .arg("interface", port.get("interface"))
            .arg_when(!pvid.is_empty() && pvid != DEFAULT_PVID, "pvid", pvid)
            .build(),
    )
}

fn vlan(vlan: &Record) -> Option<String> {
    Some(
        Directive::new("/interface vlan add")
            .arg("name", vlan.get("name"))
            .arg("vlan-id", vlan.get("vlan-id"))
            .arg("interface", vlan.get("interface"))
            .quoted_if("comment", vlan.get("comment"))
            .build(),
    )
}

fn bridge_vlan(entry: &Record) -> Option<String> {
    Some(
        Directive::new("/interface bridge vlan add")
            .arg("bridge", entry.get("bridge"))
            .arg("vlan-ids", entry.get("vlan-ids"))
            .arg_if("tagged", entry.get("tagged"))
            .arg_if("untagged", entry.get("untagged"))
            .build(),
    )
}

fn address(addr: &Record) -> Option<String> {
    Some(
        Directive::new("/ip address add")
            .arg("address", addr.get("address"))
            .arg("interface", addr.get("interface"))
            .quoted_if("comment", addr.get("comment"))
            .build(),
    )
}

fn route(route: &Record) -> Option<String> {
    if route.is_flag_set("dynamic") {
        return None;
    }
    let dst_address = route.get("dst-address");
    let gateway = route.get("gateway");
    if dst_address.is_empty() || gateway.is_empty() {
        return None;
    }
    Some(
        Directive::new("/ip route add")
            .arg("dst-address", dst_address)
            .arg("gateway", gateway)
            .quoted_if("comment", route.get("comment"))
            .build(),
    )
}

fn dns(config: &RawConfig) -> Option<Section> {
    let servers = config
        .first(tables::DNS)
        .map(|dns| dns.get("servers"))
        .filter(|servers| !servers.is_empty())?;
    Some(Section {
        title: "DNS Configuration",
        lines: vec![Directive::new("/ip dns set").arg("servers", servers).build()],
    })
}

fn pool(pool: &Record) -> Option<String> {
    Some(
        Directive::new("/ip pool add")
            .arg("name", pool.get("name"))
            .arg("ranges", pool.get("ranges"))
            .build(),
    )
}

fn dhcp_network(network: &Record) -> Option<String> {
    Some(
        Directive::new("/ip dhcp-server network add")
            .arg("address", network.get("address"))
            .arg_if("gateway", network.get("gateway"))
            .arg_if("dns-server", network.get("dns-server"))
            .build(),
    )
}

fn dhcp_server(server: &Record) -> Option<String> {
    let enabled = server.get_or("disabled", "no") == "no";
    Some(
        Directive::new("/ip dhcp-server add")
            .arg("name", server.get("name"))
            .arg_if("interface", server.get("interface"))
            .arg_if("address-pool", server.get("address-pool"))
            .arg_when(enabled, "disabled", "no")
            .build(),
    )
}

fn service(service: &Record) -> Option<String> {
    let port = service.get("port");
    let default_port = service.get_or("default-port", port);
    Some(
        Directive::new("/ip service set")
            .word(service.get("name"))
            .arg("disabled", service.get_or("disabled", "no"))
            .arg_when(!port.is_empty() && port != default_port, "port", port)
            .build(),
    )
}

fn filter_rule(rule: &Record) -> Option<String> {
    if rule.is_flag_set("dynamic") {
        return None;
    }
    Some(
        Directive::new("/ip firewall filter add")
            .arg("chain", rule.get("chain"))
            .arg("action", rule.get("action"))
            .arg_if("protocol", rule.get("protocol"))
            .arg_if("src-address", rule.get("src-address"))
            .arg_if("dst-address", rule.get("dst-address"))
            .arg_if("dst-port", rule.get("dst-port"))
            .arg_if("in-interface", rule.get("in-interface"))
            .arg_if("connection-state", rule.get("connection-state"))
            .quoted_if("comment", rule.get("comment"))
            .build(),
    )
}

fn snmp(config: &RawConfig) -> Option<Section> {
    let snmp = config.first(tables::SNMP)?;
    if snmp.get_or("enabled", "no") != "yes" {
        return None;
    }

    let mut lines = vec![Directive::new("/snmp set")
        .arg("enabled", "yes")
        .arg_if("contact", snmp.get("contact"))
        .quoted_if("location", snmp.get("location"))
        .build()];
    for community in config.table(tables::SNMP_COMMUNITIES) {
        let name = community.get("name");
        if name.is_empty() || name == DEFAULT_SNMP_COMMUNITY {
            continue;
        }
        lines.push(
            Directive::new("/snmp community set [find default=yes]")
                .quoted("name", name)
                .build(),
        );
    }
    Some(Section {
        title: "SNMP Configuration",
        lines,
    })
}

/// One script line built from a menu command and `key=value` arguments.
struct Directive {
    line: String,
}

impl Directive {
    fn new(command: &str) -> Self {
        Self {
            line: command.to_string(),
        }
    }

    /// Positional word, e.g. the service name in `/ip service set ssh`.
    fn word(mut self, word: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(&value(word));
        self
    }

    fn arg(mut self, key: &str, val: &str) -> Self {
        self.line.push_str(&format!(" {key}={}", value(val)));
        self
    }

    fn arg_if(self, key: &str, val: &str) -> Self {
        self.arg_when(!val.is_empty(), key, val)
    }

    fn arg_when(self, condition: bool, key: &str, val: &str) -> Self {
        if condition {
            self.arg(key, val)
        } else {
            self
        }
    }

    /// Always-quoted argument, used for free text such as comments.
    fn quoted(mut self, key: &str, val: &str) -> Self {
        self.line.push_str(&format!(" {key}={}", quote(val)));
        self
    }

    fn quoted_if(self, key: &str, val: &str) -> Self {
        if val.is_empty() {
            self
        } else {
            self.quoted(key, val)
        }
    }

    fn build(self) -> String {
        self.line
    }
}

/// Bare value when RouterOS can read it unquoted, quoted otherwise.
fn value(raw: &str) -> String {
    let bare = !raw.is_empty()
        && raw
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "-_.,:/@+*!%".contains(ch));
    if bare {
        raw.to_string()
    } else {
        quote(raw)
    }
}

fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        if matches!(ch, '"' | '\\' | '$') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use routeros_model::{tables, RawConfig, Record};

    use super::{quote, render_script, to_text};
    use crate::provenance::Provenance;

    fn provenance() -> Provenance {
        Provenance::new("192.168.88.1", "2024-05-01 10:15:00")
    }

    fn body(config: &RawConfig) -> Vec<String> {
        render_script(config, &provenance())
            .into_iter()
            .skip(4)
            .collect()
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_config_renders_header_only() {
        let out = render_script(&RawConfig::new(), &provenance());
        assert_eq!(
            out,
            lines(&[
                "# MikroTik RouterOS Configuration Script",
                "# Extracted from 192.168.88.1 on 2024-05-01 10:15:00",
                "# Generated by MikroTik Config Extractor",
                "",
            ])
        );
    }

    #[test]
    fn bridge_omits_default_fields() {
        let config = RawConfig::new().with_table(
            tables::BRIDGES,
            vec![
                Record::new()
                    .with("name", "br-vcf")
                    .with("protocol-mode", "none")
                    .with("vlan-filtering", "no"),
                Record::new()
                    .with("name", "br-lab")
                    .with("protocol-mode", "rstp")
                    .with("vlan-filtering", "yes"),
            ],
        );
        assert_eq!(
            body(&config),
            lines(&[
                "# Bridge Configuration",
                "/interface bridge add name=br-vcf comment=\"Extracted bridge\"",
                "/interface bridge add name=br-lab protocol-mode=rstp vlan-filtering=yes comment=\"Extracted bridge\"",
                "",
            ])
        );
    }

    #[test]
    fn bridge_port_pvid_only_when_not_default() {
        let config = RawConfig::new().with_table(
            tables::BRIDGE_PORTS,
            vec![
                Record::new().with("bridge", "br").with("interface", "ether1").with("pvid", "1"),
                Record::new().with("bridge", "br").with("interface", "ether2").with("pvid", "100"),
                Record::new().with("bridge", "br").with("interface", "ether3"),
            ],
        );
        assert_eq!(
            body(&config),
            lines(&[
                "# Bridge Port Configuration",
                "/interface bridge port add bridge=br interface=ether1",
                "/interface bridge port add bridge=br interface=ether2 pvid=100",
                "/interface bridge port add bridge=br interface=ether3",
                "",
            ])
        );
    }

    #[test]
    fn routes_need_destination_and_gateway_and_skip_dynamic() {
        let config = RawConfig::new().with_table(
            tables::ROUTES,
            vec![
                Record::new().with("dst-address", "0.0.0.0/0").with("gateway", "10.0.0.1"),
                Record::new().with("dst-address", "10.1.0.0/16"),
                Record::new()
                    .with("dst-address", "10.2.0.0/16")
                    .with("gateway", "10.0.0.2")
                    .with("dynamic", "true"),
                Record::new().with("gateway", "10.0.0.3"),
            ],
        );
        assert_eq!(
            body(&config),
            lines(&[
                "# Route Configuration",
                "/ip route add dst-address=0.0.0.0/0 gateway=10.0.0.1",
                "",
            ])
        );
    }

    #[test]
    fn firewall_fields_follow_fixed_order_and_dynamic_rules_are_skipped() {
        let config = RawConfig::new().with_table(
            tables::FIREWALL_FILTER,
            vec![
                Record::new()
                    .with("comment", "ssh from mgmt")
                    .with("in-interface", "vlan100")
                    .with("dst-port", "22")
                    .with("protocol", "tcp")
                    .with("action", "accept")
                    .with("chain", "input"),
                Record::new()
                    .with("chain", "forward")
                    .with("action", "passthrough")
                    .with("dynamic", "true"),
            ],
        );
        assert_eq!(
            body(&config),
            lines(&[
                "# Firewall Filter Rules",
                "/ip firewall filter add chain=input action=accept protocol=tcp dst-port=22 in-interface=vlan100 comment=\"ssh from mgmt\"",
                "",
            ])
        );
    }

    #[test]
    fn service_port_only_when_changed() {
        let config = RawConfig::new().with_table(
            tables::SERVICES,
            vec![
                Record::new()
                    .with("name", "ssh")
                    .with("port", "2222")
                    .with("default-port", "22")
                    .with("disabled", "no"),
                Record::new()
                    .with("name", "telnet")
                    .with("port", "23")
                    .with("default-port", "23")
                    .with("disabled", "yes"),
                Record::new().with("name", "winbox").with("port", "8291"),
            ],
        );
        assert_eq!(
            body(&config),
            lines(&[
                "# Service Configuration",
                "/ip service set ssh disabled=no port=2222",
                "/ip service set telnet disabled=yes",
                "/ip service set winbox disabled=no",
                "",
            ])
        );
    }

    #[test]
    fn snmp_requires_enabled_and_keeps_public_community() {
        let disabled = RawConfig::new()
            .with_table(tables::SNMP, vec![Record::new().with("enabled", "no")])
            .with_table(
                tables::SNMP_COMMUNITIES,
                vec![Record::new().with("name", "secret")],
            );
        assert!(body(&disabled).is_empty());

        let enabled = RawConfig::new()
            .with_table(
                tables::SNMP,
                vec![Record::new()
                    .with("enabled", "yes")
                    .with("contact", "noc")
                    .with("location", "Rack 4")],
            )
            .with_table(
                tables::SNMP_COMMUNITIES,
                vec![
                    Record::new().with("name", "public"),
                    Record::new().with("name", "vcf-ro"),
                ],
            );
        assert_eq!(
            body(&enabled),
            lines(&[
                "# SNMP Configuration",
                "/snmp set enabled=yes contact=noc location=\"Rack 4\"",
                "/snmp community set [find default=yes] name=\"vcf-ro\"",
                "",
            ])
        );
    }

    #[test]
    fn dhcp_server_disabled_flag_only_for_enabled_servers() {
        let config = RawConfig::new().with_table(
            tables::DHCP_SERVERS,
            vec![
                Record::new()
                    .with("name", "dhcp1")
                    .with("interface", "vlan100")
                    .with("address-pool", "pool1"),
                Record::new().with("name", "dhcp2").with("disabled", "yes"),
            ],
        );
        assert_eq!(
            body(&config),
            lines(&[
                "# DHCP Server Configuration",
                "/ip dhcp-server add name=dhcp1 interface=vlan100 address-pool=pool1 disabled=no",
                "/ip dhcp-server add name=dhcp2",
                "",
            ])
        );
    }

    #[test]
    fn sections_follow_fixed_order_regardless_of_insertion() {
        let config = RawConfig::new()
            .with_table(tables::SNMP, vec![Record::new().with("enabled", "yes")])
            .with_table(tables::DNS, vec![Record::new().with("servers", "1.1.1.1")])
            .with_table(
                tables::POOLS,
                vec![Record::new().with("name", "p").with("ranges", "10.0.0.10-10.0.0.20")],
            )
            .with_table(tables::IDENTITY, vec![Record::new().with("name", "core-sw")]);
        let headers: Vec<String> = body(&config)
            .into_iter()
            .filter(|line| line.starts_with('#'))
            .collect();
        assert_eq!(
            headers,
            lines(&[
                "# System Identity",
                "# DNS Configuration",
                "# DHCP Pool Configuration",
                "# SNMP Configuration",
            ])
        );
    }

    #[test]
    fn comments_and_odd_values_are_quoted() {
        let config = RawConfig::new().with_table(
            tables::VLANS,
            vec![Record::new()
                .with("name", "vlan100")
                .with("vlan-id", "100")
                .with("interface", "br lab")
                .with("comment", "say \"hi\" for $5")],
        );
        assert_eq!(
            body(&config)[1],
            "/interface vlan add name=vlan100 vlan-id=100 interface=\"br lab\" comment=\"say \\\"hi\\\" for \\$5\""
        );
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn rendering_is_idempotent() {
        let config = RawConfig::new()
            .with_table(tables::IDENTITY, vec![Record::new().with("name", "sw")])
            .with_table(
                tables::ADDRESSES,
                vec![Record::new()
                    .with("address", "10.0.0.1/24")
                    .with("interface", "vlan10")],
            );
        let first = to_text(&render_script(&config, &provenance()));
        let second = to_text(&render_script(&config, &provenance()));
        assert_eq!(first, second);
        assert!(first.ends_with("interface=vlan10\n\n"));
    }
}

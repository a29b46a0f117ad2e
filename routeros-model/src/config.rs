use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Functional categories a snapshot is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryName {
    System,
    Interfaces,
    Bridge,
    Ip,
    Services,
    Firewall,
    Snmp,
}

impl CategoryName {
    /// Every category in extraction order.
    pub const ALL: [CategoryName; 7] = [
        CategoryName::System,
        CategoryName::Interfaces,
        CategoryName::Bridge,
        CategoryName::Ip,
        CategoryName::Services,
        CategoryName::Firewall,
        CategoryName::Snmp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryName::System => "system",
            CategoryName::Interfaces => "interfaces",
            CategoryName::Bridge => "bridge",
            CategoryName::Ip => "ip",
            CategoryName::Services => "services",
            CategoryName::Firewall => "firewall",
            CategoryName::Snmp => "snmp",
        }
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of one record table inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub category: CategoryName,
    pub table: &'static str,
}

impl Display for TableRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.table)
    }
}

/// Well-known tables and the RouterOS menus they are read from.
pub mod tables {
    use super::{CategoryName, TableRef};

    const fn table(category: CategoryName, table: &'static str) -> TableRef {
        TableRef { category, table }
    }

    /// `/system/identity`
    pub const IDENTITY: TableRef = table(CategoryName::System, "identity");
    /// `/system/clock`
    pub const CLOCK: TableRef = table(CategoryName::System, "clock");
    /// `/system/resource`
    pub const RESOURCE: TableRef = table(CategoryName::System, "resource");
    /// `/interface`
    pub const INTERFACES: TableRef = table(CategoryName::Interfaces, "interfaces");
    /// `/interface/bridge`
    pub const BRIDGES: TableRef = table(CategoryName::Interfaces, "bridge");
    /// `/interface/bridge/port`
    pub const BRIDGE_PORTS: TableRef = table(CategoryName::Interfaces, "bridge_port");
    /// `/interface/vlan`
    pub const VLANS: TableRef = table(CategoryName::Interfaces, "vlan");
    /// `/interface/bridge/vlan`
    pub const BRIDGE_VLANS: TableRef = table(CategoryName::Bridge, "bridge_vlan");
    /// `/ip/address`
    pub const ADDRESSES: TableRef = table(CategoryName::Ip, "addresses");
    /// `/ip/route`
    pub const ROUTES: TableRef = table(CategoryName::Ip, "routes");
    /// `/ip/dns`
    pub const DNS: TableRef = table(CategoryName::Ip, "dns");
    /// `/ip/dhcp-server`
    pub const DHCP_SERVERS: TableRef = table(CategoryName::Ip, "dhcp_server");
    /// `/ip/dhcp-server/network`
    pub const DHCP_NETWORKS: TableRef = table(CategoryName::Ip, "dhcp_network");
    /// `/ip/pool`
    pub const POOLS: TableRef = table(CategoryName::Ip, "pools");
    /// `/ip/service`
    pub const SERVICES: TableRef = table(CategoryName::Services, "services");
    /// `/ip/firewall/filter`
    pub const FIREWALL_FILTER: TableRef = table(CategoryName::Firewall, "filter");
    /// `/snmp`
    pub const SNMP: TableRef = table(CategoryName::Snmp, "snmp");
    /// `/snmp/community`
    pub const SNMP_COMMUNITIES: TableRef = table(CategoryName::Snmp, "snmp_community");
}

/// Named record tables belonging to one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category {
    tables: BTreeMap<String, Vec<Record>>,
}

impl Category {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.tables.insert(name.into(), records);
    }

    /// Records of the named table, or an empty slice when the table is absent.
    pub fn table(&self, name: &str) -> &[Record] {
        self.tables
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.tables
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }
}

/// Metadata describing where and when a snapshot was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_by: Option<String>,
}

/// Normalized snapshot of a device's configuration.
///
/// Built once per run and read-only afterwards. Lookups of absent categories or
/// tables yield empty record sets rather than errors, so consumers degrade
/// section by section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    extraction_info: Option<ExtractionInfo>,
    #[serde(flatten)]
    categories: BTreeMap<String, Category>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extraction_info(&self) -> Option<&ExtractionInfo> {
        self.extraction_info.as_ref()
    }

    pub fn set_extraction_info(&mut self, info: ExtractionInfo) {
        self.extraction_info = Some(info);
    }

    pub fn insert_category(&mut self, name: CategoryName, category: Category) {
        self.categories.insert(name.as_str().to_string(), category);
    }

    /// Insert one table, creating its category when needed.
    pub fn insert_table(&mut self, table: TableRef, records: Vec<Record>) {
        self.categories
            .entry(table.category.as_str().to_string())
            .or_default()
            .insert_table(table.table, records);
    }

    /// Builder-style [`RawConfig::insert_table`].
    pub fn with_table(mut self, table: TableRef, records: Vec<Record>) -> Self {
        self.insert_table(table, records);
        self
    }

    pub fn category(&self, name: CategoryName) -> Option<&Category> {
        self.categories.get(name.as_str())
    }

    /// Records of a table, or an empty slice when the category or table is absent.
    pub fn table(&self, table: TableRef) -> &[Record] {
        self.category(table.category)
            .map(|category| category.table(table.table))
            .unwrap_or_default()
    }

    /// First record of a singleton table such as `/ip/dns` or `/snmp`.
    pub fn first(&self, table: TableRef) -> Option<&Record> {
        self.table(table).first()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Category::is_empty)
    }
}

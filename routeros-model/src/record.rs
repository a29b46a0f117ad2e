use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single device object (a VLAN, a bridge port, an address, a firewall rule, ...).
///
/// Field names are RouterOS property names (lowercase, hyphenated). Every value is
/// kept as the string the device reported; fields this crate knows nothing about
/// are preserved untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for constructing fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Return the field value, or an empty string when the field is missing.
    pub fn get(&self, field: &str) -> &str {
        self.get_or(field, "")
    }

    /// Return the field value, or `default` when the field is missing.
    ///
    /// A field that is present but empty is returned as-is.
    pub fn get_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.fields.get(field).map_or(default, String::as_str)
    }

    /// Whether the field holds a RouterOS truthy flag (`true` or `yes`).
    pub fn is_flag_set(&self, field: &str) -> bool {
        matches!(self.get(field), "true" | "yes")
    }
}

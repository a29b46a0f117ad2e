//! The per-category fetch contract and the snapshot-backed implementation.
//!
//! A live device session and a JSON snapshot both look the same to the rest of
//! the pipeline: something that can be asked for one category at a time.
//! [`extract`] enforces the degrade policy, so a category that fails to load
//! becomes an empty category and the remaining ones are still read.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{Category, CategoryName, ExtractionInfo, RawConfig};
use crate::parser::{parse_category, parse_extraction_info, parse_root, ParseError};

/// Error reported by a [`ConfigSource`] for a single category.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Something that can return a device's records one category at a time.
pub trait ConfigSource {
    /// Fetch one category. `Ok` with an empty category means "no data".
    fn fetch(&mut self, category: CategoryName) -> Result<Category, FetchError>;

    /// Snapshot metadata, when the source knows it.
    fn extraction_info(&self) -> Option<ExtractionInfo> {
        None
    }
}

/// Build a [`RawConfig`] from every category a source can provide.
///
/// A failed fetch is logged and replaced with an empty category; it never aborts
/// the extraction.
pub fn extract<S: ConfigSource + ?Sized>(source: &mut S) -> RawConfig {
    let mut config = RawConfig::new();
    if let Some(info) = source.extraction_info() {
        config.set_extraction_info(info);
    }

    for name in CategoryName::ALL {
        let category = match source.fetch(name) {
            Ok(category) => category,
            Err(err) => {
                warn!(
                    category = %name,
                    error = %err,
                    "category unavailable, continuing without it"
                );
                Category::new()
            }
        };
        debug!(category = %name, tables = category.tables().count(), "fetched category");
        config.insert_category(name, category);
    }

    config
}

/// A [`ConfigSource`] over a JSON snapshot as dumped by `--json`.
///
/// The document is split into categories up front; each category is only
/// normalized when fetched, so one malformed category does not spoil the others.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    root: Map<String, Value>,
}

impl SnapshotSource {
    pub fn from_slice(json: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            root: parse_root(json)?,
        })
    }

    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let bytes = fs::read(path)?;
        Self::from_slice(&bytes)
    }
}

impl ConfigSource for SnapshotSource {
    fn fetch(&mut self, category: CategoryName) -> Result<Category, FetchError> {
        match self.root.get(category.as_str()) {
            None | Some(Value::Null) => Ok(Category::new()),
            Some(value) => Ok(parse_category(category.as_str(), value)?),
        }
    }

    fn extraction_info(&self) -> Option<ExtractionInfo> {
        let value = self.root.get("extraction_info")?;
        match parse_extraction_info(value) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(error = %err, "ignoring malformed extraction_info");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{extract, ConfigSource, FetchError, SnapshotSource};
    use crate::config::{tables, Category, CategoryName};
    use crate::record::Record;

    struct FlakySource;

    impl ConfigSource for FlakySource {
        fn fetch(&mut self, category: CategoryName) -> Result<Category, FetchError> {
            if category == CategoryName::Ip {
                return Err("connection reset".into());
            }
            let mut out = Category::new();
            if category == CategoryName::Interfaces {
                out.insert_table("vlan", vec![Record::new().with("vlan-id", "100")]);
            }
            Ok(out)
        }
    }

    #[test]
    fn failed_fetch_degrades_to_empty_category() {
        let config = extract(&mut FlakySource);
        assert!(config.table(tables::ADDRESSES).is_empty());
        assert_eq!(config.table(tables::VLANS).len(), 1);
        assert!(config.category(CategoryName::Ip).is_some());
    }

    #[test]
    fn malformed_category_does_not_spoil_the_rest() {
        let mut source = SnapshotSource::from_slice(
            br#"{
                "ip": "unreachable",
                "interfaces": {"bridge": [{"name": "br-vcf"}]}
            }"#,
        )
        .expect("snapshot");
        let config = extract(&mut source);
        assert!(config.table(tables::ADDRESSES).is_empty());
        assert_eq!(config.table(tables::BRIDGES)[0].get("name"), "br-vcf");
    }

    #[test]
    fn reads_extraction_info() {
        let source = SnapshotSource::from_slice(
            br#"{"extraction_info": {"host": "192.168.3.1", "timestamp": "2024-05-01T10:00:00"}}"#,
        )
        .expect("snapshot");
        let info = source.extraction_info().expect("info");
        assert_eq!(info.host.as_deref(), Some("192.168.3.1"));
        assert_eq!(info.extracted_by, None);
    }
}

//! Naming conventions the classifiers work from.
//!
//! The keyword groups and port conventions are plain data loaded from TOML and
//! passed into the classifiers, so an alternate vocabulary can be tried
//! without touching the matching code.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::roles::Role;

/// One keyword group of the role classifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleRule {
    pub role: Role,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub qualifier: Option<RoleQualifier>,
}

/// Refines a matched role when an extra keyword is also present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleQualifier {
    pub keyword: String,
    pub role: Role,
}

/// Conventions used to pick out and order physical bridge ports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortRules {
    pub prefix: String,
    pub trunk_pvid: String,
    pub uplink_pair_threshold: usize,
}

impl Default for PortRules {
    fn default() -> Self {
        Self {
            prefix: "ether".to_string(),
            trunk_pvid: "1".to_string(),
            uplink_pair_threshold: 3,
        }
    }
}

/// Immutable heuristic tables for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Vocabulary {
    /// Keyword groups in priority order.
    #[serde(rename = "role")]
    pub roles: Vec<RoleRule>,
    #[serde(default)]
    pub ports: PortRules,
}

/// Errors returned when loading vocabulary files.
#[derive(Debug, Error)]
pub enum VocabularyLoadError {
    #[error("failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse vocabulary file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("vocabulary file {path} defines no role groups")]
    Empty { path: String },
}

/// Load a vocabulary from a TOML file.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary, VocabularyLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| VocabularyLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_vocabulary(&raw, path.display().to_string())
}

/// Built-in vocabulary.
pub fn default_vocabulary() -> Vocabulary {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/vocab/default.toml"));
    parse_vocabulary(embedded, "embedded vocabulary".to_string())
        .unwrap_or_else(|_| fallback_vocabulary())
}

fn parse_vocabulary(raw: &str, path: String) -> Result<Vocabulary, VocabularyLoadError> {
    let mut parsed: Vocabulary = toml::from_str(raw).map_err(|source| {
        VocabularyLoadError::Parse {
            path: path.clone(),
            source,
        }
    })?;
    if parsed.roles.is_empty() {
        return Err(VocabularyLoadError::Empty { path });
    }

    // Matching runs against lower-cased text.
    for rule in &mut parsed.roles {
        for keyword in &mut rule.keywords {
            *keyword = keyword.to_lowercase();
        }
        if let Some(qualifier) = &mut rule.qualifier {
            qualifier.keyword = qualifier.keyword.to_lowercase();
        }
    }
    Ok(parsed)
}

fn fallback_vocabulary() -> Vocabulary {
    let rule = |role: Role, keywords: &[&str]| RoleRule {
        role,
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        qualifier: None,
    };

    Vocabulary {
        roles: vec![
            rule(Role::Mgmt, &["management", "mgmt"]),
            rule(Role::Vmotion, &["vmotion"]),
            rule(Role::Vsan, &["vsan"]),
            RoleRule {
                qualifier: Some(RoleQualifier {
                    keyword: "edge".to_string(),
                    role: Role::EdgeTep,
                }),
                ..rule(Role::Tep, &["tep"])
            },
            rule(Role::Vm, &["vm"]),
            rule(Role::Nfs, &["nfs", "storage"]),
        ],
        ports: PortRules::default(),
    }
}

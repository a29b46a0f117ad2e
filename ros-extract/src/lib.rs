//! MikroTik RouterOS snapshot analysis and provisioning document generation.
//!
//! Reads a normalized device snapshot ([`routeros_model::RawConfig`]), infers
//! which VLANs serve which VCF network role and how bridge ports are used, and
//! renders two documents: a RouterOS import script and a shell-sourceable env
//! file for the provisioning tooling.
//!
//! # Architecture
//!
//! ## Inference
//!
//! - [`vocabulary`]: Role keywords and port rules, loaded from TOML
//! - [`roles`]: VLAN to role classification
//! - [`ports`]: Uplink/trunk/access partitioning of bridge ports
//! - [`network`]: Role network prefixes from VLAN interface addresses
//! - [`inference`]: Runs the three stages over one snapshot
//! - [`diagnostics`]: Non-fatal findings raised along the way
//!
//! ## Rendering
//!
//! - [`script`]: RouterOS `.rsc` script
//! - [`env`]: `KEY="value"` env file with fixed fallbacks
//! - [`provenance`]: Header comments shared by both documents
//! - [`report`]: Terminal output for `classify` and `extract`
//! - [`artifacts`]: Output file naming
//!
//! # Examples
//!
//! ```ignore
//! use ros_extract::env::{render_env, Connection};
//! use ros_extract::inference::infer;
//! use ros_extract::provenance::Provenance;
//! use ros_extract::vocabulary::default_vocabulary;
//! use routeros_model::parse_file;
//!
//! let config = parse_file("snapshot.json")?;
//! let inference = infer(&config, &default_vocabulary());
//! let connection = Connection { host: "192.168.3.1".into(), username: "admin".into() };
//! let provenance = Provenance::new("192.168.3.1", "2024-05-01 10:15:00");
//! let env = render_env(
//!     &config,
//!     &inference.roles,
//!     &inference.networks,
//!     &inference.ports,
//!     &connection,
//!     &provenance,
//! );
//! print!("{}", env.to_text());
//! ```

pub mod artifacts;
pub mod diagnostics;
pub mod env;
pub mod inference;
pub mod network;
pub mod ports;
pub mod provenance;
pub mod report;
pub mod roles;
pub mod script;
pub mod vocabulary;

//! Generic RouterOS snapshot primitives used by higher-level tools.
//!
//! A snapshot is a set of categories (`system`, `interfaces`, `ip`, ...), each
//! holding named tables of string-valued [`Record`]s exactly as the device
//! reported them.

pub mod config;
pub mod parser;
pub mod record;
pub mod source;
pub mod writer;

pub use config::{tables, Category, CategoryName, ExtractionInfo, RawConfig, TableRef};
pub use parser::{parse, parse_file, ParseError};
pub use record::Record;
pub use source::{extract, ConfigSource, FetchError, SnapshotSource};
pub use writer::{write_atomic, write_json, write_json_file, WriteError};

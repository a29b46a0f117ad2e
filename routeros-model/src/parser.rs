use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{Category, ExtractionInfo, RawConfig};
use crate::record::Record;
use crate::source::{extract, SnapshotSource};

/// Errors that can occur while reading a JSON snapshot.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was not valid JSON.
    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),
    /// Valid JSON with an unexpected shape.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// Parse snapshot bytes into a [`RawConfig`].
///
/// Only a document that is not a JSON object fails as a whole. A category with an
/// unexpected shape is logged and replaced by an empty category.
pub fn parse(json: &[u8]) -> Result<RawConfig, ParseError> {
    let mut source = SnapshotSource::from_slice(json)?;
    Ok(extract(&mut source))
}

/// Parse a snapshot file into a [`RawConfig`].
pub fn parse_file(path: &Path) -> Result<RawConfig, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Parse the top-level snapshot object.
pub(crate) fn parse_root(json: &[u8]) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_slice::<Value>(json)? {
        Value::Object(root) => Ok(root),
        other => Err(ParseError::Malformed(format!(
            "expected a JSON object at the top level, found {}",
            kind(&other)
        ))),
    }
}

pub(crate) fn parse_extraction_info(value: &Value) -> Result<ExtractionInfo, ParseError> {
    Ok(serde_json::from_value(value.clone())?)
}

/// Parse one category object (`{"vlan": [...], "bridge": [...]}`).
pub(crate) fn parse_category(name: &str, value: &Value) -> Result<Category, ParseError> {
    let Value::Object(tables) = value else {
        return Err(ParseError::Malformed(format!(
            "category '{name}' must be an object, found {}",
            kind(value)
        )));
    };

    let mut category = Category::new();
    for (table, rows) in tables {
        let Value::Array(rows) = rows else {
            return Err(ParseError::Malformed(format!(
                "table '{name}.{table}' must be an array, found {}",
                kind(rows)
            )));
        };
        let records = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| parse_record(row).map_err(|msg| {
                ParseError::Malformed(format!("{name}.{table}[{idx}]: {msg}"))
            }))
            .collect::<Result<Vec<_>, _>>()?;
        category.insert_table(table.clone(), records);
    }
    Ok(category)
}

/// Normalize one device object into a [`Record`].
///
/// Scalars become their string form, `null` fields are dropped and nested values
/// are kept as compact JSON text.
fn parse_record(row: &Value) -> Result<Record, String> {
    let Value::Object(fields) = row else {
        return Err(format!("record must be an object, found {}", kind(row)));
    };

    let mut record = Record::new();
    for (field, value) in fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => value.to_string(),
        };
        record.insert(field.clone(), text);
    }
    Ok(record)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! JSON and YAML output.
//!
//! Both keep native cell types: booleans stay booleans and list cells stay
//! arrays. Append mode re-reads the prior array and extends it.

use super::Section;
use crate::error::{RenderError, Result};
use crate::record::Schema;
use serde::Serialize;
use std::io;

/// Objects in schema order, one per record
fn objects(section: &Section, schema: &Schema) -> Vec<serde_json::Value> {
    section
        .records
        .project(schema)
        .into_iter()
        .map(|row| {
            let obj: serde_json::Map<String, serde_json::Value> = schema
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.to_string(), value.to_json()))
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect()
}

fn prior_items(
    value: serde_json::Value,
    format: &'static str,
    target: &str,
) -> Result<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(items) => Ok(items),
        serde_json::Value::Null => Ok(Vec::new()),
        _ => Err(RenderError::parse(
            format,
            target,
            "top-level value is not an array",
        )),
    }
}

/// Render as a compact JSON array
pub fn to_json(
    section: &Section,
    schema: &Schema,
    prior: Option<&str>,
    target: &str,
) -> Result<String> {
    let mut items = match prior.filter(|p| !p.trim().is_empty()) {
        Some(text) => {
            let value: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| RenderError::parse("json", target, e.to_string()))?;
            prior_items(value, "json", target)?
        }
        None => Vec::new(),
    };
    items.extend(objects(section, schema));

    let mut output = encode_json(&items)?;
    output.push('\n');
    Ok(output)
}

/// Render as a YAML sequence of mappings
pub fn to_yaml(
    section: &Section,
    schema: &Schema,
    prior: Option<&str>,
    target: &str,
) -> Result<String> {
    let mut items = match prior.filter(|p| !p.trim().is_empty()) {
        Some(text) => {
            let value: serde_json::Value = serde_yaml::from_str(text)
                .map_err(|e| RenderError::parse("yaml", target, e.to_string()))?;
            prior_items(value, "yaml", target)?
        }
        None => Vec::new(),
    };
    items.extend(objects(section, schema));

    encode_yaml(&items)
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| RenderError::io("encode", "json", io::Error::from(e)))
}

fn encode_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| RenderError::io("encode", "yaml", io::Error::other(e)))
}

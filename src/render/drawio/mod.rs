//! draw.io CSV import output.
//!
//! The file is a `#` comment header followed by plain CSV. In append mode the
//! previous file is read back and merged by the identity column, so that a
//! diagram can be built one account or region at a time without duplicating
//! nodes.

mod header;

pub use header::{Connection, DrawioHeader, Layout, DATA_SEPARATOR};

use super::csv::write_rows;
use super::Section;
use crate::error::{RenderError, Result};
use crate::record::{Record, RecordCollection, Schema, Value};
use crate::settings::RenderSettings;
use ahash::AHashMap;

/// draw.io resolves `connect` targets by splitting cells on commas
const LIST_SEPARATOR: &str = ",";

/// Render the header block and data rows, merging with `prior` if given
pub fn to_drawio(
    section: &Section,
    schema: &Schema,
    settings: &RenderSettings,
    prior: Option<&str>,
    target: &str,
) -> Result<String> {
    let header = settings.drawio_header()?;

    let (schema, records) = match prior {
        Some(existing) => {
            let identity = header.identity.as_deref().ok_or_else(|| {
                RenderError::config("appending to a drawio file requires an identity column")
            })?;
            let (old_schema, old_records) = parse_existing(existing, identity, target)?;
            let merged = merge(old_records, section.records.iter().cloned(), identity);
            tracing::info!(
                destination = %target,
                previous = merged.previous,
                added = merged.added,
                updated = merged.updated,
                "merged drawio records"
            );

            let mut columns = schema.clone();
            for column in old_schema.iter() {
                columns.push(column);
            }
            let mut collection = RecordCollection::with_sort_key(settings.sort_key.clone())
                .with_text_style(settings.bool_style, LIST_SEPARATOR);
            collection.extend(merged.records);
            (columns, collection)
        }
        None => (schema.clone(), section.records.clone()),
    };

    let rows: Vec<Vec<String>> = records
        .project(&schema)
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| value.to_text(settings.bool_style, LIST_SEPARATOR))
                .collect()
        })
        .collect();

    let mut output = header.to_comment_block();
    output.push_str(&write_rows(Some(schema.columns()), &rows)?);
    Ok(output)
}

/// Read a previously written import file back into records.
///
/// Every cell comes back as text; list cells stay joined, which is how
/// draw.io reads them anyway. Only the part above the separator line is a
/// comment block, so data cells starting with `#` are ordinary values.
pub fn parse_existing(text: &str, identity: &str, target: &str) -> Result<(Schema, Vec<Record>)> {
    let at = text
        .find(DATA_SEPARATOR)
        .ok_or_else(|| RenderError::parse("drawio", target, "data separator line not found"))?;
    let data = text[at + DATA_SEPARATOR.len()..].trim_start_matches(['\r', '\n']);

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(data.as_bytes());

    let columns = reader
        .headers()
        .map_err(|e| RenderError::parse("drawio", target, e.to_string()))?
        .clone();
    if columns.is_empty() {
        return Err(RenderError::parse("drawio", target, "column header row is missing"));
    }
    if !columns.iter().any(|c| c == identity) {
        return Err(RenderError::parse(
            "drawio",
            target,
            format!("identity column '{}' is not in the existing file", identity),
        ));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| RenderError::parse("drawio", target, e.to_string()))?;
        let mut record = Record::new();
        for (column, cell) in columns.iter().zip(row.iter()) {
            record.set(column, cell);
        }
        records.push(record);
    }

    Ok((Schema::new(columns.iter()), records))
}

struct Merged {
    records: Vec<Record>,
    previous: usize,
    added: usize,
    updated: usize,
}

/// Old records keep their position; a new record either overlays the record
/// with the same identity or is appended. Blank identities never match.
fn merge(old: Vec<Record>, new: impl Iterator<Item = Record>, identity: &str) -> Merged {
    let mut merged = Merged {
        records: Vec::with_capacity(old.len()),
        previous: old.len(),
        added: 0,
        updated: 0,
    };
    let mut index: AHashMap<String, usize> = AHashMap::new();

    let mut insert = |merged: &mut Merged, record: Record, is_new: bool| {
        let key = record
            .get(identity)
            .map(Value::sort_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        let existing = if key.is_empty() {
            None
        } else {
            index.get(&key).copied()
        };
        match existing {
            Some(i) => {
                merged.records[i].merge_from(record);
                if is_new {
                    merged.updated += 1;
                }
            }
            _ => {
                if !key.is_empty() {
                    index.insert(key, merged.records.len());
                }
                merged.records.push(record);
                if is_new {
                    merged.added += 1;
                }
            }
        }
    };

    for record in old {
        insert(&mut merged, record, false);
    }
    for record in new {
        insert(&mut merged, record, true);
    }
    merged
}

//! Record model: heterogeneous output rows and the ordered collection that
//! holds them.
//!
//! A [`Record`] carries whatever columns its producer discovered; the
//! [`Schema`] decides which of them are emitted and in which order. Cells are
//! a small tagged union ([`Value`]) so every projector has one exhaustive
//! conversion instead of ad hoc type checks.

mod collection;

pub use collection::RecordCollection;

use crate::settings::BoolStyle;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    /// The value used for a schema column a record does not carry
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Bool(_) => false,
            Value::List(items) => items.is_empty(),
        }
    }

    /// Flattened text for textual projectors (CSV, table, HTML, markdown, DOT).
    pub fn to_text(&self, bools: BoolStyle, separator: &str) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Bool(b) => bools.render(*b).to_string(),
            Value::List(items) => items.join(separator),
        }
    }

    /// Canonical text used for sort comparisons.
    pub fn sort_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => items.join(","),
        }
    }

    /// Identifiers held by this cell, for graph and diagram connections.
    ///
    /// Text is split on `separator`; blank parts are dropped so an empty cell
    /// yields no identifiers at all.
    pub fn identifiers(&self, separator: &str) -> Vec<String> {
        let parts: Vec<String> = match self {
            Value::Text(s) if separator.is_empty() => vec![s.clone()],
            Value::Text(s) => s.split(separator).map(str::to_string).collect(),
            Value::Bool(b) => vec![b.to_string()],
            Value::List(items) => items.clone(),
        };
        parts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Native JSON value (booleans and lists keep their types)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|i| serde_json::Value::String(i.clone()))
                    .collect(),
            ),
        }
    }

    /// Convert a JSON value into a cell. `null` means "no value".
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Number(n) => Some(Value::Text(n.to_string())),
            serde_json::Value::Array(items) => Some(Value::List(
                items
                    .iter()
                    .filter(|i| !i.is_null())
                    .map(|i| match i {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            serde_json::Value::Object(_) => Some(Value::Text(value.to_string())),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

/// One output row: named columns in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Record::set`]
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column, replacing an existing value in place.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overlay `other` onto this record; `other` wins on shared columns.
    pub fn merge_from(&mut self, other: Record) {
        for (column, value) in other.fields {
            self.set(column, value);
        }
    }

    /// Build a record from a JSON object, skipping `null` members.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut record = Record::new();
        for (column, value) in object {
            if let Some(value) = Value::from_json(value) {
                record.set(column.as_str(), value);
            }
        }
        record
    }
}

/// Ordered list of column names that a render emits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Schema::default();
        for column in columns {
            schema.push(column);
        }
        schema
    }

    /// Union of all record columns in first-seen order
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut schema = Schema::default();
        for record in records {
            for column in record.columns() {
                schema.push(column);
            }
        }
        schema
    }

    /// Append a column unless it is already present.
    pub fn push(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.contains(&column) {
            self.columns.push(column);
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

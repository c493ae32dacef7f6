//! Sorted, insertion-ordered record collection.

use super::{Record, Schema, Value};
use crate::settings::BoolStyle;
use std::sync::mpsc::Receiver;

/// Records in output order.
///
/// With a sort key the collection is kept sorted after every insertion
/// (stable: equal keys keep their arrival order). Keys compare by their
/// rendered text, so booleans and lists order the way they are printed.
/// Without a sort key, arrival order is the output order.
#[derive(Debug, Clone)]
pub struct RecordCollection {
    records: Vec<Record>,
    sort_key: Option<String>,
    bools: BoolStyle,
    separator: String,
}

impl Default for RecordCollection {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            sort_key: None,
            bools: BoolStyle::default(),
            separator: ",".to_string(),
        }
    }
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort_key(sort_key: Option<String>) -> Self {
        Self {
            sort_key,
            ..Self::default()
        }
    }

    /// Compare sort keys in the given boolean style and list separator
    pub fn with_text_style(mut self, bools: BoolStyle, separator: &str) -> Self {
        self.bools = bools;
        self.separator = separator.to_string();
        if let Some(key) = self.sort_key.clone() {
            self.records
                .sort_by_cached_key(|record| sort_text(record, &key, bools, separator));
        }
        self
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    /// Insert a record at its sorted position (or at the end when unsorted)
    pub fn add(&mut self, record: Record) {
        match &self.sort_key {
            Some(key) => {
                let needle = sort_text(&record, key, self.bools, &self.separator);
                let pos = self.records.partition_point(|existing| {
                    sort_text(existing, key, self.bools, &self.separator) <= needle
                });
                self.records.insert(pos, record);
            }
            None => self.records.push(record),
        }
    }

    /// Drain completed records sent by worker threads.
    ///
    /// Workers must not touch the collection themselves; this collector is
    /// the only writer, so the sort invariant holds whatever order the
    /// records arrive in. Returns once every sender has been dropped.
    pub fn collect_from(&mut self, receiver: Receiver<Record>) -> usize {
        let mut received = 0;
        for record in receiver {
            self.add(record);
            received += 1;
        }
        tracing::debug!(received, "collected records from workers");
        received
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Record> {
        self.records.iter_mut()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Restrict every record to `schema`: exactly `schema.len()` cells per
    /// row, in schema order, with [`Value::empty`] for absent columns.
    pub fn project(&self, schema: &Schema) -> Vec<Vec<Value>> {
        self.records
            .iter()
            .map(|record| {
                schema
                    .iter()
                    .map(|column| record.get(column).cloned().unwrap_or_else(Value::empty))
                    .collect()
            })
            .collect()
    }
}

impl Extend<Record> for RecordCollection {
    fn extend<T: IntoIterator<Item = Record>>(&mut self, iter: T) {
        for record in iter {
            self.add(record);
        }
    }
}

fn sort_text(record: &Record, key: &str, bools: BoolStyle, separator: &str) -> String {
    record
        .get(key)
        .map(|value| value.to_text(bools, separator))
        .unwrap_or_default()
}

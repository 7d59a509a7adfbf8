//! Row identity and storage.
//!
//! Rows are kept in insertion order. Each row maps every live field id to a
//! value; the table guarantees that coverage, the store only holds the data.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::FieldId;
use crate::value::CellValue;

/// Reserved id of the trailing "add row" affordance. Never a real row.
pub const SENTINEL_ROW_ID: &str = "add_row";

/// Opaque, stable row identifier. Never reused or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn sentinel() -> Self {
        Self(SENTINEL_ROW_ID.to_string())
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == SENTINEL_ROW_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RowId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    id: RowId,
    values: BTreeMap<FieldId, CellValue>,
}

impl Row {
    pub(crate) fn new(id: RowId, values: BTreeMap<FieldId, CellValue>) -> Self {
        Self { id, values }
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.values.get(field)
    }

    pub fn values(&self) -> &BTreeMap<FieldId, CellValue> {
        &self.values
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &FieldId> {
        self.values.keys()
    }

    pub(crate) fn set(&mut self, field: FieldId, value: CellValue) {
        self.values.insert(field, value);
    }
}

/// Rows in display order with an id index.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    index: FxHashMap<RowId, usize>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Row> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RowId> {
        self.rows.iter().map(Row::id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Row> {
        match self.index.get(id) {
            Some(&i) => self.rows.get_mut(i),
            None => None,
        }
    }

    /// Append a row. The caller guarantees the id is fresh.
    pub(crate) fn push(&mut self, row: Row) {
        self.index.insert(row.id.clone(), self.rows.len());
        self.rows.push(row);
    }

    /// Give every row `value` under `field`. Returns the number of rows touched.
    pub(crate) fn backfill(&mut self, field: &FieldId, value: &CellValue) -> usize {
        for row in &mut self.rows {
            row.set(field.clone(), value.clone());
        }
        self.rows.len()
    }

    /// Remove the rows in `ids`, preserving the order of the rest.
    /// Returns the removed ids in display order.
    pub(crate) fn remove(&mut self, ids: &FxHashSet<RowId>) -> Vec<RowId> {
        let mut removed = Vec::new();
        self.rows.retain(|row| {
            if ids.contains(&row.id) {
                removed.push(row.id.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.reindex();
        }
        removed
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, row) in self.rows.iter().enumerate() {
            self.index.insert(row.id.clone(), i);
        }
    }
}

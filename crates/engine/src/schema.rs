//! Column definitions and field-id derivation.
//!
//! Field ids are derived from display labels: lower-cased, every character
//! outside `[a-z0-9]` replaced by the filler. Labels that differ only in
//! punctuation or case therefore collide, and the second one is rejected.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use gridform_config::TableSettings;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::value::{CellValue, CoercionError, ColumnType, EditInput};

/// Field id of the synthetic trailing "add column" header. Never a real column.
pub const ADD_COLUMN_FIELD: &str = "add_column";

/// Stable key of a column inside every row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the field id for a display label.
    pub fn from_label(label: &str, filler: char) -> Self {
        Self(slugify(label, filler))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids the grid uses for its own affordances.
    pub fn is_reserved(&self) -> bool {
        self.0 == ADD_COLUMN_FIELD
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-case `label` and replace each character outside `[a-z0-9]` with `filler`.
pub fn slugify(label: &str, filler: char) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { filler })
        .collect()
}

/// A schema entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub field_id: FieldId,
    /// Display label; not required to be unique.
    pub label: String,
    pub column_type: ColumnType,
    /// Allowed values for select types, suggestion vocabulary for tags, empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl Column {
    pub fn new(field_id: impl Into<FieldId>, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            field_id: field_id.into(),
            label: label.into(),
            column_type,
            choices: Vec::new(),
        }
    }

    pub fn with_choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(&self, settings: &TableSettings, now: DateTime<Utc>) -> CellValue {
        self.column_type.default_value(&self.choices, settings, now)
    }

    pub fn coerce(
        &self,
        settings: &TableSettings,
        current: Option<&CellValue>,
        input: EditInput,
    ) -> Result<CellValue, CoercionError> {
        self.column_type.coerce(&self.choices, settings, current, input)
    }
}

/// Ordered column definitions. Append-only.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<Column>,
    index: FxHashMap<FieldId, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Column> {
        self.index.get(field).map(|&i| &self.columns[i])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &FieldId> {
        self.columns.iter().map(|c| &c.field_id)
    }

    /// True if `field` is neither taken nor reserved.
    pub fn is_field_available(&self, field: &FieldId) -> bool {
        !field.is_reserved() && !self.contains(field.as_str())
    }

    /// Check that `column` can be appended without breaking a schema invariant.
    pub(crate) fn check_new(&self, column: &Column) -> Result<(), TableError> {
        if column.label.trim().is_empty() {
            return Err(TableError::EmptyLabel);
        }
        if !self.is_field_available(&column.field_id) {
            return Err(TableError::DuplicateField(column.field_id.clone()));
        }
        if column.column_type.is_select() && column.choices.is_empty() {
            return Err(TableError::InvalidChoices(column.field_id.clone()));
        }
        Ok(())
    }

    /// Append a column that already passed `check_new`.
    pub(crate) fn push(&mut self, column: Column) {
        self.index.insert(column.field_id.clone(), self.columns.len());
        self.columns.push(column);
    }
}

/// A column being composed in the "new column" form.
///
/// Choices are edited one at a time; changing the type discards them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDraft {
    pub label: String,
    column_type: ColumnType,
    choices: Vec<String>,
}

impl ColumnDraft {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            column_type: ColumnType::Text,
            choices: Vec::new(),
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.set_type(column_type);
        self
    }

    pub fn with_choice(mut self, choice: &str) -> Self {
        self.add_choice(choice);
        self
    }

    pub fn set_type(&mut self, column_type: ColumnType) {
        if column_type != self.column_type {
            self.choices.clear();
        }
        self.column_type = column_type;
    }

    /// Add a trimmed choice. Blank and duplicate choices are ignored.
    pub fn add_choice(&mut self, choice: &str) -> bool {
        let choice = choice.trim();
        if !self.column_type.uses_choices()
            || choice.is_empty()
            || self.choices.iter().any(|c| c == choice)
        {
            return false;
        }
        self.choices.push(choice.to_string());
        true
    }

    pub fn remove_choice(&mut self, choice: &str) -> bool {
        let before = self.choices.len();
        self.choices.retain(|c| c != choice);
        self.choices.len() != before
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Field id the draft would receive.
    pub fn field_id(&self, filler: char) -> FieldId {
        FieldId::from_label(&self.label, filler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Name", '_'), "name");
        assert_eq!(slugify("Start Date", '_'), "start_date");
        assert_eq!(slugify("Q3 Revenue ($)", '_'), "q3_revenue____");
        assert_eq!(slugify("A  B", '_'), "a__b");
        assert_eq!(slugify("Café", '_'), "caf_");
        assert_eq!(slugify("Start Date", '-'), "start-date");
    }

    #[test]
    fn test_punctuation_variants_collide() {
        assert_eq!(FieldId::from_label("E-mail", '_'), FieldId::from_label("e mail", '_'));
    }

    #[test]
    fn test_schema_lookup() {
        let mut schema = Schema::new();
        schema.push(Column::new("name", "Name", ColumnType::Text));
        schema.push(Column::new("age", "Age", ColumnType::Number));

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("name").map(|c| c.column_type), Some(ColumnType::Text));
        assert!(schema.get("missing").is_none());
        let ids: Vec<&str> = schema.field_ids().map(FieldId::as_str).collect();
        assert_eq!(ids, vec!["name", "age"]);
    }

    #[test]
    fn test_check_new_rejections() {
        let mut schema = Schema::new();
        schema.push(Column::new("name", "Name", ColumnType::Text));

        assert_eq!(
            schema.check_new(&Column::new("name", "NAME", ColumnType::Number)),
            Err(TableError::DuplicateField(FieldId::from("name")))
        );
        assert_eq!(
            schema.check_new(&Column::new("add_column", "Add Column", ColumnType::Text)),
            Err(TableError::DuplicateField(FieldId::from("add_column")))
        );
        assert_eq!(
            schema.check_new(&Column::new("___", "   ", ColumnType::Text)),
            Err(TableError::EmptyLabel)
        );
        assert_eq!(
            schema.check_new(&Column::new("status", "Status", ColumnType::SingleSelect)),
            Err(TableError::InvalidChoices(FieldId::from("status")))
        );
        assert!(schema
            .check_new(&Column::new("status", "Status", ColumnType::Dropdown).with_choices(["Open"]))
            .is_ok());
        // Tags keep a suggestion list that may be empty
        assert!(schema.check_new(&Column::new("tags", "Tags", ColumnType::Tags)).is_ok());
    }

    #[test]
    fn test_draft_choices() {
        let mut draft = ColumnDraft::new("Department").with_type(ColumnType::SingleSelect);
        assert!(draft.add_choice(" Engineering "));
        assert!(!draft.add_choice("Engineering"));
        assert!(!draft.add_choice("   "));
        assert!(draft.add_choice("Sales"));
        assert_eq!(draft.choices(), &["Engineering".to_string(), "Sales".to_string()]);

        assert!(draft.remove_choice("Engineering"));
        assert!(!draft.remove_choice("Engineering"));
        assert_eq!(draft.choices(), &["Sales".to_string()]);

        draft.set_type(ColumnType::Dropdown);
        assert!(draft.choices().is_empty());
        assert_eq!(draft.field_id('_'), FieldId::from("department"));
    }

    #[test]
    fn test_draft_ignores_choices_for_plain_types() {
        let mut draft = ColumnDraft::new("Notes");
        assert!(!draft.add_choice("anything"));
        assert!(draft.choices().is_empty());
    }
}

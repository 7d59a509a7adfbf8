//! The table: schema, rows and selection mutated together.
//!
//! Every public mutation either commits completely, bumping the revision and
//! notifying the listener once, or fails with a `TableError` and leaves the
//! table untouched. Invariants held between calls:
//!
//! - field ids are unique and never the reserved `add_column`
//! - every row holds a value of the right kind for every column
//! - the selection is a subset of live row ids and never holds the sentinel

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use gridform_config::TableSettings;
use rustc_hash::FxHashSet;

use crate::error::TableError;
use crate::events::{EventCallback, TableChange, TableEvent};
use crate::row::{Row, RowId, RowStore, SENTINEL_ROW_ID};
use crate::schema::{Column, ColumnDraft, FieldId, Schema};
use crate::selection::Selection;
use crate::value::{CellValue, ColumnType, EditInput};

/// A row given explicitly when seeding a table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRow {
    pub id: RowId,
    pub values: Vec<(FieldId, CellValue)>,
}

impl SeedRow {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            values: Vec::new(),
        }
    }

    pub fn with(mut self, field: impl Into<FieldId>, value: CellValue) -> Self {
        self.values.push((field.into(), value));
        self
    }
}

pub struct Table {
    settings: TableSettings,
    schema: Schema,
    rows: RowStore,
    selection: Selection,
    revision: u64,
    clock: fn() -> DateTime<Utc>,
    listener: Option<EventCallback>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("settings", &self.settings)
            .field("schema", &self.schema)
            .field("rows", &self.rows)
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Empty table with default settings.
    pub fn new() -> Self {
        Self::with_settings(TableSettings::default())
    }

    pub fn with_settings(settings: TableSettings) -> Self {
        Self {
            settings,
            schema: Schema::new(),
            rows: RowStore::new(),
            selection: Selection::new(),
            revision: 0,
            clock: Utc::now,
            listener: None,
        }
    }

    /// Replace the clock used for Date/DateTime defaults.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Table with default settings seeded from explicit columns and rows.
    pub fn from_parts(columns: Vec<Column>, rows: Vec<SeedRow>) -> Result<Self, TableError> {
        Self::from_parts_with_settings(TableSettings::default(), columns, rows)
    }

    /// Build a table from explicit columns and rows, checking every invariant.
    ///
    /// Stored values are canonicalized the way `update_cell` would store them.
    /// Seeding does not emit events or bump the revision.
    pub fn from_parts_with_settings(
        settings: TableSettings,
        columns: Vec<Column>,
        rows: Vec<SeedRow>,
    ) -> Result<Self, TableError> {
        let mut table = Self::with_settings(settings);

        for mut column in columns {
            if !column.column_type.uses_choices() {
                column.choices.clear();
            }
            table.schema.check_new(&column)?;
            table.schema.push(column);
        }

        for seed in rows {
            let row = table.seed_row(seed)?;
            table.rows.push(row);
        }

        Ok(table)
    }

    fn seed_row(&self, seed: SeedRow) -> Result<Row, TableError> {
        if seed.id.is_sentinel() || self.rows.contains(seed.id.as_str()) {
            return Err(TableError::DuplicateRow(seed.id));
        }

        let mut values = BTreeMap::new();
        for (field, value) in seed.values {
            let column = match self.schema.get(field.as_str()) {
                Some(column) => column,
                None => return Err(TableError::UnknownColumn(field)),
            };
            if !value.matches(column.column_type) {
                return Err(TableError::MissingValue { row: seed.id, field });
            }
            let value = match column.column_type.canonicalize(&column.choices, &self.settings, value) {
                Ok(value) => value,
                Err(reason) => return Err(TableError::InvalidValue { field, reason }),
            };
            values.insert(field, value);
        }

        for field in self.schema.field_ids() {
            if !values.contains_key(field) {
                return Err(TableError::MissingValue {
                    row: seed.id,
                    field: field.clone(),
                });
            }
        }

        Ok(Row::new(seed.id, values))
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        self.schema.columns()
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.schema.get(field)
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        self.rows.rows()
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.get(id)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: &str, field: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(field))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Number of committed mutations since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Field id a label would receive in this table.
    pub fn field_id_for(&self, label: &str) -> FieldId {
        FieldId::from_label(label, self.settings.field_filler)
    }

    /// True if a column with this label could be added (ignoring choices).
    pub fn field_id_available(&self, label: &str) -> bool {
        !label.trim().is_empty() && self.schema.is_field_available(&self.field_id_for(label))
    }

    /// Append a column without choices and backfill every row with its default.
    pub fn add_column(&mut self, label: &str, column_type: ColumnType) -> Result<Column, TableError> {
        self.add_column_with_choices(label, column_type, Vec::<String>::new())
    }

    /// Append a column and backfill every row with its default.
    ///
    /// Select types need at least one choice; the first is the default.
    /// Choices given for types that don't use them are dropped.
    pub fn add_column_with_choices<S: Into<String>>(
        &mut self,
        label: &str,
        column_type: ColumnType,
        choices: impl IntoIterator<Item = S>,
    ) -> Result<Column, TableError> {
        let mut column = Column::new(self.field_id_for(label), label, column_type).with_choices(choices);
        if !column_type.uses_choices() {
            column.choices.clear();
        }

        if let Err(e) = self.schema.check_new(&column) {
            log::debug!("add_column '{}' rejected: {}", label, e);
            return Err(e);
        }

        let default = column.default_value(&self.settings, (self.clock)());
        let backfilled = self.rows.backfill(&column.field_id, &default);
        self.schema.push(column.clone());

        self.commit(TableChange::ColumnAdded {
            field: column.field_id.clone(),
            backfilled,
        });
        Ok(column)
    }

    pub fn add_column_draft(&mut self, draft: &ColumnDraft) -> Result<Column, TableError> {
        self.add_column_with_choices(&draft.label, draft.column_type(), draft.choices().iter().cloned())
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Append a row holding every column's default.
    pub fn add_row(&mut self) -> Row {
        let now = (self.clock)();
        let id = self.fresh_row_id();
        let values = self
            .schema
            .columns()
            .iter()
            .map(|c| (c.field_id.clone(), c.default_value(&self.settings, now)))
            .collect();

        let row = Row::new(id.clone(), values);
        self.rows.push(row.clone());
        self.commit(TableChange::RowAdded { row: id });
        row
    }

    /// Coerce `input` for the target column and store it in that one cell.
    pub fn update_cell(
        &mut self,
        row_id: &str,
        field: &str,
        input: impl Into<EditInput>,
    ) -> Result<(), TableError> {
        let row = match self.rows.get_mut(row_id) {
            Some(row) => row,
            None => return Err(TableError::UnknownRow(RowId::from(row_id))),
        };
        let column = match self.schema.get(field) {
            Some(column) => column,
            None => return Err(TableError::UnknownColumn(FieldId::from(field))),
        };

        let value = match column.coerce(&self.settings, row.get(field), input.into()) {
            Ok(value) => value,
            Err(reason) => {
                log::debug!("update_cell {}/{} rejected: {}", row_id, field, reason);
                return Err(TableError::InvalidValue {
                    field: column.field_id.clone(),
                    reason,
                });
            }
        };

        let field_id = column.field_id.clone();
        row.set(field_id.clone(), value);

        self.commit(TableChange::CellUpdated {
            row: RowId::from(row_id),
            field: field_id,
        });
        Ok(())
    }

    /// Remove every listed row. Unknown ids and the sentinel are ignored.
    /// Deleted rows leave the selection. Returns the number removed.
    pub fn delete_rows<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doomed = FxHashSet::default();
        for id in ids {
            let id = id.as_ref();
            if id == SENTINEL_ROW_ID {
                log::debug!("delete_rows: ignoring append-row sentinel");
            } else if self.rows.contains(id) {
                doomed.insert(RowId::from(id));
            } else {
                log::debug!("delete_rows: ignoring unknown row {}", id);
            }
        }
        if doomed.is_empty() {
            return 0;
        }

        let removed = self.rows.remove(&doomed);
        let deselected = self.selection.forget(&removed);
        let count = removed.len();
        self.commit(TableChange::RowsDeleted {
            rows: removed,
            deselected,
        });
        count
    }

    /// Delete the selected rows; the selection ends up empty.
    pub fn delete_selected(&mut self) -> usize {
        let ids: Vec<RowId> = self.selection.iter().cloned().collect();
        self.delete_rows(ids)
    }

    fn fresh_row_id(&self) -> RowId {
        loop {
            let id = RowId::generate();
            if !self.rows.contains(id.as_str()) {
                return id;
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Replace the selection. The sentinel and unknown ids are dropped.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<RowId>,
    {
        let rows = &self.rows;
        let changed = self
            .selection
            .set(ids.into_iter().map(Into::into), |id| rows.contains(id.as_str()));
        if changed {
            let selected = self.selection.len();
            self.commit(TableChange::SelectionChanged { selected });
        }
    }

    pub fn toggle_selection(&mut self, id: &str) {
        let rows = &self.rows;
        if self.selection.toggle(&RowId::from(id), |id| rows.contains(id.as_str())) {
            let selected = self.selection.len();
            self.commit(TableChange::SelectionChanged { selected });
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.commit(TableChange::SelectionChanged { selected: 0 });
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Register the single commit listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: EventCallback) {
        self.listener = Some(listener);
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    fn commit(&mut self, change: TableChange) {
        self.revision += 1;
        log::debug!("revision {}: {:?}", self.revision, change);
        let event = TableEvent {
            revision: self.revision,
            change,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

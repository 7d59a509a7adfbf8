//! Render-ready snapshot of a table.
//!
//! The grid shows every data column followed by a synthetic "add column"
//! header, and every data row followed by the append-row sentinel. Cells
//! are display strings aligned with the data columns.

use serde::Serialize;

use crate::row::SENTINEL_ROW_ID;
use crate::schema::ADD_COLUMN_FIELD;
use crate::table::Table;
use crate::value::ColumnType;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub columns: Vec<HeaderView>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub field: String,
    pub header: String,
    /// None for the "add column" header.
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    /// Type name as shown in the column type picker.
    pub type_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    pub is_add_column: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
    pub is_sentinel: bool,
}

impl GridView {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Headers of real columns.
    pub fn data_columns(&self) -> impl Iterator<Item = &HeaderView> {
        self.columns.iter().filter(|c| !c.is_add_column)
    }

    /// Rows backed by table rows.
    pub fn data_rows(&self) -> impl Iterator<Item = &RowView> {
        self.rows.iter().filter(|r| !r.is_sentinel)
    }

    pub fn sentinel(&self) -> Option<&RowView> {
        self.rows.iter().find(|r| r.is_sentinel)
    }
}

impl Table {
    /// Snapshot for the rendering collaborator.
    pub fn view(&self) -> GridView {
        let separator = self.settings().tag_separator.as_str();

        let mut columns: Vec<HeaderView> = self
            .columns()
            .iter()
            .map(|c| HeaderView {
                field: c.field_id.to_string(),
                header: c.label.clone(),
                column_type: Some(c.column_type),
                type_label: Some(c.column_type.label()),
                choices: c.choices.clone(),
                is_add_column: false,
            })
            .collect();
        columns.push(HeaderView {
            field: ADD_COLUMN_FIELD.to_string(),
            header: String::new(),
            column_type: None,
            type_label: None,
            choices: Vec::new(),
            is_add_column: true,
        });

        let mut rows: Vec<RowView> = self
            .rows()
            .iter()
            .map(|row| RowView {
                id: row.id().to_string(),
                cells: self
                    .columns()
                    .iter()
                    .map(|c| {
                        row.get(c.field_id.as_str())
                            .map(|v| v.display(separator))
                            .unwrap_or_default()
                    })
                    .collect(),
                selected: self.selection().contains(row.id().as_str()),
                is_sentinel: false,
            })
            .collect();
        rows.push(RowView {
            id: SENTINEL_ROW_ID.to_string(),
            cells: vec![String::new(); self.columns().len()],
            selected: false,
            is_sentinel: true,
        });

        GridView { columns, rows }
    }
}

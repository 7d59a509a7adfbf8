//! Editable table core: typed columns, rows keyed by stable ids, a row
//! selection and the mutations that keep them consistent.

pub mod error;
pub mod events;
pub mod presets;
pub mod projection;
pub mod row;
pub mod schema;
pub mod selection;
pub mod table;
pub mod value;

pub use error::TableError;
pub use events::{EventCallback, EventCollector, TableChange, TableEvent};
pub use gridform_config::TableSettings;
pub use projection::{GridView, HeaderView, RowView};
pub use row::{Row, RowId, SENTINEL_ROW_ID};
pub use schema::{slugify, Column, ColumnDraft, FieldId, Schema, ADD_COLUMN_FIELD};
pub use selection::Selection;
pub use table::{SeedRow, Table};
pub use value::{CellValue, CoercionError, ColumnType, EditInput};

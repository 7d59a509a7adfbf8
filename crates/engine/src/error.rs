use std::fmt;

use crate::row::RowId;
use crate::schema::FieldId;
use crate::value::CoercionError;

/// Every expected failure of a table operation.
///
/// A failed operation leaves the table exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// Column label is blank.
    EmptyLabel,
    /// Label derives a field id that already exists (or is reserved).
    DuplicateField(FieldId),
    /// Select column declared without choices.
    InvalidChoices(FieldId),
    UnknownRow(RowId),
    UnknownColumn(FieldId),
    /// Input could not be coerced into the column's type.
    InvalidValue { field: FieldId, reason: CoercionError },
    /// Seed rows reuse an id (or use the append-row sentinel).
    DuplicateRow(RowId),
    /// Seed row lacks a value for a column.
    MissingValue { row: RowId, field: FieldId },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "column label cannot be empty"),
            Self::DuplicateField(field) => write!(f, "field '{field}' already exists"),
            Self::InvalidChoices(field) => {
                write!(f, "field '{field}': select columns need at least one choice")
            }
            Self::UnknownRow(row) => write!(f, "unknown row: {row}"),
            Self::UnknownColumn(field) => write!(f, "unknown column: {field}"),
            Self::InvalidValue { field, reason } => write!(f, "field '{field}': {reason}"),
            Self::DuplicateRow(row) => write!(f, "row id '{row}' is already in use"),
            Self::MissingValue { row, field } => {
                write!(f, "row '{row}': missing or mistyped value for field '{field}'")
            }
        }
    }
}

impl std::error::Error for TableError {}

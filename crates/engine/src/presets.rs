//! Starter tables.
//!
//! `employees` is the typed data grid (number, date, boolean, single select).
//! `task_board` is the lighter board variant (dropdown, tags, link, email).

use chrono::NaiveDate;

use crate::error::TableError;
use crate::schema::Column;
use crate::table::{SeedRow, Table};
use crate::value::{CellValue, CoercionError, ColumnType};

pub const DEPARTMENTS: [&str; 5] = ["Engineering", "Marketing", "Sales", "HR", "Finance"];

pub const DROPDOWN_OPTIONS: [&str; 7] = [
    "Dropdown Option 1",
    "Dropdown Option 2",
    "Dropdown Option 3",
    "In Progress",
    "Completed",
    "Pending",
    "Cancelled",
];

/// Suggested tag labels. Cells may hold others.
pub const TAG_OPTIONS: [&str; 10] = [
    "Tag1",
    "Tag2",
    "Tag3",
    "Tag4",
    "Tag5",
    "Priority",
    "Bug",
    "Feature",
    "Enhancement",
    "Documentation",
];

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn choice(s: &str) -> CellValue {
    CellValue::Choice(s.to_string())
}

fn date(y: i32, m: u32, d: u32) -> Result<CellValue, TableError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(CellValue::Date)
        .ok_or_else(|| TableError::InvalidValue {
            field: "start_date".into(),
            reason: CoercionError::NotADate(format!("{y}-{m}-{d}")),
        })
}

fn tags(labels: &[&str]) -> CellValue {
    CellValue::Tags(labels.iter().map(|s| s.to_string()).collect())
}

/// Employee directory: six typed columns, four rows with ids "1".."4".
pub fn employees() -> Result<Table, TableError> {
    let columns = vec![
        Column::new("name", "Name", ColumnType::Text),
        Column::new("age", "Age", ColumnType::Number),
        Column::new("email", "Email", ColumnType::Text),
        Column::new("department", "Department", ColumnType::SingleSelect).with_choices(DEPARTMENTS),
        Column::new("start_date", "Start Date", ColumnType::Date),
        Column::new("active", "Active", ColumnType::Boolean),
    ];

    let people = [
        ("1", "John Doe", 30.0, "john.doe@company.com", "Engineering", (2022, 1, 15), true),
        ("2", "Jane Smith", 28.0, "jane.smith@company.com", "Marketing", (2021, 11, 8), true),
        ("3", "Bob Johnson", 35.0, "bob.johnson@company.com", "Sales", (2020, 6, 22), false),
        ("4", "Alice Brown", 26.0, "alice.brown@company.com", "HR", (2023, 3, 10), true),
    ];

    let mut rows = Vec::with_capacity(people.len());
    for (id, name, age, email, department, (y, m, d), active) in people {
        rows.push(
            SeedRow::new(id)
                .with("name", text(name))
                .with("age", CellValue::Number(age))
                .with("email", text(email))
                .with("department", choice(department))
                .with("start_date", date(y, m, d)?)
                .with("active", CellValue::Bool(active)),
        );
    }

    Table::from_parts(columns, rows)
}

/// Task board: text, dropdown, tags, link and email columns with three rows.
pub fn task_board() -> Result<Table, TableError> {
    let columns = vec![
        Column::new("name", "Name", ColumnType::Text),
        Column::new("dropdown", "Dropdown", ColumnType::Dropdown).with_choices(DROPDOWN_OPTIONS),
        Column::new("tags", "Tags", ColumnType::Tags).with_choices(TAG_OPTIONS),
        Column::new("links", "Links", ColumnType::Link),
        Column::new("email", "Email", ColumnType::Email),
    ];

    let board = [
        ("1", "Row 1 Name", "Dropdown Option 1", &["Tag1", "Tag2"][..], "https://example.com", "row1@example.com"),
        ("2", "Row 2 Name", "In Progress", &["Tag3"][..], "https://test.com", "row2@example.com"),
        ("3", "Row 3 Name", "Completed", &["Tag4", "Tag5"][..], "https://demo.com", "row3@example.com"),
    ];

    let rows = board
        .iter()
        .map(|&(id, name, status, labels, link, email)| {
            SeedRow::new(id)
                .with("name", text(name))
                .with("dropdown", choice(status))
                .with("tags", tags(labels))
                .with("links", CellValue::Link(link.to_string()))
                .with("email", CellValue::Email(email.to_string()))
        })
        .collect();

    Table::from_parts(columns, rows)
}

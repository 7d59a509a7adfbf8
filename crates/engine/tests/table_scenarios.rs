// End-to-end editing sessions against the public API.

use std::sync::{Arc, Mutex};

use gridform_engine::presets;
use gridform_engine::*;

fn alice() -> Table {
    Table::from_parts(
        vec![Column::new("name", "Name", ColumnType::Text)],
        vec![SeedRow::new("r1").with("name", CellValue::Text("Alice".into()))],
    )
    .unwrap()
}

#[test]
fn add_column_add_row_edit_delete() {
    let mut table = alice();

    // Add Score: existing row gets the number default
    table.add_column("Score", ColumnType::Number).unwrap();
    assert_eq!(table.cell("r1", "score"), Some(&CellValue::Number(0.0)));

    // New row holds defaults for both columns
    let new_id = table.add_row().id().clone();
    assert_ne!(new_id.as_str(), SENTINEL_ROW_ID);
    assert_eq!(table.cell(new_id.as_str(), "name"), Some(&CellValue::Text(String::new())));
    assert_eq!(table.cell(new_id.as_str(), "score"), Some(&CellValue::Number(0.0)));

    // Text input is coerced to a number
    table.update_cell(new_id.as_str(), "score", "7").unwrap();
    assert_eq!(table.cell(new_id.as_str(), "score"), Some(&CellValue::Number(7.0)));

    // Delete the seeded row; the new one survives untouched
    table.set_selection(["r1"]);
    assert_eq!(table.delete_rows(["r1"]), 1);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows()[0].id(), &new_id);
    assert!(table.selection().is_empty());
    assert_eq!(table.revision(), 5);
}

#[test]
fn failed_operations_emit_nothing() {
    let collector = Arc::new(Mutex::new(EventCollector::new()));
    let mut table = alice();
    table.set_listener(EventCollector::listener(&collector));

    let _ = table.add_column("name", ColumnType::Number);
    let _ = table.add_column("", ColumnType::Text);
    let _ = table.add_column("Status", ColumnType::SingleSelect);
    let _ = table.update_cell("r1", "missing", "x");
    let _ = table.update_cell("ghost", "name", "x");
    table.delete_rows(["ghost", SENTINEL_ROW_ID]);
    table.set_selection([SENTINEL_ROW_ID]);
    table.clear_selection();

    assert!(collector.lock().unwrap().is_empty());
    assert_eq!(table.revision(), 0);
    assert_eq!(table.columns().len(), 1);
    assert_eq!(table.row_count(), 1);
}

#[test]
fn view_tracks_mutations() {
    let mut table = presets::task_board().unwrap();
    let id = table.add_row().id().clone();
    table.update_cell(id.as_str(), "name", "Row 4 Name").unwrap();
    table.update_cell(id.as_str(), "tags", vec!["Bug".to_string(), "Bug".to_string(), " ".to_string()]).unwrap();
    table.toggle_selection(id.as_str());

    let view = table.view();
    assert_eq!(view.data_rows().count(), 4);
    assert_eq!(view.data_columns().count(), 5);

    let last = view.data_rows().last().unwrap();
    assert_eq!(last.id, id.as_str());
    assert!(last.selected);
    assert_eq!(last.cells[0], "Row 4 Name");
    assert_eq!(last.cells[2], "Bug");
    assert_eq!(last.cells[3], "https://");

    assert_eq!(view.rows.last().map(|r| r.id.as_str()), Some("add_row"));
    assert!(view.columns.last().unwrap().is_add_column);
}

#[test]
fn employees_edit_session() {
    let mut table = presets::employees().unwrap();

    table.update_cell("2", "department", "Finance").unwrap();
    assert_eq!(table.cell("2", "department"), Some(&CellValue::Choice("Finance".into())));

    // Choices match exactly by default
    let err = table.update_cell("2", "department", "finance").unwrap_err();
    assert!(matches!(err, TableError::InvalidValue { .. }));

    table.update_cell("3", "active", true).unwrap();
    assert_eq!(table.cell("3", "active"), Some(&CellValue::Bool(true)));

    table.update_cell("4", "age", 27.5).unwrap();
    assert_eq!(table.cell("4", "age"), Some(&CellValue::Number(27.5)));

    table.set_selection(["1", "3", "add_row"]);
    assert_eq!(table.delete_selected(), 2);
    let ids: Vec<&str> = table.rows().iter().map(|r| r.id().as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);
}

#[test]
fn case_insensitive_choices_store_canonical_spelling() {
    let settings = TableSettings {
        case_sensitive_choices: false,
        ..TableSettings::default()
    };
    let mut table = Table::with_settings(settings);
    table
        .add_column_with_choices("Team", ColumnType::Dropdown, ["Red", "Blue"])
        .unwrap();
    let id = table.add_row().id().clone();

    table.update_cell(id.as_str(), "team", "blue").unwrap();
    assert_eq!(table.cell(id.as_str(), "team"), Some(&CellValue::Choice("Blue".into())));
}

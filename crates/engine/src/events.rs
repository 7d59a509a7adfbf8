//! Commit notifications for table changes.
//!
//! After each successful mutation the table bumps its revision and hands one
//! `TableEvent` to its registered listener, synchronously and in call order.
//! Failed operations emit nothing.

use std::sync::{Arc, Mutex};

use crate::row::RowId;
use crate::schema::FieldId;

/// Emitted once per committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEvent {
    /// Revision produced by this mutation.
    pub revision: u64,
    pub change: TableChange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableChange {
    /// A column was appended and every existing row backfilled.
    ColumnAdded { field: FieldId, backfilled: usize },

    RowAdded { row: RowId },

    CellUpdated { row: RowId, field: FieldId },

    /// Rows were removed; `deselected` of them had been selected.
    RowsDeleted { rows: Vec<RowId>, deselected: usize },

    /// The selected set changed; `selected` is its new size.
    SelectionChanged { selected: usize },
}

/// Callback type for receiving table events.
pub type EventCallback = Box<dyn FnMut(&TableEvent) + Send>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<TableEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Listener that appends every event to `collector`.
    pub fn listener(collector: &Arc<Mutex<EventCollector>>) -> EventCallback {
        let collector = Arc::clone(collector);
        Box::new(move |event: &TableEvent| {
            if let Ok(mut c) = collector.lock() {
                c.push(event.clone());
            }
        })
    }

    pub fn push(&mut self, event: TableEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TableEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Revisions in emission order.
    pub fn revisions(&self) -> Vec<u64> {
        self.events.iter().map(|e| e.revision).collect()
    }

    /// Filter to only ColumnAdded events.
    pub fn columns_added(&self) -> Vec<&FieldId> {
        self.events
            .iter()
            .filter_map(|e| match &e.change {
                TableChange::ColumnAdded { field, .. } => Some(field),
                _ => None,
            })
            .collect()
    }

    /// Filter to only RowsDeleted events.
    pub fn rows_deleted(&self) -> Vec<&[RowId]> {
        self.events
            .iter()
            .filter_map(|e| match &e.change {
                TableChange::RowsDeleted { rows, .. } => Some(rows.as_slice()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_collector_filtering() {
        let mut collector = EventCollector::new();

        collector.push(TableEvent {
            revision: 1,
            change: TableChange::ColumnAdded {
                field: FieldId::from("score"),
                backfilled: 2,
            },
        });
        collector.push(TableEvent {
            revision: 2,
            change: TableChange::RowAdded { row: RowId::from("r9") },
        });
        collector.push(TableEvent {
            revision: 3,
            change: TableChange::RowsDeleted {
                rows: vec![RowId::from("r9")],
                deselected: 0,
            },
        });

        assert_eq!(collector.len(), 3);
        assert_eq!(collector.revisions(), vec![1, 2, 3]);
        assert_eq!(collector.columns_added(), vec![&FieldId::from("score")]);
        assert_eq!(collector.rows_deleted().len(), 1);

        collector.clear();
        assert!(collector.is_empty());
    }

    #[test]
    fn test_shared_listener() {
        let shared = Arc::new(Mutex::new(EventCollector::new()));
        let mut listener = EventCollector::listener(&shared);

        listener(&TableEvent {
            revision: 7,
            change: TableChange::SelectionChanged { selected: 1 },
        });

        assert_eq!(shared.lock().unwrap().revisions(), vec![7]);
    }
}

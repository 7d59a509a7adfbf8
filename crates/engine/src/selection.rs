//! Row selection.
//!
//! The selected set only ever holds ids of rows that exist, and never the
//! append-row sentinel. Callers pass an existence check so the tracker can
//! filter without owning the rows.

use std::collections::BTreeSet;

use crate::row::RowId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<RowId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &BTreeSet<RowId> {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Replace the selection. Returns true if the set changed.
    pub fn set<I>(&mut self, ids: I, exists: impl Fn(&RowId) -> bool) -> bool
    where
        I: IntoIterator<Item = RowId>,
    {
        let next: BTreeSet<RowId> = ids
            .into_iter()
            .filter(|id| !id.is_sentinel() && exists(id))
            .collect();
        if next == self.ids {
            return false;
        }
        self.ids = next;
        true
    }

    /// Flip one row in or out. The sentinel and unknown rows are ignored.
    pub fn toggle(&mut self, id: &RowId, exists: impl Fn(&RowId) -> bool) -> bool {
        if id.is_sentinel() {
            return false;
        }
        if self.ids.remove(id) {
            return true;
        }
        if !exists(id) {
            return false;
        }
        self.ids.insert(id.clone())
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// Drop ids of deleted rows. Returns how many were deselected.
    pub(crate) fn forget(&mut self, removed: &[RowId]) -> usize {
        removed.iter().filter(|id| self.ids.remove(id.as_str())).count()
    }
}

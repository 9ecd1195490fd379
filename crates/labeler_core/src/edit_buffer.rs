use std::collections::{BTreeMap, BTreeSet};

use crate::{Dataset, Label};

/// Buffered label and reason for one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Edit {
    pub label: Label,
    pub reason: String,
}

/// Counts from folding an edit buffer into a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub applied: usize,
    pub dropped: usize,
}

/// Session-scoped edits keyed by 0-based row index.
///
/// Rows the reviewer changed during the session are tracked separately so a
/// reload keeps them instead of the freshly loaded values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBuffer {
    edits: BTreeMap<usize, Edit>,
    touched: BTreeSet<usize>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        let edits = dataset
            .records()
            .iter()
            .enumerate()
            .map(|(row, record)| {
                (
                    row,
                    Edit {
                        label: record.label,
                        reason: record.reason.clone(),
                    },
                )
            })
            .collect();
        Self {
            edits,
            touched: BTreeSet::new(),
        }
    }

    /// Re-initialize from `dataset`, keeping touched rows that still exist.
    pub fn rebase(&mut self, dataset: &Dataset) {
        let mut next = Self::from_dataset(dataset);
        for row in &self.touched {
            if let (Some(edit), Some(slot)) = (self.edits.get(row), next.edits.get_mut(row)) {
                *slot = edit.clone();
                next.touched.insert(*row);
            }
        }
        *self = next;
    }

    pub fn get(&self, row: usize) -> Option<&Edit> {
        self.edits.get(&row)
    }

    /// Returns `false` when nothing changed.
    pub fn set_label(&mut self, row: usize, label: Label) -> bool {
        let edit = self.edits.entry(row).or_default();
        if edit.label == label {
            return false;
        }
        edit.label = label;
        self.touched.insert(row);
        true
    }

    /// Returns `false` when nothing changed.
    pub fn set_reason(&mut self, row: usize, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let edit = self.edits.entry(row).or_default();
        if edit.reason == reason {
            return false;
        }
        edit.reason = reason;
        self.touched.insert(row);
        true
    }

    pub fn insert(&mut self, row: usize, label: Label, reason: impl Into<String>) {
        self.edits.insert(
            row,
            Edit {
                label,
                reason: reason.into(),
            },
        );
        self.touched.insert(row);
    }

    pub fn is_touched(&self, row: usize) -> bool {
        self.touched.contains(&row)
    }

    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    /// Only the rows changed this session, still marked touched.
    pub fn touched_edits(&self) -> Self {
        let edits = self
            .touched
            .iter()
            .filter_map(|row| self.edits.get(row).map(|edit| (*row, edit.clone())))
            .collect();
        Self {
            edits,
            touched: self.touched.clone(),
        }
    }

    pub fn clear_touched(&mut self) {
        self.touched.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Edit)> {
        self.edits.iter().map(|(row, edit)| (*row, edit))
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Overwrite label and reason of every buffered row present in `dataset`.
    /// Rows past the end of `dataset` are skipped.
    pub fn apply_to(&self, dataset: &mut Dataset) -> MergeStats {
        let mut stats = MergeStats::default();
        for (row, edit) in &self.edits {
            match dataset.record_mut(*row) {
                Some(record) => {
                    record.label = edit.label;
                    record.reason.clone_from(&edit.reason);
                    stats.applied += 1;
                }
                None => stats.dropped += 1,
            }
        }
        stats
    }
}

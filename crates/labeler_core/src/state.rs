use std::fmt;

use crate::view_model::{AppViewModel, RowView, SaveStatusView};
use crate::{Dataset, EditBuffer, Label};

/// How many rows the review form shows and accepts edits for by default.
pub const DEFAULT_ROW_LIMIT: usize = 110;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveSummary {
    pub version: Option<String>,
    pub rows: usize,
    pub applied: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailureKind {
    SourceNotFound,
    Fetch,
    Parse,
    Conflict,
    Write,
    MissingCredential,
}

impl fmt::Display for SaveFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveFailureKind::SourceNotFound => write!(f, "source not found"),
            SaveFailureKind::Fetch => write!(f, "fetch failed"),
            SaveFailureKind::Parse => write!(f, "stored dataset is malformed"),
            SaveFailureKind::Conflict => write!(f, "dataset changed since it was read"),
            SaveFailureKind::Write => write!(f, "write failed"),
            SaveFailureKind::MissingCredential => write!(f, "missing credential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub kind: SaveFailureKind,
    pub message: String,
}

impl SaveFailure {
    pub fn new(kind: SaveFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved(SaveSummary),
    Failed(SaveFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    dataset: Dataset,
    buffer: EditBuffer,
    row_limit: Option<usize>,
    save: SaveStatus,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` means every row is editable.
    pub fn with_row_limit(row_limit: Option<usize>) -> Self {
        Self {
            row_limit,
            ..Self::default()
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save
    }

    /// Number of leading rows shown and accepting edits.
    pub fn editable_rows(&self) -> usize {
        match self.row_limit {
            Some(limit) => self.dataset.len().min(limit),
            None => self.dataset.len(),
        }
    }

    pub fn label_of(&self, row: usize) -> Label {
        self.buffer.get(row).map(|edit| edit.label).unwrap_or_default()
    }

    pub fn view(&self) -> AppViewModel {
        let rows: Vec<RowView> = self
            .dataset
            .records()
            .iter()
            .take(self.editable_rows())
            .enumerate()
            .map(|(row, record)| {
                let edit = self.buffer.get(row);
                let label = edit.map(|e| e.label).unwrap_or_default();
                RowView {
                    number: row + 1,
                    link: (!record.derived_url.is_empty()).then(|| record.derived_url.clone()),
                    standard: label == Label::Standard,
                    not_standard: label == Label::NotStandard,
                    reason: edit.map(|e| e.reason.clone()).unwrap_or_default(),
                    edited: self.buffer.is_touched(row),
                }
            })
            .collect();
        let labeled = rows.iter().filter(|r| r.standard || r.not_standard).count();

        AppViewModel {
            total_rows: self.dataset.len(),
            labeled,
            pending_edits: self.buffer.touched_count(),
            save: match &self.save {
                SaveStatus::Idle => SaveStatusView::Idle,
                SaveStatus::Saving => SaveStatusView::Saving,
                SaveStatus::Saved(summary) => SaveStatusView::Saved {
                    version: summary.version.clone(),
                },
                SaveStatus::Failed(failure) => SaveStatusView::Failed {
                    conflict: failure.kind == SaveFailureKind::Conflict,
                    message: format!("{}: {}", failure.kind, failure.message),
                },
            },
            rows,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn load_dataset(&mut self, dataset: Dataset) {
        self.buffer.rebase(&dataset);
        self.dataset = dataset;
        self.mark_dirty();
    }

    fn accepts_edit(&self, row: usize) -> bool {
        row < self.editable_rows()
    }

    pub(crate) fn set_label(&mut self, row: usize, label: Label) {
        if self.accepts_edit(row) && self.buffer.set_label(row, label) {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_reason(&mut self, row: usize, text: String) {
        if self.accepts_edit(row) && self.buffer.set_reason(row, text) {
            self.mark_dirty();
        }
    }

    /// Snapshot of the buffer to reconcile, or `None` while a save is in flight.
    pub(crate) fn begin_save(&mut self) -> Option<EditBuffer> {
        if self.save == SaveStatus::Saving {
            return None;
        }
        self.save = SaveStatus::Saving;
        self.mark_dirty();
        // Untouched rows stay whatever the store holds at save time.
        Some(self.buffer.touched_edits())
    }

    pub(crate) fn finish_save(&mut self, result: Result<SaveSummary, SaveFailure>) {
        match result {
            Ok(summary) => {
                self.buffer.apply_to(&mut self.dataset);
                self.buffer.clear_touched();
                self.save = SaveStatus::Saved(summary);
            }
            Err(failure) => {
                self.save = SaveStatus::Failed(failure);
            }
        }
        self.mark_dirty();
    }
}

use crate::Label;

pub const BODY_COLUMN: &str = "body";
pub const LABEL_COLUMN: &str = "label";
pub const REASON_COLUMN: &str = "reason";

/// One reviewable row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub body: String,
    /// Display-only; never written back.
    pub derived_url: String,
    pub label: Label,
    pub reason: String,
    /// Cells of every other column, in column order.
    pub passthrough: Vec<String>,
}

impl Record {
    pub fn new(body: impl Into<String>, derived_url: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            derived_url: derived_url.into(),
            ..Self::default()
        }
    }
}

/// Which typed field a column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Body,
    Label,
    Reason,
    Passthrough(usize),
}

/// Ordered rows plus the column layout they are written back with.
///
/// `body`, `label` and `reason` are always present in `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dataset {
    /// Zero rows with the three expected columns.
    pub fn empty() -> Self {
        Self {
            columns: vec![
                BODY_COLUMN.to_string(),
                LABEL_COLUMN.to_string(),
                REASON_COLUMN.to_string(),
            ],
            records: Vec::new(),
        }
    }

    /// Builds a dataset from a header row, appending `label`/`reason` when absent.
    ///
    /// Callers supply records whose `passthrough` cells line up with the
    /// non-typed columns of `columns`.
    pub fn new(mut columns: Vec<String>, records: Vec<Record>) -> Self {
        if !columns.iter().any(|c| c == BODY_COLUMN) {
            columns.insert(0, BODY_COLUMN.to_string());
        }
        for required in [LABEL_COLUMN, REASON_COLUMN] {
            if !columns.iter().any(|c| c == required) {
                columns.push(required.to_string());
            }
        }
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Role of every column in order; passthrough columns are numbered from zero.
    pub fn column_roles(&self) -> Vec<ColumnRole> {
        let mut next_passthrough = 0;
        self.columns
            .iter()
            .map(|name| match name.as_str() {
                BODY_COLUMN => ColumnRole::Body,
                LABEL_COLUMN => ColumnRole::Label,
                REASON_COLUMN => ColumnRole::Reason,
                _ => {
                    let role = ColumnRole::Passthrough(next_passthrough);
                    next_passthrough += 1;
                    role
                }
            })
            .collect()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }

    pub fn record_mut(&mut self, row: usize) -> Option<&mut Record> {
        self.records.get_mut(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

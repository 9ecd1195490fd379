/// Shown instead of a link when a row has no `html_url`.
pub const NO_LINK_PLACEHOLDER: &str = "No Link Available";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatusView {
    #[default]
    Idle,
    Saving,
    Saved {
        version: Option<String>,
    },
    Failed {
        conflict: bool,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<RowView>,
    pub total_rows: usize,
    pub labeled: usize,
    pub pending_edits: usize,
    pub save: SaveStatusView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// 1-based position in the dataset.
    pub number: usize,
    pub link: Option<String>,
    pub standard: bool,
    pub not_standard: bool,
    pub reason: String,
    pub edited: bool,
}

impl RowView {
    pub fn link_text(&self) -> &str {
        self.link.as_deref().unwrap_or(NO_LINK_PLACEHOLDER)
    }
}

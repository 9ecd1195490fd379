//! Labeler core: data model, edit buffer and the pure review state machine.
mod dataset;
mod edit_buffer;
mod effect;
mod label;
mod msg;
mod state;
mod update;
mod view_model;

pub use dataset::{ColumnRole, Dataset, Record, BODY_COLUMN, LABEL_COLUMN, REASON_COLUMN};
pub use edit_buffer::{Edit, EditBuffer, MergeStats};
pub use effect::Effect;
pub use label::Label;
pub use msg::Msg;
pub use state::{
    AppState, SaveFailure, SaveFailureKind, SaveStatus, SaveSummary, DEFAULT_ROW_LIMIT,
};
pub use update::update;
pub use view_model::{AppViewModel, RowView, SaveStatusView, NO_LINK_PLACEHOLDER};

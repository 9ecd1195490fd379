use crate::{Dataset, Label, SaveFailure, SaveSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A dataset was (re)loaded from storage.
    DatasetLoaded(Dataset),
    /// User toggled the "Standard" control of a row.
    StandardToggled { row: usize, checked: bool },
    /// User toggled the "Not Standard" control of a row.
    NotStandardToggled { row: usize, checked: bool },
    /// Direct label assignment, bypassing the paired controls.
    LabelSet { row: usize, label: Label },
    /// User edited the reason text of a row.
    ReasonChanged { row: usize, text: String },
    /// User clicked Save.
    SaveClicked,
    /// Outcome of a reconcile effect.
    SaveFinished(Result<SaveSummary, SaveFailure>),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

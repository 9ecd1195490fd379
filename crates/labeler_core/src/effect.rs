use crate::EditBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Merge the buffered edits into the stored dataset and write it back.
    Reconcile { edits: EditBuffer },
}

use std::io;

use labeler_core::{Dataset, EditBuffer};

use crate::{fetch_dataset, reconcile, DatasetStore, ReconcileError, ReconcileOutcome};

/// Runs reconciliation to completion on the calling thread.
pub struct SyncReconciler {
    runtime: tokio::runtime::Runtime,
}

impl SyncReconciler {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }

    /// Must not be called from inside another tokio runtime.
    pub fn reconcile(
        &self,
        store: &dyn DatasetStore,
        edits: &EditBuffer,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        self.runtime.block_on(reconcile(store, edits))
    }

    pub fn fetch_dataset(&self, store: &dyn DatasetStore) -> Result<Dataset, ReconcileError> {
        self.runtime.block_on(fetch_dataset(store))
    }
}

use labeler_core::{Dataset, EditBuffer};
use labeler_logging::{labeler_debug, labeler_info, labeler_trace, labeler_warn};

use crate::github::{Credential, GithubContentsStore, RemoteLocation, StoreSettings};
use crate::{load, serialize, DatasetStore, FailureKind, ParseError, SerializeError, StoreError, VersionToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Token of the revision just written, when the store reports one.
    pub version: Option<VersionToken>,
    /// Rows in the merged dataset.
    pub rows: usize,
    pub applied: usize,
    /// Buffered rows with no counterpart in the stored dataset.
    pub dropped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("source not found: {0}")]
    SourceNotFound(String),
    #[error("fetch failed: {0}")]
    Fetch(StoreError),
    #[error("stored dataset could not be parsed: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to serialize merged dataset: {0}")]
    Serialize(#[from] SerializeError),
    #[error("dataset was modified concurrently: {0}")]
    ConcurrencyConflict(String),
    #[error("write failed: {0}")]
    Write(StoreError),
}

/// Merge `edits` into the latest stored dataset and write it back.
///
/// The write is tagged with the version token obtained by the fetch, so a
/// concurrent writer surfaces as [`ReconcileError::ConcurrencyConflict`]
/// instead of being overwritten. Nothing is retried.
pub async fn reconcile(
    store: &dyn DatasetStore,
    edits: &EditBuffer,
) -> Result<ReconcileOutcome, ReconcileError> {
    let location = store.describe();

    let (mut dataset, version) = fetch_parsed(store, &location).await?;
    for (row, edit) in edits.iter() {
        labeler_trace!("Row {} <- label={:?} reason={:?}", row, edit.label, edit.reason);
    }
    let stats = edits.apply_to(&mut dataset);
    if stats.dropped > 0 {
        labeler_debug!(
            "Dropped {} buffered rows beyond the {} rows of {}",
            stats.dropped,
            dataset.len(),
            location
        );
    }

    let bytes = serialize(&dataset)?;
    let written = store
        .write(bytes, &version)
        .await
        .map_err(|err| match err.kind {
            FailureKind::Conflict => {
                labeler_warn!("Version {} of {} is stale", version, location);
                ReconcileError::ConcurrencyConflict(err.message)
            }
            _ => ReconcileError::Write(err),
        })?;

    labeler_info!(
        "Reconciled {} rows into {} (applied={} dropped={})",
        dataset.len(),
        location,
        stats.applied,
        stats.dropped
    );
    Ok(ReconcileOutcome {
        version: written,
        rows: dataset.len(),
        applied: stats.applied,
        dropped: stats.dropped,
    })
}

/// Read and parse the current stored dataset.
///
/// Sessions start from this so their buffer is based on the revision later
/// saves are merged into.
pub async fn fetch_dataset(store: &dyn DatasetStore) -> Result<Dataset, ReconcileError> {
    let location = store.describe();
    let (dataset, _) = fetch_parsed(store, &location).await?;
    Ok(dataset)
}

async fn fetch_parsed(
    store: &dyn DatasetStore,
    location: &str,
) -> Result<(Dataset, VersionToken), ReconcileError> {
    let snapshot = store.fetch().await.map_err(|err| match err.kind {
        FailureKind::NotFound => ReconcileError::SourceNotFound(location.to_string()),
        _ => ReconcileError::Fetch(err),
    })?;
    labeler_debug!(
        "Fetched {} bytes from {} at {}",
        snapshot.bytes.len(),
        location,
        snapshot.version
    );
    let dataset = load(snapshot.bytes.as_slice())?;
    Ok((dataset, snapshot.version))
}

/// [`reconcile`] against a repository file reached through the contents API.
pub async fn reconcile_remote(
    edits: &EditBuffer,
    location: RemoteLocation,
    credential: Credential,
    settings: StoreSettings,
) -> Result<ReconcileOutcome, ReconcileError> {
    let store =
        GithubContentsStore::new(location, credential, settings).map_err(ReconcileError::Fetch)?;
    reconcile(&store, edits).await
}

use std::path::Path;

use chrono::Utc;
use labeler_core::{Dataset, Effect, Msg, SaveFailure, SaveFailureKind, SaveSummary};
use labeler_engine::{
    load_file_or_empty, Credential, DatasetStore, GithubContentsStore, LoadError,
    LocalFileStore, ReconcileError, RemoteLocation, StoreSettings, SyncReconciler,
};
use labeler_logging::{labeler_error, labeler_info, labeler_warn};

use crate::config::{repository_path, Config, DatasetChoice};

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error(transparent)]
    Local(#[from] LoadError),
    #[error("failed to read {location}: {source}")]
    Store {
        location: String,
        #[source]
        source: ReconcileError,
    },
}

/// Executes core effects and turns their outcome back into messages.
pub struct EffectRunner {
    reconciler: SyncReconciler,
    /// Store setup errors surface when a save is attempted, not before.
    store: Result<Box<dyn DatasetStore>, SaveFailure>,
}

impl EffectRunner {
    pub fn new(reconciler: SyncReconciler, store: Result<Box<dyn DatasetStore>, SaveFailure>) -> Self {
        Self { reconciler, store }
    }

    pub fn from_config(config: &Config, choice: &DatasetChoice) -> std::io::Result<Self> {
        Ok(Self::new(SyncReconciler::new()?, build_store(config, choice)))
    }

    pub fn target(&self) -> String {
        match &self.store {
            Ok(store) => store.describe(),
            Err(failure) => format!("<unavailable: {}>", failure.message),
        }
    }

    /// Reads the dataset from the store saves go to, so edits are based on
    /// the revision they are merged into. `fallback` is read when the store
    /// could not be set up. A missing dataset loads as empty.
    pub fn load_dataset(&self, fallback: &Path) -> Result<Dataset, ReloadError> {
        let store = match &self.store {
            Ok(store) => store,
            Err(failure) => {
                labeler_warn!(
                    "Store unavailable ({}), reading {:?}",
                    failure.message,
                    fallback
                );
                return Ok(load_file_or_empty(fallback)?);
            }
        };
        match self.reconciler.fetch_dataset(store.as_ref()) {
            Ok(dataset) => Ok(dataset),
            Err(ReconcileError::SourceNotFound(location)) => {
                labeler_error!("Dataset not found at {}, starting empty", location);
                Ok(Dataset::empty())
            }
            Err(source) => Err(ReloadError::Store {
                location: store.describe(),
                source,
            }),
        }
    }

    pub fn run(&self, effect: Effect) -> Msg {
        match effect {
            Effect::Reconcile { edits } => {
                let store = match &self.store {
                    Ok(store) => store,
                    Err(failure) => {
                        labeler_warn!("Save skipped: {}", failure.message);
                        return Msg::SaveFinished(Err(failure.clone()));
                    }
                };
                labeler_info!(
                    "Reconcile rows={} touched={} target={}",
                    edits.len(),
                    edits.touched_count(),
                    store.describe()
                );
                let result = self
                    .reconciler
                    .reconcile(store.as_ref(), &edits)
                    .map(|outcome| SaveSummary {
                        version: outcome.version.map(|token| token.into_string()),
                        rows: outcome.rows,
                        applied: outcome.applied,
                        dropped: outcome.dropped,
                    })
                    .map_err(|err| {
                        labeler_error!("Reconcile failed: {}", err);
                        map_failure(err)
                    });
                Msg::SaveFinished(result)
            }
        }
    }
}

/// Remote when configured, otherwise the local CSV itself.
pub fn build_store(
    config: &Config,
    choice: &DatasetChoice,
) -> Result<Box<dyn DatasetStore>, SaveFailure> {
    let Some(remote) = &config.remote else {
        return Ok(Box::new(LocalFileStore::new(choice.path.clone())));
    };

    let credential = Credential::from_env(&remote.token_env).map_err(|_| {
        SaveFailure::new(
            SaveFailureKind::MissingCredential,
            format!("set {} to a token with write access", remote.token_env),
        )
    })?;
    let mut location = RemoteLocation::new(
        &remote.api_base,
        remote.owner.clone(),
        remote.repo.clone(),
        repository_path(&choice.path),
    )
    .map_err(|err| SaveFailure::new(SaveFailureKind::Fetch, err.to_string()))?;
    if let Some(branch) = &remote.branch {
        location = location.with_branch(branch.clone());
    }

    let store = GithubContentsStore::new(location, credential, StoreSettings::default())
        .map_err(|err| SaveFailure::new(SaveFailureKind::Fetch, err.to_string()))?
        .with_commit_message(remote.commit_message(&choice.name, Utc::now()));
    Ok(Box::new(store))
}

fn map_failure(err: ReconcileError) -> SaveFailure {
    match err {
        ReconcileError::SourceNotFound(location) => {
            SaveFailure::new(SaveFailureKind::SourceNotFound, location)
        }
        ReconcileError::Fetch(store_err) => {
            SaveFailure::new(SaveFailureKind::Fetch, store_err.to_string())
        }
        ReconcileError::Parse(parse_err) => {
            SaveFailure::new(SaveFailureKind::Parse, parse_err.to_string())
        }
        ReconcileError::ConcurrencyConflict(message) => {
            SaveFailure::new(SaveFailureKind::Conflict, message)
        }
        ReconcileError::Serialize(ser_err) => {
            SaveFailure::new(SaveFailureKind::Write, ser_err.to_string())
        }
        ReconcileError::Write(store_err) => {
            SaveFailure::new(SaveFailureKind::Write, store_err.to_string())
        }
    }
}

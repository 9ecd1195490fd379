//! Labeler engine: dataset IO, stores and reconciliation.
mod engine;
mod github;
mod load;
mod local;
mod persist;
mod reconcile;
mod serialize;
mod store;
mod types;

pub use engine::SyncReconciler;
pub use github::{
    Credential, GithubContentsStore, MissingCredential, RemoteLocation, StoreSettings,
    DEFAULT_API_BASE,
};
pub use load::{extract_html_url, load, load_file, load_file_or_empty, LoadError, ParseError};
pub use local::{content_version, LocalFileStore};
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use reconcile::{fetch_dataset, reconcile, reconcile_remote, ReconcileError, ReconcileOutcome};
pub use serialize::{serialize, SerializeError};
pub use store::DatasetStore;
pub use types::{FailureKind, StoreError, StoredDataset, VersionToken};

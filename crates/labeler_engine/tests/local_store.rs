use std::fs;

use labeler_core::{EditBuffer, Label};
use labeler_engine::{
    content_version, DatasetStore, FailureKind, LocalFileStore, ReconcileError, SyncReconciler,
    VersionToken,
};
use tempfile::TempDir;

const DATA: &str = "body,label,reason\nfirst,,\nsecond,0,vague\n";

fn store_with(content: &str) -> (TempDir, LocalFileStore) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("label_Jose.csv");
    fs::write(&path, content).unwrap();
    (temp, LocalFileStore::new(path))
}

#[tokio::test]
async fn fetch_versions_by_content_hash() {
    let (_temp, store) = store_with(DATA);

    let first = store.fetch().await.unwrap();
    assert_eq!(first.bytes, DATA.as_bytes());
    assert_eq!(first.version, content_version(DATA.as_bytes()));
    assert_eq!(first.version.as_str().len(), 64);

    let again = store.fetch().await.unwrap();
    assert_eq!(first.version, again.version);
}

#[tokio::test]
async fn stale_token_is_rejected_without_writing() {
    let (_temp, store) = store_with(DATA);
    let stale = VersionToken::new("0".repeat(64));

    let err = store.write(b"body\nclobbered\n".to_vec(), &stale).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Conflict);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), DATA);
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp.path().join("missing.csv"));

    let err = store.fetch().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NotFound);
}

#[test]
fn sync_reconcile_writes_labels_to_disk() {
    let (_temp, store) = store_with(DATA);
    let mut edits = EditBuffer::new();
    edits.insert(0, Label::Standard, "clear repro steps");

    let reconciler = SyncReconciler::new().unwrap();
    let outcome = reconciler.reconcile(&store, &edits).unwrap();

    let written = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        written,
        "body,label,reason\nfirst,1,clear repro steps\nsecond,0,vague\n"
    );
    assert_eq!(outcome.version, Some(content_version(written.as_bytes())));
    assert_eq!(outcome.rows, 2);
    assert_eq!(outcome.applied, 1);
}

#[test]
fn sync_reconcile_reports_missing_source() {
    let temp = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp.path().join("label_Lukas.csv"));

    let reconciler = SyncReconciler::new().unwrap();
    let err = reconciler
        .reconcile(&store, &EditBuffer::new())
        .unwrap_err();

    assert!(matches!(err, ReconcileError::SourceNotFound(_)));
    assert!(!store.path().exists());
}

#[test]
fn sync_fetch_parses_the_stored_revision() {
    let (_temp, store) = store_with(DATA);

    let reconciler = SyncReconciler::new().unwrap();
    let dataset = reconciler.fetch_dataset(&store).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records()[1].label, Label::NotStandard);
    assert_eq!(dataset.records()[1].reason, "vague");
}

#[test]
fn sync_fetch_reports_missing_source() {
    let temp = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp.path().join("label_Charles.csv"));

    let reconciler = SyncReconciler::new().unwrap();
    let err = reconciler.fetch_dataset(&store).unwrap_err();

    assert!(matches!(err, ReconcileError::SourceNotFound(_)));
}

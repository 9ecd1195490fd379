use crate::{StoreError, StoredDataset, VersionToken};

/// A versioned home for a dataset file.
///
/// `write` must refuse to overwrite when `expected` no longer names the
/// current revision, reporting [`crate::FailureKind::Conflict`].
#[async_trait::async_trait]
pub trait DatasetStore: Send + Sync {
    /// Human-readable location for logs and messages.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<StoredDataset, StoreError>;

    /// Returns the new version token when the store reports one.
    async fn write(
        &self,
        bytes: Vec<u8>,
        expected: &VersionToken,
    ) -> Result<Option<VersionToken>, StoreError>;
}

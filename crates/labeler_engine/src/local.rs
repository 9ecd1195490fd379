use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::persist::AtomicFileWriter;
use crate::{DatasetStore, FailureKind, StoreError, StoredDataset, VersionToken};

/// Dataset kept in a local CSV file, versioned by the SHA-256 of its bytes.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<u8>, StoreError> {
        fs::read(&self.path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                StoreError::new(FailureKind::NotFound, self.path.display().to_string())
            }
            _ => StoreError::new(FailureKind::Io, err.to_string()),
        })
    }
}

pub fn content_version(bytes: &[u8]) -> VersionToken {
    VersionToken::new(format!("{:x}", Sha256::digest(bytes)))
}

#[async_trait::async_trait]
impl DatasetStore for LocalFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<StoredDataset, StoreError> {
        let bytes = self.read()?;
        let version = content_version(&bytes);
        Ok(StoredDataset { bytes, version })
    }

    async fn write(
        &self,
        bytes: Vec<u8>,
        expected: &VersionToken,
    ) -> Result<Option<VersionToken>, StoreError> {
        let current = content_version(&self.read()?);
        if &current != expected {
            return Err(StoreError::new(
                FailureKind::Conflict,
                format!(
                    "{} changed on disk (expected {}, found {})",
                    self.path.display(),
                    expected,
                    current
                ),
            ));
        }

        AtomicFileWriter::new(self.path.clone())
            .write(&bytes)
            .map_err(|err| StoreError::new(FailureKind::Io, err.to_string()))?;
        Ok(Some(content_version(&bytes)))
    }
}

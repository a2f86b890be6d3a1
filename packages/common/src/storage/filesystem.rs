use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{DocumentId, DocumentStore};

/// Filesystem-backed document store.
///
/// Each payload is stored as a single file named after its document id:
/// `{base_path}/{id}`. Writes go through `{base_path}/.tmp` and are moved
/// into place with an atomic rename, so a replaced payload is either the old
/// or the new version, never a mix.
pub struct FilesystemDocumentStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemDocumentStore {
    /// Create a new filesystem document store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Compute the filesystem path for a given document id.
    fn document_path(&self, id: DocumentId) -> PathBuf {
        self.base_path.join(id.to_string())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl DocumentStore for FilesystemDocumentStore {
    async fn put(&self, id: DocumentId, data: &[u8]) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, self.document_path(id)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, id: DocumentId) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.document_path(id)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, id: DocumentId) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.document_path(id)).await?)
    }

    async fn delete(&self, id: DocumentId) -> Result<bool, StorageError> {
        match fs::remove_file(self.document_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, id: DocumentId) -> Result<u64, StorageError> {
        match fs::metadata(self.document_path(id)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}

use async_trait::async_trait;

use super::error::StorageError;

/// Surrogate key of the document metadata row owning a payload.
pub type DocumentId = i32;

/// Storage for document payloads, keyed by document id.
///
/// A payload is an opaque byte blob; writing to an id that already holds a
/// payload replaces it. Payload lifetime is managed by the caller alongside
/// the document metadata row.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store the payload for a document, replacing any previous one.
    async fn put(&self, id: DocumentId, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve the payload stored for a document.
    async fn get(&self, id: DocumentId) -> Result<Vec<u8>, StorageError>;

    /// Check whether a payload exists for a document.
    async fn exists(&self, id: DocumentId) -> Result<bool, StorageError>;

    /// Delete the payload for a document.
    ///
    /// Returns `true` if a payload was deleted, `false` if none existed.
    async fn delete(&self, id: DocumentId) -> Result<bool, StorageError>;

    /// Get the size of the stored payload in bytes.
    async fn size(&self, id: DocumentId) -> Result<u64, StorageError>;
}

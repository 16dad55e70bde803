//! Storage port for uploaded signature images.

use crate::agreement::domain::{SignatureField, SignatureUpload, SignatureUrl};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for signature storage operations.
pub type SignatureFileStoreResult<T> = Result<T, SignatureFileStoreError>;

/// Signature image storage contract.
#[async_trait]
pub trait SignatureFileStore: Send + Sync {
    /// Persists an uploaded image and returns a retrievable URL.
    async fn save(
        &self,
        field: SignatureField,
        upload: &SignatureUpload,
    ) -> SignatureFileStoreResult<SignatureUrl>;

    /// Removes a file previously returned by [`Self::save`].
    ///
    /// Removing a file that is already gone succeeds.
    async fn delete(&self, url: &SignatureUrl) -> SignatureFileStoreResult<()>;
}

/// Errors returned by signature storage adapters.
#[derive(Debug, Clone, Error)]
pub enum SignatureFileStoreError {
    /// The stored file could not be addressed by URL.
    #[error("stored signature has an invalid url: {0}")]
    InvalidUrl(String),

    /// Storage I/O failed.
    #[error("signature storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl SignatureFileStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

//! In-memory signature image store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agreement::{
    adapters::naming::{signature_url, stored_file_name},
    domain::{SignatureField, SignatureUpload, SignatureUrl},
    ports::{SignatureFileStore, SignatureFileStoreError, SignatureFileStoreResult},
};

/// Signature store that keeps uploaded bytes keyed by their URL.
#[derive(Debug, Clone)]
pub struct InMemorySignatureStore {
    base_url: String,
    files: Arc<RwLock<HashMap<SignatureUrl, Vec<u8>>>>,
}

impl InMemorySignatureStore {
    /// Creates an empty store whose URLs start with `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            files: Arc::default(),
        }
    }

    /// Returns the bytes stored under `url`, if any.
    #[must_use]
    pub fn contents(&self, url: &SignatureUrl) -> Option<Vec<u8>> {
        self.files
            .read()
            .ok()
            .and_then(|files| files.get(url).cloned())
    }

    /// Returns how many files have been stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().map_or(0, |files| files.len())
    }

    /// Returns whether no files have been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySignatureStore {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[async_trait]
impl SignatureFileStore for InMemorySignatureStore {
    async fn save(
        &self,
        field: SignatureField,
        upload: &SignatureUpload,
    ) -> SignatureFileStoreResult<SignatureUrl> {
        let url = signature_url(&self.base_url, &stored_file_name(field, upload))?;
        let mut files = self.files.write().map_err(|err| {
            SignatureFileStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        files.insert(url.clone(), upload.bytes().to_vec());
        Ok(url)
    }

    async fn delete(&self, url: &SignatureUrl) -> SignatureFileStoreResult<()> {
        let mut files = self.files.write().map_err(|err| {
            SignatureFileStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        files.remove(url);
        Ok(())
    }
}

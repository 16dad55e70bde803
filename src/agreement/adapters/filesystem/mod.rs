//! Local filesystem storage for signature images.
//!
//! Files are written through a capability handle to the upload root, so the
//! adapter cannot touch anything outside it regardless of the file names it
//! is given.

use crate::agreement::{
    adapters::naming::{
        SIGNATURE_PATH, signature_url, stored_file_name, stored_file_name_from_url,
    },
    domain::{SignatureField, SignatureUpload, SignatureUrl},
    ports::{SignatureFileStore, SignatureFileStoreError, SignatureFileStoreResult},
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

/// Signature store writing to `<upload root>/uploads/signatures`.
#[derive(Debug, Clone)]
pub struct LocalSignatureStore {
    signatures: Arc<Dir>,
    base_url: String,
}

impl LocalSignatureStore {
    /// Opens (creating if needed) the signature directory below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureFileStoreError::Storage`] when the directory cannot
    /// be created or opened.
    pub fn open(root: &Utf8Path, base_url: impl Into<String>) -> SignatureFileStoreResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(SignatureFileStoreError::storage)?;
        let root_dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(SignatureFileStoreError::storage)?;
        root_dir
            .create_dir_all(SIGNATURE_PATH)
            .map_err(SignatureFileStoreError::storage)?;
        let signatures = root_dir
            .open_dir(SIGNATURE_PATH)
            .map_err(SignatureFileStoreError::storage)?;

        Ok(Self {
            signatures: Arc::new(signatures),
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SignatureFileStore for LocalSignatureStore {
    async fn save(
        &self,
        field: SignatureField,
        upload: &SignatureUpload,
    ) -> SignatureFileStoreResult<SignatureUrl> {
        let file_name = stored_file_name(field, upload);
        let url = signature_url(&self.base_url, &file_name)?;
        let signatures = Arc::clone(&self.signatures);
        let bytes = upload.bytes().to_vec();

        tokio::task::spawn_blocking(move || signatures.write(file_name, bytes))
            .await
            .map_err(SignatureFileStoreError::storage)?
            .map_err(SignatureFileStoreError::storage)?;

        Ok(url)
    }

    async fn delete(&self, url: &SignatureUrl) -> SignatureFileStoreResult<()> {
        let file_name = stored_file_name_from_url(&self.base_url, url)?;
        let signatures = Arc::clone(&self.signatures);

        let removed = tokio::task::spawn_blocking(move || signatures.remove_file(file_name))
            .await
            .map_err(SignatureFileStoreError::storage)?;
        match removed {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(SignatureFileStoreError::storage(err))
            }
            _ => Ok(()),
        }
    }
}

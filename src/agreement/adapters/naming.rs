//! Naming shared by the signature storage adapters.

use crate::agreement::{
    domain::{SignatureField, SignatureUpload, SignatureUrl},
    ports::{SignatureFileStoreError, SignatureFileStoreResult},
};
use uuid::Uuid;

/// URL path segment under which signatures are served.
pub const SIGNATURE_PATH: &str = "uploads/signatures";

/// Returns a collision-free stored file name such as
/// `partner1Signature_3f2c….png`.
pub(crate) fn stored_file_name(field: SignatureField, upload: &SignatureUpload) -> String {
    format!(
        "{}_{}.{}",
        field.field_name(),
        Uuid::new_v4().simple(),
        upload.extension()
    )
}

/// Recovers the stored file name from a URL built by [`signature_url`].
pub(crate) fn stored_file_name_from_url(
    base_url: &str,
    url: &SignatureUrl,
) -> SignatureFileStoreResult<String> {
    let prefix = format!("{}/{SIGNATURE_PATH}/", base_url.trim_end_matches('/'));
    url.as_str()
        .strip_prefix(&prefix)
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .map(ToOwned::to_owned)
        .ok_or_else(|| SignatureFileStoreError::InvalidUrl(url.as_str().to_owned()))
}

/// Builds the public URL for a stored file.
pub(crate) fn signature_url(
    base_url: &str,
    file_name: &str,
) -> SignatureFileStoreResult<SignatureUrl> {
    let url = format!("{}/{SIGNATURE_PATH}/{file_name}", base_url.trim_end_matches('/'));
    SignatureUrl::new(url).map_err(|err| SignatureFileStoreError::InvalidUrl(err.to_string()))
}

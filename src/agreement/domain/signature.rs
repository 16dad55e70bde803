//! Signature image references and upload payloads.

use super::AgreementDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted signature image, in bytes.
pub const MAX_SIGNATURE_BYTES: usize = 1024 * 1024;

/// File extensions accepted for signature images.
pub const ALLOWED_SIGNATURE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Retrievable URL of a stored signature image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignatureUrl(String);

impl SignatureUrl {
    /// Creates a validated signature URL.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidSignatureUrl`] when the value is
    /// empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, AgreementDomainError> {
        let raw = value.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(AgreementDomainError::InvalidSignatureUrl(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the URL as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SignatureUrl {
    type Error = AgreementDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SignatureUrl> for String {
    fn from(value: SignatureUrl) -> Self {
        value.0
    }
}

impl fmt::Display for SignatureUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upload slot a signature image is submitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureField {
    /// First partner's signature.
    Partner1,
    /// Second partner's signature.
    Partner2,
    /// Officiant's countersignature.
    Officiant,
}

impl SignatureField {
    /// Returns the multipart field name used by upload clients.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Partner1 => "partner1Signature",
            Self::Partner2 => "partner2Signature",
            Self::Officiant => "officiantSignature",
        }
    }
}

/// Raw signature image received from a client.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl SignatureUpload {
    /// Creates a validated signature upload.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidSignatureUpload`] when the file
    /// is empty, larger than [`MAX_SIGNATURE_BYTES`], or not an image type
    /// listed in [`ALLOWED_SIGNATURE_EXTENSIONS`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AgreementDomainError> {
        let name = file_name.into();
        let reject = |reason| AgreementDomainError::InvalidSignatureUpload {
            file_name: name.clone(),
            reason,
        };

        if bytes.is_empty() {
            return Err(reject("file is empty"));
        }
        if bytes.len() > MAX_SIGNATURE_BYTES {
            return Err(reject("file exceeds the 1 MiB limit"));
        }
        let is_image = extension_of(&name).is_some_and(|extension| {
            ALLOWED_SIGNATURE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension))
        });
        if !is_image {
            return Err(reject("signatures must be jpg, jpeg, png, gif, or webp images"));
        }

        Ok(Self {
            file_name: name,
            bytes,
        })
    }

    /// Returns the client-supplied file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the lower-cased file extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_of(&self.file_name)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default()
    }

    /// Returns the image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SignatureUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| !extension.is_empty())
}

/// Both partner signature uploads, submitted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerSignatureUploads {
    partner1: SignatureUpload,
    partner2: SignatureUpload,
}

impl PartnerSignatureUploads {
    /// Pairs the two partner uploads.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::IncompleteSubmission`] unless both
    /// uploads are present.
    pub fn new(
        partner1: Option<SignatureUpload>,
        partner2: Option<SignatureUpload>,
    ) -> Result<Self, AgreementDomainError> {
        match (partner1, partner2) {
            (Some(first), Some(second)) => Ok(Self {
                partner1: first,
                partner2: second,
            }),
            _ => Err(AgreementDomainError::IncompleteSubmission(
                "both partner signatures are required",
            )),
        }
    }

    /// Returns the first partner's upload.
    #[must_use]
    pub const fn partner1(&self) -> &SignatureUpload {
        &self.partner1
    }

    /// Returns the second partner's upload.
    #[must_use]
    pub const fn partner2(&self) -> &SignatureUpload {
        &self.partner2
    }
}

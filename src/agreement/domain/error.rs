//! Error types for agreement domain validation and transitions.

use super::{AgreementId, AgreementStatus};
use thiserror::Error;

/// Errors returned by agreement domain values and lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgreementDomainError {
    /// Officiant-supplied fields are immutable once the couple has signed.
    #[error("agreement {agreement_id} cannot be edited in status {status}")]
    EditLocked {
        /// Agreement identifier.
        agreement_id: AgreementId,
        /// Status that triggered the lock.
        status: AgreementStatus,
    },

    /// The operation is not permitted from the current status.
    #[error("agreement {agreement_id} cannot {operation} while {from}")]
    InvalidTransition {
        /// Agreement identifier.
        agreement_id: AgreementId,
        /// Status at the time the operation was attempted.
        from: AgreementStatus,
        /// Operation name in human-readable form.
        operation: &'static str,
    },

    /// Paired inputs were only partially supplied.
    #[error("incomplete submission: {0}")]
    IncompleteSubmission(&'static str),

    /// A required file was not supplied.
    #[error("missing file: {0}")]
    MissingFile(&'static str),

    /// The requester does not own the agreement.
    #[error("account {requester} is not authorized to modify agreement {agreement_id}")]
    Forbidden {
        /// Agreement identifier.
        agreement_id: AgreementId,
        /// Account that attempted the operation.
        requester: String,
    },

    /// The agreement is past payment and can no longer be deleted.
    #[error("agreement {agreement_id} is protected in status {status}")]
    ProtectedState {
        /// Agreement identifier.
        agreement_id: AgreementId,
        /// Protected status.
        status: AgreementStatus,
    },

    /// An account identifier is empty after trimming.
    #[error("account identifier must not be empty")]
    EmptyAccountId,

    /// A signature URL is empty or contains whitespace.
    #[error("invalid signature url '{0}'")]
    InvalidSignatureUrl(String),

    /// An uploaded signature image was rejected.
    #[error("invalid signature upload '{file_name}': {reason}")]
    InvalidSignatureUpload {
        /// Original file name supplied by the uploader.
        file_name: String,
        /// Reason for rejection.
        reason: &'static str,
    },

    /// A monetary amount exceeds the persisted range.
    #[error("amount of {0} cents exceeds the supported range")]
    AmountOutOfRange(u64),

    /// Adding price and travel fee overflowed.
    #[error("agreement total overflows the supported range")]
    TotalOverflow,
}

/// Error returned while parsing agreement statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agreement status: {0}")]
pub struct ParseAgreementStatusError(pub String);

/// Error returned while parsing a payment confirmation policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown payment confirmation policy: {0}")]
pub struct ParsePaymentPolicyError(pub String);

//! Domain model for ceremony agreements.
//!
//! The agreement aggregate owns every status rule. Its lifecycle methods
//! validate before mutating and return the side effects a transition requires,
//! so the domain stays free of I/O.

mod agreement;
mod amount;
mod ceremony;
mod details;
mod effect;
mod error;
mod ids;
mod policy;
mod signature;
mod status;
mod transition;

pub use agreement::{
    Agreement, AgreementRevision, AgreementSignatures, AgreementTimeline, PersistedAgreementData,
};
pub use amount::Amount;
pub use ceremony::{CeremonyReadiness, EventSubmitted};
pub use details::{CeremonyDetails, CeremonyDetailsPatch};
pub use effect::{AgreementEffect, Notification, NotificationCategory};
pub use error::{AgreementDomainError, ParseAgreementStatusError, ParsePaymentPolicyError};
pub use ids::{AccountId, AgreementId};
pub use policy::PaymentConfirmationPolicy;
pub use signature::{
    ALLOWED_SIGNATURE_EXTENSIONS, MAX_SIGNATURE_BYTES, PartnerSignatureUploads, SignatureField,
    SignatureUpload, SignatureUrl,
};
pub use status::AgreementStatus;
pub use transition::AgreementTransition;

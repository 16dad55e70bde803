//! Agreement aggregate root and lifecycle transitions.

use super::{
    AccountId, AgreementDomainError, AgreementEffect, AgreementId, AgreementStatus, Amount,
    CeremonyDetails, CeremonyDetailsPatch, Notification, NotificationCategory,
    PaymentConfirmationPolicy, SignatureUrl,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const DETAILS_CREATED_TEXT: &str =
    "Your officiant has created a ceremony agreement. Please review and sign.";
const DETAILS_FILLED_TEXT: &str =
    "Officiant has filled the agreement details. Please review and sign.";
const USERS_SIGNED_TEXT: &str =
    "Users have signed the agreement. You can now send payment request.";
const PAYMENT_RECEIVED_TEXT: &str = "Payment received. You can now sign the agreement.";
const AGREEMENT_COMPLETED_TEXT: &str = "Agreement completed! You can now create your ceremony.";
const AGREEMENT_CANCELLED_TEXT: &str = "An agreement has been cancelled by the officiant.";

/// Signature references collected over the lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementSignatures {
    /// First partner's signature image.
    pub partner1: Option<SignatureUrl>,
    /// Second partner's signature image.
    pub partner2: Option<SignatureUrl>,
    /// Officiant's countersignature image.
    pub officiant: Option<SignatureUrl>,
}

/// Timestamps recorded as the agreement moves through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementTimeline {
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the officiant last supplied details.
    pub officiant_filled_at: Option<DateTime<Utc>>,
    /// When both partners signed.
    pub user_signed_at: Option<DateTime<Utc>>,
    /// When payment was requested.
    pub payment_requested_at: Option<DateTime<Utc>>,
    /// When payment was confirmed.
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// When the officiant countersigned.
    pub officiant_signed_at: Option<DateTime<Utc>>,
    /// When the agreement was completed (set with `officiant_signed_at`).
    pub completed_at: Option<DateTime<Utc>>,
    /// When a ceremony consumed the agreement.
    pub ceremony_submitted_at: Option<DateTime<Utc>>,
}

impl AgreementTimeline {
    fn starting_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            created_at: timestamp,
            updated_at: timestamp,
            officiant_filled_at: None,
            user_signed_at: None,
            payment_requested_at: None,
            payment_completed_at: None,
            officiant_signed_at: None,
            completed_at: None,
            ceremony_submitted_at: None,
        }
    }
}

/// Status and write counter a conditional write must still observe.
///
/// Every committed write bumps `version`, so two writers that read the same
/// record cannot both commit even when the status does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgreementRevision {
    /// Lifecycle status at read time.
    pub status: AgreementStatus,
    /// Write counter at read time, starting at 1.
    pub version: u64,
}

impl fmt::Display for AgreementRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (version {})", self.status, self.version)
    }
}

/// Ceremony agreement between a couple and an officiant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    id: AgreementId,
    user_id: AccountId,
    officiant_id: AccountId,
    details: CeremonyDetails,
    signatures: AgreementSignatures,
    status: AgreementStatus,
    version: u64,
    is_used_for_ceremony: bool,
    timeline: AgreementTimeline,
}

/// Parameter object for reconstructing a persisted agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgreementData {
    /// Persisted agreement identifier.
    pub id: AgreementId,
    /// Persisted couple account.
    pub user_id: AccountId,
    /// Persisted officiant account.
    pub officiant_id: AccountId,
    /// Persisted ceremony details.
    pub details: CeremonyDetails,
    /// Persisted signature references.
    pub signatures: AgreementSignatures,
    /// Persisted lifecycle status.
    pub status: AgreementStatus,
    /// Persisted write counter.
    pub version: u64,
    /// Persisted ceremony consumption flag.
    pub is_used_for_ceremony: bool,
    /// Persisted lifecycle timestamps.
    pub timeline: AgreementTimeline,
}

impl Agreement {
    /// Creates an agreement drafted by an officiant.
    ///
    /// Agreements created with details start in
    /// [`AgreementStatus::OfficiantFilled`].
    #[must_use]
    pub fn new(
        user_id: AccountId,
        officiant_id: AccountId,
        details: CeremonyDetails,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let mut timeline = AgreementTimeline::starting_at(timestamp);
        timeline.officiant_filled_at = Some(timestamp);

        Self {
            id: AgreementId::new(),
            user_id,
            officiant_id,
            details,
            signatures: AgreementSignatures::default(),
            status: AgreementStatus::OfficiantFilled,
            version: 1,
            is_used_for_ceremony: false,
            timeline,
        }
    }

    /// Reconstructs an agreement from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgreementData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            officiant_id: data.officiant_id,
            details: data.details,
            signatures: data.signatures,
            status: data.status,
            version: data.version,
            is_used_for_ceremony: data.is_used_for_ceremony,
            timeline: data.timeline,
        }
    }

    /// Returns the agreement identifier.
    #[must_use]
    pub const fn id(&self) -> AgreementId {
        self.id
    }

    /// Returns the couple's account.
    #[must_use]
    pub const fn user_id(&self) -> &AccountId {
        &self.user_id
    }

    /// Returns the officiant's account.
    #[must_use]
    pub const fn officiant_id(&self) -> &AccountId {
        &self.officiant_id
    }

    /// Returns the ceremony details.
    #[must_use]
    pub const fn details(&self) -> &CeremonyDetails {
        &self.details
    }

    /// Returns the collected signatures.
    #[must_use]
    pub const fn signatures(&self) -> &AgreementSignatures {
        &self.signatures
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgreementStatus {
        self.status
    }

    /// Returns the write counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the status and version a write against this snapshot expects.
    #[must_use]
    pub const fn revision(&self) -> AgreementRevision {
        AgreementRevision {
            status: self.status,
            version: self.version,
        }
    }

    /// Returns whether a ceremony has consumed this agreement.
    #[must_use]
    pub const fn is_used_for_ceremony(&self) -> bool {
        self.is_used_for_ceremony
    }

    /// Returns the lifecycle timestamps.
    #[must_use]
    pub const fn timeline(&self) -> &AgreementTimeline {
        &self.timeline
    }

    /// Returns the total payable amount.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::TotalOverflow`] when the sum leaves the
    /// supported range.
    pub const fn total(&self) -> Result<Amount, AgreementDomainError> {
        self.details.total()
    }

    /// Side effects that announce a newly created agreement.
    #[must_use]
    pub fn creation_effects(&self, schedule_id: Option<String>) -> Vec<AgreementEffect> {
        let mut effects = vec![
            self.notify_user(NotificationCategory::Agreement, DETAILS_CREATED_TEXT),
            AgreementEffect::EmailAgreementReady {
                recipient: self.user_id.clone(),
            },
        ];
        if let Some(schedule) = schedule_id {
            effects.push(AgreementEffect::LinkSchedule {
                schedule_id: schedule,
                agreement_id: self.id,
            });
        }
        effects
    }

    /// Applies officiant edits and marks the agreement as filled.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::Forbidden`] when `requester` is not the
    /// agreement's officiant, or [`AgreementDomainError::EditLocked`] once the
    /// couple has signed.
    pub fn fill_details(
        &mut self,
        requester: &AccountId,
        patch: &CeremonyDetailsPatch,
        clock: &impl Clock,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        self.ensure_officiant(requester)?;
        if self.status.is_edit_locked() {
            return Err(AgreementDomainError::EditLocked {
                agreement_id: self.id,
                status: self.status,
            });
        }

        patch.apply_to(&mut self.details);
        let timestamp = clock.utc();
        self.status = AgreementStatus::OfficiantFilled;
        self.timeline.officiant_filled_at = Some(timestamp);
        self.timeline.updated_at = timestamp;

        Ok(vec![
            self.notify_user(NotificationCategory::Agreement, DETAILS_FILLED_TEXT),
        ])
    }

    /// Validates that partner signatures may be recorded.
    ///
    /// Signing may skip straight from `pending`, and re-signing replaces the
    /// previous images, but never once payment has been requested.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidTransition`] when the agreement
    /// has moved past `user_signed`.
    pub const fn ensure_accepts_partner_signatures(&self) -> Result<(), AgreementDomainError> {
        if self.status.is_after(AgreementStatus::UserSigned) {
            return Err(self.invalid_transition("record partner signatures"));
        }
        Ok(())
    }

    /// Records both partner signatures.
    ///
    /// # Errors
    ///
    /// See [`Self::ensure_accepts_partner_signatures`].
    pub fn record_partner_signatures(
        &mut self,
        partner1: SignatureUrl,
        partner2: SignatureUrl,
        clock: &impl Clock,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        self.ensure_accepts_partner_signatures()?;

        let timestamp = clock.utc();
        self.signatures.partner1 = Some(partner1);
        self.signatures.partner2 = Some(partner2);
        self.status = AgreementStatus::UserSigned;
        self.timeline.user_signed_at = Some(timestamp);
        self.timeline.updated_at = timestamp;

        Ok(vec![
            self.notify_officiant(NotificationCategory::Agreement, USERS_SIGNED_TEXT),
        ])
    }

    /// Requests payment from the couple.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidTransition`] unless the status is
    /// `user_signed`, or [`AgreementDomainError::TotalOverflow`] when the
    /// total cannot be computed.
    pub fn request_payment(
        &mut self,
        clock: &impl Clock,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        if self.status != AgreementStatus::UserSigned {
            return Err(self.invalid_transition("request payment"));
        }
        let total = self.total()?;
        let text = self.details.couple_names().map_or_else(
            || format!("Payment request sent for your ceremony. Amount: {total}"),
            |couple| format!("Payment request sent for {couple} ceremony. Amount: {total}"),
        );

        let timestamp = clock.utc();
        self.status = AgreementStatus::PaymentRequested;
        self.timeline.payment_requested_at = Some(timestamp);
        self.timeline.updated_at = timestamp;

        Ok(vec![self.notify_user(NotificationCategory::Payment, text)])
    }

    /// Confirms that payment has been received.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidTransition`] when the policy
    /// rejects the current status. Agreements past `payment_completed` are
    /// always rejected.
    pub fn mark_payment_completed(
        &mut self,
        policy: PaymentConfirmationPolicy,
        clock: &impl Clock,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        let permitted = match policy {
            PaymentConfirmationPolicy::Lenient => {
                !self.status.is_after(AgreementStatus::PaymentCompleted)
            }
            PaymentConfirmationPolicy::RequirePaymentRequested => {
                self.status == AgreementStatus::PaymentRequested
            }
        };
        if !permitted {
            return Err(self.invalid_transition("confirm payment"));
        }

        let timestamp = clock.utc();
        self.status = AgreementStatus::PaymentCompleted;
        self.timeline.payment_completed_at = Some(timestamp);
        self.timeline.updated_at = timestamp;

        Ok(vec![
            AgreementEffect::SetAgreementAccepted {
                user: self.user_id.clone(),
                accepted: true,
            },
            self.notify_officiant(NotificationCategory::Payment, PAYMENT_RECEIVED_TEXT),
        ])
    }

    /// Validates that the officiant may countersign.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidTransition`] unless the status is
    /// `payment_completed`.
    pub fn ensure_accepts_officiant_signature(&self) -> Result<(), AgreementDomainError> {
        if self.status != AgreementStatus::PaymentCompleted {
            return Err(self.invalid_transition("record the officiant signature"));
        }
        Ok(())
    }

    /// Records the officiant's countersignature, completing the agreement.
    ///
    /// # Errors
    ///
    /// See [`Self::ensure_accepts_officiant_signature`].
    pub fn record_officiant_signature(
        &mut self,
        signature: SignatureUrl,
        clock: &impl Clock,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        self.ensure_accepts_officiant_signature()?;

        let timestamp = clock.utc();
        self.signatures.officiant = Some(signature);
        self.status = AgreementStatus::OfficiantSigned;
        self.timeline.officiant_signed_at = Some(timestamp);
        self.timeline.completed_at = Some(timestamp);
        self.timeline.updated_at = timestamp;

        Ok(vec![
            AgreementEffect::SetAgreementAccepted {
                user: self.user_id.clone(),
                accepted: true,
            },
            self.notify_user(NotificationCategory::Agreement, AGREEMENT_COMPLETED_TEXT),
        ])
    }

    /// Consumes the agreement for a submitted ceremony.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::InvalidTransition`] unless the officiant
    /// has countersigned and the agreement has not already been used.
    pub fn mark_used_for_ceremony(
        &mut self,
        clock: &impl Clock,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        if !self.status.is_ceremony_ready() {
            return Err(self.invalid_transition("be used for a ceremony"));
        }

        let timestamp = clock.utc();
        self.is_used_for_ceremony = true;
        self.status = AgreementStatus::Used;
        self.timeline.ceremony_submitted_at = Some(timestamp);
        self.timeline.updated_at = timestamp;

        Ok(vec![AgreementEffect::SetAgreementAccepted {
            user: self.user_id.clone(),
            accepted: false,
        }])
    }

    /// Checks that `requester` may delete the agreement and returns the
    /// effects to run once it is gone.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::Forbidden`] for anyone other than the
    /// officiant, then [`AgreementDomainError::ProtectedState`] once payment
    /// has completed.
    pub fn authorize_deletion(
        &self,
        requester: &AccountId,
    ) -> Result<Vec<AgreementEffect>, AgreementDomainError> {
        self.ensure_officiant(requester)?;
        if self.status.is_delete_protected() {
            return Err(AgreementDomainError::ProtectedState {
                agreement_id: self.id,
                status: self.status,
            });
        }

        Ok(vec![
            self.notify_user(NotificationCategory::Agreement, AGREEMENT_CANCELLED_TEXT),
        ])
    }

    pub(super) const fn advance_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    fn ensure_officiant(&self, requester: &AccountId) -> Result<(), AgreementDomainError> {
        if *requester != self.officiant_id {
            return Err(AgreementDomainError::Forbidden {
                agreement_id: self.id,
                requester: requester.as_str().to_owned(),
            });
        }
        Ok(())
    }

    const fn invalid_transition(&self, operation: &'static str) -> AgreementDomainError {
        AgreementDomainError::InvalidTransition {
            agreement_id: self.id,
            from: self.status,
            operation,
        }
    }

    fn notify_user(
        &self,
        category: NotificationCategory,
        text: impl Into<String>,
    ) -> AgreementEffect {
        AgreementEffect::Notify(Notification::new(self.user_id.clone(), category, text))
    }

    fn notify_officiant(
        &self,
        category: NotificationCategory,
        text: impl Into<String>,
    ) -> AgreementEffect {
        AgreementEffect::Notify(Notification::new(
            self.officiant_id.clone(),
            category,
            text,
        ))
    }
}

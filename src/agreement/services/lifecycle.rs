//! Service layer for the agreement lifecycle.
//!
//! Every mutating operation follows the same shape: read the current record,
//! apply a pure domain transition to a copy, write it back conditionally on
//! the revision (status and version) that was read, then dispatch the
//! transition's side effects.

use super::dispatcher::AgreementEffectDispatcher;
use crate::agreement::{
    domain::{
        AccountId, Agreement, AgreementDomainError, AgreementId, AgreementStatus,
        AgreementTransition, CeremonyDetailsPatch, CeremonyReadiness, EventSubmitted,
        PartnerSignatureUploads, PaymentConfirmationPolicy, SignatureField, SignatureUpload,
        SignatureUrl,
    },
    ports::{
        AgreementFilter, AgreementRepository, AgreementRepositoryError, AgreementSort,
        SignatureFileStore, SignatureFileStoreError,
    },
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for drafting a new agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAgreementRequest {
    user_id: String,
    officiant_id: String,
    details: CeremonyDetailsPatch,
    schedule_id: Option<String>,
}

impl CreateAgreementRequest {
    /// Creates a request for the couple `user_id` drafted by `officiant_id`.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        officiant_id: impl Into<String>,
        details: CeremonyDetailsPatch,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            officiant_id: officiant_id.into(),
            details,
            schedule_id: None,
        }
    }

    /// Links the booking schedule entry the agreement belongs to.
    #[must_use]
    pub fn with_schedule(mut self, schedule_id: impl Into<String>) -> Self {
        self.schedule_id = Some(schedule_id.into());
        self
    }
}

/// Failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgreementFailureKind {
    /// No agreement matched the request.
    NotFound,
    /// The agreement is edit-locked.
    EditLocked,
    /// The operation is not permitted from the current status.
    InvalidTransition,
    /// Paired inputs were only partially supplied.
    IncompleteSubmission,
    /// A required file was not supplied.
    MissingFile,
    /// The requester does not own the agreement.
    Forbidden,
    /// The agreement is past payment and cannot be deleted.
    ProtectedState,
    /// A concurrent write won the race.
    ConcurrentModification,
    /// An input value was malformed.
    Validation,
    /// Storage or another collaborator failed.
    Infrastructure,
}

impl AgreementFailureKind {
    /// Returns the snake-case name used in API error payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::EditLocked => "edit_locked",
            Self::InvalidTransition => "invalid_transition",
            Self::IncompleteSubmission => "incomplete_submission",
            Self::MissingFile => "missing_file",
            Self::Forbidden => "forbidden",
            Self::ProtectedState => "protected_state",
            Self::ConcurrentModification => "concurrent_modification",
            Self::Validation => "validation",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for AgreementFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-level errors for agreement lifecycle operations.
#[derive(Debug, Error)]
pub enum AgreementLifecycleError {
    /// The agreement does not exist.
    #[error("agreement not found: {0}")]
    NotFound(AgreementId),

    /// No countersigned agreement exists for a couple and officiant.
    #[error("no signed agreement between user {user_id} and officiant {officiant_id}")]
    NoSignedAgreement {
        /// Couple account.
        user_id: AccountId,
        /// Officiant account.
        officiant_id: AccountId,
    },

    /// The agreement changed between read and write.
    #[error("agreement {0} was modified concurrently")]
    ConcurrentModification(AgreementId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgreementDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgreementRepositoryError),

    /// Signature storage failed.
    #[error(transparent)]
    FileStore(#[from] SignatureFileStoreError),
}

impl AgreementLifecycleError {
    /// Returns the failure category for this error.
    #[must_use]
    pub const fn kind(&self) -> AgreementFailureKind {
        match self {
            Self::NotFound(_)
            | Self::NoSignedAgreement { .. }
            | Self::Repository(AgreementRepositoryError::NotFound(_)) => {
                AgreementFailureKind::NotFound
            }
            Self::ConcurrentModification(_)
            | Self::Repository(AgreementRepositoryError::Conflict { .. }) => {
                AgreementFailureKind::ConcurrentModification
            }
            Self::Domain(error) => domain_kind(error),
            Self::Repository(
                AgreementRepositoryError::DuplicateAgreement(_)
                | AgreementRepositoryError::Persistence(_),
            )
            | Self::FileStore(_) => AgreementFailureKind::Infrastructure,
        }
    }
}

const fn domain_kind(error: &AgreementDomainError) -> AgreementFailureKind {
    match error {
        AgreementDomainError::EditLocked { .. } => AgreementFailureKind::EditLocked,
        AgreementDomainError::InvalidTransition { .. } => AgreementFailureKind::InvalidTransition,
        AgreementDomainError::IncompleteSubmission(_) => {
            AgreementFailureKind::IncompleteSubmission
        }
        AgreementDomainError::MissingFile(_) => AgreementFailureKind::MissingFile,
        AgreementDomainError::Forbidden { .. } => AgreementFailureKind::Forbidden,
        AgreementDomainError::ProtectedState { .. } => AgreementFailureKind::ProtectedState,
        AgreementDomainError::EmptyAccountId
        | AgreementDomainError::InvalidSignatureUrl(_)
        | AgreementDomainError::InvalidSignatureUpload { .. }
        | AgreementDomainError::AmountOutOfRange(_)
        | AgreementDomainError::TotalOverflow => AgreementFailureKind::Validation,
    }
}

/// Result type for agreement lifecycle service operations.
pub type AgreementLifecycleResult<T> = Result<T, AgreementLifecycleError>;

/// Agreement lifecycle orchestration service.
#[derive(Clone)]
pub struct AgreementLifecycleService<R, F, C>
where
    R: AgreementRepository,
    F: SignatureFileStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    file_store: Arc<F>,
    dispatcher: AgreementEffectDispatcher,
    clock: Arc<C>,
    payment_policy: PaymentConfirmationPolicy,
}

impl<R, F, C> AgreementLifecycleService<R, F, C>
where
    R: AgreementRepository,
    F: SignatureFileStore,
    C: Clock + Send + Sync,
{
    /// Creates a new agreement lifecycle service using the lenient payment
    /// confirmation policy.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        file_store: Arc<F>,
        dispatcher: AgreementEffectDispatcher,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            file_store,
            dispatcher,
            clock,
            payment_policy: PaymentConfirmationPolicy::Lenient,
        }
    }

    /// Replaces the payment confirmation policy.
    #[must_use]
    pub const fn with_payment_policy(mut self, policy: PaymentConfirmationPolicy) -> Self {
        self.payment_policy = policy;
        self
    }

    /// Returns the active payment confirmation policy.
    #[must_use]
    pub const fn payment_policy(&self) -> PaymentConfirmationPolicy {
        self.payment_policy
    }

    /// Drafts a new agreement in `officiant_filled`.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::Domain`] when an account id is blank
    /// or the total overflows, and [`AgreementLifecycleError::Repository`]
    /// when the record cannot be stored.
    pub async fn create_agreement(
        &self,
        request: CreateAgreementRequest,
    ) -> AgreementLifecycleResult<Agreement> {
        let user_id = AccountId::new(request.user_id)?;
        let officiant_id = AccountId::new(request.officiant_id)?;
        let details = request.details.into_details();
        details.total()?;

        let agreement = Agreement::new(user_id, officiant_id, details, &*self.clock);
        self.repository.store(&agreement).await?;
        info!(
            agreement_id = %agreement.id(),
            officiant_id = %agreement.officiant_id(),
            "agreement created"
        );

        let effects = agreement.creation_effects(request.schedule_id);
        self.dispatcher.dispatch(&agreement, &effects).await;
        Ok(agreement)
    }

    /// Applies officiant edits to an unlocked agreement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `EditLocked` or
    /// `ConcurrentModification` failures.
    pub async fn fill_details(
        &self,
        agreement_id: AgreementId,
        requester_id: &AccountId,
        patch: &CeremonyDetailsPatch,
    ) -> AgreementLifecycleResult<Agreement> {
        let current = self.load(agreement_id).await?;
        let transition = AgreementTransition::apply(&current, |agreement| {
            agreement.fill_details(requester_id, patch, &*self.clock)
        })?;
        self.commit(transition, "fill_details").await
    }

    /// Stores both partner signatures and moves the agreement to
    /// `user_signed`.
    ///
    /// Files are stored only after the inputs and the current status have
    /// been validated, and are removed again if the transition does not
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteSubmission` unless both uploads are present, and
    /// `InvalidTransition` once the agreement has moved past `user_signed`.
    pub async fn upload_signatures(
        &self,
        agreement_id: AgreementId,
        partner1: Option<SignatureUpload>,
        partner2: Option<SignatureUpload>,
    ) -> AgreementLifecycleResult<Agreement> {
        let uploads = PartnerSignatureUploads::new(partner1, partner2)?;
        let current = self.load(agreement_id).await?;
        current.ensure_accepts_partner_signatures()?;

        let partner1_url = self
            .file_store
            .save(SignatureField::Partner1, uploads.partner1())
            .await?;
        let partner2_url = match self
            .file_store
            .save(SignatureField::Partner2, uploads.partner2())
            .await
        {
            Ok(url) => url,
            Err(err) => {
                self.discard_files(agreement_id, &[&partner1_url]).await;
                return Err(err.into());
            }
        };

        let outcome = match AgreementTransition::apply(&current, |agreement| {
            agreement.record_partner_signatures(
                partner1_url.clone(),
                partner2_url.clone(),
                &*self.clock,
            )
        }) {
            Ok(transition) => self.commit(transition, "upload_signatures").await,
            Err(err) => Err(err.into()),
        };
        if outcome.is_err() {
            self.discard_files(agreement_id, &[&partner1_url, &partner2_url]).await;
        }
        outcome
    }

    /// Requests payment from the couple.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the agreement is `user_signed`.
    pub async fn request_payment(
        &self,
        agreement_id: AgreementId,
    ) -> AgreementLifecycleResult<Agreement> {
        let current = self.load(agreement_id).await?;
        let transition = AgreementTransition::apply(&current, |agreement| {
            agreement.request_payment(&*self.clock)
        })?;
        self.commit(transition, "request_payment").await
    }

    /// Confirms payment under the configured policy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the policy rejects the current status.
    pub async fn mark_payment_completed(
        &self,
        agreement_id: AgreementId,
    ) -> AgreementLifecycleResult<Agreement> {
        let current = self.load(agreement_id).await?;
        let policy = self.payment_policy;
        let transition = AgreementTransition::apply(&current, |agreement| {
            agreement.mark_payment_completed(policy, &*self.clock)
        })?;
        self.commit(transition, "mark_payment_completed").await
    }

    /// Stores the officiant's countersignature and completes the agreement.
    ///
    /// # Errors
    ///
    /// Returns `MissingFile` when no upload is supplied, and
    /// `InvalidTransition` unless the agreement is `payment_completed`.
    pub async fn upload_officiant_signature(
        &self,
        agreement_id: AgreementId,
        signature: Option<SignatureUpload>,
    ) -> AgreementLifecycleResult<Agreement> {
        let upload = signature.ok_or(AgreementDomainError::MissingFile(
            "officiant signature is required",
        ))?;
        let current = self.load(agreement_id).await?;
        current.ensure_accepts_officiant_signature()?;

        let url = self
            .file_store
            .save(SignatureField::Officiant, &upload)
            .await?;
        let outcome = match AgreementTransition::apply(&current, |agreement| {
            agreement.record_officiant_signature(url.clone(), &*self.clock)
        }) {
            Ok(transition) => self.commit(transition, "upload_officiant_signature").await,
            Err(err) => Err(err.into()),
        };
        if outcome.is_err() {
            self.discard_files(agreement_id, &[&url]).await;
        }
        outcome
    }

    /// Consumes a countersigned agreement for a submitted ceremony.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the agreement is `officiant_signed`
    /// or `completed`.
    pub async fn mark_used_for_ceremony(
        &self,
        agreement_id: AgreementId,
    ) -> AgreementLifecycleResult<Agreement> {
        let current = self.load(agreement_id).await?;
        self.consume(&current).await
    }

    /// Deletes an agreement on behalf of its officiant and returns the
    /// removed record.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for anyone but the officiant (whatever the
    /// status), then `ProtectedState` once payment has completed.
    pub async fn delete_agreement(
        &self,
        agreement_id: AgreementId,
        requester_id: &AccountId,
    ) -> AgreementLifecycleResult<Agreement> {
        let current = self.load(agreement_id).await?;
        let effects = current.authorize_deletion(requester_id)?;

        self.repository
            .delete_conditional(agreement_id, current.revision())
            .await
            .map_err(from_write_error)?;
        info!(
            %agreement_id,
            status = %current.status(),
            "agreement deleted"
        );

        self.dispatcher.dispatch(&current, &effects).await;
        Ok(current)
    }

    /// Returns the agreement a ceremony for this couple and officiant would
    /// consume, with the price the ceremony should carry.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::NoSignedAgreement`] when no
    /// countersigned agreement exists for the pair.
    pub async fn ceremony_readiness(
        &self,
        user_id: &AccountId,
        officiant_id: &AccountId,
    ) -> AgreementLifecycleResult<CeremonyReadiness> {
        let agreement = self.find_ready(user_id, officiant_id).await?;
        Ok(CeremonyReadiness {
            agreement_id: agreement.id(),
            ceremony_price: agreement.total()?,
        })
    }

    /// Marks the couple's countersigned agreement as used after the event
    /// lifecycle reports a submitted ceremony.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::NoSignedAgreement`] when no
    /// countersigned agreement exists for the pair.
    pub async fn consume_for_ceremony(
        &self,
        event: &EventSubmitted,
    ) -> AgreementLifecycleResult<Agreement> {
        let current = self
            .find_ready(&event.user_id, &event.officiant_id)
            .await?;
        self.consume(&current).await
    }

    /// Retrieves an agreement by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::NotFound`] when it does not exist.
    pub async fn find_by_id(
        &self,
        agreement_id: AgreementId,
    ) -> AgreementLifecycleResult<Agreement> {
        self.load(agreement_id).await
    }

    /// Returns the couple's most recently created agreement.
    ///
    /// Returns `Ok(None)` when the couple has no agreements.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::Repository`] when the lookup fails.
    pub async fn latest_for_user(
        &self,
        user_id: &AccountId,
    ) -> AgreementLifecycleResult<Option<Agreement>> {
        let agreements = self.list_for_user(user_id).await?;
        Ok(agreements.into_iter().next())
    }

    /// Lists a couple's agreements, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::Repository`] when the lookup fails.
    pub async fn list_for_user(
        &self,
        user_id: &AccountId,
    ) -> AgreementLifecycleResult<Vec<Agreement>> {
        self.list(&AgreementFilter::any().with_user(user_id.clone()))
            .await
    }

    /// Lists an officiant's agreements, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::Repository`] when the lookup fails.
    pub async fn list_for_officiant(
        &self,
        officiant_id: &AccountId,
    ) -> AgreementLifecycleResult<Vec<Agreement>> {
        self.list(&AgreementFilter::any().with_officiant(officiant_id.clone()))
            .await
    }

    /// Lists every agreement, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementLifecycleError::Repository`] when the lookup fails.
    pub async fn list_all(&self) -> AgreementLifecycleResult<Vec<Agreement>> {
        self.list(&AgreementFilter::any()).await
    }

    async fn list(&self, filter: &AgreementFilter) -> AgreementLifecycleResult<Vec<Agreement>> {
        Ok(self
            .repository
            .find_many(filter, AgreementSort::NewestFirst)
            .await?)
    }

    async fn discard_files(&self, agreement_id: AgreementId, urls: &[&SignatureUrl]) {
        for url in urls {
            if let Err(err) = self.file_store.delete(url).await {
                warn!(
                    %agreement_id,
                    url = %url,
                    error = %err,
                    "failed to remove signature file from an uncommitted upload"
                );
            }
        }
    }

    async fn load(&self, agreement_id: AgreementId) -> AgreementLifecycleResult<Agreement> {
        self.repository
            .find_by_id(agreement_id)
            .await?
            .ok_or(AgreementLifecycleError::NotFound(agreement_id))
    }

    async fn find_ready(
        &self,
        user_id: &AccountId,
        officiant_id: &AccountId,
    ) -> AgreementLifecycleResult<Agreement> {
        let filter = AgreementFilter::any()
            .with_user(user_id.clone())
            .with_officiant(officiant_id.clone())
            .with_statuses([AgreementStatus::OfficiantSigned, AgreementStatus::Completed]);
        let candidates = self
            .repository
            .find_many(&filter, AgreementSort::NewestFirst)
            .await?;

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| AgreementLifecycleError::NoSignedAgreement {
                user_id: user_id.clone(),
                officiant_id: officiant_id.clone(),
            })
    }

    async fn consume(&self, current: &Agreement) -> AgreementLifecycleResult<Agreement> {
        let transition = AgreementTransition::apply(current, |agreement| {
            agreement.mark_used_for_ceremony(&*self.clock)
        })?;
        self.commit(transition, "mark_used_for_ceremony").await
    }

    async fn commit(
        &self,
        transition: AgreementTransition,
        operation: &'static str,
    ) -> AgreementLifecycleResult<Agreement> {
        let (agreement, expected, effects) = transition.into_parts();
        self.repository
            .update_conditional(&agreement, expected)
            .await
            .map_err(from_write_error)?;

        info!(
            agreement_id = %agreement.id(),
            from = %expected.status,
            to = %agreement.status(),
            version = agreement.version(),
            operation,
            "agreement transition committed"
        );
        debug!(
            agreement_id = %agreement.id(),
            effect_count = effects.len(),
            "dispatching agreement side effects"
        );

        self.dispatcher.dispatch(&agreement, &effects).await;
        Ok(agreement)
    }
}

fn from_write_error(error: AgreementRepositoryError) -> AgreementLifecycleError {
    match error {
        AgreementRepositoryError::Conflict { id, .. } => {
            AgreementLifecycleError::ConcurrentModification(id)
        }
        AgreementRepositoryError::NotFound(id) => AgreementLifecycleError::NotFound(id),
        other => AgreementLifecycleError::Repository(other),
    }
}

//! Repository port for agreement persistence.

use crate::agreement::domain::{
    AccountId, Agreement, AgreementId, AgreementRevision, AgreementStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agreement repository operations.
pub type AgreementRepositoryResult<T> = Result<T, AgreementRepositoryError>;

/// Criteria for listing agreements. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgreementFilter {
    user_id: Option<AccountId>,
    officiant_id: Option<AccountId>,
    statuses: Option<Vec<AgreementStatus>>,
}

impl AgreementFilter {
    /// Creates a filter matching every agreement.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts results to a couple account.
    #[must_use]
    pub fn with_user(mut self, user_id: AccountId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restricts results to an officiant account.
    #[must_use]
    pub fn with_officiant(mut self, officiant_id: AccountId) -> Self {
        self.officiant_id = Some(officiant_id);
        self
    }

    /// Restricts results to the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = AgreementStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Returns the couple account criterion.
    #[must_use]
    pub const fn user_id(&self) -> Option<&AccountId> {
        self.user_id.as_ref()
    }

    /// Returns the officiant account criterion.
    #[must_use]
    pub const fn officiant_id(&self) -> Option<&AccountId> {
        self.officiant_id.as_ref()
    }

    /// Returns the status criterion.
    #[must_use]
    pub fn statuses(&self) -> Option<&[AgreementStatus]> {
        self.statuses.as_deref()
    }

    /// Returns whether `agreement` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, agreement: &Agreement) -> bool {
        self.user_id
            .as_ref()
            .is_none_or(|user_id| agreement.user_id() == user_id)
            && self
                .officiant_id
                .as_ref()
                .is_none_or(|officiant_id| agreement.officiant_id() == officiant_id)
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&agreement.status()))
    }
}

/// Ordering applied to listed agreements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgreementSort {
    /// Most recently created first.
    #[default]
    NewestFirst,
    /// Oldest first.
    OldestFirst,
}

/// Agreement persistence contract.
///
/// Writes to existing agreements are conditional on the revision the caller
/// read. Implementations must apply the write atomically only when the stored
/// status and version still equal `expected`, so that at most one of several
/// concurrent writers from the same snapshot succeeds, including writers
/// whose transition leaves the status unchanged.
#[async_trait]
pub trait AgreementRepository: Send + Sync {
    /// Stores a new agreement.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementRepositoryError::DuplicateAgreement`] when the
    /// identifier already exists.
    async fn store(&self, agreement: &Agreement) -> AgreementRepositoryResult<()>;

    /// Finds an agreement by identifier.
    ///
    /// Returns `None` when the agreement does not exist.
    async fn find_by_id(&self, id: AgreementId) -> AgreementRepositoryResult<Option<Agreement>>;

    /// Lists agreements matching `filter` in `sort` order.
    async fn find_many(
        &self,
        filter: &AgreementFilter,
        sort: AgreementSort,
    ) -> AgreementRepositoryResult<Vec<Agreement>>;

    /// Replaces the stored agreement when its revision still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementRepositoryError::Conflict`] when the stored status or
    /// version differs, or [`AgreementRepositoryError::NotFound`] when the agreement
    /// no longer exists.
    async fn update_conditional(
        &self,
        agreement: &Agreement,
        expected: AgreementRevision,
    ) -> AgreementRepositoryResult<()>;

    /// Deletes the agreement when its revision still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementRepositoryError::Conflict`] when the stored status or
    /// version differs, or [`AgreementRepositoryError::NotFound`] when the agreement
    /// no longer exists.
    async fn delete_conditional(
        &self,
        id: AgreementId,
        expected: AgreementRevision,
    ) -> AgreementRepositoryResult<()>;
}

/// Errors returned by agreement repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgreementRepositoryError {
    /// An agreement with the same identifier already exists.
    #[error("duplicate agreement identifier: {0}")]
    DuplicateAgreement(AgreementId),

    /// The agreement was not found.
    #[error("agreement not found: {0}")]
    NotFound(AgreementId),

    /// The stored record no longer matches the revision the write expected.
    #[error("agreement {id} was modified concurrently (expected {expected})")]
    Conflict {
        /// Agreement identifier.
        id: AgreementId,
        /// Revision the write was conditioned on.
        expected: AgreementRevision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgreementRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

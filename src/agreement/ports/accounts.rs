//! Port onto the accounts and scheduling records owned by other services.

use crate::agreement::domain::{AccountId, AgreementId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for account directory operations.
pub type AccountDirectoryResult<T> = Result<T, AccountDirectoryError>;

/// Contact details used to address agreement emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContact {
    /// Email address.
    pub email: String,
    /// Preferred display name, when known.
    pub display_name: Option<String>,
}

/// Account and schedule records touched by agreement transitions.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Sets the user's `AgreementAccepted` flag.
    async fn set_agreement_accepted(
        &self,
        user_id: &AccountId,
        accepted: bool,
    ) -> AccountDirectoryResult<()>;

    /// Looks up contact details for an account.
    async fn find_contact(
        &self,
        account_id: &AccountId,
    ) -> AccountDirectoryResult<Option<AccountContact>>;

    /// Records the agreement on a booking schedule entry.
    async fn link_schedule(
        &self,
        schedule_id: &str,
        agreement_id: AgreementId,
    ) -> AccountDirectoryResult<()>;
}

/// Errors returned by account directory adapters.
#[derive(Debug, Clone, Error)]
pub enum AccountDirectoryError {
    /// The account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// The schedule entry does not exist.
    #[error("schedule entry not found: {0}")]
    ScheduleNotFound(String),

    /// Backend failure.
    #[error("account directory error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl AccountDirectoryError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

//! In-memory account directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agreement::{
    domain::{AccountId, AgreementId},
    ports::{AccountContact, AccountDirectory, AccountDirectoryError, AccountDirectoryResult},
};

/// Thread-safe in-memory account directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountDirectory {
    state: Arc<RwLock<InMemoryAccountState>>,
}

#[derive(Debug, Default)]
struct InMemoryAccountState {
    contacts: HashMap<AccountId, AccountContact>,
    agreement_accepted: HashMap<AccountId, bool>,
    schedule_links: HashMap<String, AgreementId>,
}

impl InMemoryAccountDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers contact details for an account.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails.
    pub fn insert_contact(
        &self,
        account_id: AccountId,
        contact: AccountContact,
    ) -> AccountDirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.contacts.insert(account_id, contact);
        Ok(())
    }

    /// Returns the user's `AgreementAccepted` flag, if it has ever been set.
    #[must_use]
    pub fn agreement_accepted(&self, user_id: &AccountId) -> Option<bool> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.agreement_accepted.get(user_id).copied())
    }

    /// Returns the agreement linked to a schedule entry.
    #[must_use]
    pub fn linked_agreement(&self, schedule_id: &str) -> Option<AgreementId> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.schedule_links.get(schedule_id).copied())
    }
}

fn lock_error(err: impl std::fmt::Display) -> AccountDirectoryError {
    AccountDirectoryError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn set_agreement_accepted(
        &self,
        user_id: &AccountId,
        accepted: bool,
    ) -> AccountDirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.agreement_accepted.insert(user_id.clone(), accepted);
        Ok(())
    }

    async fn find_contact(
        &self,
        account_id: &AccountId,
    ) -> AccountDirectoryResult<Option<AccountContact>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.contacts.get(account_id).cloned())
    }

    async fn link_schedule(
        &self,
        schedule_id: &str,
        agreement_id: AgreementId,
    ) -> AccountDirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .schedule_links
            .insert(schedule_id.to_owned(), agreement_id);
        Ok(())
    }
}

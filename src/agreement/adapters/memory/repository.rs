//! In-memory repository for agreement lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agreement::{
    domain::{Agreement, AgreementId, AgreementRevision},
    ports::{
        AgreementFilter, AgreementRepository, AgreementRepositoryError, AgreementRepositoryResult,
        AgreementSort,
    },
};

/// Thread-safe in-memory agreement repository.
///
/// Conditional writes compare and replace under a single write lock, which
/// gives the same at-most-one-winner guarantee as a conditional `UPDATE`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgreementRepository {
    state: Arc<RwLock<HashMap<AgreementId, Agreement>>>,
}

impl InMemoryAgreementRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> AgreementRepositoryError {
    AgreementRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Checks the stored revision before a conditional write.
fn ensure_expected_revision(
    agreements: &HashMap<AgreementId, Agreement>,
    id: AgreementId,
    expected: AgreementRevision,
) -> AgreementRepositoryResult<()> {
    let stored = agreements
        .get(&id)
        .ok_or(AgreementRepositoryError::NotFound(id))?;
    if stored.revision() != expected {
        return Err(AgreementRepositoryError::Conflict { id, expected });
    }
    Ok(())
}

#[async_trait]
impl AgreementRepository for InMemoryAgreementRepository {
    async fn store(&self, agreement: &Agreement) -> AgreementRepositoryResult<()> {
        let mut agreements = self.state.write().map_err(lock_error)?;
        if agreements.contains_key(&agreement.id()) {
            return Err(AgreementRepositoryError::DuplicateAgreement(agreement.id()));
        }
        agreements.insert(agreement.id(), agreement.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AgreementId) -> AgreementRepositoryResult<Option<Agreement>> {
        let agreements = self.state.read().map_err(lock_error)?;
        Ok(agreements.get(&id).cloned())
    }

    async fn find_many(
        &self,
        filter: &AgreementFilter,
        sort: AgreementSort,
    ) -> AgreementRepositoryResult<Vec<Agreement>> {
        let agreements = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<Agreement> = agreements
            .values()
            .filter(|agreement| filter.matches(agreement))
            .cloned()
            .collect();
        matching.sort_by_key(|agreement| {
            (agreement.timeline().created_at, agreement.id().into_inner())
        });
        if sort == AgreementSort::NewestFirst {
            matching.reverse();
        }
        Ok(matching)
    }

    async fn update_conditional(
        &self,
        agreement: &Agreement,
        expected: AgreementRevision,
    ) -> AgreementRepositoryResult<()> {
        let mut agreements = self.state.write().map_err(lock_error)?;
        ensure_expected_revision(&agreements, agreement.id(), expected)?;
        agreements.insert(agreement.id(), agreement.clone());
        Ok(())
    }

    async fn delete_conditional(
        &self,
        id: AgreementId,
        expected: AgreementRevision,
    ) -> AgreementRepositoryResult<()> {
        let mut agreements = self.state.write().map_err(lock_error)?;
        ensure_expected_revision(&agreements, id, expected)?;
        agreements.remove(&id);
        Ok(())
    }
}

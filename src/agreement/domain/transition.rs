//! Pure transition results.

use super::{Agreement, AgreementDomainError, AgreementEffect, AgreementRevision};

/// Outcome of applying a lifecycle step to a snapshot of an agreement.
///
/// The snapshot is never mutated; `agreement` is the proposed next state,
/// one version ahead of the snapshot, and `expected` is the revision the
/// write must still observe in storage for the transition to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementTransition {
    agreement: Agreement,
    expected: AgreementRevision,
    effects: Vec<AgreementEffect>,
}

impl AgreementTransition {
    /// Applies `step` to a copy of `current`.
    ///
    /// # Errors
    ///
    /// Propagates the step's domain error; `current` is left untouched.
    pub fn apply<F>(current: &Agreement, step: F) -> Result<Self, AgreementDomainError>
    where
        F: FnOnce(&mut Agreement) -> Result<Vec<AgreementEffect>, AgreementDomainError>,
    {
        let mut next = current.clone();
        let effects = step(&mut next)?;
        next.advance_version();
        Ok(Self {
            agreement: next,
            expected: current.revision(),
            effects,
        })
    }

    /// Returns the proposed next state.
    #[must_use]
    pub const fn agreement(&self) -> &Agreement {
        &self.agreement
    }

    /// Returns the revision the stored record must still hold.
    #[must_use]
    pub const fn expected(&self) -> AgreementRevision {
        self.expected
    }

    /// Returns the side effects to dispatch after commit.
    #[must_use]
    pub fn effects(&self) -> &[AgreementEffect] {
        &self.effects
    }

    /// Splits the transition into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Agreement, AgreementRevision, Vec<AgreementEffect>) {
        (self.agreement, self.expected, self.effects)
    }
}

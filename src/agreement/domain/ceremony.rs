//! Messages exchanged with the ceremony (event) lifecycle.

use super::{AccountId, AgreementId, Amount};
use serde::{Deserialize, Serialize};

/// Sent by the event lifecycle when a ceremony transitions to `submitted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSubmitted {
    /// Couple account that owns the ceremony.
    pub user_id: AccountId,
    /// Officiant performing the ceremony.
    pub officiant_id: AccountId,
}

impl EventSubmitted {
    /// Creates a submission message.
    #[must_use]
    pub const fn new(user_id: AccountId, officiant_id: AccountId) -> Self {
        Self {
            user_id,
            officiant_id,
        }
    }
}

/// A countersigned agreement a ceremony may be submitted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyReadiness {
    /// Agreement that will be consumed on submission.
    pub agreement_id: AgreementId,
    /// Price applied to the ceremony (`price + travel_fee`).
    pub ceremony_price: Amount,
}

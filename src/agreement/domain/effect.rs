//! Side effects requested by agreement transitions.
//!
//! Transitions never perform I/O. They describe what should happen once the
//! new state is durable, and the service layer dispatches these descriptions
//! on a best-effort basis.

use super::{AccountId, AgreementId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category shown alongside an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Agreement workflow updates.
    Agreement,
    /// Payment workflow updates.
    Payment,
}

impl NotificationCategory {
    /// Returns the canonical category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agreement => "agreement",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-app message addressed to a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Receiving account.
    pub recipient: AccountId,
    /// Notification category.
    pub category: NotificationCategory,
    /// Message body.
    pub text: String,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(
        recipient: AccountId,
        category: NotificationCategory,
        text: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            category,
            text: text.into(),
        }
    }
}

/// A side effect to run after a transition has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgreementEffect {
    /// Send an in-app notification.
    Notify(Notification),
    /// Email the couple that their agreement is ready to review.
    EmailAgreementReady {
        /// Account whose contact address receives the email.
        recipient: AccountId,
    },
    /// Update the user's `AgreementAccepted` flag.
    SetAgreementAccepted {
        /// User account to update.
        user: AccountId,
        /// New flag value.
        accepted: bool,
    },
    /// Link a booking schedule entry to the agreement.
    LinkSchedule {
        /// Schedule entry identifier.
        schedule_id: String,
        /// Agreement to link.
        agreement_id: AgreementId,
    },
}

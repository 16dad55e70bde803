//! Agreement lifecycle status.

use super::ParseAgreementStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Agreement lifecycle status.
///
/// Statuses advance forward only:
///
/// ```text
/// pending -> officiant_filled -> user_signed -> payment_requested
///         -> payment_completed -> officiant_signed/completed -> used
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    /// Agreement exists but the officiant has not supplied details.
    Pending,
    /// Officiant has supplied ceremony details.
    OfficiantFilled,
    /// Both partners have signed.
    UserSigned,
    /// Officiant has requested payment.
    PaymentRequested,
    /// Payment has been confirmed.
    PaymentCompleted,
    /// Officiant has countersigned.
    OfficiantSigned,
    /// Terminal signing alias of [`Self::OfficiantSigned`].
    Completed,
    /// Consumed by a submitted ceremony.
    Used,
}

impl AgreementStatus {
    /// Every defined status, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::OfficiantFilled,
        Self::UserSigned,
        Self::PaymentRequested,
        Self::PaymentCompleted,
        Self::OfficiantSigned,
        Self::Completed,
        Self::Used,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OfficiantFilled => "officiant_filled",
            Self::UserSigned => "user_signed",
            Self::PaymentRequested => "payment_requested",
            Self::PaymentCompleted => "payment_completed",
            Self::OfficiantSigned => "officiant_signed",
            Self::Completed => "completed",
            Self::Used => "used",
        }
    }

    /// Returns the position of this status in the lifecycle.
    ///
    /// [`Self::Completed`] shares its rank with [`Self::OfficiantSigned`].
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::OfficiantFilled => 1,
            Self::UserSigned => 2,
            Self::PaymentRequested => 3,
            Self::PaymentCompleted => 4,
            Self::OfficiantSigned | Self::Completed => 5,
            Self::Used => 6,
        }
    }

    /// Returns whether this status comes after `other` in the lifecycle.
    #[must_use]
    pub const fn is_after(self, other: Self) -> bool {
        self.rank() > other.rank()
    }

    /// Returns whether officiant-supplied fields are immutable in this status.
    #[must_use]
    pub const fn is_edit_locked(self) -> bool {
        !matches!(self, Self::Pending | Self::OfficiantFilled)
    }

    /// Returns whether the agreement can no longer be deleted.
    #[must_use]
    pub const fn is_delete_protected(self) -> bool {
        matches!(
            self,
            Self::PaymentCompleted | Self::OfficiantSigned | Self::Completed | Self::Used
        )
    }

    /// Returns whether a ceremony may be submitted against this status.
    #[must_use]
    pub const fn is_ceremony_ready(self) -> bool {
        matches!(self, Self::OfficiantSigned | Self::Completed)
    }

    /// Returns whether the agreement has been consumed by a ceremony.
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Used)
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgreementStatus {
    type Error = ParseAgreementStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "officiant_filled" => Ok(Self::OfficiantFilled),
            "user_signed" => Ok(Self::UserSigned),
            "payment_requested" => Ok(Self::PaymentRequested),
            "payment_completed" => Ok(Self::PaymentCompleted),
            "officiant_signed" => Ok(Self::OfficiantSigned),
            "completed" => Ok(Self::Completed),
            "used" => Ok(Self::Used),
            _ => Err(ParseAgreementStatusError(value.to_owned())),
        }
    }
}

impl FromStr for AgreementStatus {
    type Err = ParseAgreementStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

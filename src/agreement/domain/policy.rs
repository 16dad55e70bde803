//! Configurable lifecycle policies.

use super::ParsePaymentPolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which prior statuses may be confirmed as paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentConfirmationPolicy {
    /// Accept confirmation from any status up to `payment_completed`, so a
    /// payment taken before the request was sent can still be recorded.
    #[default]
    Lenient,
    /// Require the officiant to have requested payment first.
    RequirePaymentRequested,
}

impl PaymentConfirmationPolicy {
    /// Returns the canonical configuration value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::RequirePaymentRequested => "require_payment_requested",
        }
    }
}

impl fmt::Display for PaymentConfirmationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PaymentConfirmationPolicy {
    type Error = ParsePaymentPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "require_payment_requested" | "strict" => Ok(Self::RequirePaymentRequested),
            _ => Err(ParsePaymentPolicyError(value.to_owned())),
        }
    }
}

//! Runtime configuration for the agreement lifecycle.
//!
//! Values are read from `VOWBOOK_*` environment variables. Unset variables
//! fall back to defaults suitable for local development; set but malformed
//! values are rejected.

use crate::agreement::domain::{ParsePaymentPolicyError, PaymentConfirmationPolicy};
use thiserror::Error;

/// Public base URL under which uploaded signatures are served.
pub const PUBLIC_BASE_URL_VAR: &str = "VOWBOOK_PUBLIC_BASE_URL";
/// Sender header for outgoing email.
pub const MAIL_FROM_VAR: &str = "VOWBOOK_MAIL_FROM";
/// Payment confirmation policy name.
pub const PAYMENT_POLICY_VAR: &str = "VOWBOOK_PAYMENT_POLICY";

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_MAIL_FROM: &str = "\"Erie Wedding Officiants\" <no-reply@localhost>";

/// Errors raised while loading [`LifecycleConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but blank.
    #[error("{0} must not be blank")]
    Blank(&'static str),

    /// The base URL is not an absolute `http(s)` URL.
    #[error("{variable} must start with http:// or https://, got '{value}'")]
    InvalidBaseUrl {
        /// Variable name.
        variable: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The payment policy name is unknown.
    #[error("VOWBOOK_PAYMENT_POLICY: {0}")]
    PaymentPolicy(#[from] ParsePaymentPolicyError),
}

/// Settings shared by the lifecycle service and its adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Base URL prefixed to stored signature paths.
    pub public_base_url: String,
    /// Sender header for the "agreement ready" email.
    pub mail_from: String,
    /// Policy applied when confirming payment.
    pub payment_policy: PaymentConfirmationPolicy,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_owned(),
            mail_from: DEFAULT_MAIL_FROM.to_owned(),
            payment_policy: PaymentConfirmationPolicy::default(),
        }
    }
}

impl LifecycleConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let public_base_url = match non_blank(&lookup, PUBLIC_BASE_URL_VAR)? {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_owned()
            }
            Some(url) => {
                return Err(ConfigError::InvalidBaseUrl {
                    variable: PUBLIC_BASE_URL_VAR,
                    value: url,
                });
            }
            None => defaults.public_base_url,
        };

        let mail_from = non_blank(&lookup, MAIL_FROM_VAR)?.unwrap_or(defaults.mail_from);

        let payment_policy = match non_blank(&lookup, PAYMENT_POLICY_VAR)? {
            Some(name) => PaymentConfirmationPolicy::try_from(name.as_str())?,
            None => defaults.payment_policy,
        };

        Ok(Self {
            public_base_url,
            mail_from,
            payment_policy,
        })
    }
}

fn non_blank<L>(lookup: &L, variable: &'static str) -> Result<Option<String>, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Blank(variable)),
        Some(value) => Ok(Some(value.trim().to_owned())),
        None => Ok(None),
    }
}

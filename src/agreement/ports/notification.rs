//! Outbound ports for in-app notifications and email.

use crate::agreement::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification delivery.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// In-app notification delivery contract.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Delivers a notification to its recipient.
    async fn notify(&self, notification: &Notification) -> NotificationResult<()>;
}

/// Errors returned by notification adapters.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The recipient cannot receive notifications.
    #[error("notification recipient {0} is unknown")]
    UnknownRecipient(String),

    /// Delivery failed.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}

/// Rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender header, e.g. `"Erie Wedding Officiants" <hello@example.com>`.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Result type for email delivery.
pub type EmailResult<T> = Result<T, EmailError>;

/// Email delivery contract.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends an email.
    async fn send(&self, message: &EmailMessage) -> EmailResult<()>;
}

/// Errors returned by email adapters.
#[derive(Debug, Clone, Error)]
pub enum EmailError {
    /// The message could not be rendered.
    #[error("email rendering failed: {0}")]
    Render(String),

    /// The transport rejected the message.
    #[error("email transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmailError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

//! Recording notification and email adapters.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::agreement::{
    domain::Notification,
    ports::{
        EmailError, EmailMessage, EmailResult, EmailSender, NotificationError, NotificationResult,
        NotificationSender,
    },
};

/// Notification sender that keeps every delivered notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSender {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotificationSender {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notification delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut sent = self.sent.write().map_err(|err| {
            NotificationError::delivery(std::io::Error::other(err.to_string()))
        })?;
        sent.push(notification.clone());
        Ok(())
    }
}

/// Email sender that keeps every message in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<RwLock<Vec<EmailMessage>>>,
}

impl RecordingEmailSender {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every email sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult<()> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| EmailError::transport(std::io::Error::other(err.to_string())))?;
        sent.push(message.clone());
        Ok(())
    }
}

//! Best-effort dispatch of transition side effects.

use super::email::render_agreement_ready;
use crate::agreement::{
    domain::{AccountId, Agreement, AgreementEffect},
    ports::{AccountDirectory, EmailSender, NotificationSender},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the side effects requested by a committed transition.
///
/// Effects run in order and independently: a failing effect is logged and
/// the remaining effects still run. Nothing here can fail the operation that
/// produced the effects.
#[derive(Clone)]
pub struct AgreementEffectDispatcher {
    notifications: Arc<dyn NotificationSender>,
    email: Arc<dyn EmailSender>,
    accounts: Arc<dyn AccountDirectory>,
    mail_from: String,
}

impl AgreementEffectDispatcher {
    /// Creates a dispatcher over the outbound ports.
    #[must_use]
    pub fn new(
        notifications: Arc<dyn NotificationSender>,
        email: Arc<dyn EmailSender>,
        accounts: Arc<dyn AccountDirectory>,
        mail_from: impl Into<String>,
    ) -> Self {
        Self {
            notifications,
            email,
            accounts,
            mail_from: mail_from.into(),
        }
    }

    /// Dispatches `effects` for `agreement`.
    pub async fn dispatch(&self, agreement: &Agreement, effects: &[AgreementEffect]) {
        for effect in effects {
            self.run(agreement, effect).await;
        }
    }

    async fn run(&self, agreement: &Agreement, effect: &AgreementEffect) {
        let agreement_id = agreement.id();
        match effect {
            AgreementEffect::Notify(notification) => {
                if let Err(error) = self.notifications.notify(notification).await {
                    warn!(
                        %agreement_id,
                        recipient = %notification.recipient,
                        %error,
                        "failed to deliver agreement notification"
                    );
                }
            }
            AgreementEffect::EmailAgreementReady { recipient } => {
                self.email_agreement_ready(agreement, recipient).await;
            }
            AgreementEffect::SetAgreementAccepted { user, accepted } => {
                if let Err(error) = self.accounts.set_agreement_accepted(user, *accepted).await {
                    warn!(
                        %agreement_id,
                        recipient = %user,
                        accepted,
                        %error,
                        "failed to update agreement acceptance flag"
                    );
                }
            }
            AgreementEffect::LinkSchedule { schedule_id, .. } => {
                if let Err(error) = self.accounts.link_schedule(schedule_id, agreement_id).await {
                    warn!(
                        %agreement_id,
                        schedule_id = schedule_id.as_str(),
                        %error,
                        "failed to link schedule entry to agreement"
                    );
                }
            }
        }
    }

    async fn email_agreement_ready(&self, agreement: &Agreement, recipient: &AccountId) {
        let agreement_id = agreement.id();
        let contact = match self.accounts.find_contact(recipient).await {
            Ok(Some(contact)) => contact,
            Ok(None) => {
                debug!(
                    %agreement_id,
                    recipient = %recipient,
                    "no contact address on file; skipping agreement email"
                );
                return;
            }
            Err(error) => {
                warn!(
                    %agreement_id,
                    recipient = %recipient,
                    %error,
                    "failed to look up agreement email recipient"
                );
                return;
            }
        };

        let outcome = match render_agreement_ready(agreement, &contact, &self.mail_from) {
            Ok(message) => self.email.send(&message).await,
            Err(error) => Err(error),
        };
        if let Err(error) = outcome {
            warn!(
                %agreement_id,
                recipient = %recipient,
                %error,
                "failed to send agreement email"
            );
        }
    }
}

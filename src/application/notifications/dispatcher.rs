//! Best-effort mail dispatch
//!
//! Delivery is at-most-once with no retries. When fanning out, one
//! recipient's failure is logged and never affects the others or the
//! operation that triggered the mail.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::templates::RenderedTemplate;
use crate::application::ports::{DeliveryError, MailMessage, MailTransport, MailTransportFactory};
use crate::domain::SmtpSettings;

/// Outcome of a fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

/// A rendered mail addressed to one recipient.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub to: String,
    pub content: RenderedTemplate,
}

pub struct NotificationDispatcher {
    factory: Arc<dyn MailTransportFactory>,
    default_from: String,
}

impl NotificationDispatcher {
    pub fn new(factory: Arc<dyn MailTransportFactory>, default_from: impl Into<String>) -> Self {
        Self {
            factory,
            default_from: default_from.into(),
        }
    }

    fn sender(&self, settings: &SmtpSettings) -> String {
        if settings.from.trim().is_empty() {
            self.default_from.clone()
        } else {
            settings.from.clone()
        }
    }

    fn message(&self, settings: &SmtpSettings, outgoing: &Outgoing) -> MailMessage {
        MailMessage {
            from: self.sender(settings),
            to: outgoing.to.clone(),
            subject: outgoing.content.subject.clone(),
            html: outgoing.content.body.clone(),
        }
    }

    /// Deliver a single message, reporting failure to the caller.
    pub async fn dispatch(
        &self,
        settings: &SmtpSettings,
        outgoing: &Outgoing,
    ) -> Result<(), DeliveryError> {
        let transport = self.factory.create_transport(settings)?;
        transport.send(&self.message(settings, outgoing)).await
    }

    /// Deliver every message independently. Never fails.
    pub async fn dispatch_all(
        &self,
        settings: &SmtpSettings,
        batch: Vec<Outgoing>,
    ) -> DispatchReport {
        if batch.is_empty() {
            return DispatchReport::default();
        }

        let transport = match self.factory.create_transport(settings) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, recipients = batch.len(), "Could not create mail transport");
                return DispatchReport {
                    sent: 0,
                    failed: batch.len(),
                };
            }
        };

        let results = join_all(
            batch
                .iter()
                .map(|outgoing| self.send_one(transport.as_ref(), settings, outgoing)),
        )
        .await;

        let sent = results.iter().filter(|ok| **ok).count();
        DispatchReport {
            sent,
            failed: results.len() - sent,
        }
    }

    async fn send_one(
        &self,
        transport: &dyn MailTransport,
        settings: &SmtpSettings,
        outgoing: &Outgoing,
    ) -> bool {
        match transport.send(&self.message(settings, outgoing)).await {
            Ok(()) => {
                debug!(to = %outgoing.to, subject = %outgoing.content.subject, "Mail delivered");
                true
            }
            Err(e) => {
                warn!(to = %outgoing.to, error = %e, "Mail delivery failed");
                false
            }
        }
    }
}

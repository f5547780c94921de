//! In-memory mail transport for development and testing
//!
//! Records every delivered message instead of sending it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::{DeliveryError, MailMessage, MailTransport, MailTransportFactory};
use crate::domain::SmtpSettings;

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<MailMessage>>,
    failing: HashSet<String>,
    unavailable: bool,
}

/// Factory handing out transports that share one outbox.
#[derive(Clone, Default)]
pub struct RecordingTransportFactory {
    outbox: Arc<Outbox>,
}

impl RecordingTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries to these recipients fail.
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            outbox: Arc::new(Outbox {
                failing: recipients.iter().map(|r| r.to_string()).collect(),
                ..Outbox::default()
            }),
        }
    }

    /// Transport creation itself fails.
    pub fn unavailable() -> Self {
        Self {
            outbox: Arc::new(Outbox {
                unavailable: true,
                ..Outbox::default()
            }),
        }
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.outbox
            .sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MailTransportFactory for RecordingTransportFactory {
    fn create_transport(
        &self,
        _settings: &SmtpSettings,
    ) -> Result<Box<dyn MailTransport>, DeliveryError> {
        if self.outbox.unavailable {
            return Err(DeliveryError("Mail transport unavailable".into()));
        }
        Ok(Box::new(RecordingTransport {
            outbox: self.outbox.clone(),
        }))
    }
}

struct RecordingTransport {
    outbox: Arc<Outbox>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        if self.outbox.failing.contains(&message.to) {
            return Err(DeliveryError(format!("Mailbox unavailable: {}", message.to)));
        }
        self.outbox
            .sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        Ok(())
    }
}

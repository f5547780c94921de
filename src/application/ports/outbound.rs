//! Outbound ports: interfaces for delivering rendered mail
//!
//! [`MailTransportFactory`] decouples the application layer from the
//! concrete mail transport. The production implementation is
//! [`SmtpTransportFactory`](crate::infrastructure::mail::SmtpTransportFactory).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::SmtpSettings;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// A single message could not be delivered.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DeliveryError(pub String);

/// A ready-to-use mail transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError>;
}

/// Builds a transport from the administered SMTP settings.
pub trait MailTransportFactory: Send + Sync {
    fn create_transport(&self, settings: &SmtpSettings)
        -> Result<Box<dyn MailTransport>, DeliveryError>;
}

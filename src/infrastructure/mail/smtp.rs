//! SMTP mail transport backed by lettre

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::info;

use crate::application::ports::{DeliveryError, MailMessage, MailTransport, MailTransportFactory};
use crate::domain::SmtpSettings;

/// Builds [`SmtpTransport`]s from the administered SMTP settings.
#[derive(Debug, Clone, Default)]
pub struct SmtpTransportFactory;

impl SmtpTransportFactory {
    pub fn new() -> Self {
        Self
    }
}

impl MailTransportFactory for SmtpTransportFactory {
    fn create_transport(
        &self,
        settings: &SmtpSettings,
    ) -> Result<Box<dyn MailTransport>, DeliveryError> {
        Ok(Box::new(SmtpTransport::new(settings)?))
    }
}

pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn new(settings: &SmtpSettings) -> Result<Self, DeliveryError> {
        let tls = TlsParameters::new(settings.host.clone())
            .map_err(|e| DeliveryError(format!("TLS setup failed: {}", e)))?;
        let tls = if settings.secure {
            Tls::Wrapper(tls)
        } else {
            Tls::Opportunistic(tls)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .tls(tls);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|_| DeliveryError(format!("Invalid email address: {}", address)))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        let email = Message::builder()
            .from(mailbox(&message.from)?)
            .to(mailbox(&message.to)?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| DeliveryError(format!("Failed to build message: {}", e)))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| DeliveryError(format!("SMTP error: {}", e)))?;

        info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

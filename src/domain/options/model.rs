//! Global options singleton

use secrecy::SecretString;

/// Outbound mail transport settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (SMTPS). When false, STARTTLS is attempted.
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    /// Sender address; falls back to the configured default when empty.
    pub from: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            secure: false,
            username: None,
            password: None,
            from: String::new(),
        }
    }
}

/// Externally administered configuration record. Read once per operation.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub enable_registration: bool,
    pub user_registration_notification: bool,
    /// Custom notification template (JSON with `subject` and `body`).
    pub notification_template: Option<String>,
    /// Custom forgot-password template (JSON with `subject` and `body`).
    pub forgot_password_template: Option<String>,
    pub smtp: SmtpSettings,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            enable_registration: true,
            user_registration_notification: false,
            notification_template: None,
            forgot_password_template: None,
            smtp: SmtpSettings::default(),
        }
    }
}

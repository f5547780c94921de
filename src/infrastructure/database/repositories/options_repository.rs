use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::domain::{DomainResult, GlobalOptions, GlobalOptionsRepository, SmtpSettings};
use crate::infrastructure::database::entities::global_options::{self, SINGLETON_ID};
use crate::support::InfraError;

pub struct OptionsRepository {
    db: DatabaseConnection,
}

impl OptionsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn smtp_port(stored: i32) -> u16 {
    u16::try_from(stored).unwrap_or_else(|_| {
        let fallback = SmtpSettings::default().port;
        warn!(stored, fallback, "SMTP port out of range, using default");
        fallback
    })
}

fn options_model_to_domain(model: global_options::Model) -> GlobalOptions {
    GlobalOptions {
        enable_registration: model.enable_registration,
        user_registration_notification: model.user_registration_notification,
        notification_template: model.notification_template,
        forgot_password_template: model.forgot_password_template,
        smtp: SmtpSettings {
            host: model.smtp_host,
            port: smtp_port(model.smtp_port),
            secure: model.smtp_secure,
            username: model.smtp_username,
            password: model.smtp_password.map(SecretString::from),
            from: model.smtp_from,
        },
    }
}

#[async_trait]
impl GlobalOptionsRepository for OptionsRepository {
    async fn get_options(&self) -> DomainResult<GlobalOptions> {
        let model = global_options::Entity::find_by_id(SINGLETON_ID)
            .one(&self.db)
            .await
            .map_err(InfraError::from)?;

        match model {
            Some(model) => Ok(options_model_to_domain(model)),
            None => {
                debug!("No global options row, using defaults");
                Ok(GlobalOptions::default())
            }
        }
    }
}

//! Global options entity (single row, id = 1)

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

pub const SINGLETON_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "global_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub enable_registration: bool,
    pub user_registration_notification: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notification_template: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub forgot_password_template: Option<String>,
    pub smtp_host: String,
    pub smtp_port: i32,
    pub smtp_secure: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

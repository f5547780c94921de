//! Create global_options table migration and seed the singleton row

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GlobalOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GlobalOptions::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GlobalOptions::EnableRegistration)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GlobalOptions::UserRegistrationNotification)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(GlobalOptions::NotificationTemplate).text().null())
                    .col(ColumnDef::new(GlobalOptions::ForgotPasswordTemplate).text().null())
                    .col(
                        ColumnDef::new(GlobalOptions::SmtpHost)
                            .string_len(255)
                            .not_null()
                            .default("localhost"),
                    )
                    .col(
                        ColumnDef::new(GlobalOptions::SmtpPort)
                            .integer()
                            .not_null()
                            .default(25),
                    )
                    .col(
                        ColumnDef::new(GlobalOptions::SmtpSecure)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(GlobalOptions::SmtpUsername).string_len(255).null())
                    .col(ColumnDef::new(GlobalOptions::SmtpPassword).string_len(255).null())
                    .col(
                        ColumnDef::new(GlobalOptions::SmtpFrom)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(GlobalOptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(GlobalOptions::Table)
            .columns([GlobalOptions::Id, GlobalOptions::UpdatedAt])
            .values([1.into(), chrono::Utc::now().into()])
            .map_err(|e| DbErr::Custom(e.to_string()))?
            .to_owned();
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GlobalOptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum GlobalOptions {
    Table,
    Id,
    EnableRegistration,
    UserRegistrationNotification,
    NotificationTemplate,
    ForgotPasswordTemplate,
    SmtpHost,
    SmtpPort,
    SmtpSecure,
    SmtpUsername,
    SmtpPassword,
    SmtpFrom,
    UpdatedAt,
}

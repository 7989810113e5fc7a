//! Create the `users` table.
//!
//! Single table owning identity, credentials and the one-time codes; the
//! password column only ever holds a salted hash.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::Name, 128).not_null())
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(string_len(Users::Password, 255).not_null())
                    .col(string_len(Users::Status, 16).not_null())
                    .col(string_len(Users::Role, 16).not_null())
                    // One-time codes are nullable on purpose: null means
                    // "no code outstanding / already consumed"
                    .col(ColumnDef::new(Users::RecuperationCode).string_len(8).null())
                    .col(ColumnDef::new(Users::VerificationCode).string_len(8).null())
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Users::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Password,
    Status,
    Role,
    RecuperationCode,
    VerificationCode,
    CreatedAt,
    UpdatedAt,
}

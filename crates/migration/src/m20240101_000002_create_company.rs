//! Create `company` table with FK to `country`.
//!
//! Timestamps are stored as epoch seconds.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_auto(Company::Id))
                    .col(string_len(Company::Name, 255).not_null())
                    .col(integer(Company::Code).not_null())
                    .col(integer(Company::CountryId).not_null())
                    .col(string_len(Company::Website, 512).not_null())
                    .col(string_len(Company::Phone, 32).not_null())
                    .col(big_integer(Company::CreatedAt).not_null())
                    .col(big_integer(Company::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_country")
                            .from(Company::Table, Company::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Company::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Company { Table, Id, Name, Code, CountryId, Website, Phone, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Country { Table, Id }

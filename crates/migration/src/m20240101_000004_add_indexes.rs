use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Company: index on country_id
        manager
            .create_index(
                Index::create()
                    .name("idx_company_country")
                    .table(Company::Table)
                    .col(Company::CountryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_company_country").table(Company::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Company { Table, CountryId }

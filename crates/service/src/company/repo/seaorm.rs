use models::company::Fields;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use crate::company::domain::{Company, Country};
use crate::company::repository::CompanyRepository;

pub struct SeaOrmCompanyRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn create_company(&self, fields: Fields) -> Result<Company, ModelError> {
        Ok(models::company::create(&self.db, fields).await?.into())
    }

    async fn find_company(&self, id: i32) -> Result<Option<Company>, ModelError> {
        Ok(models::company::find(&self.db, id).await?.map(Company::from))
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ModelError> {
        let rows = models::company::list(&self.db).await?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn update_company(&self, id: i32, fields: Fields) -> Result<Company, ModelError> {
        Ok(models::company::update(&self.db, id, fields).await?.into())
    }

    async fn delete_company(&self, id: i32) -> Result<bool, ModelError> {
        models::company::delete(&self.db, id).await
    }

    async fn find_or_create_country(&self, name: &str) -> Result<Country, ModelError> {
        Ok(models::country::find_or_create(&self.db, name).await?.into())
    }
}

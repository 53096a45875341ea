use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{Company, CompanyUpdate, NewCompany};
use super::repository::CompanyRepository;
use crate::errors::ServiceError;

/// Company and country lifecycle on top of a [`CompanyRepository`].
pub struct CompanyService<R: CompanyRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CompanyRepository + ?Sized> CompanyService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Find-or-create a country by name and return its id.
    #[instrument(skip(self))]
    pub async fn resolve_country(&self, name: &str) -> Result<i32, ServiceError> {
        let name = name.trim();
        models::country::validate_name(name)
            .map_err(|e| ServiceError::from_model(e, ServiceError::CountryPersistenceFailure))?;
        let country = self
            .repo
            .find_or_create_country(name)
            .await
            .map_err(|e| ServiceError::from_model(e, ServiceError::CountryPersistenceFailure))?;
        debug!(country_id = country.id, "country resolved");
        Ok(country.id)
    }

    /// Store a company under an already resolved country and return its id.
    ///
    /// # Examples
    /// ```
    /// use service::company::{CompanyService, domain::NewCompany, repository::mock::MockCompanyRepository};
    /// use std::sync::Arc;
    /// let svc = CompanyService::new(Arc::new(MockCompanyRepository::default()));
    /// let input = NewCompany {
    ///     name: "Acme".into(), code: 12345, country: "Cyprus".into(),
    ///     website: "https://acme.example".into(), phone: "+35799123456".into(),
    /// };
    /// let country_id = tokio_test::block_on(svc.resolve_country(&input.country)).unwrap();
    /// let id = tokio_test::block_on(svc.create_company(&input, country_id)).unwrap();
    /// assert_eq!(tokio_test::block_on(svc.get_company(id)).unwrap().name, "Acme");
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_company(&self, input: &NewCompany, country_id: i32) -> Result<i32, ServiceError> {
        let fields = input.fields(country_id);
        fields.validate().map_err(|e| ServiceError::from_model(e, ServiceError::CompanyPersistenceFailure))?;
        let company = self
            .repo
            .create_company(fields)
            .await
            .map_err(|e| ServiceError::from_model(e, ServiceError::CompanyPersistenceFailure))?;
        info!(company_id = company.id, "company_created");
        Ok(company.id)
    }

    pub async fn get_company(&self, id: i32) -> Result<Company, ServiceError> {
        self.repo
            .find_company(id)
            .await
            .map_err(|e| ServiceError::from_model(e, ServiceError::CompanyPersistenceFailure))?
            .ok_or_else(|| ServiceError::not_found("company"))
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, ServiceError> {
        self.repo
            .list_companies()
            .await
            .map_err(|e| ServiceError::from_model(e, ServiceError::CompanyPersistenceFailure))
    }

    #[instrument(skip(self, input), fields(company_id = id))]
    pub async fn update_company(&self, id: i32, input: &CompanyUpdate) -> Result<Company, ServiceError> {
        let fields = input.fields();
        fields.validate().map_err(|e| ServiceError::from_model(e, ServiceError::CompanyPersistenceFailure))?;
        let company = self.repo.update_company(id, fields).await.map_err(|e| match e {
            models::errors::ModelError::NotFound(_) => ServiceError::not_found("company"),
            other => ServiceError::from_model(other, ServiceError::CompanyPersistenceFailure),
        })?;
        info!("company_updated");
        Ok(company)
    }

    #[instrument(skip(self), fields(company_id = id))]
    pub async fn delete_company(&self, id: i32) -> Result<(), ServiceError> {
        let removed = self
            .repo
            .delete_company(id)
            .await
            .map_err(|e| ServiceError::from_model(e, ServiceError::CompanyPersistenceFailure))?;
        if !removed {
            return Err(ServiceError::not_found("company"));
        }
        info!("company_deleted");
        Ok(())
    }
}

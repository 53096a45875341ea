use async_trait::async_trait;
use models::company::Fields;
use models::errors::ModelError;

use super::domain::{Company, Country};

/// Repository abstraction for companies and the countries they reference.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create_company(&self, fields: Fields) -> Result<Company, ModelError>;
    async fn find_company(&self, id: i32) -> Result<Option<Company>, ModelError>;
    async fn list_companies(&self) -> Result<Vec<Company>, ModelError>;
    /// Overwrites every field; a missing row is `ModelError::NotFound`.
    async fn update_company(&self, id: i32, fields: Fields) -> Result<Company, ModelError>;
    /// Returns whether a row was removed.
    async fn delete_company(&self, id: i32) -> Result<bool, ModelError>;
    /// Look a country up by name, creating it on first use. At most one row
    /// exists per name even under concurrent first-time calls.
    async fn find_or_create_country(&self, name: &str) -> Result<Country, ModelError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        companies: BTreeMap<i32, Company>,
        countries: HashMap<String, Country>, // key: name
        next_company: i32,
        next_country: i32,
    }

    #[derive(Default)]
    pub struct MockCompanyRepository {
        state: Mutex<State>,
        failing: bool,
    }

    impl MockCompanyRepository {
        /// A repository whose every call fails like an unreachable database.
        pub fn failing() -> Self { Self { failing: true, ..Self::default() } }

        pub fn country_count(&self) -> usize { self.state.lock().unwrap().countries.len() }

        fn check(&self) -> Result<(), ModelError> {
            if self.failing {
                return Err(ModelError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    fn now() -> i64 { chrono::Utc::now().timestamp() }

    #[async_trait]
    impl CompanyRepository for MockCompanyRepository {
        async fn create_company(&self, fields: Fields) -> Result<Company, ModelError> {
            self.check()?;
            let mut st = self.state.lock().unwrap();
            st.next_company += 1;
            let ts = now();
            let company = Company {
                id: st.next_company,
                name: fields.name,
                code: fields.code,
                country_id: fields.country_id,
                website: fields.website,
                phone: fields.phone,
                created_at: ts,
                updated_at: ts,
            };
            st.companies.insert(company.id, company.clone());
            Ok(company)
        }

        async fn find_company(&self, id: i32) -> Result<Option<Company>, ModelError> {
            self.check()?;
            Ok(self.state.lock().unwrap().companies.get(&id).cloned())
        }

        async fn list_companies(&self) -> Result<Vec<Company>, ModelError> {
            self.check()?;
            Ok(self.state.lock().unwrap().companies.values().cloned().collect())
        }

        async fn update_company(&self, id: i32, fields: Fields) -> Result<Company, ModelError> {
            self.check()?;
            let mut st = self.state.lock().unwrap();
            let c = st.companies.get_mut(&id).ok_or_else(|| ModelError::NotFound(format!("company {id}")))?;
            c.name = fields.name;
            c.code = fields.code;
            c.country_id = fields.country_id;
            c.website = fields.website;
            c.phone = fields.phone;
            c.updated_at = now();
            Ok(c.clone())
        }

        async fn delete_company(&self, id: i32) -> Result<bool, ModelError> {
            self.check()?;
            Ok(self.state.lock().unwrap().companies.remove(&id).is_some())
        }

        async fn find_or_create_country(&self, name: &str) -> Result<Country, ModelError> {
            self.check()?;
            let mut st = self.state.lock().unwrap();
            if let Some(c) = st.countries.get(name) {
                return Ok(c.clone());
            }
            st.next_country += 1;
            let c = Country { id: st.next_country, name: name.to_string() };
            st.countries.insert(name.to_string(), c.clone());
            Ok(c)
        }
    }
}

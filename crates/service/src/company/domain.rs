use models::company::Fields;
use serde::{Deserialize, Serialize};

/// Stored company (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub code: i32,
    pub country_id: i32,
    pub website: String,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<models::company::Model> for Company {
    fn from(m: models::company::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
            country_id: m.country_id,
            website: m.website,
            phone: m.phone,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i32,
    pub name: String,
}

impl From<models::country::Model> for Country {
    fn from(m: models::country::Model) -> Self { Self { id: m.id, name: m.name } }
}

/// Create request; the country is given by name and resolved to an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub code: i32,
    pub country: String,
    pub website: String,
    pub phone: String,
}

impl NewCompany {
    pub fn fields(&self, country_id: i32) -> Fields {
        Fields {
            name: self.name.trim().to_string(),
            code: self.code,
            country_id,
            website: self.website.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

/// Full-field update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: String,
    pub code: i32,
    pub country_id: i32,
    pub website: String,
    pub phone: String,
}

impl CompanyUpdate {
    pub fn fields(&self) -> Fields {
        Fields {
            name: self.name.trim().to_string(),
            code: self.code,
            country_id: self.country_id,
            website: self.website.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

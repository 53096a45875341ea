use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, NotSet, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{country, errors::ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: i32,
    pub country_id: i32,
    pub website: String,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Country }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Country => Entity::belongs_to(country::Entity)
                .from(Column::CountryId)
                .to(country::Column::Id)
                .into(),
        }
    }
}

impl Related<country::Entity> for Entity {
    fn to() -> RelationDef { Relation::Country.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values written on create and on full-field update.
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    pub name: String,
    pub code: i32,
    pub country_id: i32,
    pub website: String,
    pub phone: String,
}

// column widths from the company migration
const NAME_MAX: usize = 255;
const WEBSITE_MAX: usize = 512;
const PHONE_MAX: usize = 32;

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(ModelError::Validation(format!("name too long (<={NAME_MAX})")));
    }
    Ok(())
}

pub fn validate_code(code: i32) -> Result<(), ModelError> {
    if code <= 0 {
        return Err(ModelError::Validation("code must be a positive number".into()));
    }
    Ok(())
}

pub fn validate_website(url: &str) -> Result<(), ModelError> {
    if url.chars().count() > WEBSITE_MAX {
        return Err(ModelError::Validation(format!("website too long (<={WEBSITE_MAX})")));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ModelError::Validation("website must start with http(s)".into()))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(ModelError::Validation("website must contain a host".into()));
    }
    Ok(())
}

/// E.164: `+`, then 2..=15 digits, the first non-zero.
pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if phone.len() > PHONE_MAX {
        return Err(ModelError::Validation("phone must be in E.164 format".into()));
    }
    let digits = phone
        .strip_prefix('+')
        .ok_or_else(|| ModelError::Validation("phone must be in E.164 format".into()))?;
    let valid = (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0');
    if !valid {
        return Err(ModelError::Validation("phone must be in E.164 format".into()));
    }
    Ok(())
}

pub fn validate_country_id(id: i32) -> Result<(), ModelError> {
    if id <= 0 {
        return Err(ModelError::Validation("country_id must be positive".into()));
    }
    Ok(())
}

impl Fields {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        validate_code(self.code)?;
        validate_country_id(self.country_id)?;
        validate_website(&self.website)?;
        validate_phone(&self.phone)?;
        Ok(())
    }
}

pub async fn create(db: &DatabaseConnection, fields: Fields) -> Result<Model, ModelError> {
    fields.validate()?;
    let now = Utc::now().timestamp();
    let am = ActiveModel {
        id: NotSet,
        name: Set(fields.name),
        code: Set(fields.code),
        country_id: Set(fields.country_id),
        website: Set(fields.website),
        phone: Set(fields.phone),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(ModelError::from_db)
}

/// Overwrite every mutable column and bump `updated_at`.
pub async fn update(db: &DatabaseConnection, id: i32, fields: Fields) -> Result<Model, ModelError> {
    fields.validate()?;
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::NotFound(format!("company {id}")))?
        .into();
    found.name = Set(fields.name);
    found.code = Set(fields.code);
    found.country_id = Set(fields.country_id);
    found.website = Set(fields.website);
    found.phone = Set(fields.phone);
    found.updated_at = Set(Utc::now().timestamp());
    found.update(db).await.map_err(ModelError::from_db)
}

/// Returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(res.rows_affected > 0)
}

use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    if name.len() > 128 { return Err(ModelError::Validation("name too long (<=128)".into())); }
    Ok(())
}

/// Insert a user; a taken name surfaces as `ModelError::Conflict`.
pub async fn create(db: &DatabaseConnection, name: &str, password_hash: String) -> Result<Model, ModelError> {
    validate_name(name)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        password_hash: Set(password_hash),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

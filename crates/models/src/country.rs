use sea_orm::entity::prelude::*;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::{company, errors::ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "country")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Company }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::has_many(company::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

const NAME_MAX: usize = 128;

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("country required".into()));
    }
    if !trimmed.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(ModelError::Validation("country must contain letters only".into()));
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(ModelError::Validation(format!("country too long (<={NAME_MAX})")));
    }
    Ok(())
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

/// Find a country by name, inserting it when absent.
///
/// The insert is `ON CONFLICT (name) DO NOTHING`, so a concurrent caller that
/// wins the race leaves us re-reading its row instead of creating a second one.
pub async fn find_or_create(db: &DatabaseConnection, name: &str) -> Result<Model, ModelError> {
    validate_name(name)?;
    let name = name.trim();
    if let Some(found) = find_by_name(db, name).await? {
        return Ok(found);
    }

    let am = ActiveModel { id: NotSet, name: Set(name.to_string()) };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Name).do_nothing().to_owned())
        .exec(db)
        .await;
    match inserted {
        Ok(res) => Ok(Model { id: res.last_insert_id, name: name.to_string() }),
        Err(DbErr::RecordNotInserted) => find_by_name(db, name)
            .await?
            .ok_or_else(|| ModelError::Db(format!("country '{name}' missing after conflicting insert"))),
        Err(e) => Err(ModelError::from_db(e)),
    }
}

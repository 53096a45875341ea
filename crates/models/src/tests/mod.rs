//! Database-backed entity tests. Skipped when `SKIP_DB_TESTS` is set or no
//! `DATABASE_URL` is configured.
use crate::db::connect_with_config;
use crate::errors::ModelError;
use crate::{company, country, user};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(url) = std::env::var("DATABASE_URL") else { return Ok(None) };
    let cfg = configs::DatabaseConfig { url, ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

fn unique_country() -> String {
    // country names are letters only
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .map(|c| if c.is_ascii_digit() { (b'a' + (c as u8 - b'0')) as char } else { c })
        .collect();
    format!("Testland {suffix}")
}

#[tokio::test]
async fn country_find_or_create_is_idempotent() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let name = unique_country();
    let first = country::find_or_create(&db, &name).await?;
    let second = country::find_or_create(&db, &name).await?;
    assert_eq!(first.id, second.id);

    country::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn concurrent_find_or_create_yields_one_row() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let name = unique_country();
    let (a, b) = tokio::join!(country::find_or_create(&db, &name), country::find_or_create(&db, &name));
    let (a, b) = (a?, b?);
    assert_eq!(a.id, b.id);

    let rows = country::Entity::find().filter(country::Column::Name.eq(name.clone())).count(&db).await?;
    assert_eq!(rows, 1);

    country::Entity::delete_by_id(a.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn company_crud_roundtrip() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let c = country::find_or_create(&db, &unique_country()).await?;
    let fields = company::Fields {
        name: "Acme".into(),
        code: 12345,
        country_id: c.id,
        website: "https://acme.example".into(),
        phone: "+35799123456".into(),
    };
    let created = company::create(&db, fields.clone()).await?;
    let found = company::find(&db, created.id).await?.expect("company exists");
    assert_eq!(found, created);

    let mut changed = fields.clone();
    changed.name = "Acme Holdings".into();
    let updated = company::update(&db, created.id, changed).await?;
    assert_eq!(updated.name, "Acme Holdings");
    assert!(updated.updated_at >= created.updated_at);

    assert!(company::delete(&db, created.id).await?);
    assert!(!company::delete(&db, created.id).await?);
    assert!(matches!(company::update(&db, created.id, fields).await, Err(ModelError::NotFound(_))));

    country::Entity::delete_by_id(c.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_user_name_is_conflict() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let name = format!("user_{}", Uuid::new_v4());
    let u = user::create(&db, &name, "$argon2id$fake".into()).await?;
    let dup = user::create(&db, &name, "$argon2id$fake".into()).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    assert_eq!(user::find_by_name(&db, &name).await?.map(|m| m.id), Some(u.id));

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

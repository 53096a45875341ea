use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use crate::auth::domain::User;
use crate::auth::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, name: &str, password_hash: String) -> Result<User, ModelError> {
        let created = models::user::create(&self.db, name, password_hash).await?;
        Ok(created.into())
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, ModelError> {
        let found = models::user::find_by_name(&self.db, name).await?;
        Ok(found.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn stores_and_finds_user() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmUserRepository { db };
        let name = format!("repo-user-{}", uuid::Uuid::new_v4());

        let created = repo.create_user(&name, "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".into()).await?;
        let found = repo.find_user_by_name(&name).await?.expect("user stored");
        assert_eq!(found, created);
        assert!(repo.find_user_by_name("no-such-user-name").await?.is_none());

        let dup = repo.create_user(&name, "$argon2id$x".into()).await;
        assert!(matches!(dup, Err(ModelError::Conflict(_))));
        Ok(())
    }
}

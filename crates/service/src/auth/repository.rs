use async_trait::async_trait;
use models::errors::ModelError;

use super::domain::User;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user under a fresh id; a taken name is `ModelError::Conflict`.
    async fn create_user(&self, name: &str, password_hash: String) -> Result<User, ModelError>;
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, ModelError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<String, User>>, // key: name
        failing: bool,
    }

    impl MockUserRepository {
        /// A repository whose every call fails like an unreachable database.
        pub fn failing() -> Self { Self { failing: true, ..Self::default() } }

        fn check(&self) -> Result<(), ModelError> {
            if self.failing {
                return Err(ModelError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create_user(&self, name: &str, password_hash: String) -> Result<User, ModelError> {
            self.check()?;
            let mut users = self.users.lock().unwrap();
            if users.contains_key(name) {
                return Err(ModelError::Conflict(format!("user '{name}' exists")));
            }
            let user = User { id: Uuid::new_v4(), name: name.to_string(), password_hash };
            users.insert(name.to_string(), user.clone());
            Ok(user)
        }

        async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, ModelError> {
            self.check()?;
            let users = self.users.lock().unwrap();
            Ok(users.get(name).cloned())
        }
    }
}

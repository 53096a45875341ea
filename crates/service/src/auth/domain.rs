use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Register/login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

/// Domain user. The hash is a PHC string and is never serialized outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self { id: m.id, name: m.name, password_hash: m.password_hash }
    }
}

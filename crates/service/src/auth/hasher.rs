//! One-way password hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so verification reads the cost parameters back out of the stored value and
//! keeps working after the defaults change.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use rand::rngs::OsRng;

use super::errors::HashError;

#[derive(Clone, Default)]
pub struct CredentialHasher {
    params: Option<Params>,
}

impl CredentialHasher {
    pub fn new() -> Self { Self::default() }

    /// Use explicit cost parameters instead of the library defaults.
    pub fn with_params(params: Params) -> Self { Self { params: Some(params) } }

    fn argon2(&self) -> Argon2<'static> {
        match &self.params {
            Some(p) => Argon2::new(Algorithm::Argon2id, Version::V0x13, p.clone()),
            None => Argon2::default(),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        if password.is_empty() {
            return Err(HashError::EmptyInput);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// False on mismatch and on a hash that does not parse.
    pub fn verify(&self, hash: &str, password: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self.argon2().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> CredentialHasher {
    CredentialHasher::with_params(Params::new(1024, 1, 1, None).unwrap())
}

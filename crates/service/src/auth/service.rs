use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::User;
use super::errors::{AuthError, HashError};
use super::hasher::CredentialHasher;
use super::repository::UserRepository;
use super::token::TokenManager;
use crate::errors::ServiceError;

/// Registration, login and the bearer-token gate, independent of web framework
pub struct AuthService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    hasher: CredentialHasher,
    tokens: Arc<TokenManager>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: CredentialHasher, tokens: Arc<TokenManager>) -> Self {
        Self { repo, hasher, tokens }
    }

    /// Register a new user with a hashed password and return its id.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, CredentialHasher, TokenManager, repository::mock::MockUserRepository};
    /// use std::{sync::Arc, time::Duration};
    /// let tokens = Arc::new(TokenManager::new(Some("secret"), Duration::from_secs(60)).unwrap());
    /// let svc = AuthService::new(Arc::new(MockUserRepository::default()), CredentialHasher::new(), tokens);
    /// let id = tokio_test::block_on(svc.register("bill", "password")).unwrap();
    /// assert_eq!(id.get_version_num(), 4);
    /// ```
    #[instrument(skip_all, fields(name = %name))]
    pub async fn register(&self, name: &str, password: &str) -> Result<Uuid, ServiceError> {
        models::user::validate_name(name).map_err(|e| ServiceError::from_model(e, ServiceError::PersistenceFailure))?;
        let hash = self.hash_password(password).await.map_err(AuthError::WeakOrEmptyCredential)?;

        let user = self.repo.create_user(name, hash).await.map_err(|e| {
            let err = ServiceError::from_model(e, ServiceError::PersistenceFailure);
            if matches!(err, ServiceError::Conflict(_)) {
                debug!("user name taken");
                return ServiceError::Conflict("user already exists".into());
            }
            err
        })?;
        info!(user_id = %user.id, "user_registered");
        Ok(user.id)
    }

    /// Authenticate a user by name and password. Issuing a token is a
    /// separate step, see [`AuthService::issue_token`].
    #[instrument(skip_all, fields(name = %name))]
    pub async fn login(&self, name: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .repo
            .find_user_by_name(name)
            .await
            .map_err(ServiceError::PersistenceFailure)?
            .ok_or_else(|| {
                debug!("login rejected: unknown user");
                AuthError::UserNotFound
            })?;

        if !self.verify_password(&user.password_hash, password).await {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }
        info!(user_id = %user.id, "user_logged_in");
        Ok(user)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        self.tokens.issue(&user.id.to_string()).map_err(|e| {
            warn!(error = %e, "token issuance failed");
            ServiceError::TokenIssue(e)
        })
    }

    pub fn token_ttl(&self) -> Duration { self.tokens.ttl() }

    /// Validate an `Authorization` header value of the form `Bearer <token>`
    /// and return the authenticated user id.
    pub fn check_auth(&self, header_value: &str) -> Result<String, AuthError> {
        let mut parts = header_value.split_whitespace();
        let scheme = parts.next();
        let token = match parts.next() {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::EmptyToken),
        };
        let bearer = scheme.is_some_and(|s| s.eq_ignore_ascii_case("bearer"));
        if !bearer || parts.next().is_some() {
            return Err(AuthError::InvalidToken(super::errors::TokenError::MalformedToken(
                "expected 'Bearer <token>'".into(),
            )));
        }
        self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::InvalidToken(e)
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        if password.is_empty() {
            return Err(HashError::EmptyInput);
        }
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, hash: &str, password: &str) -> bool {
        let hasher = self.hasher.clone();
        let (hash, password) = (hash.to_string(), password.to_string());
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .unwrap_or(false)
    }
}

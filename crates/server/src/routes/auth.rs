use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::HeaderName, HeaderMap, HeaderValue},
    Json,
};
use chrono::{SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use service::auth::{
    domain::Credentials, repository::UserRepository, AuthService, CredentialHasher, TokenManager,
};
use service::auth::errors::TokenError;
use service::company::{repository::CompanyRepository, CompanyService};
use service::errors::ServiceError;
use service::origin::OriginPolicy;

use crate::errors::JsonApiError;
use crate::metrics::{AUTH_GATE_TOTAL, LOGIN_TOTAL};

pub const X_EXPIRES_AFTER: HeaderName = HeaderName::from_static("x-expires-after");

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
    pub companies: Arc<CompanyService<dyn CompanyRepository>>,
    pub origin: Arc<dyn OriginPolicy>,
}

impl ServerState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        companies: Arc<dyn CompanyRepository>,
        tokens: Arc<TokenManager>,
        hasher: CredentialHasher,
        origin: Arc<dyn OriginPolicy>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, hasher, tokens)),
            companies: Arc::new(CompanyService::new(companies)),
            origin,
        }
    }

    /// Run the bearer gate on the request headers and return the caller's user id.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<String, JsonApiError> {
        let value = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        match self.auth.check_auth(value) {
            Ok(user_id) => {
                AUTH_GATE_TOTAL.with_label_values(&["accepted"]).inc();
                Ok(user_id)
            }
            Err(e) => {
                AUTH_GATE_TOTAL.with_label_values(&["rejected"]).inc();
                Err(e.into())
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterOutput { pub id: Uuid, pub name: String }

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginOutput { pub token: String, pub user_id: Uuid, pub expires_at: i64 }

#[utoipa::path(post, path = "/v1/users", tag = "auth", request_body = crate::openapi::CredentialsDoc, responses((status = 200, description = "Registered", body = crate::openapi::RegisterOutputDoc), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<RegisterOutput>, JsonApiError> {
    let Json(input) = body?;
    let id = state.auth.register(&input.name, &input.password).await?;
    Ok(Json(RegisterOutput { id, name: input.name }))
}

#[utoipa::path(post, path = "/v1/users/login", tag = "auth", request_body = crate::openapi::CredentialsDoc, responses((status = 200, description = "Logged In", body = crate::openapi::LoginOutputDoc, headers(("X-Expires-After" = String, description = "RFC 3339 expiry of the token"))), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(HeaderMap, Json<LoginOutput>), JsonApiError> {
    let Json(input) = body?;
    let user = match state.auth.login(&input.name, &input.password).await {
        Ok(user) => user,
        Err(e) => {
            LOGIN_TOTAL.with_label_values(&["rejected"]).inc();
            return Err(e.into());
        }
    };
    let token = state.auth.issue_token(&user)?;

    let expires = i64::try_from(state.auth.token_ttl().as_secs())
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| ServiceError::TokenIssue(TokenError::SigningFailure("token lifetime out of range".into())))?;
    LOGIN_TOTAL.with_label_values(&["accepted"]).inc();

    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(&expires.to_rfc3339_opts(SecondsFormat::Secs, true)) {
        headers.insert(X_EXPIRES_AFTER, v);
    }
    info!(user_id = %user.id, "login ok");
    Ok((headers, Json(LoginOutput { token, user_id: user.id, expires_at: expires.timestamp() })))
}

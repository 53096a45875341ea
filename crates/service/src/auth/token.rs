//! Signed access tokens.
//!
//! Compact HS256 JWTs carrying `{user_id, iss_at, exp}`. The signing secret
//! and the TTL are fixed when the manager is built.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use super::errors::TokenError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub iss_at: i64,
    pub exp: i64,
}

pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenManager {
    /// Fails with `MissingSigningKey` when no secret, or an empty one, is given.
    pub fn new(secret: Option<&str>, ttl: Duration) -> Result<Self, TokenError> {
        let secret = secret.filter(|s| !s.is_empty()).ok_or(TokenError::MissingSigningKey)?;
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked in verify_at against an explicit clock, without leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: &str, now: i64) -> Result<String, TokenError> {
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| TokenError::SigningFailure("token lifetime out of range".into()))?;
        let claims = Claims { user_id: user_id.to_string(), iss_at: now, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::SigningFailure(e.to_string()))
    }

    /// Returns the `user_id` claim of a valid token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<String, TokenError> {
        ensure_hs256(token)?;
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(classify)?;
        let claims = data.claims;
        if claims.user_id.trim().is_empty() {
            return Err(TokenError::MalformedToken("user_id claim is empty".into()));
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims.user_id)
    }
}

/// Any header that does not name HS256, including `none` and names the
/// library does not know, is an algorithm mismatch.
fn ensure_hs256(token: &str) -> Result<(), TokenError> {
    let raw = token
        .split('.')
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| TokenError::MalformedToken("missing header".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(raw.trim_end_matches('='))
        .map_err(|e| TokenError::MalformedToken(e.to_string()))?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|e| TokenError::MalformedToken(e.to_string()))?;
    match header.alg.as_deref() {
        Some("HS256") => Ok(()),
        _ => Err(TokenError::InvalidSignature),
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
            TokenError::InvalidSignature
        }
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::MalformedToken(err.to_string()),
    }
}

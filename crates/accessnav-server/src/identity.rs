//! Caller identity for user-scoped endpoints.
//!
//! Without a `JWT_SECRET` every request acts as one fixed development user.
//! With a secret, requests must carry `Authorization: Bearer <jwt>` signed
//! with HS256; the `sub` claim is the user id.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization required")]
    MissingToken,
    #[error("Invalid Authorization header format")]
    MalformedHeader,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Resolves the user a request acts on behalf of.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self, headers: &HeaderMap) -> Result<String, AuthError>;
}

/// Every caller is the same user.
pub struct StaticIdentity {
    user_id: String,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self, _headers: &HeaderMap) -> Result<String, AuthError> {
        Ok(self.user_id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// HS256 bearer tokens; `exp` is enforced when present.
pub struct JwtIdentity {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl IdentityProvider for JwtIdentity {
    fn current_user_id(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let token = bearer_token(headers)?;
        let data = decode::<Claims>(&token, &self.key, &self.validation)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;
        let sub = data.claims.sub.trim().to_string();
        if sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }
        Ok(sub)
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let text = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = text
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MalformedHeader)?;
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token.to_string())
}

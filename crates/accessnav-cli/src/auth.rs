//! Development JWTs for servers running with `JWT_SECRET`.

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id the server will act on behalf of
    sub: String,
    exp: i64,
    iat: i64,
}

/// HS256 token whose `sub` is `user_id`, valid for `expiry_hours`.
pub fn generate_dev_token(user_id: &str, secret: &str, expiry_hours: i64) -> Result<String> {
    if user_id.trim().is_empty() {
        anyhow::bail!("user id must not be empty");
    }
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.trim().to_string(),
        exp: now + expiry_hours.max(1) * 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to encode JWT")
}

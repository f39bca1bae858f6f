//! JWT issuance and verification (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User, UserId};

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 signing.
    pub secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    /// Read configuration from `JWT_SECRET` and `TOKEN_TTL_HOURS`.
    ///
    /// Falls back to a development secret and a 7-day lifetime, matching the
    /// seeded defaults; production deployments set both.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "supersecret".to_string());
        let token_ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 7);
        Self {
            secret,
            token_ttl_hours,
        }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    /// Parse the subject back into a typed user id.
    pub fn user_id(&self) -> Result<UserId, uuid::Error> {
        self.sub.parse::<uuid::Uuid>().map(UserId::from)
    }
}

/// Sign a token for the given user.
pub fn issue_token(config: &AuthConfig, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role,
        exp: (Utc::now() + Duration::hours(config.token_ttl_hours)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode and validate a token, returning its claims.
pub fn verify_token(
    config: &AuthConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

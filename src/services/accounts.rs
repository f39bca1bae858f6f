//! Account registration, login and admin seeding.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{ServiceError, ServiceResult};
use crate::auth::{self, AuthConfig};
use crate::db::repository::{FullRepository, UserRepository};
use crate::models::{NewUser, Role, UserPublic};

/// Signup payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signin payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A signed-in identity: the public user plus a fresh session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub user: UserPublic,
    pub token: String,
}

/// Register a new account with role `User` and sign them in.
pub async fn register(
    repo: &Arc<dyn FullRepository>,
    auth_config: &AuthConfig,
    request: SignupRequest,
) -> ServiceResult<AuthSession> {
    let (name, email, password) = match (request.name, request.email, request.password) {
        (Some(name), Some(email), Some(password))
            if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            (name, email, password)
        }
        _ => {
            return Err(ServiceError::Validation(
                "name, email and password are required".to_string(),
            ))
        }
    };

    let password_hash = auth::hash_password(&password)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))?;

    let user = repo
        .create_user(NewUser {
            name,
            email,
            password_hash,
            role: Role::User,
        })
        .await?;

    info!("New user registered: {}", user.email);

    let token = auth::issue_token(auth_config, &user)
        .map_err(|e| ServiceError::Internal(format!("token signing failed: {}", e)))?;

    Ok(AuthSession {
        user: user.public(),
        token,
    })
}

/// Verify credentials and sign the user in.
///
/// Unknown e-mail and wrong password are indistinguishable to the caller.
pub async fn login(
    repo: &Arc<dyn FullRepository>,
    auth_config: &AuthConfig,
    request: SigninRequest,
) -> ServiceResult<AuthSession> {
    let invalid = || ServiceError::Auth("invalid email or password".to_string());

    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(invalid()),
    };

    let user = repo.find_user_by_email(&email).await?.ok_or_else(invalid)?;

    let matches = auth::verify_password(&password, &user.password_hash)
        .map_err(|e| ServiceError::Internal(format!("password verification failed: {}", e)))?;
    if !matches {
        return Err(invalid());
    }

    info!("User logged in: {}", user.email);

    let token = auth::issue_token(auth_config, &user)
        .map_err(|e| ServiceError::Internal(format!("token signing failed: {}", e)))?;

    Ok(AuthSession {
        user: user.public(),
        token,
    })
}

/// Create the bootstrap administrator unless one already exists.
///
/// Reads `ADMIN_EMAIL` and `ADMIN_PASSWORD`, with development defaults.
/// Returns whether an account was created. Safe to call on every startup.
pub async fn ensure_default_admin(repo: &Arc<dyn FullRepository>) -> ServiceResult<bool> {
    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@parking.com".to_string());
    let admin_password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    if repo.find_user_by_email(&admin_email).await?.is_some() {
        info!("Default admin already exists");
        return Ok(false);
    }

    let password_hash = auth::hash_password(&admin_password)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))?;

    repo.create_user(NewUser {
        name: "System Admin".to_string(),
        email: admin_email,
        password_hash,
        role: Role::Admin,
    })
    .await?;

    info!("Default admin created");
    Ok(true)
}

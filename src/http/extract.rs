//! Typed authentication extractors.
//!
//! The authenticated identity is an explicit value extracted once per
//! request, never an ad hoc optional field: handlers that need a signed-in
//! caller take [`AuthUser`], admin-only handlers take [`AdminUser`]. The
//! extractor verifies the bearer token and confirms the account still
//! exists before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::AppError;
use super::state::AppState;
use crate::auth;
use crate::db::repository::UserRepository;
use crate::models::{Role, UserId};

/// The verified caller of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Auth("not authorized, no token provided".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(existing) = parts.extensions.get::<Self>() {
            return Ok(existing.clone());
        }

        let token = bearer_token(parts)?;
        let claims = auth::verify_token(&state.auth, token)
            .map_err(|_| AppError::Auth("not authorized, token failed".to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|_| AppError::Auth("not authorized, token failed".to_string()))?;

        // The token may outlive the account; re-check the store.
        let user = state
            .repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Auth("user not found".to_string()))?;

        let auth_user = AuthUser {
            id: user.id,
            role: user.role,
        };
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

/// An [`AuthUser`] that is additionally required to be an administrator.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "access denied, admins only".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

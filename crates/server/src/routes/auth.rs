//! Authentication route handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use cartwheel_core::{Role, UserId};

use crate::error::{AppJson, Result};
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public profile fields of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email.into_inner(),
            role: user.role,
        }
    }
}

/// Token plus profile, returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new account and return its first token.
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, token) = auth.register(&req.username, &req.email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Verify credentials and return a fresh token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, token) = auth.login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Return the caller's resolved identity.
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth.get_user(user.id).await?;

    Ok(Json(user.into()))
}

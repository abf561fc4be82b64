//! Authentication extractors.
//!
//! The access gate for every protected route: a bearer token is resolved to
//! an identity (id + role) before the handler runs. Verification is pure -
//! the claims already carry everything the gate needs, so no store
//! round-trip happens here.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use cartwheel_core::{Role, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: CurrentUser) -> impl IntoResponse {
///     format!("Hello, user {}!", user.id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// The authenticated user's id.
    pub id: UserId,
    /// The role carried by the token.
    pub role: Role,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("missing bearer token".to_owned()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("missing bearer token".to_owned()))?;

        let claims = state.tokens().verify(token)?;

        Ok(Self {
            id: claims.user_id(),
            role: claims.role,
        })
    }
}

/// Extractor that additionally requires the ADMIN role.
///
/// Rejects with an authorization error (not authentication) when the token
/// is valid but the role is insufficient.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Authorization("admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}

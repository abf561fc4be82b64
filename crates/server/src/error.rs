//! Unified error handling.
//!
//! Provides a unified `AppError` type mapping the application's error
//! taxonomy onto HTTP responses. All route handlers return
//! `Result<T, AppError>`; clients always receive a structured JSON body
//! `{"error": {"category", "message"}}` and internal details are never
//! exposed.

use axum::Json;
use axum::extract::FromRequest;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::{AuthError, TokenError};
use crate::services::cart::CartError;
use crate::services::images::ImageError;
use crate::services::orders::OrderError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, invalid, or expired credential.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Valid credential, insufficient role or ownership.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Referenced entity absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate where uniqueness is required.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Generic message for faults whose details stay server-side.
const INTERNAL_MESSAGE: &str = "internal server error";

impl AppError {
    /// Status code, error category, and client-safe message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            Self::Authentication(msg) => (StatusCode::UNAUTHORIZED, "authentication", msg.clone()),
            Self::Authorization(msg) => (StatusCode::FORBIDDEN, "authorization", msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            Self::Database(err) => match err {
                RepositoryError::NotFound => {
                    (StatusCode::NOT_FOUND, "not_found", "not found".to_owned())
                }
                RepositoryError::Conflict(msg) => {
                    (StatusCode::CONFLICT, "conflict", msg.clone())
                }
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    INTERNAL_MESSAGE.to_owned(),
                ),
            },
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                INTERNAL_MESSAGE.to_owned(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, category, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        let body = json!({
            "error": {
                "category": category,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// `Json` wrapper whose rejection is an [`AppError`], so malformed request
/// bodies produce the same structured error shape as everything else.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Authentication(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmptyUsername => Self::Validation("username is required".to_owned()),
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvalidCredentials => {
                Self::Authentication("invalid credentials".to_owned())
            }
            AuthError::UserAlreadyExists => Self::Conflict("email already in use".to_owned()),
            AuthError::UserNotFound => Self::Authentication("user not found".to_owned()),
            AuthError::PasswordHash | AuthError::Token => {
                Self::Internal("credential processing failed".to_owned())
            }
            AuthError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity => {
                Self::Validation("quantity must be at least 1".to_owned())
            }
            CartError::ProductNotFound => Self::NotFound("product not found".to_owned()),
            CartError::CartNotFound => Self::NotFound("cart not found".to_owned()),
            CartError::ItemNotFound => Self::NotFound("product not found in cart".to_owned()),
            CartError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::Validation("cart is empty".to_owned()),
            OrderError::MissingAddressField(_) => Self::Validation(err.to_string()),
            OrderError::NotFound => Self::NotFound("order not found".to_owned()),
            OrderError::AccessDenied => Self::Authorization("access denied".to_owned()),
            OrderError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::NotAnImage => Self::Validation(err.to_string()),
            ImageError::Io(e) => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_owned());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::Validation("invalid input".to_owned());
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Authentication("test".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Authorization("test".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_map_through_database_variant() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict(
                "dup".to_owned()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "bad row".to_owned()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::Internal("connection to 10.0.0.3:5432 refused".to_owned());
        let (_, category, message) = err.parts();
        assert_eq!(category, "internal");
        assert_eq!(message, INTERNAL_MESSAGE);
    }

    #[test]
    fn test_auth_error_conversions() {
        assert!(matches!(
            AppError::from(AuthError::InvalidCredentials),
            AppError::Authentication(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::UserAlreadyExists),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::EmptyUsername),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_cart_error_conversions() {
        assert!(matches!(
            AppError::from(CartError::InvalidQuantity),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(CartError::ItemNotFound),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_order_error_conversions() {
        assert!(matches!(
            AppError::from(OrderError::EmptyCart),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(OrderError::AccessDenied),
            AppError::Authorization(_)
        ));
    }
}

//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartwheel_core::{Email, Role, UserId};

/// A registered user (domain type).
///
/// The password hash never leaves the db layer; this type is safe to hand to
/// any route handler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name chosen at registration.
    pub username: String,
    /// User's email address.
    pub email: Email,
    /// Role for authorization decisions.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

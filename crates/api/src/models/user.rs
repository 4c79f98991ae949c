//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use velour_core::{Email, UserId};

/// A storefront user.
///
/// The password hash never leaves the database layer; this type is safe to
/// serialize into responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Whether the user can reach admin operations.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

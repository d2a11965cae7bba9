//! Records persisted alongside food items.
//!
//! Food items themselves are [`pantry_shared::FoodItem`].

use chrono::{DateTime, Utc};
use pantry_shared::UserId;
use serde::Serialize;

/// A registered account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// `salt_hex$hash_hex`; never sent to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A login session. Only the hash of the bearer token is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

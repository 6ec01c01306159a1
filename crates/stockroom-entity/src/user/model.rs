//! User entity model.
//!
//! Only the identity fields the access-control layer needs are mapped;
//! profile data is owned elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockroom_core::types::UserId;

/// An application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login e-mail address.
    pub email: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

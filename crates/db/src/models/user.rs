//! User entity model and DTOs.
//!
//! Users exist so a copy's borrower is a real foreign key. Credentials and
//! sessions are not modelled here.

use std::fmt;

use catalog_core::fields::non_blank;
use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A user row from the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(max = 150), custom(function = "non_blank"))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
}

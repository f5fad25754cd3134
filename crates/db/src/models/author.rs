//! Author entity model and DTOs.

use std::fmt;

use catalog_core::fields::non_blank;
use catalog_core::labels::author_label;
use catalog_core::links::author_detail_path;
use catalog_core::listing::AuthorSortKey;
use catalog_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An author row from the `authors` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Author {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    /// Labelled "Died" wherever the field is presented.
    pub date_of_death: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Author {
    /// Detail path, e.g. `/catalog/author/7`.
    pub fn detail_path(&self) -> String {
        author_detail_path(self.id)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&author_label(&self.last_name, &self.first_name))
    }
}

impl AuthorSortKey for Author {
    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn first_name(&self) -> &str {
        &self.first_name
    }
}

/// DTO for creating a new author.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAuthor {
    #[validate(length(max = 100), custom(function = "non_blank"))]
    pub first_name: String,
    #[validate(length(max = 100), custom(function = "non_blank"))]
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub date_of_death: Option<Date>,
}

/// DTO for updating an author's names. All fields are optional.
///
/// Life dates are replaced as a pair through `AuthorRepo::set_life_dates`
/// so either one can be cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAuthor {
    #[validate(length(max = 100), custom(function = "non_blank"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100), custom(function = "non_blank"))]
    pub last_name: Option<String>,
}

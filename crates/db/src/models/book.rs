//! Book entity model and DTOs.

use std::fmt;

use catalog_core::fields::non_blank;
use catalog_core::links::book_detail_path;
use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::author::Author;
use crate::models::genre::Genre;

/// A book row from the `books` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    /// Cleared to `None` when the author is deleted.
    pub author_id: Option<DbId>,
    pub summary: String,
    pub isbn: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Book {
    /// Detail path, e.g. `/catalog/book/12`.
    pub fn detail_path(&self) -> String {
        book_detail_path(self.id)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A book with its author and genre set resolved.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

/// DTO for creating a new book.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(max = 200), custom(function = "non_blank"))]
    pub title: String,
    pub author_id: Option<DbId>,
    #[validate(length(max = 1000), custom(function = "non_blank"))]
    pub summary: String,
    #[validate(length(max = 13), custom(function = "non_blank"))]
    pub isbn: String,
    /// Duplicates are collapsed before insert.
    #[serde(default)]
    pub genre_ids: Vec<DbId>,
}

/// DTO for updating an existing book. All fields are optional.
///
/// The author reference is changed through `BookRepo::set_author` so it can
/// also be cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(max = 200), custom(function = "non_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 1000), custom(function = "non_blank"))]
    pub summary: Option<String>,
    #[validate(length(max = 13), custom(function = "non_blank"))]
    pub isbn: Option<String>,
    /// When `Some`, replaces the whole genre set.
    pub genre_ids: Option<Vec<DbId>>,
}

//! Repository for the `authors` table.

use catalog_core::types::{Date, DbId};
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::author::{Author, CreateAuthor, UpdateAuthor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, first_name, last_name, date_of_birth, date_of_death, created_at, updated_at";

/// Canonical author listing order. Byte-wise collation keeps it identical to
/// `catalog_core::listing::cmp_authors`.
const ORDER_BY: &str = "last_name COLLATE \"C\", first_name COLLATE \"C\", id";

/// Provides CRUD operations for authors.
pub struct AuthorRepo;

impl AuthorRepo {
    /// Insert a new author, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAuthor) -> DbResult<Author> {
        input.validate()?;

        let query = format!(
            "INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.date_of_birth)
            .bind(input.date_of_death)
            .fetch_one(pool)
            .await?;

        tracing::debug!(author_id = author.id, author = %author, "Author created");
        Ok(author)
    }

    /// Find an author by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Author>> {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE id = $1");
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(author)
    }

    /// List all authors in canonical order: last name, then first name.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<Author>> {
        let query = format!("SELECT {COLUMNS} FROM authors ORDER BY {ORDER_BY}");
        let authors = sqlx::query_as::<_, Author>(&query).fetch_all(pool).await?;
        Ok(authors)
    }

    /// Update an author's names. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAuthor,
    ) -> DbResult<Option<Author>> {
        input.validate()?;

        let query = format!(
            "UPDATE authors SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_optional(pool)
            .await?;
        Ok(author)
    }

    /// Replace both life dates. `None` clears the stored date.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_life_dates(
        pool: &PgPool,
        id: DbId,
        date_of_birth: Option<Date>,
        date_of_death: Option<Date>,
    ) -> DbResult<Option<Author>> {
        let query = format!(
            "UPDATE authors SET date_of_birth = $2, date_of_death = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .bind(date_of_birth)
            .bind(date_of_death)
            .fetch_optional(pool)
            .await?;
        Ok(author)
    }

    /// Delete an author. Their books survive with `author_id` cleared.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(author_id = id, "Author deleted");
        }
        Ok(deleted)
    }
}

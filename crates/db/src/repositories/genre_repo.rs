//! Repository for the `genres` table.

use catalog_core::types::DbId;
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::genre::{CreateGenre, Genre, UpdateGenre};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> DbResult<Genre> {
        input.validate()?;

        let query = format!("INSERT INTO genres (name) VALUES ($1) RETURNING {COLUMNS}");
        let genre = sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await?;

        tracing::debug!(genre_id = genre.id, name = %genre.name, "Genre created");
        Ok(genre)
    }

    /// Find a genre by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Genre>> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = $1");
        let genre = sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(genre)
    }

    /// List all genres ordered by name.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<Genre>> {
        let query = format!("SELECT {COLUMNS} FROM genres ORDER BY name COLLATE \"C\", id");
        let genres = sqlx::query_as::<_, Genre>(&query).fetch_all(pool).await?;
        Ok(genres)
    }

    /// Update a genre. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateGenre) -> DbResult<Option<Genre>> {
        input.validate()?;

        let query = format!(
            "UPDATE genres SET name = COALESCE($2, name) WHERE id = $1 RETURNING {COLUMNS}"
        );
        let genre = sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await?;
        Ok(genre)
    }

    /// Delete a genre. Books keep existing; the genre just leaves their sets.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(genre_id = id, "Genre deleted");
        }
        Ok(deleted)
    }
}

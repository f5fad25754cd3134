//! Repository for the `books` and `book_genres` tables.

use catalog_core::fields::unique_ids;
use catalog_core::types::DbId;
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::author::Author;
use crate::models::book::{Book, BookDetail, CreateBook, UpdateBook};
use crate::models::genre::Genre;
use crate::repositories::AuthorRepo;

/// Column list for the `books` table.
const COLUMNS: &str = "id, title, author_id, summary, isbn, created_at, updated_at";

/// Column list for the `genres` table (used in JOIN queries).
const GENRE_COLUMNS: &str = "g.id, g.name, g.created_at, g.updated_at";

/// Provides CRUD operations for books and their genre sets.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row.
    ///
    /// The genre set is written in the same transaction; duplicate ids in
    /// `genre_ids` collapse to one association.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> DbResult<Book> {
        input.validate()?;

        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO books (title, author_id, summary, isbn)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&insert_query)
            .bind(&input.title)
            .bind(input.author_id)
            .bind(&input.summary)
            .bind(&input.isbn)
            .fetch_one(&mut *tx)
            .await?;

        if !input.genre_ids.is_empty() {
            Self::set_genres_inner(&mut tx, book.id, &input.genre_ids).await?;
        }

        tx.commit().await?;
        tracing::debug!(book_id = book.id, title = %book.title, "Book created");
        Ok(book)
    }

    /// Find a book by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Book>> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(book)
    }

    /// Find a book by ID with its author and genres resolved.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> DbResult<Option<BookDetail>> {
        let Some(book) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let author = Self::author(pool, &book).await?;
        let genres = Self::genres(pool, book.id).await?;
        Ok(Some(BookDetail {
            book,
            author,
            genres,
        }))
    }

    /// Resolve a book's author reference. `None` if unset or deleted.
    pub async fn author(pool: &PgPool, book: &Book) -> DbResult<Option<Author>> {
        match book.author_id {
            Some(author_id) => AuthorRepo::find_by_id(pool, author_id).await,
            None => Ok(None),
        }
    }

    /// List all books ordered by title.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<Book>> {
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY title COLLATE \"C\", id");
        let books = sqlx::query_as::<_, Book>(&query).fetch_all(pool).await?;
        Ok(books)
    }

    /// List the books written by an author, ordered by title.
    pub async fn list_by_author(pool: &PgPool, author_id: DbId) -> DbResult<Vec<Book>> {
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE author_id = $1
             ORDER BY title COLLATE \"C\", id"
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await?;
        Ok(books)
    }

    /// List the books carrying a genre, ordered by title.
    pub async fn list_by_genre(pool: &PgPool, genre_id: DbId) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT b.id, b.title, b.author_id, b.summary, b.isbn, b.created_at, b.updated_at
             FROM books b
             JOIN book_genres bg ON bg.book_id = b.id
             WHERE bg.genre_id = $1
             ORDER BY b.title COLLATE \"C\", b.id",
        )
        .bind(genre_id)
        .fetch_all(pool)
        .await?;
        Ok(books)
    }

    /// Update a book. Only non-`None` fields in `input` are applied.
    ///
    /// If `genre_ids` is `Some`, replaces the whole genre set.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateBook) -> DbResult<Option<Book>> {
        input.validate()?;

        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE books SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                isbn = COALESCE($4, isbn)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&update_query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.isbn)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref book) = book {
            if let Some(ref genre_ids) = input.genre_ids {
                Self::set_genres_inner(&mut tx, book.id, genre_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Point a book at a different author, or clear the reference with `None`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_author(
        pool: &PgPool,
        id: DbId,
        author_id: Option<DbId>,
    ) -> DbResult<Option<Book>> {
        let query = format!("UPDATE books SET author_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(pool)
            .await?;
        Ok(book)
    }

    /// Delete a book. Its copies survive with `book_id` cleared; authors and
    /// genres are untouched.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(book_id = id, "Book deleted");
        }
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Genre set
    // -----------------------------------------------------------------------

    /// All genres in a book's set, ordered by name.
    pub async fn genres(pool: &PgPool, book_id: DbId) -> DbResult<Vec<Genre>> {
        let query = format!(
            "SELECT {GENRE_COLUMNS}
             FROM genres g
             JOIN book_genres bg ON bg.genre_id = g.id
             WHERE bg.book_id = $1
             ORDER BY g.name COLLATE \"C\", g.id"
        );
        let genres = sqlx::query_as::<_, Genre>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await?;
        Ok(genres)
    }

    /// Replace a book's genre set.
    pub async fn set_genres(pool: &PgPool, book_id: DbId, genre_ids: &[DbId]) -> DbResult<()> {
        let mut tx = pool.begin().await?;
        Self::set_genres_inner(&mut tx, book_id, genre_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Add a genre to a book's set. Idempotent.
    ///
    /// Returns `true` if the association was new.
    pub async fn add_genre(pool: &PgPool, book_id: DbId, genre_id: DbId) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(book_id)
        .bind(genre_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a genre from a book's set.
    ///
    /// Returns `true` if the association was removed.
    pub async fn remove_genre(pool: &PgPool, book_id: DbId, genre_id: DbId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM book_genres WHERE book_id = $1 AND genre_id = $2")
            .bind(book_id)
            .bind(genre_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace genre associations within an existing transaction.
    async fn set_genres_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        book_id: DbId,
        genre_ids: &[DbId],
    ) -> DbResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        for genre_id in unique_ids(genre_ids) {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(book_id)
                .bind(genre_id)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

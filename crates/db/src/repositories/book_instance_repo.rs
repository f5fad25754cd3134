//! Repository for the `book_instances` table (physical copies).

use catalog_core::loan::LoanStatus;
use catalog_core::types::{CopyId, Date, DbId};
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::book::Book;
use crate::models::book_instance::{
    BookInstance, BookInstanceWithTitle, CreateBookInstance, UpdateBookInstance,
};
use crate::models::user::User;
use crate::repositories::{BookRepo, UserRepo};

/// Column list for the `book_instances` table.
const COLUMNS: &str =
    "id, book_id, imprint, due_back, borrower_id, status, created_at, updated_at";

/// Column list for queries joining `book_instances bi` to `books b`.
const TITLED_COLUMNS: &str = "bi.id, bi.book_id, bi.imprint, bi.due_back, bi.borrower_id, \
    bi.status, bi.created_at, bi.updated_at, b.title AS book_title";

/// Canonical copy listing order: undated copies first, then by due date.
/// Ties break on id, matching `catalog_core::listing::cmp_copies`.
const ORDER_BY: &str = "due_back ASC NULLS FIRST, id";

/// Same order for queries aliasing the table as `bi`.
const TITLED_ORDER_BY: &str = "bi.due_back ASC NULLS FIRST, bi.id";

/// Provides CRUD operations for book instances.
pub struct BookInstanceRepo;

impl BookInstanceRepo {
    /// Insert a new copy under a freshly generated UUID.
    ///
    /// If `status` is `None` in the input, defaults to Maintenance.
    pub async fn create(pool: &PgPool, input: &CreateBookInstance) -> DbResult<BookInstance> {
        input.validate()?;

        let id = CopyId::new_v4();
        let status = input.status.unwrap_or_default();

        let query = format!(
            "INSERT INTO book_instances (id, book_id, imprint, due_back, borrower_id, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(input.book_id)
            .bind(&input.imprint)
            .bind(input.due_back)
            .bind(input.borrower_id)
            .bind(status.code())
            .fetch_one(pool)
            .await?;

        tracing::debug!(
            instance_id = %instance.id,
            book_id = ?instance.book_id,
            status = %instance.status,
            "Book instance created"
        );
        Ok(instance)
    }

    /// Find a copy by its UUID.
    pub async fn find_by_id(pool: &PgPool, id: CopyId) -> DbResult<Option<BookInstance>> {
        let query = format!("SELECT {COLUMNS} FROM book_instances WHERE id = $1");
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(instance)
    }

    /// Find a copy together with its book's title, ready for labelling.
    pub async fn find_with_title(
        pool: &PgPool,
        id: CopyId,
    ) -> DbResult<Option<BookInstanceWithTitle>> {
        let query = format!(
            "SELECT {TITLED_COLUMNS}
             FROM book_instances bi
             LEFT JOIN books b ON b.id = bi.book_id
             WHERE bi.id = $1"
        );
        let instance = sqlx::query_as::<_, BookInstanceWithTitle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(instance)
    }

    /// Resolve a copy's book reference. `None` if unset or deleted.
    pub async fn book(pool: &PgPool, instance: &BookInstance) -> DbResult<Option<Book>> {
        match instance.book_id {
            Some(book_id) => BookRepo::find_by_id(pool, book_id).await,
            None => Ok(None),
        }
    }

    /// Resolve a copy's borrower reference. `None` if unset or deleted.
    pub async fn borrower(pool: &PgPool, instance: &BookInstance) -> DbResult<Option<User>> {
        match instance.borrower_id {
            Some(user_id) => UserRepo::find_by_id(pool, user_id).await,
            None => Ok(None),
        }
    }

    /// List all copies in canonical order.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<BookInstance>> {
        let query = format!("SELECT {COLUMNS} FROM book_instances ORDER BY {ORDER_BY}");
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .fetch_all(pool)
            .await?;
        Ok(instances)
    }

    /// List all copies with book titles, in canonical order.
    pub async fn list_with_titles(pool: &PgPool) -> DbResult<Vec<BookInstanceWithTitle>> {
        let query = format!(
            "SELECT {TITLED_COLUMNS}
             FROM book_instances bi
             LEFT JOIN books b ON b.id = bi.book_id
             ORDER BY {TITLED_ORDER_BY}"
        );
        let instances = sqlx::query_as::<_, BookInstanceWithTitle>(&query)
            .fetch_all(pool)
            .await?;
        Ok(instances)
    }

    /// List the copies of one book in canonical order.
    pub async fn list_for_book(pool: &PgPool, book_id: DbId) -> DbResult<Vec<BookInstance>> {
        let query = format!(
            "SELECT {COLUMNS} FROM book_instances WHERE book_id = $1 ORDER BY {ORDER_BY}"
        );
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await?;
        Ok(instances)
    }

    /// List the copies currently in `status`, in canonical order.
    pub async fn list_by_status(
        pool: &PgPool,
        status: LoanStatus,
    ) -> DbResult<Vec<BookInstance>> {
        let query = format!(
            "SELECT {COLUMNS} FROM book_instances WHERE status = $1 ORDER BY {ORDER_BY}"
        );
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(status.code())
            .fetch_all(pool)
            .await?;
        Ok(instances)
    }

    /// List the copies a user currently has on loan, soonest due first.
    pub async fn list_on_loan_to(
        pool: &PgPool,
        borrower_id: DbId,
    ) -> DbResult<Vec<BookInstanceWithTitle>> {
        let query = format!(
            "SELECT {TITLED_COLUMNS}
             FROM book_instances bi
             LEFT JOIN books b ON b.id = bi.book_id
             WHERE bi.borrower_id = $1 AND bi.status = $2
             ORDER BY {TITLED_ORDER_BY}"
        );
        let instances = sqlx::query_as::<_, BookInstanceWithTitle>(&query)
            .bind(borrower_id)
            .bind(LoanStatus::OnLoan.code())
            .fetch_all(pool)
            .await?;
        Ok(instances)
    }

    /// List copies whose due date is strictly before `today`.
    ///
    /// Matches `BookInstance::is_overdue_on` row for row.
    pub async fn list_overdue(pool: &PgPool, today: Date) -> DbResult<Vec<BookInstance>> {
        let query = format!(
            "SELECT {COLUMNS} FROM book_instances WHERE due_back < $1 ORDER BY {ORDER_BY}"
        );
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(today)
            .fetch_all(pool)
            .await?;
        Ok(instances)
    }

    /// Update a copy's imprint and/or status. Only non-`None` fields apply.
    ///
    /// No transition rule is enforced between statuses.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: CopyId,
        input: &UpdateBookInstance,
    ) -> DbResult<Option<BookInstance>> {
        input.validate()?;

        let query = format!(
            "UPDATE book_instances SET
                imprint = COALESCE($2, imprint),
                status = COALESCE($3, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(&input.imprint)
            .bind(input.status.map(LoanStatus::code))
            .fetch_optional(pool)
            .await?;
        Ok(instance)
    }

    /// Set a copy's status.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: CopyId,
        status: LoanStatus,
    ) -> DbResult<Option<BookInstance>> {
        let query =
            format!("UPDATE book_instances SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(status.code())
            .fetch_optional(pool)
            .await?;

        if let Some(ref instance) = instance {
            tracing::debug!(instance_id = %instance.id, status = %status, "Loan status set");
        }
        Ok(instance)
    }

    /// Set or clear a copy's due date.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_due_back(
        pool: &PgPool,
        id: CopyId,
        due_back: Option<Date>,
    ) -> DbResult<Option<BookInstance>> {
        let query =
            format!("UPDATE book_instances SET due_back = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(due_back)
            .fetch_optional(pool)
            .await?;
        Ok(instance)
    }

    /// Set or clear a copy's borrower.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_borrower(
        pool: &PgPool,
        id: CopyId,
        borrower_id: Option<DbId>,
    ) -> DbResult<Option<BookInstance>> {
        let query = format!(
            "UPDATE book_instances SET borrower_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(borrower_id)
            .fetch_optional(pool)
            .await?;
        Ok(instance)
    }

    /// Set or clear the book a copy belongs to.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_book(
        pool: &PgPool,
        id: CopyId,
        book_id: Option<DbId>,
    ) -> DbResult<Option<BookInstance>> {
        let query =
            format!("UPDATE book_instances SET book_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(book_id)
            .fetch_optional(pool)
            .await?;
        Ok(instance)
    }

    /// Delete a copy. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: CopyId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(instance_id = %id, "Book instance deleted");
        }
        Ok(deleted)
    }
}

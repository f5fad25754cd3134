//! Cross-table queries over the whole catalog.

use catalog_core::loan::LoanStatus;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::catalog::CatalogCounts;

/// Read-only aggregate queries.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Count records of every kind, plus copies currently available.
    pub async fn counts(pool: &PgPool) -> DbResult<CatalogCounts> {
        let counts = sqlx::query_as::<_, CatalogCounts>(
            "SELECT
                (SELECT COUNT(*) FROM books) AS num_books,
                (SELECT COUNT(*) FROM book_instances) AS num_instances,
                (SELECT COUNT(*) FROM book_instances WHERE status = $1)
                    AS num_instances_available,
                (SELECT COUNT(*) FROM authors) AS num_authors,
                (SELECT COUNT(*) FROM genres) AS num_genres",
        )
        .bind(LoanStatus::Available.code())
        .fetch_one(pool)
        .await?;
        Ok(counts)
    }
}

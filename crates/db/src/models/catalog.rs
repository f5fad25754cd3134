//! Aggregate counts across the catalog.

use serde::Serialize;
use sqlx::FromRow;

/// Record counts for a catalog overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow, Serialize)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}

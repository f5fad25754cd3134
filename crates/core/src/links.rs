//! Detail paths used when other layers link to a single record.

use crate::types::DbId;

/// Path prefix shared by all catalog detail pages.
pub const CATALOG_PREFIX: &str = "/catalog";

/// Detail path for an author, e.g. `/catalog/author/7`.
pub fn author_detail_path(id: DbId) -> String {
    format!("{CATALOG_PREFIX}/author/{id}")
}

/// Detail path for a book, e.g. `/catalog/book/12`.
pub fn book_detail_path(id: DbId) -> String {
    format!("{CATALOG_PREFIX}/book/{id}")
}

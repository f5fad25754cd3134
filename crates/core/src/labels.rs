//! Human-readable labels for catalog records.
//!
//! Genres and books are labelled by their name/title directly; these helpers
//! cover the composite forms.

use crate::types::CopyId;

/// Placeholder used when a copy's book reference has been cleared.
pub const NO_BOOK_LABEL: &str = "no book";

/// Author label: `"last_name, first_name"`.
pub fn author_label(last_name: &str, first_name: &str) -> String {
    format!("{last_name}, {first_name}")
}

/// Copy label: `"<id> (<book title>)"`.
///
/// Falls back to [`NO_BOOK_LABEL`] in place of the title when the copy no
/// longer references a book.
pub fn copy_label(id: &CopyId, book_title: Option<&str>) -> String {
    format!("{id} ({})", book_title.unwrap_or(NO_BOOK_LABEL))
}

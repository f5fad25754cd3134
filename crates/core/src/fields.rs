//! Field constraints for catalog records.
//!
//! The length limits mirror the `VARCHAR(n)` widths in the schema. DTOs in
//! the persistence layer reference them through `validator` attributes, and
//! the schema enforces them again at the database boundary.

use std::borrow::Cow;
use std::collections::BTreeSet;

use validator::ValidationError;

use crate::types::DbId;

/// Maximum characters in a genre name.
pub const GENRE_NAME_MAX_LEN: u64 = 200;

/// Maximum characters in an author's first or last name.
pub const AUTHOR_NAME_MAX_LEN: u64 = 100;

/// Maximum characters in a book title.
pub const BOOK_TITLE_MAX_LEN: u64 = 200;

/// Maximum characters in a book summary.
pub const BOOK_SUMMARY_MAX_LEN: u64 = 1000;

/// Maximum characters in an ISBN (ISBN-13 without separators).
pub const ISBN_MAX_LEN: u64 = 13;

/// Maximum characters in a copy's imprint.
pub const IMPRINT_MAX_LEN: u64 = 200;

/// Maximum characters in a username.
pub const USERNAME_MAX_LEN: u64 = 150;

/// Reject text that is empty or whitespace only.
///
/// Used as a `validator` custom function on every required text field.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank"))
        );
    }
    Ok(())
}

/// Collapse a list of ids into a duplicate-free, ascending set.
///
/// A book's genre set has no ordering significance, so the sorted form is
/// the canonical one.
pub fn unique_ids(ids: &[DbId]) -> Vec<DbId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

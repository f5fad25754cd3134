//! Canonical listing orders.
//!
//! The repositories sort in SQL; these comparators give the same order for
//! records already in memory. Text compares by byte value, matching the
//! `COLLATE "C"` used in the queries.

use std::cmp::Ordering;

use crate::types::{CopyId, Date};

/// Anything listed in author order.
pub trait AuthorSortKey {
    fn last_name(&self) -> &str;
    fn first_name(&self) -> &str;
}

/// Anything listed in loan (due date) order.
pub trait CopySortKey {
    fn due_back(&self) -> Option<Date>;
    fn copy_id(&self) -> CopyId;
}

/// Order authors by `(last_name, first_name)`.
pub fn cmp_authors<A: AuthorSortKey + ?Sized>(a: &A, b: &A) -> Ordering {
    a.last_name()
        .cmp(b.last_name())
        .then_with(|| a.first_name().cmp(b.first_name()))
}

/// Order copies by `due_back` ascending with undated copies first.
///
/// Ties break on the copy id so the order is total.
pub fn cmp_copies<C: CopySortKey + ?Sized>(a: &C, b: &C) -> Ordering {
    // `None < Some(_)` for `Option`, which puts undated copies first.
    a.due_back()
        .cmp(&b.due_back())
        .then_with(|| a.copy_id().cmp(&b.copy_id()))
}

/// Sort a slice of authors in place into canonical order.
pub fn sort_authors<A: AuthorSortKey>(authors: &mut [A]) {
    authors.sort_by(cmp_authors);
}

/// Sort a slice of copies in place into canonical order.
pub fn sort_copies<C: CopySortKey>(copies: &mut [C]) {
    copies.sort_by(cmp_copies);
}

//! Book instance (physical copy) model and DTOs.

use std::fmt;

use catalog_core::fields::non_blank;
use catalog_core::labels::copy_label;
use catalog_core::listing::CopySortKey;
use catalog_core::loan::{self, LoanStatus};
use catalog_core::types::{CopyId, Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::book::Book;

/// A copy row from the `book_instances` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BookInstance {
    pub id: CopyId,
    /// Cleared to `None` when the book is deleted; the copy survives.
    pub book_id: Option<DbId>,
    pub imprint: String,
    pub due_back: Option<Date>,
    /// Cleared to `None` when the user is deleted.
    pub borrower_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: LoanStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BookInstance {
    /// Whether the copy is past its due date today.
    pub fn is_overdue(&self) -> bool {
        loan::is_overdue(self.due_back)
    }

    /// Whether the copy is past its due date as of `today`.
    pub fn is_overdue_on(&self, today: Date) -> bool {
        loan::is_overdue_on(self.due_back, today)
    }

    /// Label using an already-resolved book.
    pub fn label_with(&self, book: Option<&Book>) -> String {
        copy_label(&self.id, book.map(|b| b.title.as_str()))
    }
}

impl CopySortKey for BookInstance {
    fn due_back(&self) -> Option<Date> {
        self.due_back
    }

    fn copy_id(&self) -> CopyId {
        self.id
    }
}

/// A copy joined with the title of the book it references, if any.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BookInstanceWithTitle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub instance: BookInstance,
    pub book_title: Option<String>,
}

impl fmt::Display for BookInstanceWithTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&copy_label(&self.instance.id, self.book_title.as_deref()))
    }
}

impl CopySortKey for BookInstanceWithTitle {
    fn due_back(&self) -> Option<Date> {
        self.instance.due_back
    }

    fn copy_id(&self) -> CopyId {
        self.instance.id
    }
}

/// DTO for creating a new copy. The id is generated on insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookInstance {
    pub book_id: Option<DbId>,
    #[validate(length(max = 200), custom(function = "non_blank"))]
    pub imprint: String,
    pub due_back: Option<Date>,
    pub borrower_id: Option<DbId>,
    /// Defaults to Maintenance if omitted.
    pub status: Option<LoanStatus>,
}

/// DTO for updating a copy's imprint and status.
///
/// Any status may replace any other. Nullable references and the due date
/// have dedicated setters on `BookInstanceRepo`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBookInstance {
    #[validate(length(max = 200), custom(function = "non_blank"))]
    pub imprint: Option<String>,
    pub status: Option<LoanStatus>,
}

//! Loan status and overdue rules for physical copies.
//!
//! A copy's status is a closed set of four values stored as a one-letter
//! code. Any status may follow any other; there is no transition graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Availability of a physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    /// All statuses in declaration order.
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    /// One-letter code stored in `book_instances.status`.
    pub fn code(self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LoanStatus {
    type Err = CoreError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| {
                let valid: Vec<&str> = LoanStatus::ALL.iter().map(|s| s.code()).collect();
                CoreError::Validation(format!(
                    "Invalid loan status '{code}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl TryFrom<String> for LoanStatus {
    type Error = CoreError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// Whether a copy due back on `due_back` is overdue as of `today`.
///
/// Overdue means a due date exists and `today` is strictly after it.
pub fn is_overdue_on(due_back: Option<Date>, today: Date) -> bool {
    due_back.is_some_and(|due| today > due)
}

/// [`is_overdue_on`] evaluated against the local calendar date.
pub fn is_overdue(due_back: Option<Date>) -> bool {
    is_overdue_on(due_back, today())
}

/// The current local calendar date.
pub fn today() -> Date {
    chrono::Local::now().date_naive()
}

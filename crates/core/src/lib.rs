//! Pure domain logic for the library catalog.
//!
//! Everything here is free of database dependencies so it can be shared by
//! the persistence layer and exercised with plain unit tests.

pub mod error;
pub mod fields;
pub mod labels;
pub mod links;
pub mod listing;
pub mod loan;
pub mod types;

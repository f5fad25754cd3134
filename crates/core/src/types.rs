/// Primary keys for genres, authors, books and users are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Physical copies are keyed by a random UUID assigned at creation.
pub type CopyId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (birth, death, due back) carry no time zone.
pub type Date = chrono::NaiveDate;

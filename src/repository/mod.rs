//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking
//! against a SQLite database.

pub mod diesel_context;
pub mod diesel_document;
pub mod diesel_models;
pub mod pool;

pub use diesel_context::DieselDbContext;
pub use diesel_document::DieselDocumentRepository;
pub use pool::{AsyncSqlitePool, DieselError};

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-03-15T10:00:00.000000Z");
        assert_eq!(dt.to_rfc3339(), "2024-03-15T10:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_invalid_is_epoch() {
        assert_eq!(parse_datetime("yesterday"), DateTime::UNIX_EPOCH);
    }
}

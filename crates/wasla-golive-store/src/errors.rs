// SPDX-License-Identifier: Apache-2.0

use rusqlite::ErrorCode;
use wasla_golive_core::StoreError;

/// Classifies a SQLite failure into the store error taxonomy.
///
/// A missing table means migrations have not run yet; contention and open
/// failures are transient infrastructure trouble; anything else is a query
/// bug or corrupt data.
pub fn map_sqlite_error(err: rusqlite::Error) -> StoreError {
    let detail = err.to_string();
    if detail.contains("no such table") {
        return StoreError::NotReady { detail };
    }
    match err.sqlite_error_code() {
        Some(
            ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::SystemIoFailure,
        ) => StoreError::Unavailable { detail },
        _ => StoreError::Query { detail },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn missing_table_maps_to_not_ready() {
        let conn = Connection::open_in_memory().expect("open");
        let err = conn
            .query_row("SELECT name FROM tenants", [], |row| row.get::<_, String>(0))
            .expect_err("no table");
        assert!(map_sqlite_error(err).is_not_ready());
    }

    #[test]
    fn busy_maps_to_unavailable() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        assert_eq!(map_sqlite_error(err).category(), "unavailable");
    }

    #[test]
    fn other_failures_map_to_query() {
        let conn = Connection::open_in_memory().expect("open");
        let err = conn.execute_batch("SELEC 1").expect_err("syntax");
        assert_eq!(map_sqlite_error(err).category(), "query");
    }
}

// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;
use tracing::{debug, info};
use wasla_golive_core::StoreError;

use crate::errors::map_sqlite_error;

/// Ordered schema migrations; entry `n` moves `user_version` from `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[
    "
    CREATE TABLE tenants (
      tenant_id TEXT PRIMARY KEY,
      name TEXT NOT NULL,
      contact_email TEXT,
      description TEXT,
      currency TEXT,
      logo_url TEXT
    ) WITHOUT ROWID;
    CREATE TABLE branding (
      tenant_id TEXT PRIMARY KEY REFERENCES tenants(tenant_id) ON DELETE CASCADE,
      theme_code TEXT,
      primary_color TEXT,
      secondary_color TEXT,
      accent_color TEXT,
      font_family TEXT
    ) WITHOUT ROWID;
    CREATE TABLE payment_methods (
      tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id) ON DELETE CASCADE,
      provider TEXT NOT NULL,
      enabled INTEGER NOT NULL,
      PRIMARY KEY (tenant_id, provider)
    ) WITHOUT ROWID;
    CREATE TABLE products (
      tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id) ON DELETE CASCADE,
      sku TEXT NOT NULL,
      name TEXT NOT NULL,
      price_minor INTEGER NOT NULL,
      published INTEGER NOT NULL,
      image_count INTEGER NOT NULL DEFAULT 0,
      PRIMARY KEY (tenant_id, sku)
    ) WITHOUT ROWID;
    ",
    "
    CREATE TABLE shipping_zones (
      tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id) ON DELETE CASCADE,
      name TEXT NOT NULL,
      enabled INTEGER NOT NULL,
      PRIMARY KEY (tenant_id, name)
    ) WITHOUT ROWID;
    CREATE TABLE legal_pages (
      tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id) ON DELETE CASCADE,
      kind TEXT NOT NULL,
      published INTEGER NOT NULL,
      PRIMARY KEY (tenant_id, kind)
    ) WITHOUT ROWID;
    CREATE TABLE custom_domains (
      hostname TEXT PRIMARY KEY,
      tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id) ON DELETE CASCADE,
      verified INTEGER NOT NULL,
      ssl_active INTEGER NOT NULL
    ) WITHOUT ROWID;
    CREATE INDEX custom_domains_tenant ON custom_domains (tenant_id);
    ",
];

pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

pub fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(map_sqlite_error)
}

pub fn ensure_current(conn: &Connection) -> Result<(), StoreError> {
    let version = schema_version(conn)?;
    if version < SCHEMA_VERSION {
        return Err(StoreError::NotReady {
            detail: format!("schema at version {version}, expected {SCHEMA_VERSION}"),
        });
    }
    if version > SCHEMA_VERSION {
        return Err(StoreError::Query {
            detail: format!("schema version {version} is newer than supported {SCHEMA_VERSION}"),
        });
    }
    Ok(())
}

/// Applies pending migrations and returns the `(from, to)` versions.
pub fn migrate(conn: &mut Connection) -> Result<(i64, i64), StoreError> {
    let from = schema_version(conn)?;
    if from > SCHEMA_VERSION {
        return Err(StoreError::Query {
            detail: format!("schema version {from} is newer than supported {SCHEMA_VERSION}"),
        });
    }
    let applied = usize::try_from(from).unwrap_or(0);
    let tx = conn.transaction().map_err(map_sqlite_error)?;
    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        tx.execute_batch(sql).map_err(map_sqlite_error)?;
        debug!(version = idx + 1, "store_migration_applied");
    }
    tx.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))
        .map_err(map_sqlite_error)?;
    tx.commit().map_err(map_sqlite_error)?;
    if from < SCHEMA_VERSION {
        info!(from, to = SCHEMA_VERSION, "store_migrations_applied");
    }
    Ok((from, SCHEMA_VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_not_ready_until_migrated() {
        let mut conn = Connection::open_in_memory().expect("open");
        let err = ensure_current(&conn).expect_err("fresh schema");
        assert!(err.is_not_ready());

        assert_eq!(migrate(&mut conn).expect("migrate"), (0, SCHEMA_VERSION));
        ensure_current(&conn).expect("current");
        assert_eq!(
            migrate(&mut conn).expect("re-migrate"),
            (SCHEMA_VERSION, SCHEMA_VERSION)
        );
    }

    #[test]
    fn partial_schema_is_upgraded_in_place() {
        let mut conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(MIGRATIONS[0]).expect("v1");
        conn.execute_batch("PRAGMA user_version=1;").expect("version");
        assert!(ensure_current(&conn).expect_err("behind").is_not_ready());

        assert_eq!(migrate(&mut conn).expect("migrate"), (1, SCHEMA_VERSION));
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'custom_domains'",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(tables, 1);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().expect("open");
        conn.execute_batch("PRAGMA user_version=99;").expect("version");
        let err = migrate(&mut conn).expect_err("newer");
        assert_eq!(err.category(), "query");
    }
}

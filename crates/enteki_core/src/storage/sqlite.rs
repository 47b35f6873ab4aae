//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Connections must come from `db::open_db*` so `kv_entries` exists.
//! - `set` is an upsert; a key maps to at most one row.

use super::{KeyValueStore, StoreResult};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|source| entry_error(key, source))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )
        .map_err(|source| entry_error(key, source))?;
        Ok(())
    }
}

fn entry_error(key: &str, source: rusqlite::Error) -> DbError {
    DbError::Entry {
        key: key.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKeyValueStore;
    use crate::db::{open_db_in_memory, DbError};
    use crate::storage::{KeyValueStore, StoreError};

    #[test]
    fn set_upserts_and_get_reads_back() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteKeyValueStore::new(&conn);

        assert_eq!(store.get("tools").unwrap(), None);
        store.set("tools", "[]").unwrap();
        store.set("tools", r#"[{"name":"a","type":"bow"}]"#).unwrap();

        assert_eq!(
            store.get("tools").unwrap().as_deref(),
            Some(r#"[{"name":"a","type":"bow"}]"#)
        );
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn entry_failures_name_the_key() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch("DROP TABLE kv_entries;").unwrap();
        let mut store = SqliteKeyValueStore::new(&conn);

        let err = store.set("records", "{}").unwrap_err();
        match err {
            StoreError::Db(DbError::Entry { key, .. }) => assert_eq!(key, "records"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.get("tools").unwrap_err().to_string().contains("`tools`"));
    }
}

use super::{KeyValueStore, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store over the `kv_entries` table.
///
/// Expects a connection returned by [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`], so the table already exists.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=storage status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKeyValueStore;
    use crate::db::open_db_in_memory;
    use crate::storage::KeyValueStore;

    #[test]
    fn upsert_replaces_the_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);

        assert_eq!(store.get("ce_theme").unwrap(), None);
        store.set("ce_theme", "dark").unwrap();
        store.set("ce_theme", "light").unwrap();
        assert_eq!(store.get("ce_theme").unwrap().as_deref(), Some("light"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);
        store.set("ce_installed", "1").unwrap();

        store.remove("ce_installed").unwrap();
        store.remove("ce_installed").unwrap();
        assert_eq!(store.get("ce_installed").unwrap(), None);
    }
}

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::kv::KvStore;

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn()?
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn()?.execute("DELETE FROM kv_entries", [])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_entries ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_read() {
        let db = Database::open_in_memory().unwrap();
        db.set("theme", "light").unwrap();
        db.set("theme", "dark").unwrap();

        assert_eq!(db.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(db.get("missing").unwrap(), None);
        assert_eq!(db.keys().unwrap(), vec!["theme".to_string()]);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("iesgo_swipes", "[]").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("iesgo_swipes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_remove_many_and_clear() {
        let db = Database::open_in_memory().unwrap();
        for key in ["a", "b", "c"] {
            db.set(key, "x").unwrap();
        }

        db.remove_many(&["a", "c"]).unwrap();
        assert_eq!(db.keys().unwrap(), vec!["b".to_string()]);
        assert!(db.remove("b").unwrap());

        db.set("z", "1").unwrap();
        db.clear().unwrap();
        assert!(db.keys().unwrap().is_empty());
    }
}

//! Scalar preference storage.
//!
//! Mirrors a platform user-defaults store: independent keys, each holding
//! one floating-point value. Missing keys read as `None`.

use super::RepoResult;
use rusqlite::{Connection, OptionalExtension};

/// Repository interface for scalar preferences.
pub trait PreferenceRepository {
    fn get_f64(&self, key: &str) -> RepoResult<Option<f64>>;
    fn set_f64(&self, key: &str, value: f64) -> RepoResult<()>;
}

/// SQLite-backed preference repository.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn get_f64(&self, key: &str) -> RepoResult<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_f64(&self, key: &str, value: f64) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

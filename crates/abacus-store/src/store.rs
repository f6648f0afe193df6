use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use abacus_core::persist::{CUSTOM_THEMES_KEY, STATE_KEY};
use abacus_core::time::now_unix_millis;
use abacus_core::{PersistedState, ThemeCatalog};

use crate::error::Result;
use crate::schema;

/// Key/value storage for one calculator profile.
pub struct Store {
    conn: Connection,
}

/// Row counts and timestamps for `abacus stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub keys: usize,
    pub bytes: usize,
    pub last_updated: Option<u64>,
    pub history_entries: usize,
    pub custom_themes: usize,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Raw keyed storage ---

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now_unix_millis() as i64],
        )?;
        Ok(())
    }

    /// Returns whether the key existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM storage WHERE key = ?1", [key])?;
        Ok(n > 0)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    // --- Calculator state ---

    /// The persisted calculator fields. Absent or unreadable state falls back
    /// to defaults; an unreadable value is logged, not returned as an error.
    pub fn load_state(&self) -> Result<PersistedState> {
        let Some(json) = self.get(STATE_KEY)? else {
            return Ok(PersistedState::default());
        };
        match PersistedState::from_json(&json) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!("stored calculator state is unreadable, using defaults: {e}");
                Ok(PersistedState::default())
            }
        }
    }

    pub fn save_state(&self, state: &PersistedState) -> Result<()> {
        let json = state.to_json()?;
        self.put(STATE_KEY, &json)?;
        tracing::debug!(
            history = state.history.len(),
            bytes = json.len(),
            "saved calculator state"
        );
        Ok(())
    }

    pub fn load_custom_themes(&self) -> Result<ThemeCatalog> {
        let Some(json) = self.get(CUSTOM_THEMES_KEY)? else {
            return Ok(ThemeCatalog::new());
        };
        match serde_json::from_str(&json) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                tracing::warn!("stored custom themes are unreadable, ignoring: {e}");
                Ok(ThemeCatalog::new())
            }
        }
    }

    pub fn save_custom_themes(&self, catalog: &ThemeCatalog) -> Result<()> {
        let json = serde_json::to_string(catalog)?;
        self.put(CUSTOM_THEMES_KEY, &json)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let (keys, bytes, last_updated): (i64, i64, Option<i64>) = self.conn.query_row(
            "SELECT count(*), coalesce(sum(length(value)), 0), max(updated_at) FROM storage",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(StoreStats {
            keys: keys as usize,
            bytes: bytes as usize,
            last_updated: last_updated.map(|t| t as u64),
            history_entries: self.load_state()?.history.len(),
            custom_themes: self.load_custom_themes()?.themes().len(),
        })
    }
}

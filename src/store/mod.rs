//! Persistence - the full application state as one JSON document in a
//! local SQLite key-value slot

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::state::{overlay_defaults, AppState};

/// Fixed key the whole state document lives under.
const STATE_KEY: &str = "gym_tracker_simple_v2";

/// Durable local store wrapper.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store file.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Serialize the complete state and overwrite the previous document.
    /// Called after every mutation.
    pub fn save(&self, state: &AppState) -> Result<()> {
        let doc = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO app_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![STATE_KEY, doc],
        )?;
        debug!(bytes = doc.len(), "state saved");
        Ok(())
    }

    /// Load the persisted state. A missing key or malformed document falls
    /// back to the built-in defaults; only the store itself failing is an
    /// error.
    pub fn load(&self) -> Result<AppState> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(text) = raw else {
            debug!("no persisted state, starting from defaults");
            return Ok(AppState::default_state());
        };

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(parsed) => Ok(overlay_defaults(&parsed)),
            Err(err) => {
                warn!("malformed persisted state, falling back to defaults: {err}");
                Ok(AppState::default_state())
            }
        }
    }
}

//! Domain model - sessions, log entries and the application state

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::plan::SESSION_DEFS;

/// Number of set inputs per log entry.
pub const MAX_SETS: usize = 4;

/// One workout day: display name plus ordered exercise list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub exercises: Vec<String>,
}

/// A single (weight, reps) pair, kept as entered. Values are free-form
/// strings and only interpreted as numbers by the stats module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub w: String,
    pub r: String,
}

impl SetEntry {
    pub fn new(w: impl Into<String>, r: impl Into<String>) -> Self {
        Self {
            w: w.into(),
            r: r.into(),
        }
    }

    /// Both fields blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.w.trim().is_empty() && self.r.trim().is_empty()
    }
}

/// One completed exercise instance. Append/delete only, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    pub session_key: String,
    /// Session name snapshotted at creation time, not re-derived later.
    pub session_name: String,
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
    #[serde(default)]
    pub notes: String,
}

/// The whole persisted application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub sessions: BTreeMap<String, Session>,
    pub logs: Vec<LogEntry>,
}

impl AppState {
    /// Built-in default: the fixed three-day split, no logs.
    pub fn default_state() -> Self {
        let sessions = SESSION_DEFS
            .iter()
            .map(|def| {
                (
                    def.key.to_string(),
                    Session {
                        name: def.name.to_string(),
                        exercises: def.exercises.iter().map(|x| x.to_string()).collect(),
                    },
                )
            })
            .collect();
        Self {
            sessions,
            logs: Vec::new(),
        }
    }

    /// Record a new log entry. Sets where both fields are blank are dropped
    /// and at most [`MAX_SETS`] are kept; if nothing remains the call is a
    /// no-op and returns `None` ("nothing to save").
    pub fn add_log(
        &mut self,
        session_key: &str,
        exercise_name: &str,
        sets: Vec<SetEntry>,
        notes: &str,
    ) -> Option<&LogEntry> {
        let cleaned: Vec<SetEntry> = sets
            .into_iter()
            .map(|s| SetEntry::new(s.w.trim(), s.r.trim()))
            .filter(|s| !s.is_blank())
            .take(MAX_SETS)
            .collect();
        if cleaned.is_empty() {
            return None;
        }

        let session_name = self
            .sessions
            .get(session_key)
            .map(|s| s.name.clone())
            .unwrap_or_default();

        let ts = Utc::now().timestamp_millis();
        let entry = LogEntry {
            id: new_log_id(ts),
            ts,
            session_key: session_key.to_string(),
            session_name,
            exercise_name: exercise_name.to_string(),
            sets: cleaned,
            notes: notes.trim().to_string(),
        };
        self.logs.insert(0, entry);
        self.logs.first()
    }

    /// Remove the entry with the given id. No-op when absent.
    pub fn delete_log(&mut self, id: &str) -> bool {
        let before = self.logs.len();
        self.logs.retain(|l| l.id != id);
        self.logs.len() != before
    }
}

/// Merge a parsed persisted/imported document over the built-in defaults.
/// Sessions overlay per top-level key (persisted wins, no deep merge of
/// exercise lists); the log list is taken only when it is a sequence, and
/// entries that fail to parse are skipped so one corrupt entry never
/// discards the rest.
pub fn overlay_defaults(parsed: &Value) -> AppState {
    let mut state = AppState::default_state();

    if let Some(sessions) = parsed.get("sessions").and_then(|v| v.as_object()) {
        for (key, raw) in sessions {
            match serde_json::from_value::<Session>(raw.clone()) {
                Ok(session) => {
                    state.sessions.insert(key.clone(), session);
                }
                Err(err) => {
                    tracing::warn!("ignoring malformed session {key:?}: {err}");
                }
            }
        }
    }

    if let Some(raw) = parsed.get("logs").and_then(|v| v.as_array()) {
        let mut logs = Vec::with_capacity(raw.len());
        for (i, item) in raw.iter().enumerate() {
            match serde_json::from_value::<LogEntry>(item.clone()) {
                Ok(log) => logs.push(log),
                Err(err) => {
                    tracing::warn!("ignoring malformed log entry at index {i}: {err}");
                }
            }
        }
        state.logs = logs;
    }

    state
}

/// Fresh identifier: random component plus the creation timestamp in hex.
/// Collision-resistant for a single writer, no global coordination needed.
pub fn new_log_id(ts: i64) -> String {
    let salt: u64 = rand::random();
    format!("{salt:016x}{ts:x}")
}

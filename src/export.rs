//! Export / import - CSV log export, JSON backup and restore

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat, TimeZone, Utc};

use crate::state::{overlay_defaults, AppState, LogEntry, MAX_SETS};
use crate::stats::log_volume;

pub const CSV_HEADERS: [&str; 13] = [
    "timestamp",
    "session",
    "exercise",
    "set1_kg",
    "set1_reps",
    "set2_kg",
    "set2_reps",
    "set3_kg",
    "set3_reps",
    "set4_kg",
    "set4_reps",
    "notes",
    "volume",
];

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn iso_ts(ts: i64) -> String {
    Utc.timestamp_millis_opt(ts)
        .single()
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Render all logs as CSV, one row per log in ascending timestamp order.
/// Every data field is quoted with internal quote-doubling; notes have
/// newlines collapsed to spaces; volume is rounded to the nearest integer.
pub fn logs_to_csv(logs: &[LogEntry]) -> String {
    let mut sorted: Vec<&LogEntry> = logs.iter().collect();
    sorted.sort_by_key(|l| l.ts);

    let mut out = CSV_HEADERS.join(",");
    for log in sorted {
        let mut fields: Vec<String> = vec![
            iso_ts(log.ts),
            log.session_name.clone(),
            log.exercise_name.clone(),
        ];
        for i in 0..MAX_SETS {
            fields.push(log.sets.get(i).map(|s| s.w.clone()).unwrap_or_default());
            fields.push(log.sets.get(i).map(|s| s.r.clone()).unwrap_or_default());
        }
        fields.push(log.notes.replace('\n', " "));
        fields.push((log_volume(log).round() as i64).to_string());

        out.push('\n');
        let row: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
        out.push_str(&row.join(","));
    }
    out
}

/// Full state as a pretty-printed document, suitable for later import.
pub fn backup_to_json(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parse a backup document. Parse failure is an error the caller must
/// surface; a parseable document goes through the same default-overlay as
/// a normal load (missing sessions fall back to defaults, a non-sequence
/// log list falls back to empty).
pub fn import_backup(text: &str) -> Result<AppState> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).context("backup is not a valid JSON document")?;
    Ok(overlay_defaults(&parsed))
}

pub fn csv_filename() -> String {
    format!("gym_logs_{}.csv", Local::now().format("%Y-%m-%d"))
}

pub fn backup_filename() -> String {
    format!("gym_backup_{}.json", Local::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SetEntry;

    fn make_log(id: &str, exercise: &str, ts: i64, sets: &[(&str, &str)]) -> LogEntry {
        LogEntry {
            id: id.into(),
            ts,
            session_key: "A".into(),
            session_name: "A – Upper Body".into(),
            exercise_name: exercise.into(),
            sets: sets.iter().map(|(w, r)| SetEntry::new(*w, *r)).collect(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_csv_header_row() {
        let csv = logs_to_csv(&[]);
        assert_eq!(
            csv,
            "timestamp,session,exercise,set1_kg,set1_reps,set2_kg,set2_reps,\
             set3_kg,set3_reps,set4_kg,set4_reps,notes,volume"
        );
    }

    #[test]
    fn test_csv_row_layout_and_blank_sets() {
        let log = make_log("x", "Bench Press", 0, &[("100", "5"), ("100", "4")]);
        let csv = logs_to_csv(&[log]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"1970-01-01T00:00:00.000Z\",\"A – Upper Body\",\"Bench Press\",\
             \"100\",\"5\",\"100\",\"4\",\"\",\"\",\"\",\"\",\"\",\"900\""
        );
    }

    #[test]
    fn test_csv_rows_ascend_by_timestamp() {
        let logs = vec![
            make_log("b", "Back Squat", 5000, &[("90", "5")]),
            make_log("a", "Bench Press", 1000, &[("100", "5")]),
        ];
        let csv = logs_to_csv(&logs);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Bench Press"));
        assert!(lines[2].contains("Back Squat"));
    }

    #[test]
    fn test_csv_quoting_and_notes_newlines() {
        let mut log = make_log("x", "Farmer's \"heavy\" Carry", 0, &[("40", "1")]);
        log.notes = "line one\nline two".into();
        let csv = logs_to_csv(&[log]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"Farmer's \"\"heavy\"\" Carry\""));
        assert!(row.contains("\"line one line two\""));
    }

    #[test]
    fn test_backup_round_trip() {
        let mut state = AppState::default_state();
        state.add_log(
            "B",
            "Back Squat",
            vec![SetEntry::new("120", "5"), SetEntry::new("120", "4")],
            "belt on",
        );
        state.add_log("A", "Bench Press", vec![SetEntry::new("100", "5")], "");

        let backup = backup_to_json(&state).unwrap();
        let restored = import_backup(&backup).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_import_malformed_fails_without_touching_state() {
        let mut state = AppState::default_state();
        state.add_log("A", "Bench Press", vec![SetEntry::new("100", "5")], "");
        let snapshot = state.clone();

        assert!(import_backup("{ definitely not json").is_err());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_import_empty_object_is_defaults() {
        let restored = import_backup("{}").unwrap();
        assert_eq!(restored, AppState::default_state());
    }

    #[test]
    fn test_filenames_are_date_stamped() {
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(csv_filename(), format!("gym_logs_{today}.csv"));
        assert_eq!(backup_filename(), format!("gym_backup_{today}.json"));
    }
}

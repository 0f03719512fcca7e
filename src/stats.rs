//! Statistics engine - pure aggregations over the log list
//!
//! Everything here is recomputed from the full log list on each read; at
//! tens to low thousands of records there is nothing worth caching.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Local, TimeZone};

use crate::state::LogEntry;

/// Per-exercise aggregate across all logs for that exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseStats {
    pub exercise: String,
    /// Max single-set weight ever recorded; strictly greater values update
    /// the record, so equal values keep the earliest timestamp.
    pub best_weight: f64,
    pub best_weight_ts: Option<i64>,
    /// Best per-log total volume, same tie-break rule.
    pub best_volume: f64,
    pub best_volume_ts: Option<i64>,
    pub last_ts: Option<i64>,
    pub last_weight: f64,
    pub last_volume: f64,
}

/// One Monday-aligned calendar week with any logged volume.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub week_ts: i64,
    pub label: String,
    pub volume: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    /// At most 8 buckets, ascending by week start.
    pub weeks: Vec<WeekBucket>,
    /// Max bucket volume, floored at 1 for relative-scaling consumers.
    pub max_weekly: i64,
}

fn parse_num(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Total volume of one log: Σ weight × reps over its sets, skipping any set
/// where either value does not parse as a finite number.
pub fn log_volume(log: &LogEntry) -> f64 {
    log.sets
        .iter()
        .filter_map(|s| Some(parse_num(&s.w)? * parse_num(&s.r)?))
        .sum()
}

/// Heaviest parseable single-set weight in one log, 0 when none parse.
pub fn max_set_weight(log: &LogEntry) -> f64 {
    log.sets
        .iter()
        .filter_map(|s| parse_num(&s.w))
        .fold(0.0, f64::max)
}

/// The chronologically latest log for an exercise (exact, case-sensitive
/// name match). Used to pre-fill a new entry with the previous numbers.
pub fn last_for<'a>(logs: &'a [LogEntry], exercise: &str) -> Option<&'a LogEntry> {
    logs.iter()
        .filter(|l| l.exercise_name == exercise)
        .max_by_key(|l| l.ts)
}

/// Per-exercise PRs and latest values, sorted by exercise name. Exercises
/// with no logs are absent.
pub fn exercise_stats(logs: &[LogEntry]) -> Vec<ExerciseStats> {
    let mut by_exercise: BTreeMap<&str, ExerciseStats> = BTreeMap::new();

    for log in logs {
        let vol = log_volume(log);
        let max_w = max_set_weight(log);

        let entry = by_exercise
            .entry(log.exercise_name.as_str())
            .or_insert_with(|| ExerciseStats {
                exercise: log.exercise_name.clone(),
                best_weight: 0.0,
                best_weight_ts: None,
                best_volume: 0.0,
                best_volume_ts: None,
                last_ts: None,
                last_weight: 0.0,
                last_volume: 0.0,
            });

        if entry.last_ts.map_or(true, |t| log.ts > t) {
            entry.last_ts = Some(log.ts);
            entry.last_weight = max_w;
            entry.last_volume = vol;
        }

        if max_w > entry.best_weight {
            entry.best_weight = max_w;
            entry.best_weight_ts = Some(log.ts);
        }
        if vol > entry.best_volume {
            entry.best_volume = vol;
            entry.best_volume_ts = Some(log.ts);
        }
    }

    by_exercise.into_values().collect()
}

/// Start of the Monday-aligned local calendar week containing `ts`, as
/// epoch milliseconds. Falls back to `ts` itself on unrepresentable local
/// times.
pub fn week_start_ms(ts: i64) -> i64 {
    let Some(dt) = Local.timestamp_millis_opt(ts).single() else {
        return ts;
    };
    let monday = dt.date_naive() - Duration::days(dt.weekday().num_days_from_monday() as i64);
    let Some(midnight) = monday.and_hms_opt(0, 0, 0) else {
        return ts;
    };
    match Local.from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp_millis(),
        None => ts,
    }
}

/// Weekly volume totals: the most recent 8 weeks with any data, ascending.
pub fn weekly_series(logs: &[LogEntry]) -> WeeklySeries {
    let mut by_week: BTreeMap<i64, f64> = BTreeMap::new();
    for log in logs {
        *by_week.entry(week_start_ms(log.ts)).or_insert(0.0) += log_volume(log);
    }

    let skip = by_week.len().saturating_sub(8);
    let weeks: Vec<WeekBucket> = by_week
        .into_iter()
        .skip(skip)
        .map(|(week_ts, vol)| WeekBucket {
            week_ts,
            label: fmt_day(week_ts),
            volume: vol.round() as i64,
        })
        .collect();

    let max_weekly = weeks.iter().map(|w| w.volume).max().unwrap_or(0).max(1);
    WeeklySeries { weeks, max_weekly }
}

/// Total volume logged in the trailing 7 days.
pub fn volume_last_7_days(logs: &[LogEntry], now_ms: i64) -> f64 {
    let cutoff = now_ms - 7 * 24 * 3600 * 1000;
    logs.iter()
        .filter(|l| l.ts >= cutoff)
        .map(log_volume)
        .sum()
}

/// Short local date label, e.g. "Oct 07".
pub fn fmt_day(ts: i64) -> String {
    Local
        .timestamp_millis_opt(ts)
        .single()
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Local date-time label for log listings, e.g. "Oct 07 18:42".
pub fn fmt_ts(ts: i64) -> String {
    Local
        .timestamp_millis_opt(ts)
        .single()
        .map(|d| d.format("%b %d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SetEntry;

    const DAY_MS: i64 = 24 * 3600 * 1000;

    fn make_log(exercise: &str, ts: i64, sets: &[(&str, &str)]) -> LogEntry {
        LogEntry {
            id: format!("test-{ts}"),
            ts,
            session_key: "A".into(),
            session_name: "A – Upper Body".into(),
            exercise_name: exercise.into(),
            sets: sets.iter().map(|(w, r)| SetEntry::new(*w, *r)).collect(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_volume_skips_unparseable_sets() {
        // 100×5 + 100×4, third set invalid
        let log = make_log(
            "Bench Press",
            0,
            &[("100", "5"), ("100", "4"), ("invalid", "3")],
        );
        assert_eq!(log_volume(&log), 900.0);
        assert_eq!(max_set_weight(&log), 100.0);
    }

    #[test]
    fn test_volume_empty_and_nonfinite() {
        let log = make_log("Bench Press", 0, &[("", "5"), ("inf", "2"), ("60", "")]);
        assert_eq!(log_volume(&log), 0.0);
        assert_eq!(max_set_weight(&log), 0.0);
    }

    #[test]
    fn test_volume_invariant_to_set_order() {
        let a = make_log("Bench Press", 0, &[("100", "5"), ("80", "8"), ("x", "1")]);
        let b = make_log("Bench Press", 0, &[("x", "1"), ("80", "8"), ("100", "5")]);
        assert_eq!(log_volume(&a), log_volume(&b));
    }

    #[test]
    fn test_best_weight_takes_later_heavier_log() {
        let logs = vec![
            make_log("Back Squat", 1000, &[("80", "5")]),
            make_log("Back Squat", 2000, &[("90", "5")]),
        ];
        let stats = exercise_stats(&logs);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].best_weight, 90.0);
        assert_eq!(stats[0].best_weight_ts, Some(2000));
        assert_eq!(stats[0].last_weight, 90.0);
        assert_eq!(stats[0].last_ts, Some(2000));
    }

    #[test]
    fn test_best_weight_tie_keeps_earliest_ts() {
        let logs = vec![
            make_log("Bench Press", 1000, &[("100", "5")]),
            make_log("Bench Press", 2000, &[("100", "3")]),
        ];
        let stats = exercise_stats(&logs);
        assert_eq!(stats[0].best_weight, 100.0);
        assert_eq!(stats[0].best_weight_ts, Some(1000));
        // last values still come from the latest log
        assert_eq!(stats[0].last_ts, Some(2000));
        assert_eq!(stats[0].last_volume, 300.0);
    }

    #[test]
    fn test_best_values_monotone_as_logs_accumulate() {
        let weights = ["60", "80", "70", "90", "85"];
        let mut logs = Vec::new();
        let mut prev_best = 0.0;
        for (i, w) in weights.iter().enumerate() {
            logs.push(make_log("Back Squat", i as i64 * 1000, &[(*w, "5")]));
            let best = exercise_stats(&logs)[0].best_weight;
            assert!(best >= prev_best);
            assert!(best <= 90.0);
            prev_best = best;
        }
        assert_eq!(prev_best, 90.0);
    }

    #[test]
    fn test_stats_sorted_by_exercise_name() {
        let logs = vec![
            make_log("Rope Pushdown", 1, &[("20", "12")]),
            make_log("Bench Press", 2, &[("100", "5")]),
            make_log("Dead Bug", 3, &[("0", "10")]),
        ];
        let names: Vec<_> = exercise_stats(&logs)
            .into_iter()
            .map(|s| s.exercise)
            .collect();
        assert_eq!(names, vec!["Bench Press", "Dead Bug", "Rope Pushdown"]);
    }

    #[test]
    fn test_last_for_picks_latest() {
        let logs = vec![
            make_log("Bench Press", 2000, &[("100", "5")]),
            make_log("Bench Press", 5000, &[("95", "8")]),
            make_log("Back Squat", 9000, &[("120", "3")]),
        ];
        let last = last_for(&logs, "Bench Press").unwrap();
        assert_eq!(last.ts, 5000);
        assert!(last_for(&logs, "Deadlift").is_none());
    }

    #[test]
    fn test_weekly_series_three_weeks_ascending() {
        // 14 days apart guarantees distinct calendar weeks in any timezone
        let base = 1_700_000_000_000;
        let logs = vec![
            make_log("Bench Press", base, &[("100", "1")]),
            make_log("Bench Press", base + 14 * DAY_MS, &[("200", "1")]),
            make_log("Bench Press", base + 28 * DAY_MS, &[("300", "1")]),
        ];
        let series = weekly_series(&logs);
        assert_eq!(series.weeks.len(), 3);
        let vols: Vec<_> = series.weeks.iter().map(|w| w.volume).collect();
        assert_eq!(vols, vec![100, 200, 300]);
        assert!(series.weeks.windows(2).all(|w| w[0].week_ts < w[1].week_ts));
        assert_eq!(series.max_weekly, 300);
    }

    #[test]
    fn test_weekly_series_caps_at_eight_weeks() {
        let base = 1_700_000_000_000;
        let logs: Vec<_> = (0..10)
            .map(|i| make_log("Bench Press", base + i * 14 * DAY_MS, &[("10", "1")]))
            .collect();
        let series = weekly_series(&logs);
        assert_eq!(series.weeks.len(), 8);
        // the oldest two weeks fall off
        assert_eq!(series.weeks[0].week_ts, week_start_ms(base + 2 * 14 * DAY_MS));
    }

    #[test]
    fn test_weekly_series_groups_same_week() {
        let base = 1_700_000_000_000;
        // an hour apart, same day, same week everywhere
        let logs = vec![
            make_log("Bench Press", base, &[("100", "2")]),
            make_log("Back Squat", base + 3_600_000, &[("50", "2")]),
        ];
        let series = weekly_series(&logs);
        assert_eq!(series.weeks.len(), 1);
        assert_eq!(series.weeks[0].volume, 300);
        assert!(!series.weeks[0].label.is_empty());
    }

    #[test]
    fn test_weekly_series_empty_logs() {
        let series = weekly_series(&[]);
        assert!(series.weeks.is_empty());
        assert_eq!(series.max_weekly, 1);
    }

    #[test]
    fn test_volume_last_7_days() {
        let now = 1_700_000_000_000;
        let logs = vec![
            make_log("Bench Press", now - DAY_MS, &[("100", "5")]),
            make_log("Bench Press", now - 10 * DAY_MS, &[("100", "5")]),
        ];
        assert_eq!(volume_last_7_days(&logs, now), 500.0);
    }
}

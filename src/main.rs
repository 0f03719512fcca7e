//! gymlog - Personal gym set logger
//!
//! Fast kg × reps logging, offline, export CSV.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use gymlog::export;
use gymlog::plan;
use gymlog::state::{SetEntry, MAX_SETS};
use gymlog::stats;
use gymlog::store::Store;
use gymlog::tui::App;

const DB_PATH: &str = "gymlog.db";

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(author, version, about = "Personal gym set logger - kg × reps, PRs, weekly volume")]
struct Cli {
    /// Store file path
    #[arg(long, default_value = DB_PATH)]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Log an exercise with up to four sets
    Log {
        /// Session code (A, B or C)
        session: String,

        /// Exercise name, e.g. "Bench Press"
        exercise: String,

        /// A set as WEIGHTxREPS, e.g. 100x5 (repeat up to 4 times)
        #[arg(short, long = "set")]
        sets: Vec<String>,

        /// Optional notes, e.g. "RPE 8"
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List recent logs
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "12")]
        limit: usize,
    },

    /// Delete a log by id
    Delete {
        id: String,
    },

    /// Show a session's plan with warm-up, cool-down and last numbers
    Plan {
        /// Session code (A, B or C)
        session: String,

        /// Filter exercises by substring
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show PRs and weekly volume
    Stats {
        /// Filter by exercise name (exact)
        exercise: Option<String>,
    },

    /// Export all logs as CSV
    Export {
        /// Output path (default: gym_logs_<date>.csv)
        output: Option<PathBuf>,
    },

    /// Write a full JSON backup
    Backup {
        /// Output path (default: gym_backup_<date>.json)
        output: Option<PathBuf>,
    },

    /// Restore state from a JSON backup
    Restore {
        input: PathBuf,
    },
}

fn parse_set(raw: &str) -> Result<SetEntry> {
    let (w, r) = raw
        .split_once(['x', 'X', '×'])
        .with_context(|| format!("set {raw:?} is not in WEIGHTxREPS form, e.g. 100x5"))?;
    Ok(SetEntry::new(w, r))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = Store::open(&cli.db)?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(store)?;
            app.run()?;
        }

        Some(Commands::Log { session, exercise, sets, notes }) => {
            let mut state = store.load()?;
            if !state.sessions.contains_key(&session) {
                let known: Vec<_> = state.sessions.keys().cloned().collect();
                bail!("unknown session {session:?} (have: {})", known.join(", "));
            }
            if sets.len() > MAX_SETS {
                bail!("at most {MAX_SETS} sets per log");
            }
            let sets = sets
                .iter()
                .map(|s| parse_set(s))
                .collect::<Result<Vec<_>>>()?;

            let saved = state
                .add_log(&session, &exercise, sets, notes.as_deref().unwrap_or(""))
                .map(|l| (l.id.clone(), stats::log_volume(l)));
            match saved {
                Some((id, vol)) => {
                    store.save(&state)?;
                    println!("Logged: {} - vol {} (id: {})", exercise, vol.round() as i64, id);
                }
                None => println!("Nothing to save: all sets were blank."),
            }
        }

        Some(Commands::List { limit }) => {
            let state = store.load()?;
            let mut logs: Vec<_> = state.logs.iter().collect();
            logs.sort_by_key(|l| std::cmp::Reverse(l.ts));

            println!("Recent logs ({} total):", state.logs.len());
            println!("{:-<72}", "");
            for l in logs.iter().take(limit) {
                let sets = l
                    .sets
                    .iter()
                    .map(|s| format!("{}×{}", s.w, s.r))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "{} | {} | {:24} | {:16} | vol {}",
                    l.id,
                    stats::fmt_ts(l.ts),
                    l.exercise_name,
                    sets,
                    stats::log_volume(l).round() as i64,
                );
            }
        }

        Some(Commands::Delete { id }) => {
            let mut state = store.load()?;
            if state.delete_log(&id) {
                store.save(&state)?;
                println!("Deleted log {id}");
            } else {
                println!("No log with id {id}");
            }
        }

        Some(Commands::Plan { session, search }) => {
            let state = store.load()?;
            let Some(sess) = state.sessions.get(&session) else {
                let known: Vec<_> = state.sessions.keys().cloned().collect();
                bail!("unknown session {session:?} (have: {})", known.join(", "));
            };

            println!("{}", sess.name);
            if let Some(def) = plan::find_session_def(&session) {
                println!("\n5-min warm-up:");
                for item in def.warmup {
                    println!("  - {item}");
                }
            }

            println!("\nExercises:");
            let query = search.as_deref().unwrap_or("");
            for ex in plan::filter_exercises(&sess.exercises, query) {
                match stats::last_for(&state.logs, ex) {
                    Some(last) => {
                        let first = last.sets.first().cloned().unwrap_or_default();
                        println!(
                            "  {:26} Last: {}kg × {} • {}",
                            ex,
                            if first.w.is_empty() { "—" } else { first.w.as_str() },
                            if first.r.is_empty() { "—" } else { first.r.as_str() },
                            stats::fmt_ts(last.ts),
                        );
                    }
                    None => println!("  {ex:26} No history yet"),
                }
            }

            if let Some(def) = plan::find_session_def(&session) {
                println!("\n5-min cool-down:");
                for item in def.cooldown {
                    println!("  - {item}");
                }
            }
        }

        Some(Commands::Stats { exercise }) => {
            let state = store.load()?;

            if let Some(ex) = exercise {
                let all = stats::exercise_stats(&state.logs);
                let Some(s) = all.into_iter().find(|s| s.exercise == ex) else {
                    println!("No logs yet for {ex:?}");
                    return Ok(());
                };
                println!("{}", s.exercise);
                println!("{:-<40}", "");
                println!(
                    "Best kg:  {} ({})",
                    s.best_weight,
                    s.best_weight_ts.map(stats::fmt_day).unwrap_or_default()
                );
                println!(
                    "Best vol: {} ({})",
                    s.best_volume.round() as i64,
                    s.best_volume_ts.map(stats::fmt_day).unwrap_or_default()
                );
                println!(
                    "Last:     {}kg, vol {} ({})",
                    s.last_weight,
                    s.last_volume.round() as i64,
                    s.last_ts.map(stats::fmt_ts).unwrap_or_default()
                );
                if let Some(last) = stats::last_for(&state.logs, &s.exercise) {
                    let sets = last
                        .sets
                        .iter()
                        .map(|x| format!("{}×{}", x.w, x.r))
                        .collect::<Vec<_>>()
                        .join(" ");
                    println!("Previous sets: {sets}");
                }
            } else {
                let now = chrono::Utc::now().timestamp_millis();
                println!("Performance tracking");
                println!("{:-<40}", "");
                println!("Total logs: {}", state.logs.len());
                println!(
                    "Last 7 days volume: {}",
                    stats::volume_last_7_days(&state.logs, now).round() as i64
                );

                let series = stats::weekly_series(&state.logs);
                if !series.weeks.is_empty() {
                    println!("\nWeekly volume (last {} weeks):", series.weeks.len());
                    for w in &series.weeks {
                        let width = (w.volume * 24 / series.max_weekly).max(1) as usize;
                        println!("  {:>6}  {:<24} {}", w.label, "▇".repeat(width), w.volume);
                    }
                }

                let by_exercise = stats::exercise_stats(&state.logs);
                if by_exercise.is_empty() {
                    println!("\nNo data yet - log a few exercises and your PRs will appear here.");
                } else {
                    println!("\nPRs by exercise:");
                    for s in by_exercise {
                        println!(
                            "  {:26} best {}kg | best vol {} | last {}kg vol {}",
                            s.exercise,
                            s.best_weight,
                            s.best_volume.round() as i64,
                            s.last_weight,
                            s.last_volume.round() as i64,
                        );
                    }
                }
            }
        }

        Some(Commands::Export { output }) => {
            let state = store.load()?;
            let path = output.unwrap_or_else(|| PathBuf::from(export::csv_filename()));
            fs::write(&path, export::logs_to_csv(&state.logs))
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} logs to {}", state.logs.len(), path.display());
        }

        Some(Commands::Backup { output }) => {
            let state = store.load()?;
            let path = output.unwrap_or_else(|| PathBuf::from(export::backup_filename()));
            fs::write(&path, export::backup_to_json(&state)?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Backup written to {}", path.display());
        }

        Some(Commands::Restore { input }) => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let state = export::import_backup(&text)
                .with_context(|| format!("importing {}", input.display()))?;
            store.save(&state)?;
            println!(
                "Restored {} sessions and {} logs from {}",
                state.sessions.len(),
                state.logs.len(),
                input.display()
            );
        }
    }

    Ok(())
}

//! TUI module - terminal dashboard with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{stdout, Stdout};

use crate::state::{AppState, LogEntry};
use crate::stats;
use crate::store::Store;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tab {
    Logs,
    Stats,
}

/// App state for TUI
pub struct App {
    store: Store,
    state: AppState,
    tab: Tab,
    should_quit: bool,
}

impl App {
    pub fn new(store: Store) -> Result<Self> {
        let state = store.load()?;
        Ok(Self {
            store,
            state,
            tab: Tab::Logs,
            should_quit: false,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let title = match self.tab {
            Tab::Logs => "gymlog - Recent logs",
            Tab::Stats => "gymlog - Performance tracking",
        };
        let header = Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        match self.tab {
            Tab::Logs => self.render_logs(frame, chunks[1]),
            Tab::Stats => self.render_stats(frame, chunks[1]),
        }

        let footer = Paragraph::new("q: quit | Tab: logs/stats | r: reload")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let mut logs: Vec<&LogEntry> = self.state.logs.iter().collect();
        logs.sort_by_key(|l| std::cmp::Reverse(l.ts));

        let rows: Vec<Row> = logs
            .iter()
            .map(|l| {
                let sets = l
                    .sets
                    .iter()
                    .map(|s| format!("{}×{}", blank_dash(&s.w), blank_dash(&s.r)))
                    .collect::<Vec<_>>()
                    .join("  ");
                Row::new(vec![
                    Cell::from(stats::fmt_ts(l.ts)),
                    Cell::from(l.exercise_name.clone()),
                    Cell::from(sets),
                    Cell::from(format!("{}", stats::log_volume(l).round() as i64)),
                    Cell::from(l.notes.clone()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(13),
                Constraint::Length(24),
                Constraint::Length(26),
                Constraint::Length(6),
                Constraint::Min(16),
            ],
        )
        .header(
            Row::new(vec!["Date", "Exercise", "Sets", "Vol", "Notes"])
                .style(Style::default().bold()),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Logs ({} total)", self.state.logs.len())),
        );

        frame.render_widget(table, area);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(6)])
            .split(area);

        // Weekly volume, bars scaled against the best week
        let series = stats::weekly_series(&self.state.logs);
        let weekly_rows: Vec<Row> = series
            .weeks
            .iter()
            .map(|w| {
                let width = (w.volume * 24 / series.max_weekly).max(1) as usize;
                Row::new(vec![
                    Cell::from(w.label.clone()),
                    Cell::from("▇".repeat(width)).style(Style::default().fg(Color::Cyan)),
                    Cell::from(w.volume.to_string()),
                ])
            })
            .collect();
        let weekly = Table::new(
            weekly_rows,
            [
                Constraint::Length(8),
                Constraint::Length(26),
                Constraint::Length(8),
            ],
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Weekly volume (last 8 weeks)"),
        );
        frame.render_widget(weekly, chunks[0]);

        let pr_rows: Vec<Row> = stats::exercise_stats(&self.state.logs)
            .into_iter()
            .map(|x| {
                Row::new(vec![
                    Cell::from(x.exercise),
                    Cell::from(format!("{}", x.best_weight)),
                    Cell::from(x.best_weight_ts.map(stats::fmt_day).unwrap_or_default()),
                    Cell::from(format!("{}", x.best_volume.round() as i64)),
                    Cell::from(format!(
                        "{}kg × vol {}",
                        x.last_weight,
                        x.last_volume.round() as i64
                    )),
                ])
            })
            .collect();
        let prs = Table::new(
            pr_rows,
            [
                Constraint::Length(24),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Min(16),
            ],
        )
        .header(
            Row::new(vec!["Exercise", "Best kg", "on", "Best vol", "Last"])
                .style(Style::default().bold()),
        )
        .block(Block::default().borders(Borders::ALL).title("PRs by exercise"));
        frame.render_widget(prs, chunks[1]);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Tab => {
                            self.tab = match self.tab {
                                Tab::Logs => Tab::Stats,
                                Tab::Stats => Tab::Logs,
                            };
                        }
                        KeyCode::Char('r') => {
                            self.state = self.store.load()?;
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}

fn blank_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "—"
    } else {
        s
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

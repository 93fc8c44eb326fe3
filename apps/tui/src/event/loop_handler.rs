use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fmt;
use std::io::Stdout;

use crate::app::{handle_input, App};
use crate::data::Fetcher;
use crate::domain::NoticeKind;
use crate::ui;

// States for servicing a reload request
#[derive(Clone, Copy, PartialEq, Debug)]
enum LoadState {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum LoadEvent {
    Start,
    Success,
    Failure,
    Reset,
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: LoadState,
    event: LoadEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Explicit state machine for the reload flow. Reloads are serialized: a
/// second request is ignored until the machine returns to Idle, and the
/// awaited fetch inside the loop is the single suspension point anyway.
struct LoadMachine {
    state: LoadState,
}

impl LoadMachine {
    const fn new() -> Self {
        Self {
            state: LoadState::Idle,
        }
    }

    const fn state(&self) -> LoadState {
        self.state
    }

    fn process_event(
        &mut self,
        event: LoadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next = match (self.state, event) {
            (LoadState::Idle, LoadEvent::Start) => {
                app.notify(NoticeKind::Info, "Refreshing data...");
                LoadState::Loading
            }
            (LoadState::Loading, LoadEvent::Success) => {
                app.notify(NoticeKind::Success, "Dashboard data refreshed successfully!");
                LoadState::Succeeded
            }
            (LoadState::Loading, LoadEvent::Failure) => {
                app.notify(NoticeKind::Error, "Failed to refresh data. Please try again.");
                LoadState::Failed
            }
            (LoadState::Succeeded | LoadState::Failed, LoadEvent::Reset) => LoadState::Idle,
            _ => {
                return Err(StateTransitionError {
                    from: self.state,
                    event,
                })
            }
        };

        self.state = next;
        Ok(())
    }
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    fetcher: &Fetcher,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut load_machine = LoadMachine::new();

    loop {
        // Update animations
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events
                }
            }
        }

        // Service a requested reload through the state machine
        if app.pending_reload && load_machine.state() == LoadState::Idle {
            if load_machine.process_event(LoadEvent::Start, app).is_err() {
                continue;
            }

            // Show the loading state before the fetch suspends the loop
            if terminal.draw(|f| ui::ui(app, f)).is_err() {
                // Non-fatal redraw error
            }

            let previous_active = app.store.active_name().map(str::to_string);
            let success = app.store.load_all(fetcher).await;
            app.after_reload(previous_active, success);

            let outcome = if success {
                LoadEvent::Success
            } else {
                LoadEvent::Failure
            };
            if load_machine.process_event(outcome, app).is_err() {
                // Non-fatal state transition error
            }

            app.pending_reload = false;

            if load_machine.process_event(LoadEvent::Reset, app).is_err() {
                // Non-fatal reset error
            }
        }
    }
    Ok(())
}

/// Run once without a UI: fetch, normalize, print stats, exit.
pub async fn run_headless(app: &mut App, fetcher: &Fetcher, json: bool) -> Result<()> {
    let success = app.store.load_all(fetcher).await;

    if let Some(message) = app.store.last_error() {
        return Err(color_eyre::eyre::eyre!("Data load failed: {message}"));
    }
    if !success {
        println!("No sheets available.");
        return Ok(());
    }

    let stats = build_headless_stats(app);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nSheet Dashboard Stats");
    println!("=====================");
    if let Some(updated) = &stats.last_updated {
        println!("Last updated: {updated}");
    }
    println!("Sheets: {}", stats.sheets.len());

    for sheet in &stats.sheets {
        let marker = if stats.active_sheet.as_deref() == Some(sheet.name.as_str()) {
            " (active)"
        } else {
            ""
        };
        println!("\n{}{marker}: {}", sheet.name, record_count_text(sheet.records));

        if let Some(error) = &sheet.error {
            println!("- failed to normalize: {error}");
            continue;
        }
        for (category, count) in &sheet.categories {
            let percentage = if sheet.records > 0 {
                (*count as f64 / sheet.records as f64 * 100.0).round() as u64
            } else {
                0
            };
            println!("- Category {category}: {count} ({percentage}% of total)");
        }
    }
}

fn build_headless_stats(app: &App) -> HeadlessStats {
    let sheets = app
        .store
        .sheet_names()
        .iter()
        .filter_map(|name| {
            app.store.sheet(name).map(|sheet| HeadlessSheet {
                name: name.clone(),
                records: sheet.record_count(),
                categories: sheet.category_counts.clone(),
                error: sheet.error.clone(),
            })
        })
        .collect();

    HeadlessStats {
        last_updated: app
            .store
            .last_updated()
            .map(|stamp| stamp.to_rfc3339()),
        active_sheet: app.store.active_name().map(str::to_string),
        sheets,
    }
}

/// Pluralized record-count text shared by the headless view and the TUI.
pub fn record_count_text(count: usize) -> String {
    if count == 1 {
        "1 record".to_string()
    } else {
        format!("{count} records")
    }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    last_updated: Option<String>,
    active_sheet: Option<String>,
    sheets: Vec<HeadlessSheet>,
}

#[derive(serde::Serialize)]
struct HeadlessSheet {
    name: String,
    records: usize,
    categories: Vec<(String, usize)>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_count_text_pluralizes() {
        assert_eq!(record_count_text(0), "0 records");
        assert_eq!(record_count_text(1), "1 record");
        assert_eq!(record_count_text(12), "12 records");
    }

    #[test]
    fn load_machine_walks_the_reload_cycle() {
        let mut app = App::new(crate::data::DataStore::new("CATEGORY".to_string()));
        let mut machine = LoadMachine::new();

        assert!(machine.process_event(LoadEvent::Start, &mut app).is_ok());
        assert_eq!(machine.state(), LoadState::Loading);

        // A second start while loading is an invalid transition.
        assert!(machine.process_event(LoadEvent::Start, &mut app).is_err());

        assert!(machine.process_event(LoadEvent::Failure, &mut app).is_ok());
        assert_eq!(machine.state(), LoadState::Failed);

        assert!(machine.process_event(LoadEvent::Reset, &mut app).is_ok());
        assert_eq!(machine.state(), LoadState::Idle);
    }
}

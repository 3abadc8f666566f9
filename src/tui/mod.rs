//! Terminal User Interface module for dram.
//!
//! Provides a three-panel TUI with note list, detail view, and search input
//! using ratatui for rendering and crossterm for terminal management. The
//! note list is fed by a live query, so edits made elsewhere (including the
//! connectivity monitor) show up without reloading.

use std::io;
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Handle;
use tokio::sync::watch;

mod app;
pub mod event;
mod ui;

pub use app::{App, ChartKind, Focus};
use event::Command;

use crate::models::{NoteId, TastingNote};
use crate::repository::TastingRepository;
use crate::store::LiveQuery;
use crate::sync::ConnectivityMonitor;

/// Delay between the last search keystroke and running the query.
const SEARCH_DEBOUNCE_MS: u64 = 250;

fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Always called before exiting the TUI, even in error cases.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook; errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Restores the terminal before the original panic hook runs.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Repository handles the event loop works with.
struct Session {
    runtime: Handle,
    repository: TastingRepository,
    notes: LiveQuery<Vec<TastingNote>>,
    online: watch::Sender<bool>,
}

impl Session {
    fn new(runtime: Handle, repository: TastingRepository) -> Self {
        let (online, status) = watch::channel(false);
        runtime.spawn(ConnectivityMonitor::new(repository.clone()).run(status));

        Self {
            notes: repository.all_notes(),
            runtime,
            repository,
            online,
        }
    }

    /// Re-runs the search after the debounce delay, or refreshes the list
    /// when the store changed.
    fn refresh(&mut self, app: &mut App, debounce_ms: u64) -> Result<()> {
        if app.should_search(debounce_ms) {
            self.notes = if app.search_input().is_empty() {
                self.repository.all_notes()
            } else {
                self.repository.search(app.search_input())
            };
            app.clear_search_pending();
            app.set_notes(self.notes.current()?);
        } else if self.notes.has_changed() {
            app.set_notes(self.notes.current()?);
        }
        Ok(())
    }

    /// Runs a command; returns `true` when the TUI should exit.
    fn execute(&mut self, app: &mut App, command: Command) -> Result<bool> {
        match command {
            Command::Quit => return Ok(true),
            Command::DeleteNote(id) => {
                let deleted = self.runtime.block_on(self.repository.delete_by_id(id))?;
                match deleted {
                    Some(note) => app.set_status(format!("Deleted {}", note.display_name())),
                    None => app.set_status("Note already gone"),
                }
            }
            Command::MarkSynced(id) => {
                if self.runtime.block_on(mark_synced(&self.repository, id))? {
                    app.set_status("Marked as synced");
                }
            }
            Command::SetOnline(online) => {
                app.set_online(online);
                self.online.send_replace(online);
                app.set_status(if online { "Online" } else { "Offline" });
            }
        }
        Ok(false)
    }
}

async fn mark_synced(repository: &TastingRepository, id: NoteId) -> Result<bool> {
    match repository.find(id).await? {
        Some(note) => repository.mark_as_synced(note).await,
        None => Ok(false),
    }
}

/// Runs the main event loop for the TUI.
///
/// Terminal state is always restored, even on error.
fn run_event_loop(app: &mut App, session: &mut Session) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, session, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    session: &mut Session,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        session.refresh(app, SEARCH_DEBOUNCE_MS)?;

        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
            && let Some(command) = event::handle_key_event(app, key)
            && session.execute(app, command)?
        {
            break;
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// Must be called from outside the tokio runtime that `runtime` points to;
/// repository work is driven with `Handle::block_on`.
///
/// # Errors
///
/// Returns an error if loading notes, terminal setup or the event loop fails.
pub fn run(runtime: Handle, repository: TastingRepository) -> Result<()> {
    init_panic_hook();

    let mut session = Session::new(runtime, repository);
    let mut app = App::new();
    app.set_notes(session.notes.current().context("Failed to load notes")?);

    run_event_loop(&mut app, &mut session).context("TUI event loop failed")?;

    Ok(())
}

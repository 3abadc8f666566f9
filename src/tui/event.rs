//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Key
//! behavior depends on the focused panel. Anything that needs the
//! repository is returned as a [`Command`] for the event loop to run.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};
use crate::models::NoteId;

/// Work the event loop performs on behalf of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    DeleteNote(NoteId),
    MarkSynced(NoteId),
    SetOnline(bool),
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl+C`: quit from anywhere; `q` quits outside the search input
/// - `Tab` / `Shift+Tab`: cycle focus between panels
/// - `Esc`: return to search input focus
/// - `SearchInput`: character input edits the query
/// - `NoteList`: j/k navigation, Enter opens the detail panel
/// - `NoteList` and `DetailView`: `c` switches chart, `d` deletes,
///   `s` marks the note synced, `o` toggles online
///
/// # Examples
///
/// ```
/// use dram::tui::{App, event::{Command, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new();
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), Some(Command::Quit));
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Tab => {
            app.next_focus();
            return None;
        }
        KeyCode::BackTab => {
            app.prev_focus();
            return None;
        }
        KeyCode::Esc => {
            app.reset_focus();
            app.clear_selection();
            return None;
        }
        _ => {}
    }

    match app.focus() {
        Focus::SearchInput => {
            handle_search_input(app, key);
            None
        }
        Focus::NoteList => handle_note_list(app, key),
        Focus::DetailView => handle_detail_view(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_search_char(c);
        }
        KeyCode::Backspace => {
            app.pop_search_char();
        }
        KeyCode::Enter | KeyCode::Down => {
            app.next_focus();
        }
        _ => {}
    }
}

fn handle_note_list(app: &mut App, key: KeyEvent) -> Option<Command> {
    if !key.modifiers.is_empty() {
        return None;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Enter => app.focus_detail(),
        _ => return handle_note_command(app, key),
    }
    None
}

fn handle_detail_view(app: &mut App, key: KeyEvent) -> Option<Command> {
    if !key.modifiers.is_empty() {
        return None;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail_up(1),
        _ => return handle_note_command(app, key),
    }
    None
}

/// Keys shared by the list and detail panels.
fn handle_note_command(app: &mut App, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('c') => {
            app.cycle_chart();
            None
        }
        KeyCode::Char('o') => Some(Command::SetOnline(!app.is_online())),
        KeyCode::Char('d') => app.selected_id().map(Command::DeleteNote),
        KeyCode::Char('s') => app
            .selected_note()
            .filter(|note| !note.is_synced)
            .map(|note| Command::MarkSynced(note.id)),
        _ => None,
    }
}

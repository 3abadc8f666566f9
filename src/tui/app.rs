use std::time::Instant;

use crate::models::{AromaTag, NoteId, TastingNote};

/// Application state for the TUI.
///
/// Manages the displayed notes, selection, search input, panel focus and
/// which radar chart the detail panel shows.
#[derive(Debug, Clone)]
pub struct App {
    /// Currently displayed notes (search results or all notes)
    notes: Vec<TastingNote>,
    selected_index: Option<usize>,
    search_input: String,
    focus: Focus,
    /// When the search input last changed (for debouncing)
    search_changed_at: Option<Instant>,
    search_pending: bool,
    detail_scroll: u16,
    chart: ChartKind,
    online: bool,
    status: Option<String>,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing edits the search query
    SearchInput,
    /// j/k move the selection
    NoteList,
    /// j/k scroll the detail panel
    DetailView,
}

/// Intensity group drawn as the radar chart in the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Aroma,
    Palate,
    Retronasal,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Aroma => "Aroma",
            Self::Palate => "Palate",
            Self::Retronasal => "Retronasal",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Aroma => Self::Palate,
            Self::Palate => Self::Retronasal,
            Self::Retronasal => Self::Aroma,
        }
    }

    /// Ordered axis values and the tags annotating them.
    pub fn values(self, note: &TastingNote) -> (Vec<(String, u8)>, &[AromaTag]) {
        match self {
            Self::Aroma => (note.aroma.chart_values(), note.selected_aromas.as_slice()),
            Self::Palate => (note.palate.chart_values(), &[]),
            Self::Retronasal => (
                note.retronasal.chart_values(),
                note.selected_retronasal_aromas.as_slice(),
            ),
        }
    }
}

impl App {
    /// Creates a new App with default state.
    ///
    /// # Examples
    ///
    /// ```
    /// use dram::tui::{App, Focus};
    ///
    /// let app = App::new();
    /// assert!(app.notes().is_empty());
    /// assert_eq!(app.focus(), Focus::SearchInput);
    /// ```
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            selected_index: None,
            search_input: String::new(),
            focus: Focus::SearchInput,
            search_changed_at: None,
            search_pending: false,
            detail_scroll: 0,
            chart: ChartKind::Aroma,
            online: false,
            status: None,
        }
    }

    pub fn notes(&self) -> &[TastingNote] {
        &self.notes
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn chart(&self) -> ChartKind {
        self.chart
    }

    pub fn cycle_chart(&mut self) {
        self.chart = self.chart.next();
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Replaces the displayed notes with a fresh query result.
    ///
    /// The selection follows the previously selected note by id; if that
    /// note is gone the index is clamped into the new list.
    pub fn set_notes(&mut self, notes: Vec<TastingNote>) {
        let selected_id = self.selected_note().map(|note| note.id);
        self.notes = notes;

        self.selected_index = match (selected_id, self.selected_index) {
            (Some(id), Some(previous)) => self
                .notes
                .iter()
                .position(|note| note.id == id)
                .or_else(|| (!self.notes.is_empty()).then(|| previous.min(self.notes.len() - 1))),
            _ => None,
        };
    }

    pub fn selected_note(&self) -> Option<&TastingNote> {
        self.selected_index.and_then(|i| self.notes.get(i))
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selected_note().map(|note| note.id)
    }

    /// Cycles focus: `SearchInput` -> `NoteList` -> `DetailView`.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::SearchInput => Focus::NoteList,
            Focus::NoteList => Focus::DetailView,
            Focus::DetailView => Focus::SearchInput,
        };
        self.auto_select_on_note_list_focus();
    }

    /// Cycles focus in reverse Tab order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::SearchInput => Focus::DetailView,
            Focus::NoteList => Focus::SearchInput,
            Focus::DetailView => Focus::NoteList,
        };
        self.auto_select_on_note_list_focus();
    }

    pub fn focus_detail(&mut self) {
        if self.selected_index.is_some() {
            self.focus = Focus::DetailView;
        }
    }

    fn auto_select_on_note_list_focus(&mut self) {
        if self.focus == Focus::NoteList && self.selected_index.is_none() && !self.notes.is_empty()
        {
            self.selected_index = Some(0);
        }
    }

    /// Moves selection down, wrapping to the top.
    pub fn select_next(&mut self) {
        if self.notes.is_empty() {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            Some(i) if i + 1 < self.notes.len() => i + 1,
            _ => 0,
        });
        self.detail_scroll = 0;
    }

    /// Moves selection up, wrapping to the bottom.
    pub fn select_previous(&mut self) {
        if self.notes.is_empty() {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            None | Some(0) => self.notes.len() - 1,
            Some(i) => i - 1,
        });
        self.detail_scroll = 0;
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn scroll_detail_down(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(amount);
    }

    pub fn scroll_detail_up(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(amount);
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.mark_search_changed();
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.mark_search_changed();
    }

    fn mark_search_changed(&mut self) {
        self.search_changed_at = Some(Instant::now());
        self.search_pending = true;
    }

    /// Returns whether the query changed at least `debounce_ms` ago and has
    /// not been run yet.
    pub fn should_search(&self, debounce_ms: u64) -> bool {
        if !self.search_pending {
            return false;
        }
        match self.search_changed_at {
            Some(changed_at) => changed_at.elapsed().as_millis() >= u128::from(debounce_ms),
            None => false,
        }
    }

    pub fn clear_search_pending(&mut self) {
        self.search_pending = false;
    }

    pub fn clear_selection(&mut self) {
        self.selected_index = None;
    }

    /// Returns focus to `SearchInput` (Esc key behavior).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::SearchInput;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, name: &str) -> TastingNote {
        TastingNote {
            id: NoteId::new(id),
            ..TastingNote::new(name)
        }
    }

    fn app_with(names: &[&str]) -> App {
        let mut app = App::new();
        app.set_notes(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| note(i as i64 + 1, n))
                .collect(),
        );
        app
    }

    #[test]
    fn app_initializes_with_default_state() {
        let app = App::new();
        assert!(app.notes().is_empty());
        assert_eq!(app.selected_index(), None);
        assert_eq!(app.search_input(), "");
        assert_eq!(app.focus(), Focus::SearchInput);
        assert_eq!(app.chart(), ChartKind::Aroma);
        assert!(!app.is_online());
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut app = app_with(&["a", "b"]);

        app.select_next();
        app.select_next();
        assert_eq!(app.selected_index(), Some(1));
        app.select_next();
        assert_eq!(app.selected_index(), Some(0));

        app.select_previous();
        assert_eq!(app.selected_index(), Some(1));
    }

    #[test]
    fn refreshed_notes_keep_selection_on_same_note() {
        let mut app = app_with(&["a", "b", "c"]);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_note().unwrap().name, "b");

        // "b" moved to the top after an edit.
        app.set_notes(vec![note(2, "b"), note(1, "a"), note(3, "c")]);

        assert_eq!(app.selected_index(), Some(0));
        assert_eq!(app.selected_note().unwrap().name, "b");
    }

    #[test]
    fn deleted_selection_is_clamped() {
        let mut app = app_with(&["a", "b"]);
        app.select_previous();
        assert_eq!(app.selected_index(), Some(1));

        app.set_notes(vec![note(1, "a")]);
        assert_eq!(app.selected_index(), Some(0));

        app.set_notes(Vec::new());
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn note_list_focus_auto_selects_first() {
        let mut app = app_with(&["a"]);
        app.next_focus();

        assert_eq!(app.focus(), Focus::NoteList);
        assert_eq!(app.selected_index(), Some(0));
    }

    #[test]
    fn focus_detail_requires_selection() {
        let mut app = app_with(&["a"]);
        app.focus_detail();
        assert_eq!(app.focus(), Focus::SearchInput);

        app.select_next();
        app.focus_detail();
        assert_eq!(app.focus(), Focus::DetailView);
    }

    #[test]
    fn search_is_debounced() {
        let mut app = App::new();
        assert!(!app.should_search(0));

        app.push_search_char('p');
        assert!(app.should_search(0));
        assert!(!app.should_search(60_000));

        app.clear_search_pending();
        assert!(!app.should_search(0));
    }

    #[test]
    fn chart_kind_cycles_and_selects_values() {
        let mut n = note(1, "x");
        n.palate.salty = 9;
        n.selected_retronasal_aromas
            .push(AromaTag::new("Wood", "Toasted", "Char"));

        let mut app = App::new();
        app.cycle_chart();
        assert_eq!(app.chart(), ChartKind::Palate);

        let (values, tags) = app.chart().values(&n);
        assert_eq!(values.len(), 6);
        assert!(values.contains(&("Salty".to_string(), 9)));
        assert!(tags.is_empty());

        app.cycle_chart();
        let (values, tags) = app.chart().values(&n);
        assert_eq!(values.len(), 7);
        assert_eq!(tags.len(), 1);

        app.cycle_chart();
        assert_eq!(app.chart(), ChartKind::Aroma);
    }
}

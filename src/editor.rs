//! Editor state for creating or editing one tasting note.
//!
//! [`EditorState`] is a plain value; [`EditorState::apply`] is its only
//! mutation path. [`NoteEditor`] pairs the state with the repository to load
//! and save it.

use std::path::PathBuf;

use time::OffsetDateTime;

use crate::models::{
    AromaCategory, AromaIntensity, AromaTag, CharacterAxis, Comments, NoteId, PalateIntensity,
    PalateTaste, TastingNote, toggle_tag,
};
use crate::repository::TastingRepository;

/// Upper bound of the color slider.
pub const MAX_COLOR: f32 = 2.0;

/// Every editable field of a note, without the bookkeeping ones.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub name: String,
    pub date: OffsetDateTime,
    pub abv: String,
    pub score: String,
    pub image_path: Option<PathBuf>,
    pub color: f32,
    pub aroma: AromaIntensity,
    pub selected_aromas: Vec<AromaTag>,
    pub palate: PalateIntensity,
    pub retronasal: AromaIntensity,
    pub selected_retronasal_aromas: Vec<AromaTag>,
    pub characters: Vec<CharacterAxis>,
    pub comments: Comments,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_note(&TastingNote::default())
    }
}

/// One user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    SetName(String),
    SetDate(OffsetDateTime),
    SetAbv(String),
    SetScore(String),
    SetImagePath(Option<PathBuf>),
    /// Clamped into `0.0..=MAX_COLOR`; NaN is ignored.
    SetColor(f32),
    SetAroma {
        category: AromaCategory,
        value: u8,
    },
    SetPalate {
        taste: PalateTaste,
        value: u8,
    },
    SetRetronasal {
        category: AromaCategory,
        value: u8,
    },
    ToggleAroma(AromaTag),
    ToggleRetronasalAroma(AromaTag),
    /// Out-of-range indices are ignored.
    SetCharacterValue {
        index: usize,
        value: u8,
    },
    SetNoseComment(String),
    SetPalateComment(String),
    SetFinishComment(String),
    SetOverallComment(String),
    /// Back to the defaults of a fresh note.
    Reset,
}

impl EditorState {
    /// Copies the editable fields out of a stored note.
    pub fn from_note(note: &TastingNote) -> Self {
        Self {
            name: note.name.clone(),
            date: note.date,
            abv: note.abv.clone(),
            score: note.score.clone(),
            image_path: note.image_path.clone(),
            color: note.color,
            aroma: note.aroma,
            selected_aromas: note.selected_aromas.clone(),
            palate: note.palate,
            retronasal: note.retronasal,
            selected_retronasal_aromas: note.selected_retronasal_aromas.clone(),
            characters: note.characters.clone(),
            comments: note.comments.clone(),
        }
    }

    /// Builds the entity that a save writes.
    ///
    /// Saved notes always start unsynced; `last_modified` is restamped by
    /// the repository.
    pub fn to_note(&self, id: NoteId, last_modified: OffsetDateTime) -> TastingNote {
        TastingNote {
            id,
            name: self.name.clone(),
            date: self.date,
            abv: self.abv.clone(),
            score: self.score.clone(),
            image_path: self.image_path.clone(),
            color: self.color,
            aroma: self.aroma,
            selected_aromas: self.selected_aromas.clone(),
            palate: self.palate,
            retronasal: self.retronasal,
            selected_retronasal_aromas: self.selected_retronasal_aromas.clone(),
            characters: self.characters.clone(),
            comments: self.comments.clone(),
            is_synced: false,
            last_modified,
        }
    }

    pub fn apply(&mut self, action: EditorAction) {
        match action {
            EditorAction::SetName(name) => self.name = name,
            EditorAction::SetDate(date) => self.date = date,
            EditorAction::SetAbv(abv) => self.abv = abv,
            EditorAction::SetScore(score) => self.score = score,
            EditorAction::SetImagePath(path) => self.image_path = path,
            EditorAction::SetColor(color) => {
                if !color.is_nan() {
                    self.color = color.clamp(0.0, MAX_COLOR);
                }
            }
            EditorAction::SetAroma { category, value } => self.aroma.set(category, value),
            EditorAction::SetPalate { taste, value } => self.palate.set(taste, value),
            EditorAction::SetRetronasal { category, value } => {
                self.retronasal.set(category, value)
            }
            EditorAction::ToggleAroma(tag) => {
                toggle_tag(
                    &mut self.selected_aromas,
                    &tag.category,
                    &tag.sub_category,
                    &tag.name,
                );
            }
            EditorAction::ToggleRetronasalAroma(tag) => {
                toggle_tag(
                    &mut self.selected_retronasal_aromas,
                    &tag.category,
                    &tag.sub_category,
                    &tag.name,
                );
            }
            EditorAction::SetCharacterValue { index, value } => {
                if let Some(axis) = self.characters.get_mut(index) {
                    axis.value = value.min(crate::models::MAX_INTENSITY);
                }
            }
            EditorAction::SetNoseComment(text) => self.comments.nose = text,
            EditorAction::SetPalateComment(text) => self.comments.palate = text,
            EditorAction::SetFinishComment(text) => self.comments.finish = text,
            EditorAction::SetOverallComment(text) => self.comments.overall = text,
            EditorAction::Reset => *self = Self::default(),
        }
    }
}

/// Editor session bound to the repository.
///
/// Holds the id of the note being edited ([`NoteId::UNSAVED`] for a new
/// note) and adopts the assigned id after the first successful save.
pub struct NoteEditor {
    state: EditorState,
    note_id: NoteId,
    last_modified: OffsetDateTime,
    repository: TastingRepository,
}

impl NoteEditor {
    /// Starts editing a fresh note.
    pub fn new(repository: TastingRepository) -> Self {
        let fresh = TastingNote::default();
        Self {
            state: EditorState::from_note(&fresh),
            note_id: NoteId::UNSAVED,
            last_modified: fresh.last_modified,
            repository,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn dispatch(&mut self, action: EditorAction) {
        if action == EditorAction::Reset {
            self.note_id = NoteId::UNSAVED;
        }
        self.state.apply(action);
    }

    /// Replaces the whole state with the stored note `id`.
    ///
    /// Returns false and leaves the state untouched when no such note exists.
    pub async fn load(&mut self, id: NoteId) -> anyhow::Result<bool> {
        let Some(note) = self.repository.find(id).await? else {
            tracing::debug!(%id, "nothing to load");
            return Ok(false);
        };

        self.state = EditorState::from_note(&note);
        self.note_id = note.id;
        self.last_modified = note.last_modified;
        Ok(true)
    }

    /// Writes the current state, inserting a new note or updating the
    /// loaded one.
    ///
    /// Errors are logged and reported as `false`; nothing propagates.
    pub async fn save(&mut self) -> bool {
        let note = self.state.to_note(self.note_id, self.last_modified);

        let result = if self.note_id.is_persisted() {
            self.repository.update(note).await.map(|written| {
                if !written {
                    tracing::warn!(id = %self.note_id, "note vanished before save");
                }
                written.then_some(self.note_id)
            })
        } else {
            self.repository.insert(note).await.map(Some)
        };

        match result {
            Ok(Some(id)) => {
                self.note_id = id;
                if let Ok(Some(stored)) = self.repository.find(id).await {
                    self.last_modified = stored.last_modified;
                }
                true
            }
            Ok(None) => false,
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!(%error, "failed to save note");
                false
            }
        }
    }

    pub fn toggle_aroma_tag(&mut self, category: &str, sub_category: &str, name: &str) {
        self.dispatch(EditorAction::ToggleAroma(AromaTag::new(
            category,
            sub_category,
            name,
        )));
    }

    pub fn toggle_retronasal_aroma_tag(&mut self, category: &str, sub_category: &str, name: &str) {
        self.dispatch(EditorAction::ToggleRetronasalAroma(AromaTag::new(
            category,
            sub_category,
            name,
        )));
    }

    pub fn set_character_value(&mut self, index: usize, value: u8) {
        self.dispatch(EditorAction::SetCharacterValue { index, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CHARACTER_AXIS_COUNT, DEFAULT_COLOR};
    use crate::store::NoteStore;

    fn editor() -> NoteEditor {
        NoteEditor::new(TastingRepository::new(NoteStore::in_memory().unwrap()))
    }

    #[test]
    fn default_state_matches_fresh_note() {
        let state = EditorState::default();

        assert!(state.name.is_empty());
        assert_eq!(state.color, DEFAULT_COLOR);
        assert_eq!(state.palate, PalateIntensity::default());
        assert_eq!(state.characters.len(), CHARACTER_AXIS_COUNT);
        assert!(state.characters.iter().all(|c| c.value == 5));
    }

    #[test]
    fn apply_sets_scalars_and_sliders() {
        let mut state = EditorState::default();

        state.apply(EditorAction::SetName("Ardbeg Uigeadail".into()));
        state.apply(EditorAction::SetAbv("54.2".into()));
        state.apply(EditorAction::SetAroma {
            category: AromaCategory::Peat,
            value: 9,
        });
        state.apply(EditorAction::SetPalate {
            taste: PalateTaste::Bitterness,
            value: 42,
        });
        state.apply(EditorAction::SetRetronasal {
            category: AromaCategory::Wood,
            value: 3,
        });
        state.apply(EditorAction::SetFinishComment("endless".into()));

        assert_eq!(state.name, "Ardbeg Uigeadail");
        assert_eq!(state.abv, "54.2");
        assert_eq!(state.aroma.peat, 9);
        assert_eq!(state.palate.bitterness, 10);
        assert_eq!(state.retronasal.wood, 3);
        assert_eq!(state.comments.finish, "endless");
    }

    #[test]
    fn color_is_clamped_and_nan_ignored() {
        let mut state = EditorState::default();

        state.apply(EditorAction::SetColor(3.5));
        assert_eq!(state.color, MAX_COLOR);

        state.apply(EditorAction::SetColor(-1.0));
        assert_eq!(state.color, 0.0);

        state.apply(EditorAction::SetColor(f32::NAN));
        assert_eq!(state.color, 0.0);
    }

    #[test]
    fn toggling_the_same_tag_twice_restores_the_list() {
        let mut state = EditorState::default();
        let tag = AromaTag::new("Fruit", "Citrus", "Orange Peel");

        state.apply(EditorAction::ToggleAroma(tag.clone()));
        assert_eq!(state.selected_aromas, vec![tag.clone()]);
        assert!(state.selected_retronasal_aromas.is_empty());

        state.apply(EditorAction::ToggleAroma(tag));
        assert!(state.selected_aromas.is_empty());
    }

    #[test]
    fn character_value_out_of_range_is_a_no_op() {
        let mut state = EditorState::default();
        let before = state.characters.clone();

        state.apply(EditorAction::SetCharacterValue {
            index: CHARACTER_AXIS_COUNT,
            value: 1,
        });
        assert_eq!(state.characters, before);

        state.apply(EditorAction::SetCharacterValue { index: 2, value: 8 });
        assert_eq!(state.characters[2].value, 8);
        assert_eq!(state.characters[2].left_label, before[2].left_label);
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut state = EditorState::default();
        state.apply(EditorAction::SetName("temp".into()));
        state.apply(EditorAction::Reset);

        assert!(state.name.is_empty());
    }

    #[tokio::test]
    async fn save_new_note_adopts_assigned_id() {
        let mut editor = editor();
        editor.dispatch(EditorAction::SetName("Glendronach 12".into()));

        assert!(editor.save().await);
        let id = editor.note_id();
        assert!(id.is_persisted());

        // A second save updates instead of inserting again.
        editor.dispatch(EditorAction::SetScore("86".into()));
        assert!(editor.save().await);

        assert_eq!(editor.note_id(), id);
        assert_eq!(editor.repository.store().count().unwrap(), 1);
        let stored = editor.repository.find(id).await.unwrap().unwrap();
        assert_eq!(stored.score, "86");
    }

    #[tokio::test]
    async fn load_overwrites_state() {
        let mut editor = editor();
        let mut note = TastingNote::new("Benromach 10");
        note.aroma.set(AromaCategory::Fruit, 6);
        note.selected_aromas.push(AromaTag::new("Fruit", "Dried Fruit", "Raisin"));
        let id = editor.repository.insert(note).await.unwrap();

        editor.dispatch(EditorAction::SetName("scratch".into()));
        assert!(editor.load(id).await.unwrap());

        assert_eq!(editor.note_id(), id);
        assert_eq!(editor.state().name, "Benromach 10");
        assert_eq!(editor.state().aroma.fruit, 6);
        assert_eq!(editor.state().selected_aromas.len(), 1);
    }

    #[tokio::test]
    async fn load_missing_note_keeps_state() {
        let mut editor = editor();
        editor.dispatch(EditorAction::SetName("draft".into()));

        assert!(!editor.load(NoteId::new(77)).await.unwrap());
        assert_eq!(editor.state().name, "draft");
        assert_eq!(editor.note_id(), NoteId::UNSAVED);
    }

    #[tokio::test]
    async fn saving_an_edit_clears_the_synced_flag() {
        let mut editor = editor();
        let id = editor
            .repository
            .insert(TastingNote {
                is_synced: true,
                ..TastingNote::new("Old Pulteney 12")
            })
            .await
            .unwrap();

        editor.load(id).await.unwrap();
        editor.dispatch(EditorAction::SetOverallComment("briny".into()));
        assert!(editor.save().await);

        let stored = editor.repository.find(id).await.unwrap().unwrap();
        assert!(!stored.is_synced);
        assert_eq!(stored.comments.overall, "briny");
    }

    #[tokio::test]
    async fn save_reports_false_when_note_was_deleted() {
        let mut editor = editor();
        editor.dispatch(EditorAction::SetName("doomed".into()));
        assert!(editor.save().await);

        editor.repository.delete_by_id(editor.note_id()).await.unwrap();

        assert!(!editor.save().await);
    }

    #[tokio::test]
    async fn wrappers_dispatch_actions() {
        let mut editor = editor();
        editor.toggle_aroma_tag("Floral", "Flowers", "Heather");
        editor.toggle_retronasal_aroma_tag("Spice", "Sweet Spice", "Cinnamon");
        editor.set_character_value(0, 2);

        assert_eq!(editor.state().selected_aromas[0].name, "Heather");
        assert_eq!(editor.state().selected_retronasal_aromas[0].name, "Cinnamon");
        assert_eq!(editor.state().characters[0].value, 2);
    }
}

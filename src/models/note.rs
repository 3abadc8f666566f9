use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{AromaIntensity, AromaTag, CharacterAxis, NoteId, PalateIntensity, default_characters};
use crate::utils::now_millis;

/// Default color value of a fresh note (a mid gold).
pub const DEFAULT_COLOR: f32 = 1.4;

/// The four free-text comment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comments {
    pub nose: String,
    pub palate: String,
    pub finish: String,
    pub overall: String,
}

impl Comments {
    /// Returns true if any comment contains `needle`, ignoring ASCII case.
    pub fn contains(&self, needle: &str) -> bool {
        [&self.nose, &self.palate, &self.finish, &self.overall]
            .iter()
            .any(|c| contains_ignore_ascii_case(c, needle))
    }
}

/// Substring match that folds ASCII letters only, like SQLite's `lower()`.
fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// One user-authored tasting record.
///
/// A note whose `id` is [`NoteId::UNSAVED`] lives only in memory; the store
/// assigns the id on first insert. Notes are always written back whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TastingNote {
    pub id: NoteId,
    pub name: String,
    /// When the whiskey was tasted, chosen by the user.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub abv: String,
    pub score: String,
    pub image_path: Option<PathBuf>,
    /// Perceived color depth on an SRM-like scale, observed range 0.0..=2.0.
    pub color: f32,
    pub aroma: AromaIntensity,
    pub selected_aromas: Vec<AromaTag>,
    pub palate: PalateIntensity,
    pub retronasal: AromaIntensity,
    pub selected_retronasal_aromas: Vec<AromaTag>,
    pub characters: Vec<CharacterAxis>,
    pub comments: Comments,
    pub is_synced: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

impl Default for TastingNote {
    fn default() -> Self {
        let now = now_millis();
        Self {
            id: NoteId::UNSAVED,
            name: String::new(),
            date: now,
            abv: String::new(),
            score: String::new(),
            image_path: None,
            color: DEFAULT_COLOR,
            aroma: AromaIntensity::default(),
            selected_aromas: Vec::new(),
            palate: PalateIntensity::default(),
            retronasal: AromaIntensity::default(),
            selected_retronasal_aromas: Vec::new(),
            characters: default_characters(),
            comments: Comments::default(),
            is_synced: false,
            last_modified: now,
        }
    }
}

impl TastingNote {
    /// Creates an unsaved note seeded with entity defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true if `name` or any comment contains `needle`.
    ///
    /// Mirrors the store's search predicate for in-memory filtering.
    pub fn matches_text(&self, needle: &str) -> bool {
        contains_ignore_ascii_case(&self.name, needle) || self.comments.contains(needle)
    }

    /// Name to show in lists; falls back to a placeholder for blank names.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Untitled"
        } else {
            &self.name
        }
    }
}

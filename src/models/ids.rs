use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a tasting note.
///
/// Wraps the SQLite rowid. The value `0` marks a note that has not been
/// persisted yet; the store assigns a real id on first insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    /// Id carried by notes that have never been saved.
    pub const UNSAVED: NoteId = NoteId(0);

    /// Creates a new note ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying ID value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Returns true once the store has assigned this id.
    pub fn is_persisted(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_serializes_as_raw_integer() {
        let id = NoteId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let deserialized: NoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn unsaved_id_is_not_persisted() {
        assert!(!NoteId::UNSAVED.is_persisted());
        assert!(!NoteId::default().is_persisted());
        assert!(NoteId::new(7).is_persisted());
    }
}

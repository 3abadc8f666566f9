pub mod codec;
pub mod color;
pub mod config;
pub mod db;
pub mod editor;
pub mod models;
pub mod radar;
pub mod repository;
pub mod share;
pub mod store;
pub mod sync;
pub mod tui;
pub mod utils;

pub use color::{Badge, ColorStop, Rgb};
pub use config::Config;
pub use db::Database;
pub use editor::{EditorAction, EditorState, NoteEditor};
pub use models::{AromaTag, NoteId, TastingNote};
pub use radar::{RadarChart, RadarLayout};
pub use repository::TastingRepository;
pub use store::{Change, LiveQuery, NoteStore, Revision};
pub use sync::ConnectivityMonitor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_accessible_from_crate_root() {
        let db = Database::in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let note = TastingNote::new("Springbank 10");
        assert_eq!(note.id, NoteId::UNSAVED);

        let tag = AromaTag::new("Fruit", "Citrus", "Lemon");
        assert_eq!(tag.name, "Lemon");

        let layout = RadarChart::default().layout(&note.aroma.chart_values(), &[]);
        assert_eq!(layout.axes.len(), 7);

        assert_eq!(color::badge(note.color), Badge::Amber);
    }
}

//! Shareable renderings of a single note.

use anyhow::{Context, Result};

use crate::models::TastingNote;
use crate::utils::format_date;

/// Subject line for a shared note.
pub fn subject(note: &TastingNote) -> String {
    format!("Whiskey tasting note: {}", note.name)
}

/// Plain-text summary: name, date, ABV, score and the four comments.
///
/// # Examples
///
/// ```
/// use dram::{TastingNote, share};
///
/// let mut note = TastingNote::new("Springbank 15");
/// note.score = "91".to_string();
///
/// let text = share::summary_text(&note);
/// assert!(text.contains("Name: Springbank 15"));
/// assert!(text.contains("Score: 91"));
/// ```
pub fn summary_text(note: &TastingNote) -> String {
    let c = &note.comments;
    format!(
        "Whiskey Tasting Note\n\
         \n\
         Name: {}\n\
         Date: {}\n\
         ABV: {}\n\
         Score: {}\n\
         \n\
         Nose: {}\n\
         Palate: {}\n\
         Finish: {}\n\
         Overall: {}\n",
        note.name,
        format_date(note.date),
        note.abv,
        note.score,
        c.nose,
        c.palate,
        c.finish,
        c.overall,
    )
}

/// Pretty-printed JSON of the complete note, for external renderers.
pub fn snapshot_json(note: &TastingNote) -> Result<String> {
    serde_json::to_string_pretty(note)
        .with_context(|| format!("Failed to serialize note {}", note.id))
}

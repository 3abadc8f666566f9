use anyhow::{Result, bail};
use rusqlite::Connection;

/// Table holding every tasting note.
pub const NOTES_TABLE: &str = "tasting_notes";

/// Explicit column mapping for `tasting_notes`, in declaration order.
///
/// The store reads and writes rows through exactly these names; the
/// database refuses to open if the live table disagrees.
pub const NOTE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "date",
    "abv",
    "score",
    "image_path",
    "color",
    "aroma_spice",
    "aroma_peat",
    "aroma_grain",
    "aroma_floral",
    "aroma_fruit",
    "aroma_wood",
    "aroma_other",
    "selected_aromas",
    "palate_sweetness",
    "palate_sourness",
    "palate_bitterness",
    "palate_fatty",
    "palate_salty",
    "palate_umami",
    "retronasal_spice",
    "retronasal_peat",
    "retronasal_grain",
    "retronasal_floral",
    "retronasal_fruit",
    "retronasal_wood",
    "retronasal_other",
    "selected_retronasal_aromas",
    "characters",
    "nose_comment",
    "palate_comment",
    "finish_comment",
    "overall_comment",
    "is_synced",
    "last_modified",
];

/// Comma-separated column list for SELECT statements.
pub fn select_list() -> String {
    NOTE_COLUMNS.join(", ")
}

/// Checks that the live `tasting_notes` table has exactly the mapped columns.
///
/// # Errors
///
/// Returns an error naming the first missing or unexpected column.
pub fn verify_note_columns(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({NOTES_TABLE})"))?;
    let live: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<_>>()?;

    if let Some(missing) = NOTE_COLUMNS.iter().find(|c| !live.iter().any(|l| l == *c)) {
        bail!("{NOTES_TABLE} is missing column `{missing}`");
    }
    if let Some(extra) = live.iter().find(|l| !NOTE_COLUMNS.contains(&l.as_str())) {
        bail!("{NOTES_TABLE} has unmapped column `{extra}`");
    }

    Ok(())
}

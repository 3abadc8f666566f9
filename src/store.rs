//! Persistence store for tasting notes.
//!
//! `NoteStore` owns the SQLite connection behind a mutex, maps notes to
//! rows through the explicit column list in [`crate::db`], and publishes
//! every mutation to a change log that drives [`LiveQuery`] views.

mod live;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql};

pub use live::{Change, LiveQuery, Revision};
use live::ChangeLog;

use crate::codec::{self, CodecError};
use crate::db::{Database, NOTE_COLUMNS, NOTES_TABLE, select_list};
use crate::models::{
    AromaIntensity, Comments, NoteId, PalateIntensity, TastingNote, clamp_intensity,
};
use crate::utils::{from_epoch_millis, to_epoch_millis};

/// Durable keyed collection of tasting notes.
///
/// Cloning is cheap; clones share the connection and the change log.
#[derive(Clone)]
pub struct NoteStore {
    db: Arc<Mutex<Database>>,
    changes: Arc<ChangeLog>,
}

impl NoteStore {
    /// Wraps an opened database.
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(ChangeLog::new()),
        }
    }

    /// Opens an in-memory store, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Database::in_memory()?))
    }

    /// Opens a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| anyhow!("database lock poisoned"))
    }

    /// Latest position of the change log.
    pub fn revision(&self) -> Revision {
        self.changes.revision()
    }

    /// Inserts a note, or replaces the row with the same id.
    ///
    /// An unsaved note (id 0) receives a fresh id. Returns the row id.
    pub fn insert(&self, note: &TastingNote) -> Result<NoteId> {
        let row = NoteRow::encode(note)?;
        let id = {
            let db = self.lock()?;
            let conn = db.connection();
            conn.execute(&insert_sql(), row.params().as_slice())
                .context("Failed to insert note")?;
            NoteId::new(conn.last_insert_rowid())
        };

        tracing::debug!(%id, "inserted note");
        self.changes.publish(Change::Inserted(id));
        Ok(id)
    }

    /// Overwrites the full row matching `note.id`.
    ///
    /// A missing row is silently ignored; returns whether a row was written.
    pub fn update(&self, note: &TastingNote) -> Result<bool> {
        let row = NoteRow::encode(note)?;
        let written = {
            let db = self.lock()?;
            db.connection()
                .execute(&update_sql(), row.params().as_slice())
                .context("Failed to update note")?
        };

        if written == 0 {
            tracing::debug!(id = %note.id, "update ignored, no such note");
            return Ok(false);
        }

        self.changes.publish(Change::Updated(note.id));
        Ok(true)
    }

    /// Removes the row matching `note.id`; returns whether a row existed.
    pub fn delete(&self, note: &TastingNote) -> Result<bool> {
        let removed = {
            let db = self.lock()?;
            db.connection()
                .execute(
                    &format!("DELETE FROM {NOTES_TABLE} WHERE id = ?1"),
                    [note.id.get()],
                )
                .context("Failed to delete note")?
        };

        if removed > 0 {
            self.changes.publish(Change::Deleted(note.id));
        }
        Ok(removed > 0)
    }

    /// Clears the entire store. Returns the number of removed notes.
    pub fn delete_all(&self) -> Result<usize> {
        let removed = {
            let db = self.lock()?;
            db.connection()
                .execute(&format!("DELETE FROM {NOTES_TABLE}"), [])
                .context("Failed to clear notes")?
        };

        tracing::info!(removed, "cleared all notes");
        self.changes.publish(Change::Cleared);
        Ok(removed)
    }

    /// All notes, most recently modified first.
    pub fn get_all(&self) -> LiveQuery<Vec<TastingNote>> {
        LiveQuery::new(self.clone(), NoteStore::fetch_all)
    }

    /// One note by id, or `None` while absent.
    pub fn get_by_id(&self, id: NoteId) -> LiveQuery<Option<TastingNote>> {
        LiveQuery::new(self.clone(), move |store| store.fetch_by_id(id))
    }

    /// All notes whose synced flag is still false.
    pub fn get_unsynced(&self) -> LiveQuery<Vec<TastingNote>> {
        LiveQuery::new(self.clone(), NoteStore::fetch_unsynced)
    }

    /// Notes whose name or any comment contains `query`.
    ///
    /// Plain substring containment that ignores ASCII case, the same folding
    /// SQLite's `LIKE` applies; `%` and `_` carry no special meaning. An empty query matches every note.
    pub fn search(&self, query: impl Into<String>) -> LiveQuery<Vec<TastingNote>> {
        let query = query.into();
        LiveQuery::new(self.clone(), move |store| store.fetch_search(&query))
    }

    /// Point-in-time read backing [`NoteStore::get_all`].
    pub fn fetch_all(&self) -> Result<Vec<TastingNote>> {
        let db = self.lock()?;
        query_notes(
            db.connection(),
            &format!(
                "SELECT {} FROM {NOTES_TABLE} ORDER BY last_modified DESC, id DESC",
                select_list()
            ),
            &[],
        )
    }

    /// Point-in-time read backing [`NoteStore::get_by_id`].
    pub fn fetch_by_id(&self, id: NoteId) -> Result<Option<TastingNote>> {
        let db = self.lock()?;
        db.connection()
            .query_row(
                &format!("SELECT {} FROM {NOTES_TABLE} WHERE id = ?1", select_list()),
                [id.get()],
                note_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to load note {id}"))
    }

    /// Point-in-time read backing [`NoteStore::get_unsynced`].
    pub fn fetch_unsynced(&self) -> Result<Vec<TastingNote>> {
        let db = self.lock()?;
        query_notes(
            db.connection(),
            &format!(
                "SELECT {} FROM {NOTES_TABLE}
                 WHERE is_synced = 0
                 ORDER BY last_modified DESC, id DESC",
                select_list()
            ),
            &[],
        )
    }

    /// Point-in-time read backing [`NoteStore::search`].
    pub fn fetch_search(&self, query: &str) -> Result<Vec<TastingNote>> {
        let db = self.lock()?;
        query_notes(
            db.connection(),
            &format!(
                "SELECT {} FROM {NOTES_TABLE}
                 WHERE ?1 = ''
                    OR instr(lower(name), lower(?1)) > 0
                    OR instr(lower(nose_comment), lower(?1)) > 0
                    OR instr(lower(palate_comment), lower(?1)) > 0
                    OR instr(lower(finish_comment), lower(?1)) > 0
                    OR instr(lower(overall_comment), lower(?1)) > 0
                 ORDER BY last_modified DESC, id DESC",
                select_list()
            ),
            &[&query],
        )
    }

    /// Number of stored notes.
    pub fn count(&self) -> Result<i64> {
        let db = self.lock()?;
        db.connection()
            .query_row(
                &format!("SELECT COUNT(*) FROM {NOTES_TABLE}"),
                [],
                |row| row.get(0),
            )
            .context("Failed to count notes")
    }
}

fn query_notes(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<TastingNote>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, note_from_row)?;

    let mut notes = Vec::new();
    for row in rows {
        notes.push(row.context("Failed to read note row")?);
    }
    Ok(notes)
}

fn insert_sql() -> String {
    let placeholders: Vec<String> = NOTE_COLUMNS.iter().map(|c| format!(":{c}")).collect();
    format!(
        "INSERT OR REPLACE INTO {NOTES_TABLE} ({}) VALUES ({})",
        select_list(),
        placeholders.join(", ")
    )
}

fn update_sql() -> String {
    let assignments: Vec<String> = NOTE_COLUMNS
        .iter()
        .filter(|c| **c != "id")
        .map(|c| format!("{c} = :{c}"))
        .collect();
    format!(
        "UPDATE {NOTES_TABLE} SET {} WHERE id = :id",
        assignments.join(", ")
    )
}

/// A note with its derived column values encoded, ready for binding.
struct NoteRow<'a> {
    note: &'a TastingNote,
    id: Option<i64>,
    date: i64,
    image_path: Option<String>,
    color: f64,
    selected_aromas: String,
    selected_retronasal_aromas: String,
    characters: String,
    last_modified: i64,
}

impl<'a> NoteRow<'a> {
    fn encode(note: &'a TastingNote) -> Result<Self, CodecError> {
        Ok(Self {
            note,
            // NULL lets SQLite assign the next rowid.
            id: note.id.is_persisted().then(|| note.id.get()),
            date: to_epoch_millis(note.date),
            image_path: note
                .image_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            color: f64::from(note.color),
            selected_aromas: codec::encode_aroma_tags("selected_aromas", &note.selected_aromas)?,
            selected_retronasal_aromas: codec::encode_aroma_tags(
                "selected_retronasal_aromas",
                &note.selected_retronasal_aromas,
            )?,
            characters: codec::encode_characters(&note.characters)?,
            last_modified: to_epoch_millis(note.last_modified),
        })
    }

    fn params(&self) -> Vec<(&'static str, &dyn ToSql)> {
        let n = self.note;
        vec![
            (":id", &self.id),
            (":name", &n.name),
            (":date", &self.date),
            (":abv", &n.abv),
            (":score", &n.score),
            (":image_path", &self.image_path),
            (":color", &self.color),
            (":aroma_spice", &n.aroma.spice),
            (":aroma_peat", &n.aroma.peat),
            (":aroma_grain", &n.aroma.grain),
            (":aroma_floral", &n.aroma.floral),
            (":aroma_fruit", &n.aroma.fruit),
            (":aroma_wood", &n.aroma.wood),
            (":aroma_other", &n.aroma.other),
            (":selected_aromas", &self.selected_aromas),
            (":palate_sweetness", &n.palate.sweetness),
            (":palate_sourness", &n.palate.sourness),
            (":palate_bitterness", &n.palate.bitterness),
            (":palate_fatty", &n.palate.fatty),
            (":palate_salty", &n.palate.salty),
            (":palate_umami", &n.palate.umami),
            (":retronasal_spice", &n.retronasal.spice),
            (":retronasal_peat", &n.retronasal.peat),
            (":retronasal_grain", &n.retronasal.grain),
            (":retronasal_floral", &n.retronasal.floral),
            (":retronasal_fruit", &n.retronasal.fruit),
            (":retronasal_wood", &n.retronasal.wood),
            (":retronasal_other", &n.retronasal.other),
            (":selected_retronasal_aromas", &self.selected_retronasal_aromas),
            (":characters", &self.characters),
            (":nose_comment", &n.comments.nose),
            (":palate_comment", &n.comments.palate),
            (":finish_comment", &n.comments.finish),
            (":overall_comment", &n.comments.overall),
            (":is_synced", &n.is_synced),
            (":last_modified", &self.last_modified),
        ]
    }
}

fn intensity(row: &Row<'_>, column: &str) -> rusqlite::Result<u8> {
    Ok(clamp_intensity(row.get::<_, i64>(column)?))
}

fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<time::OffsetDateTime> {
    let idx = row.as_ref().column_index(column)?;
    let millis: i64 = row.get(idx)?;
    from_epoch_millis(millis)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, e.into()))
}

fn json_column<T>(
    row: &Row<'_>,
    column: &'static str,
    decode: impl FnOnce(&str) -> Result<T, CodecError>,
) -> rusqlite::Result<T> {
    let idx = row.as_ref().column_index(column)?;
    let text: String = row.get(idx)?;
    decode(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<TastingNote> {
    Ok(TastingNote {
        id: NoteId::new(row.get("id")?),
        name: row.get("name")?,
        date: timestamp(row, "date")?,
        abv: row.get("abv")?,
        score: row.get("score")?,
        image_path: row.get::<_, Option<String>>("image_path")?.map(PathBuf::from),
        color: row.get::<_, f64>("color")? as f32,
        aroma: AromaIntensity {
            spice: intensity(row, "aroma_spice")?,
            peat: intensity(row, "aroma_peat")?,
            grain: intensity(row, "aroma_grain")?,
            floral: intensity(row, "aroma_floral")?,
            fruit: intensity(row, "aroma_fruit")?,
            wood: intensity(row, "aroma_wood")?,
            other: intensity(row, "aroma_other")?,
        },
        selected_aromas: json_column(row, "selected_aromas", |t| {
            codec::decode_aroma_tags("selected_aromas", t)
        })?,
        palate: PalateIntensity {
            sweetness: intensity(row, "palate_sweetness")?,
            sourness: intensity(row, "palate_sourness")?,
            bitterness: intensity(row, "palate_bitterness")?,
            fatty: intensity(row, "palate_fatty")?,
            salty: intensity(row, "palate_salty")?,
            umami: intensity(row, "palate_umami")?,
        },
        retronasal: AromaIntensity {
            spice: intensity(row, "retronasal_spice")?,
            peat: intensity(row, "retronasal_peat")?,
            grain: intensity(row, "retronasal_grain")?,
            floral: intensity(row, "retronasal_floral")?,
            fruit: intensity(row, "retronasal_fruit")?,
            wood: intensity(row, "retronasal_wood")?,
            other: intensity(row, "retronasal_other")?,
        },
        selected_retronasal_aromas: json_column(row, "selected_retronasal_aromas", |t| {
            codec::decode_aroma_tags("selected_retronasal_aromas", t)
        })?,
        characters: json_column(row, "characters", codec::decode_characters)?,
        comments: Comments {
            nose: row.get("nose_comment")?,
            palate: row.get("palate_comment")?,
            finish: row.get("finish_comment")?,
            overall: row.get("overall_comment")?,
        },
        is_synced: row.get("is_synced")?,
        last_modified: timestamp(row, "last_modified")?,
    })
}

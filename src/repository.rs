//! Async repository over the note store.
//!
//! The only behavior added on top of [`NoteStore`] is timestamp stamping,
//! the local mark-as-synced operation and best-effort image cleanup on
//! delete. Blocking SQLite work runs on tokio's blocking pool so callers on
//! an async runtime never stall their own thread.

use anyhow::{Context, Result};
use time::Duration;

use crate::models::{NoteId, TastingNote};
use crate::store::{LiveQuery, NoteStore};
use crate::utils::{now_millis, remove_file_best_effort};

/// Entry point the editor, the TUI and the CLI write through.
///
/// # Examples
///
/// ```
/// use dram::{NoteStore, TastingNote, TastingRepository};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let repository = TastingRepository::new(NoteStore::in_memory()?);
///
/// let id = repository.insert(TastingNote::new("Glenfarclas 15")).await?;
/// let note = repository.find(id).await?.expect("note should exist");
/// assert_eq!(note.name, "Glenfarclas 15");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TastingRepository {
    store: NoteStore,
}

impl TastingRepository {
    pub fn new(store: NoteStore) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    async fn run_blocking<R>(
        &self,
        work: impl FnOnce(NoteStore) -> Result<R> + Send + 'static,
    ) -> Result<R>
    where
        R: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || work(store))
            .await
            .context("store task did not complete")?
    }

    /// Stamps `last_modified` and inserts (or replaces) the note.
    pub async fn insert(&self, mut note: TastingNote) -> Result<NoteId> {
        stamp(&mut note);
        let id = self.run_blocking(move |store| store.insert(&note)).await?;
        tracing::info!(%id, "saved new note");
        Ok(id)
    }

    /// Stamps `last_modified` and overwrites the stored note.
    ///
    /// Returns false when no row with that id exists.
    pub async fn update(&self, mut note: TastingNote) -> Result<bool> {
        stamp(&mut note);
        let id = note.id;
        let written = self.run_blocking(move |store| store.update(&note)).await?;
        tracing::info!(%id, written, "updated note");
        Ok(written)
    }

    /// Deletes the note, then best-effort removes its image file.
    ///
    /// Image removal failures are logged and never surface to the caller.
    pub async fn delete(&self, note: TastingNote) -> Result<bool> {
        let image_path = note.image_path.clone();
        let id = note.id;
        let removed = self.run_blocking(move |store| store.delete(&note)).await?;

        if let Some(path) = image_path {
            let cleanup = tokio::task::spawn_blocking(move || remove_file_best_effort(&path));
            if let Err(e) = cleanup.await {
                tracing::warn!(%id, error = %e, "image cleanup task failed");
            }
        }

        tracing::info!(%id, removed, "deleted note");
        Ok(removed)
    }

    /// Deletes the note with `id` if it exists, returning the removed snapshot.
    pub async fn delete_by_id(&self, id: NoteId) -> Result<Option<TastingNote>> {
        let Some(note) = self.find(id).await? else {
            return Ok(None);
        };
        self.delete(note.clone()).await?;
        Ok(Some(note))
    }

    /// Sets the local synced flag. Nothing is transmitted anywhere.
    pub async fn mark_as_synced(&self, mut note: TastingNote) -> Result<bool> {
        note.is_synced = true;
        self.update(note).await
    }

    /// Flags every currently unsynced note as synced; returns how many.
    pub async fn mark_all_synced(&self) -> Result<usize> {
        let pending = self.fetch_unsynced().await?;
        let mut flagged = 0;
        for note in pending {
            if self.mark_as_synced(note).await? {
                flagged += 1;
            }
        }
        Ok(flagged)
    }

    /// Current snapshot of one note.
    pub async fn find(&self, id: NoteId) -> Result<Option<TastingNote>> {
        self.run_blocking(move |store| store.fetch_by_id(id)).await
    }

    /// One-shot read of every note, most recently modified first.
    pub async fn fetch_all(&self) -> Result<Vec<TastingNote>> {
        self.run_blocking(|store| store.fetch_all()).await
    }

    /// One-shot read of notes not yet flagged as synced.
    pub async fn fetch_unsynced(&self) -> Result<Vec<TastingNote>> {
        self.run_blocking(|store| store.fetch_unsynced()).await
    }

    /// One-shot search with the same matching as [`Self::search`].
    pub async fn fetch_search(&self, query: impl Into<String>) -> Result<Vec<TastingNote>> {
        let query = query.into();
        self.run_blocking(move |store| store.fetch_search(&query)).await
    }

    /// Live view of every note, most recently modified first.
    pub fn all_notes(&self) -> LiveQuery<Vec<TastingNote>> {
        self.store.get_all()
    }

    /// Live view of one note.
    pub fn note_by_id(&self, id: NoteId) -> LiveQuery<Option<TastingNote>> {
        self.store.get_by_id(id)
    }

    /// Live view of notes not yet flagged as synced.
    pub fn unsynced_notes(&self) -> LiveQuery<Vec<TastingNote>> {
        self.store.get_unsynced()
    }

    /// Live substring search over name and comments.
    pub fn search(&self, query: impl Into<String>) -> LiveQuery<Vec<TastingNote>> {
        self.store.search(query)
    }
}

/// Sets `last_modified` to now, keeping it strictly later than the value
/// the note carried in.
fn stamp(note: &mut TastingNote) {
    let now = now_millis();
    note.last_modified = if now > note.last_modified {
        now
    } else {
        note.last_modified + Duration::milliseconds(1)
    };
}

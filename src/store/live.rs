//! Change log and continuously-updating query views.
//!
//! Every successful store mutation bumps a revision on a `watch` channel.
//! A [`LiveQuery`] subscribes to that channel and re-evaluates its query
//! whenever a new revision arrives, so consumers never re-issue reads.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;

use super::NoteStore;
use crate::models::NoteId;

/// What a store mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Inserted(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
    Cleared,
}

/// Monotonic position in the change log plus the mutation that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revision {
    pub seq: u64,
    pub change: Option<Change>,
}

/// Publishing side of the change log.
pub(super) struct ChangeLog {
    sender: watch::Sender<Revision>,
}

impl ChangeLog {
    pub(super) fn new() -> Self {
        let (sender, _) = watch::channel(Revision::default());
        Self { sender }
    }

    /// Records a mutation. Works with zero subscribers.
    pub(super) fn publish(&self, change: Change) {
        self.sender.send_modify(|revision| {
            revision.seq += 1;
            revision.change = Some(change);
        });
        tracing::trace!(?change, "store changed");
    }

    pub(super) fn subscribe(&self) -> watch::Receiver<Revision> {
        self.sender.subscribe()
    }

    pub(super) fn revision(&self) -> Revision {
        *self.sender.borrow()
    }
}

type QueryFn<T> = dyn Fn(&NoteStore) -> Result<T> + Send + Sync;

/// A read view that follows every later mutation of the store.
pub struct LiveQuery<T> {
    store: NoteStore,
    rx: watch::Receiver<Revision>,
    query: Arc<QueryFn<T>>,
}

impl<T> LiveQuery<T> {
    pub(super) fn new(
        store: NoteStore,
        query: impl Fn(&NoteStore) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        let rx = store.changes.subscribe();
        Self {
            store,
            rx,
            query: Arc::new(query),
        }
    }

    /// Evaluates the query against the current store contents and marks
    /// every mutation so far as seen.
    pub fn current(&mut self) -> Result<T> {
        self.rx.borrow_and_update();
        (self.query)(&self.store)
    }

    /// Returns true if the store changed since the last evaluation.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next mutation, then returns the re-evaluated result.
    ///
    /// Several mutations landing before the wait resolves are observed as
    /// one update carrying the latest state.
    pub async fn changed(&mut self) -> Result<T> {
        self.rx
            .changed()
            .await
            .context("store change log closed")?;
        self.current()
    }

    /// Latest revision seen by the channel (not necessarily evaluated).
    pub fn revision(&self) -> Revision {
        *self.rx.borrow()
    }
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            rx: self.rx.clone(),
            query: Arc::clone(&self.query),
        }
    }
}

impl<T> fmt::Debug for LiveQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveQuery")
            .field("revision", &*self.rx.borrow())
            .finish_non_exhaustive()
    }
}

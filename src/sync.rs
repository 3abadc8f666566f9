//! Connectivity monitor.
//!
//! There is no remote service: "syncing" only flags unsynced notes as
//! synced locally once the device comes back online.

use anyhow::Result;
use tokio::sync::watch;

use crate::repository::TastingRepository;

/// Watches online/offline transitions and flags pending notes on reconnect.
pub struct ConnectivityMonitor {
    repository: TastingRepository,
    online: bool,
}

impl ConnectivityMonitor {
    /// Starts in the offline state.
    pub fn new(repository: TastingRepository) -> Self {
        Self {
            repository,
            online: false,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Records the current connectivity.
    ///
    /// On an offline to online transition every unsynced note is marked
    /// synced; returns how many were flagged. Other transitions do nothing.
    pub async fn observe(&mut self, online: bool) -> Result<usize> {
        let reconnected = online && !self.online;
        self.online = online;

        if !reconnected {
            return Ok(0);
        }

        let flagged = self.repository.mark_all_synced().await?;
        tracing::info!(flagged, "back online, marked pending notes synced");
        Ok(flagged)
    }

    /// Follows `status` until its sender is dropped.
    ///
    /// Failures on one transition are logged and do not stop the loop.
    /// Returns the total number of notes flagged.
    pub async fn run(mut self, mut status: watch::Receiver<bool>) -> usize {
        let mut total = 0;
        loop {
            let online = *status.borrow_and_update();
            match self.observe(online).await {
                Ok(flagged) => total += flagged,
                Err(e) => {
                    let error = format!("{e:#}");
                    tracing::warn!(%error, "sync on reconnect failed");
                }
            }

            if status.changed().await.is_err() {
                break;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TastingNote;
    use crate::store::NoteStore;

    async fn repository_with_pending(count: usize) -> TastingRepository {
        let repo = TastingRepository::new(NoteStore::in_memory().unwrap());
        for i in 0..count {
            repo.insert(TastingNote::new(format!("note {i}"))).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn reconnect_marks_pending_notes() {
        let repo = repository_with_pending(3).await;
        let mut monitor = ConnectivityMonitor::new(repo.clone());

        assert_eq!(monitor.observe(true).await.unwrap(), 3);
        assert!(monitor.is_online());
        assert!(repo.store().fetch_unsynced().unwrap().is_empty());
    }

    #[tokio::test]
    async fn staying_online_or_going_offline_does_nothing() {
        let repo = repository_with_pending(0).await;
        let mut monitor = ConnectivityMonitor::new(repo.clone());

        monitor.observe(true).await.unwrap();
        repo.insert(TastingNote::new("written while online")).await.unwrap();

        assert_eq!(monitor.observe(true).await.unwrap(), 0);
        assert_eq!(monitor.observe(false).await.unwrap(), 0);
        assert_eq!(repo.store().fetch_unsynced().unwrap().len(), 1);

        assert_eq!(monitor.observe(true).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn run_follows_status_channel_until_closed() {
        let repo = repository_with_pending(2).await;
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(ConnectivityMonitor::new(repo.clone()).run(rx));

        tx.send(true).unwrap();
        tokio::task::yield_now().await;
        drop(tx);

        let total = handle.await.unwrap();
        assert_eq!(total, 2);
        assert!(repo.store().fetch_unsynced().unwrap().is_empty());
    }
}

//! services/api/src/adapters/memory_store.rs
//!
//! The in-memory session store, the concrete implementation of the `SessionStore`
//! port from the `core` crate. Contents live as long as the process.

use async_trait::async_trait;
use chrono::Utc;
use lucid_logs_core::domain::{sample_sessions, SessionRecord};
use lucid_logs_core::ports::SessionStore;
use tokio::sync::RwLock;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Newest-first session history guarded by an async lock.
#[derive(Default)]
pub struct InMemorySessionStore {
    records: RwLock<Vec<SessionRecord>>,
}

impl InMemorySessionStore {
    /// Creates an empty `InMemorySessionStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with records that are already newest first.
    pub fn with_records(records: Vec<SessionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Creates a store holding the journal's starter entries.
    pub fn seeded() -> Self {
        Self::with_records(sample_sessions(Utc::now()))
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, record: SessionRecord) {
        self.records.write().await.insert(0, record);
    }

    async fn all(&self) -> Vec<SessionRecord> {
        self.records.read().await.clone()
    }

    async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucid_logs_core::entry::SessionDraft;

    fn record(name: &str) -> SessionRecord {
        let mut draft = SessionDraft::new();
        draft.set_product_name(name);
        draft.finish(Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn append_puts_the_new_record_first_and_keeps_prior_order() {
        let store = InMemorySessionStore::new();
        store.append(record("first")).await;
        store.append(record("second")).await;
        store.append(record("third")).await;

        let names: Vec<String> = store
            .all()
            .await
            .iter()
            .map(|r| r.product_name().to_string())
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn is_empty_tracks_appends() {
        let store = InMemorySessionStore::new();
        assert!(store.is_empty().await);
        store.append(record("only")).await;
        assert!(!store.is_empty().await);
        assert!(!InMemorySessionStore::seeded().is_empty().await);
    }

    #[tokio::test]
    async fn duplicates_are_not_collapsed() {
        let store = InMemorySessionStore::new();
        let same = record("twice");
        store.append(same.clone()).await;
        store.append(same).await;
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn seeded_store_holds_three_starter_entries() {
        let store = InMemorySessionStore::seeded();
        let all = store.all().await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].product_name(), "Blue Dream Haze");
    }

    #[tokio::test]
    async fn returned_snapshot_is_detached_from_the_store() {
        let store = InMemorySessionStore::new();
        store.append(record("kept")).await;

        let mut snapshot = store.all().await;
        snapshot.clear();

        assert_eq!(store.len().await, 1);
    }
}

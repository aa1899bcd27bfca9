//! In-memory record store for testing and development

use crate::core::record::{Record, StatusTransition};
use crate::core::service::{MutationSink, RecordSource};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct Faults {
    fetch: Option<String>,
    mutations: HashMap<String, String>,
}

/// In-memory store serving one record type
///
/// Records keep insertion order. Uses RwLock for thread-safe access; clones
/// share the same data, so a test can keep a handle while a list view owns
/// another.
pub struct InMemoryRecordStore<R: Record> {
    records: Arc<RwLock<IndexMap<String, R>>>,
    faults: Arc<RwLock<Faults>>,
    fetches: Arc<AtomicUsize>,
}

impl<R: Record> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            faults: Arc::clone(&self.faults),
            fetches: Arc::clone(&self.fetches),
        }
    }
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
            faults: Arc::new(RwLock::new(Faults::default())),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a store holding `records`, keyed by their ids
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.records.write() {
            map.extend(records.into_iter().map(|r| (r.id().to_string(), r)));
        }
        store
    }

    /// Make every fetch fail with `message` until cleared with `None`
    pub fn fail_fetch(&self, message: Option<&str>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.fetch = message.map(str::to_string);
        }
    }

    /// Make every mutation of `id` fail with `message`
    pub fn fail_mutations_for(&self, id: impl Into<String>, message: impl Into<String>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.mutations.insert(id.into(), message.into());
        }
    }

    /// Number of `fetch_all` calls so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Snapshot of a stored record
    pub fn get(&self, id: &str) -> Option<R> {
        self.records.read().ok().and_then(|map| map.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_mutation(&self, id: &str) -> Result<()> {
        let faults = self
            .faults
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        match faults.mutations.get(id) {
            Some(message) => bail!("{}", message),
            None => Ok(()),
        }
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordSource<R> for InMemoryRecordStore<R> {
    async fn fetch_all(&self) -> Result<Vec<R>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let faults = self
            .faults
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        if let Some(message) = &faults.fetch {
            bail!("{}", message);
        }

        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().cloned().collect())
    }
}

#[async_trait]
impl<R: Record> MutationSink<R> for InMemoryRecordStore<R> {
    async fn create(&self, mut record: R) -> Result<R> {
        if record.id().is_empty() {
            record.set_id(Uuid::new_v4().to_string());
        }
        self.check_mutation(record.id())?;

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.contains_key(record.id()) {
            bail!("{} '{}' already exists", R::record_type(), record.id());
        }
        records.insert(record.id().to_string(), record.clone());

        Ok(record)
    }

    async fn update(&self, id: &str, mut record: R) -> Result<R> {
        self.check_mutation(id)?;

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = records
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} '{}' not found", R::record_type(), id))?;
        record.set_id(id.to_string());
        *slot = record.clone();

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.check_mutation(id)?;

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("{} '{}' not found", R::record_type(), id))
    }

    async fn transition(&self, id: &str, transition: StatusTransition) -> Result<()> {
        self.check_mutation(id)?;

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let record = records
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} '{}' not found", R::record_type(), id))?;
        if !record.apply_transition(transition) {
            bail!("{} does not support '{}'", R::record_type(), transition);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Contact;

    fn contact(id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: format!("Contact {id}"),
            status: "new".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_preserves_insertion_order() {
        let store = InMemoryRecordStore::with_records(vec![contact("b"), contact("a"), contact("c")]);
        let ids: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let store = InMemoryRecordStore::<Contact>::new();
        let created = store.create(contact("")).await.unwrap();
        assert!(!created.id.is_empty());
        assert!(store.get(&created.id).is_some());

        let duplicate = store.create(created.clone()).await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = InMemoryRecordStore::with_records(vec![contact("a")]);

        let updated = store
            .update("a", Contact {
                subject: "Updated".to_string(),
                ..contact("ignored")
            })
            .await
            .unwrap();
        assert_eq!(updated.id, "a");
        assert_eq!(store.get("a").unwrap().subject, "Updated");

        assert!(store.update("zz", contact("zz")).await.is_err());
        assert!(store.delete("zz").await.is_err());
        store.delete("a").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_transition_applies_and_rejects_unsupported() {
        let store = InMemoryRecordStore::with_records(vec![contact("a")]);

        store.mark_as_read("a").await.unwrap();
        assert_eq!(store.get("a").unwrap().status, "read");

        let err = store.approve("a").await.unwrap_err();
        assert_eq!(err.to_string(), "contact does not support 'approve'");
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = InMemoryRecordStore::with_records(vec![contact("a"), contact("b")]);

        store.fail_fetch(Some("network down"));
        assert_eq!(store.fetch_all().await.unwrap_err().to_string(), "network down");
        store.fail_fetch(None);
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);

        store.fail_mutations_for("b", "server error");
        assert!(store.delete("a").await.is_ok());
        assert_eq!(store.delete("b").await.unwrap_err().to_string(), "server error");
        assert_eq!(store.fetch_count(), 2);
    }
}

//! Async key-value record store

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record backend unavailable: {0}")]
    Unavailable(String),

    #[error("corrupted record {key}: {reason}")]
    Corrupted { key: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Something kept in a named collection under a string key
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the record lives in, shared by every record of the type
    const COLLECTION: &'static str;

    fn key(&self) -> String;
}

/// Record persistence.
///
/// `add` replaces a record with the same key.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<R>>;

    async fn has(&self, key: &str) -> StoreResult<bool>;

    async fn add(&self, record: R) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Every record of the collection, in key order for ordered backends
    fn iterate(&self) -> BoxStream<'_, StoreResult<R>>;
}

type Collection = BTreeMap<String, Value>;

/// In-memory store holding every collection as JSON documents, used by
/// tests and the debugging harness
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<&'static str, Collection>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn decode<R: Record>(key: &str, document: Value) -> StoreResult<R> {
    serde_json::from_value(document).map_err(|e| StoreError::Corrupted {
        key: format!("{}/{}", R::COLLECTION, key),
        reason: e.to_string(),
    })
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryRecordStore {
    async fn get(&self, key: &str) -> StoreResult<Option<R>> {
        let document = self
            .collections
            .read()
            .get(R::COLLECTION)
            .and_then(|records| records.get(key).cloned());
        document.map(|document| decode(key, document)).transpose()
    }

    async fn has(&self, key: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .read()
            .get(R::COLLECTION)
            .is_some_and(|records| records.contains_key(key)))
    }

    async fn add(&self, record: R) -> StoreResult<()> {
        let key = record.key();
        let document = serde_json::to_value(&record).map_err(|e| StoreError::Corrupted {
            key: format!("{}/{}", R::COLLECTION, key),
            reason: e.to_string(),
        })?;
        self.collections
            .write()
            .entry(R::COLLECTION)
            .or_default()
            .insert(key, document);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        if let Some(records) = self.collections.write().get_mut(R::COLLECTION) {
            records.remove(key);
        }
        Ok(())
    }

    fn iterate(&self) -> BoxStream<'_, StoreResult<R>> {
        let snapshot: Vec<(String, Value)> = self
            .collections
            .read()
            .get(R::COLLECTION)
            .map(|records| records.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        stream::iter(snapshot.into_iter().map(|(key, document)| decode(&key, document))).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note(String, u32);

    impl Record for Note {
        const COLLECTION: &'static str = "note";

        fn key(&self) -> String {
            self.0.clone()
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Tag {
        name: String,
    }

    impl Record for Tag {
        const COLLECTION: &'static str = "tag";

        fn key(&self) -> String {
            self.name.clone()
        }
    }

    fn note(key: &str, n: u32) -> Note {
        Note(key.to_string(), n)
    }

    #[tokio::test]
    async fn add_replaces_existing_key() {
        let store = MemoryRecordStore::new();
        store.add(note("a", 1)).await.unwrap();
        store.add(note("a", 2)).await.unwrap();
        assert_eq!(store.len(Note::COLLECTION), 1);
        assert_eq!(RecordStore::<Note>::get(&store, "a").await.unwrap(), Some(note("a", 2)));
    }

    #[tokio::test]
    async fn iterate_yields_snapshot_in_key_order() {
        let store = MemoryRecordStore::new();
        store.add(note("b", 2)).await.unwrap();
        store.add(note("a", 1)).await.unwrap();

        let all: Vec<Note> = RecordStore::<Note>::iterate(&store).try_collect().await.unwrap();
        assert_eq!(all, vec![note("a", 1), note("b", 2)]);

        RecordStore::<Note>::remove(&store, "a").await.unwrap();
        assert!(!RecordStore::<Note>::has(&store, "a").await.unwrap());
    }

    #[tokio::test]
    async fn collections_are_kept_apart() {
        let store = MemoryRecordStore::new();
        store.add(note("shared", 1)).await.unwrap();
        store.add(Tag { name: "shared".to_string() }).await.unwrap();

        assert_eq!(store.len(Note::COLLECTION), 1);
        assert_eq!(store.len(Tag::COLLECTION), 1);
        RecordStore::<Tag>::remove(&store, "shared").await.unwrap();
        assert!(store.is_empty(Tag::COLLECTION));
        assert_eq!(RecordStore::<Note>::get(&store, "shared").await.unwrap(), Some(note("shared", 1)));
    }

    #[tokio::test]
    async fn undecodable_document_is_corrupted() {
        let store = MemoryRecordStore::new();
        store.add(note("x", 1)).await.unwrap();
        store
            .collections
            .write()
            .entry(Note::COLLECTION)
            .or_default()
            .insert("x".to_string(), Value::Bool(true));

        assert!(matches!(
            RecordStore::<Note>::get(&store, "x").await,
            Err(StoreError::Corrupted { key, .. }) if key == "note/x"
        ));
    }
}

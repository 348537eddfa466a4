//! In-memory document store.
//!
//! Thread-safe backend holding collections as plain vectors of BSON
//! documents behind an async-aware lock. Filter matching is top-level field
//! equality, which is all the gateway's pass-through queries use. Intended
//! for development and tests; replicates the driver's write-count semantics
//! (a matched document whose fields already hold the written values counts
//! as matched but not modified).

use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError, WriteOutcome};

/// Document store held entirely in process memory
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, assigning a fresh `_id` when it carries none.
    /// Returns the document's identifier.
    pub async fn insert(&self, collection: &str, mut doc: Document) -> ObjectId {
        let id = match doc.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = ObjectId::new();
                doc.insert("_id", id);
                id
            }
        };
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(doc);
        id
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    fn matches(doc: &Document, filter: &Document) -> bool {
        filter.iter().all(|(key, value)| doc.get(key) == Some(value))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let doc = collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| Self::matches(doc, &filter)))
            .cloned();
        Ok(doc)
    }

    async fn find_all(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| Self::matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<WriteOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| Self::matches(doc, &filter)));

        let Some(doc) = target else {
            return Ok(WriteOutcome::default());
        };

        let mut changed = false;
        for (key, value) in update {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                changed = true;
            }
        }

        Ok(WriteOutcome {
            matched_count: 1,
            modified_count: u64::from(changed),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_find_one_returns_first_match() {
        let store = MemoryStore::new();
        store.insert("bots", doc! {"name": "x", "status": "idle"}).await;
        store.insert("bots", doc! {"name": "y", "status": "idle"}).await;

        let found = store
            .find_one("bots", doc! {"status": "idle"})
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("name").unwrap(), "x");
    }

    #[tokio::test]
    async fn test_find_all_filters_by_equality() {
        let store = MemoryStore::new();
        store.insert("bots", doc! {"name": "x", "status": "idle"}).await;
        store.insert("bots", doc! {"name": "y", "status": "active"}).await;
        store.insert("bots", doc! {"name": "z", "status": "idle"}).await;

        let docs = store.find_all("bots", doc! {"status": "idle"}).await.unwrap();
        assert_eq!(docs.len(), 2);

        let all = store.find_all("bots", doc! {}).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_object_id() {
        let store = MemoryStore::new();
        let id = store.insert("bots", doc! {"name": "x"}).await;

        let found = store
            .find_one("bots", doc! {"_id": id})
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("name").unwrap(), "x");
    }

    #[tokio::test]
    async fn test_update_one_merges_fields() {
        let store = MemoryStore::new();
        store.insert("bots", doc! {"name": "x", "status": "idle", "hp": 10_i64}).await;

        let outcome = store
            .update_one("bots", doc! {"name": "x"}, doc! {"status": "active"})
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 1);

        // Untouched fields survive the merge.
        let doc = store.find_one("bots", doc! {"name": "x"}).await.unwrap().unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "active");
        assert_eq!(doc.get_i64("hp").unwrap(), 10);
    }

    #[tokio::test]
    async fn test_update_to_same_value_counts_as_unmodified() {
        let store = MemoryStore::new();
        store.insert("bots", doc! {"name": "x", "status": "idle"}).await;

        let outcome = store
            .update_one("bots", doc! {"name": "x"}, doc! {"status": "idle"})
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 0);
    }

    #[tokio::test]
    async fn test_update_with_no_match() {
        let store = MemoryStore::new();
        let outcome = store
            .update_one("bots", doc! {"name": "ghost"}, doc! {"status": "active"})
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::default());
    }
}

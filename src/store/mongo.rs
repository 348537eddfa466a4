//! MongoDB-backed document store.
//!
//! Wraps a [`mongodb::Client`] with a bounded connection pool and a bounded
//! wait for a free connection; when the pool is exhausted and the wait
//! elapses, the in-flight operation fails and surfaces through the gateway's
//! error envelope. Operations target the default database named by the
//! connection string.

use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::GatewayConfig;
use crate::error::GatewayError;

use super::{DocumentStore, StoreError, WriteOutcome};

/// Document store backed by the MongoDB driver
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect to the store named by the config and verify reachability
    /// with an initial ping.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut options = ClientOptions::parse(&config.store_url)
            .await
            .map_err(StoreError::from)?;
        options.max_pool_size = Some(config.max_pool_size);
        options.wait_queue_timeout = Some(Duration::from_millis(config.wait_queue_timeout_ms));

        let client = Client::with_options(options).map_err(StoreError::from)?;
        let db = client
            .default_database()
            .ok_or(GatewayError::NoDefaultDatabase)?;

        let store = Self { client, db };
        store.ping().await?;
        Ok(store)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let doc = self
            .db
            .collection::<Document>(collection)
            .find_one(filter)
            .await?;
        Ok(doc)
    }

    async fn find_all(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter)
            .await?;
        let docs = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<WriteOutcome, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .update_one(filter, doc! {"$set": update})
            .await?;
        Ok(WriteOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! {"ping": 1})
            .await?;
        Ok(())
    }

    async fn close(&self) {
        // Client::shutdown consumes; the handle is an Arc internally.
        self.client.clone().shutdown().await;
    }
}

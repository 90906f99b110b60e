//! In-memory datastore.
//!
//! Keeps objects in a shared map and returns `memory://` locators. Streaming
//! support can be switched off to exercise the buffered store path that some
//! production backends force.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::{Datastore, Locator, StreamSink};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

type ObjectMap = Arc<Mutex<HashMap<String, StoredObject>>>;

/// A datastore backed by a process-local map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: ObjectMap,
    streaming_disabled: bool,
}

impl MemoryStore {
    /// Create a streaming-capable in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses streaming handles, forcing callers onto
    /// the buffered path.
    pub fn without_streaming() -> Self {
        Self {
            objects: ObjectMap::default(),
            streaming_disabled: true,
        }
    }

    /// Fetch a stored object's bytes.
    pub async fn get(&self, context: &str, name: &str) -> Option<Bytes> {
        let objects = self.objects.lock().await;
        objects.get(&object_key(context, name)).map(|o| o.data.clone())
    }

    /// Fetch a stored object's content type.
    pub async fn content_type(&self, context: &str, name: &str) -> Option<String> {
        let objects = self.objects.lock().await;
        objects
            .get(&object_key(context, name))
            .map(|o| o.content_type.clone())
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }
}

fn object_key(context: &str, name: &str) -> String {
    format!("{context}/{name}")
}

fn memory_locator(context: &str, name: &str) -> Locator {
    Locator::new(format!("memory://{context}/{name}"))
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn streamable(
        &self,
        context: &str,
        name: &str,
        content_type: &str,
    ) -> Result<Option<Box<dyn StreamSink>>, StoreError> {
        if self.streaming_disabled {
            debug!(context, name, "memory store refusing streaming handle");
            return Ok(None);
        }
        Ok(Some(Box::new(MemorySink {
            objects: Arc::clone(&self.objects),
            context: context.to_string(),
            name: name.to_string(),
            content_type: content_type.to_string(),
            buf: Vec::new(),
        })))
    }

    async fn store_bytes(
        &self,
        context: &str,
        data: Bytes,
        name: &str,
        content_type: &str,
    ) -> Result<Locator, StoreError> {
        let mut objects = self.objects.lock().await;
        objects.insert(
            object_key(context, name),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(memory_locator(context, name))
    }
}

/// Streaming sink accumulating into the store's map on finish.
struct MemorySink {
    objects: ObjectMap,
    context: String,
    name: String,
    content_type: String,
    buf: Vec<u8>,
}

#[async_trait]
impl StreamSink for MemorySink {
    async fn write_all(&mut self, buf: &[u8]) -> Result<(), StoreError> {
        self.buf.extend_from_slice(buf);
        Ok(())
    }

    async fn finish(self: Box<Self>) -> Result<Locator, StoreError> {
        let mut objects = self.objects.lock().await;
        objects.insert(
            object_key(&self.context, &self.name),
            StoredObject {
                data: Bytes::from(self.buf),
                content_type: self.content_type,
            },
        );
        Ok(memory_locator(&self.context, &self.name))
    }

    async fn abort(self: Box<Self>) {
        // Nothing was published; dropping the buffer is the whole cleanup.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_streaming_store_and_get() {
        let store = MemoryStore::new();
        let mut sink = store
            .streamable("ctx", "a.csv", "text/csv")
            .await
            .unwrap()
            .expect("memory store should stream by default");
        sink.write_all(b"x").await.unwrap();
        sink.write_all(b"y").await.unwrap();
        let locator = sink.finish().await.unwrap();

        assert_eq!(locator.as_str(), "memory://ctx/a.csv");
        assert_eq!(store.get("ctx", "a.csv").await.unwrap(), Bytes::from_static(b"xy"));
        assert_eq!(
            store.content_type("ctx", "a.csv").await.unwrap(),
            "text/csv"
        );
    }

    #[tokio::test]
    async fn test_abort_publishes_nothing() {
        let store = MemoryStore::new();
        let mut sink = store
            .streamable("ctx", "a.csv", "text/csv")
            .await
            .unwrap()
            .unwrap();
        sink.write_all(b"partial").await.unwrap();
        sink.abort().await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_without_streaming_refuses_handle() {
        let store = MemoryStore::without_streaming();
        assert!(store
            .streamable("ctx", "a.csv", "text/csv")
            .await
            .unwrap()
            .is_none());

        let locator = store
            .store_bytes("ctx", Bytes::from_static(b"data"), "a.csv", "text/csv")
            .await
            .unwrap();
        assert_eq!(locator.as_str(), "memory://ctx/a.csv");
        assert_eq!(store.len().await, 1);
    }
}

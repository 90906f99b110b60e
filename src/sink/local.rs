//! Directory-backed datastore.
//!
//! Stores objects as files under `<root>/<context>/<name>` and returns
//! `file://` locators. Streaming is supported, so the buffered fallback only
//! triggers here when a caller disables it explicitly in tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::traits::{Datastore, Locator, StreamSink};
use crate::error::StoreError;

/// A datastore rooted at a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn prepare_path(&self, context: &str, name: &str) -> Result<PathBuf, StoreError> {
        validate_component(context)?;
        validate_component(name)?;
        let dir = self.root.join(context);
        fs::create_dir_all(&dir).await?;
        Ok(dir.join(name))
    }
}

/// Object names and contexts must be plain path components.
fn validate_component(component: &str) -> Result<(), StoreError> {
    if component.is_empty()
        || component == "."
        || component == ".."
        || component.contains('/')
        || component.contains('\\')
    {
        return Err(StoreError::InvalidName(component.to_string()));
    }
    Ok(())
}

fn file_locator(path: &Path) -> Locator {
    Locator::new(format!("file://{}", path.display()))
}

#[async_trait]
impl Datastore for DirectoryStore {
    async fn streamable(
        &self,
        context: &str,
        name: &str,
        _content_type: &str,
    ) -> Result<Option<Box<dyn StreamSink>>, StoreError> {
        let path = self.prepare_path(context, name).await?;
        let file = File::create(&path).await?;
        debug!(path = %path.display(), "opened streaming file sink");
        Ok(Some(Box::new(FileSink { file, path })))
    }

    async fn store_bytes(
        &self,
        context: &str,
        data: Bytes,
        name: &str,
        _content_type: &str,
    ) -> Result<Locator, StoreError> {
        let path = self.prepare_path(context, name).await?;
        fs::write(&path, &data).await?;
        debug!(path = %path.display(), bytes = data.len(), "stored buffered object");
        Ok(file_locator(&path))
    }
}

/// Streaming sink writing to a single file.
struct FileSink {
    file: File,
    path: PathBuf,
}

#[async_trait]
impl StreamSink for FileSink {
    async fn write_all(&mut self, buf: &[u8]) -> Result<(), StoreError> {
        self.file.write_all(buf).await?;
        Ok(())
    }

    async fn finish(mut self: Box<Self>) -> Result<Locator, StoreError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(file_locator(&self.path))
    }

    async fn abort(self: Box<Self>) {
        // Drop the handle first, then remove the partial file.
        let path = self.path.clone();
        drop(self);
        if let Err(e) = fs::remove_file(&path).await {
            debug!(path = %path.display(), error = %e, "failed to remove aborted object");
        }
    }
}

//! Datastore and streaming sink traits.
//!
//! A unified async interface over storage backends. Some backends accept
//! incrementally written bytes (streamable), others only whole buffers; the
//! service's store operation degrades from the first to the second. That
//! duality is imposed by the backends and is part of the contract, not an
//! implementation detail.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// A URI identifying stored output after a successful store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator(String);

impl Locator {
    /// Wrap a URI string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> String {
        locator.0
    }
}

/// A destination accepting incrementally written bytes.
///
/// A sink is a scoped resource: every sink obtained from a datastore must end
/// in exactly one of [`finish`](StreamSink::finish) or
/// [`abort`](StreamSink::abort), on every exit path. Both consume the sink,
/// so the type system rules out use-after-close.
#[async_trait]
pub trait StreamSink: Send {
    /// Write a chunk to the destination.
    async fn write_all(&mut self, buf: &[u8]) -> Result<(), StoreError>;

    /// Flush, close, and return the locator of the stored object.
    async fn finish(self: Box<Self>) -> Result<Locator, StoreError>;

    /// Close and discard any partial output. Used on the failure path before
    /// the original error propagates; abort itself is best-effort.
    async fn abort(self: Box<Self>);
}

/// Abstraction over storage backends.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Obtain a streaming destination handle, or `None` when the backend
    /// does not support streaming for this context.
    async fn streamable(
        &self,
        context: &str,
        name: &str,
        content_type: &str,
    ) -> Result<Option<Box<dyn StreamSink>>, StoreError>;

    /// Store a complete buffer under a name, returning its locator.
    async fn store_bytes(
        &self,
        context: &str,
        data: Bytes,
        name: &str,
        content_type: &str,
    ) -> Result<Locator, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display_and_conversion() {
        let locator = Locator::new("file:///tmp/out.csv");
        assert_eq!(locator.as_str(), "file:///tmp/out.csv");
        assert_eq!(locator.to_string(), "file:///tmp/out.csv");
        assert_eq!(String::from(locator), "file:///tmp/out.csv");
    }
}

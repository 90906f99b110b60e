//! Storage sinks: datastore traits and the bundled implementations.

pub mod local;
pub mod memory;
pub mod traits;

pub use local::DirectoryStore;
pub use memory::MemoryStore;
pub use traits::{Datastore, Locator, StreamSink};

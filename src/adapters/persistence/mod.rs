//! Persistence Adapters - Key-Value Storage Backends
//!
//! Implements the `KeyValueStore` port with a single atomically
//! rewritten JSON file, plus an in-memory store for tests.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

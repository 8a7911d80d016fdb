//! Persistence Adapters - Key-Value Document Storage
//!
//! Implements the `KeyValueStore` port with atomic per-key files for
//! durable state and a `HashMap` for tests and throwaway sessions.
//! No database dependency.

pub mod file_store;
pub mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

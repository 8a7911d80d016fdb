//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: Whole-document persistence by string key
//! - `Clock`: Current time for payment dates and record ids

pub mod clock;
pub mod kv_store;

pub use clock::Clock;
pub use kv_store::{KeyValueStore, StorageError};

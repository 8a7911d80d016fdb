//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure.
//!
//! Adapter categories:
//! - `clock`: System and fixed clocks
//! - `persistence`: File-backed and in-memory key-value stores

pub mod clock;
pub mod persistence;

pub use clock::{FixedClock, SystemClock};
pub use persistence::{FileStore, MemoryStore};

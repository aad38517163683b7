//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure. Each sub-module groups adapters by concern.
//!
//! Adapter categories:
//! - `persistence`: JSON file and in-memory key-value stores
//! - `reports`: Plain-text report export
//! - `console`: Terminal notifications

pub mod console;
pub mod persistence;
pub mod reports;

pub use console::ConsoleNotifier;
pub use persistence::{FileStore, MemoryStore};
pub use reports::TextFileSink;

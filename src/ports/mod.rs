//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: Persisted collections and settings
//! - `ReportSink`: Export of formatted report documents
//! - `Notifier`: Transient success/error notifications

pub mod notifier;
pub mod report_sink;
pub mod storage;

pub use notifier::{Level, Notifier};
pub use report_sink::ReportSink;
pub use storage::KeyValueStore;

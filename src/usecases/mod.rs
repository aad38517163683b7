//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the journal's workflows.
//!
//! Use cases:
//! - `Journal`: Load, mutate and write through the record store
//! - `Exporter`: Render reports and hand them to the report sink

pub mod exporter;
pub mod journal;

pub use exporter::{Exporter, ReportRequest};
pub use journal::{Journal, JournalOptions};

//! Report Sink Port - Document Export Interface
//!
//! Stands in for the PDF generator: receives a finished
//! `ReportDocument` and makes it available to the user.

use std::path::PathBuf;

use crate::domain::report::ReportDocument;

/// Trait for report export backends.
pub trait ReportSink {
  /// Publish a document. Returns where it ended up.
  fn publish(&mut self, document: &ReportDocument) -> anyhow::Result<PathBuf>;
}

//! Exporter - Report Rendering and Publication
//!
//! Turns a report request into a `ReportDocument`, hands it to the
//! `ReportSink` and reports the outcome through the `Notifier`.
//! A failed export never touches journal state.

use std::path::PathBuf;

use tracing::{error, info, instrument};

use crate::domain::records::RecordId;
use crate::domain::report::{ExportSelection, ReportContext, ReportDocument, ReportFormatter};
use crate::domain::state::JournalState;
use crate::error::JournalError;
use crate::ports::notifier::Notifier;
use crate::ports::report_sink::ReportSink;

/// Which report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRequest {
  Today,
  Weekly,
  Monthly,
  Trade(RecordId),
  Withdrawal(RecordId),
  Journal,
  Analytics,
  AllData,
  Selected(ExportSelection),
  TradingRules,
  Dashboard,
}

impl ReportRequest {
  /// Build the document for this request.
  pub fn render(
    &self,
    state: &JournalState,
    ctx: &ReportContext,
  ) -> Result<ReportDocument, JournalError> {
    let formatter = ReportFormatter::new(state, ctx);
    Ok(match *self {
      Self::Today => formatter.today(),
      Self::Weekly => formatter.weekly(),
      Self::Monthly => formatter.monthly(),
      Self::Trade(id) => formatter.trade(id)?,
      Self::Withdrawal(id) => formatter.withdrawal(id)?,
      Self::Journal => formatter.journal(),
      Self::Analytics => formatter.analytics(),
      Self::AllData => formatter.all_data(),
      Self::Selected(selection) => formatter.selected(selection)?,
      Self::TradingRules => formatter.trading_rules(),
      Self::Dashboard => formatter.dashboard(),
    })
  }
}

/// Report export use case.
pub struct Exporter<K: ReportSink, N: Notifier> {
  sink: K,
  notifier: N,
}

impl<K: ReportSink, N: Notifier> Exporter<K, N> {
  pub const fn new(sink: K, notifier: N) -> Self {
    Self { sink, notifier }
  }

  /// Render and publish `request`. Every outcome is also notified.
  #[instrument(skip(self, state, ctx))]
  pub fn export(
    &mut self,
    request: ReportRequest,
    state: &JournalState,
    ctx: &ReportContext,
  ) -> Result<PathBuf, JournalError> {
    let document = match request.render(state, ctx) {
      Ok(doc) => doc,
      Err(e) => {
        self.notifier.error(&e.toast());
        return Err(e);
      }
    };

    match self.sink.publish(&document) {
      Ok(path) => {
        info!(filename = %document.filename, path = %path.display(), "Report published");
        self.notifier.success(&format!(
          "Report \"{}\" saved to {}",
          document.filename,
          path.display()
        ));
        Ok(path)
      }
      Err(e) => {
        error!(filename = %document.filename, error = %e, "Report export failed");
        self.notifier.error("Error generating report. Please try again.");
        Err(JournalError::Report(format!("{e:#}")))
      }
    }
  }

  pub const fn notifier(&self) -> &N {
    &self.notifier
  }

  pub const fn sink(&self) -> &K {
    &self.sink
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::notifier::Level;
  use chrono::NaiveDate;

  #[derive(Default)]
  struct Recorder {
    seen: Vec<(Level, String)>,
  }

  impl Notifier for Recorder {
    fn notify(&mut self, level: Level, message: &str) {
      self.seen.push((level, message.to_string()));
    }
  }

  struct FailingSink;

  impl ReportSink for FailingSink {
    fn publish(&mut self, _document: &ReportDocument) -> anyhow::Result<PathBuf> {
      anyhow::bail!("printer on fire")
    }
  }

  #[derive(Default)]
  struct CollectingSink {
    published: Vec<String>,
  }

  impl ReportSink for CollectingSink {
    fn publish(&mut self, document: &ReportDocument) -> anyhow::Result<PathBuf> {
      self.published.push(document.filename.clone());
      Ok(PathBuf::from(document.stem()))
    }
  }

  fn ctx() -> ReportContext {
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    ReportContext {
      today,
      generated_at: today.and_hms_opt(12, 0, 0).unwrap(),
      software: "Trading Journal".to_string(),
    }
  }

  #[test]
  fn test_successful_export_notifies_success() {
    let mut exporter = Exporter::new(CollectingSink::default(), Recorder::default());
    let path = exporter
      .export(ReportRequest::Analytics, &JournalState::default(), &ctx())
      .unwrap();
    assert_eq!(path, PathBuf::from("analytics-report-2026-10-17"));
    assert_eq!(exporter.sink().published, vec!["analytics-report-2026-10-17.pdf"]);
    assert_eq!(exporter.notifier().seen[0].0, Level::Success);
  }

  #[test]
  fn test_sink_failure_becomes_report_error() {
    let mut exporter = Exporter::new(FailingSink, Recorder::default());
    let err = exporter
      .export(ReportRequest::Today, &JournalState::default(), &ctx())
      .unwrap_err();
    assert!(matches!(err, JournalError::Report(ref msg) if msg.contains("printer on fire")));
    assert_eq!(exporter.notifier().seen[0].0, Level::Error);
  }

  #[test]
  fn test_empty_selection_is_rejected_before_publishing() {
    let mut exporter = Exporter::new(CollectingSink::default(), Recorder::default());
    let err = exporter
      .export(
        ReportRequest::Selected(ExportSelection::default()),
        &JournalState::default(),
        &ctx(),
      )
      .unwrap_err();
    assert!(err.is_rejection());
    assert!(exporter.sink().published.is_empty());
    assert_eq!(
      exporter.notifier().seen[0].1,
      "Please select at least one data type to export"
    );
  }

  #[test]
  fn test_missing_trade_is_not_found() {
    let mut exporter = Exporter::new(CollectingSink::default(), Recorder::default());
    let err = exporter
      .export(ReportRequest::Trade(RecordId(7)), &JournalState::default(), &ctx())
      .unwrap_err();
    assert!(matches!(err, JournalError::NotFound { .. }));
  }
}

//! Text File Sink - Plain-Text Report Export
//!
//! Writes each report to `<export_dir>/<stem>.txt`, where `<stem>` is
//! the document's download name without its `.pdf` extension. A PDF
//! renderer can pick the files up from there.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::domain::report::ReportDocument;
use crate::ports::report_sink::ReportSink;

#[derive(Debug, Clone)]
pub struct TextFileSink {
    export_dir: PathBuf,
}

impl TextFileSink {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Destination for `document`.
    pub fn target(&self, document: &ReportDocument) -> PathBuf {
        self.export_dir.join(format!("{}.txt", document.stem()))
    }
}

impl ReportSink for TextFileSink {
    #[instrument(skip(self, document), fields(filename = %document.filename))]
    fn publish(&mut self, document: &ReportDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.export_dir).with_context(|| {
            format!(
                "Failed to create export directory {}",
                self.export_dir.display()
            )
        })?;

        let target = self.target(document);
        fs::write(&target, document.to_string())
            .with_context(|| format!("Failed to write report {}", target.display()))?;

        info!(
            path = %target.display(),
            sections = document.sections.len(),
            "Report exported"
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::ReportSection;
    use chrono::NaiveDate;

    #[test]
    fn test_publish_writes_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextFileSink::new(dir.path().join("reports"));
        let doc = ReportDocument {
            title: "Weekly Trading Performance Report".to_string(),
            filename: "weekly-stats-2026-10-17.pdf".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2026, 10, 17)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            footer: "Trading Journal".to_string(),
            sections: vec![ReportSection::new("ACCOUNT PERFORMANCE").field("Total Trades", 3)],
        };

        let path = sink.publish(&doc).unwrap();
        assert_eq!(path, dir.path().join("reports").join("weekly-stats-2026-10-17.txt"));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Weekly Trading Performance Report\n"));
        assert!(text.contains("ACCOUNT PERFORMANCE:\nTotal Trades: 3\n"));
        assert!(text.ends_with("Trading Journal"));
    }
}

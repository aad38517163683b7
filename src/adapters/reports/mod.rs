//! Report Adapters - Export Targets for Formatted Reports

pub mod text_sink;

pub use text_sink::TextFileSink;

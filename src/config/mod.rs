//! Configuration Module - TOML-based Journal Configuration
//!
//! Loads and validates configuration from `config.toml`. Every field
//! has a default, so an empty or missing file yields a working setup.
//! Limits and paths are externalized here - the domain layer only
//! carries its own fallback constants.

pub mod loader;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::activity::DEFAULT_RECENT_LIMIT;
use crate::domain::balance::DEFAULT_STARTING_BALANCE;
use crate::domain::records::DEFAULT_MAX_TRADES_PER_DAY;
use crate::domain::report::DEFAULT_SOFTWARE_NAME;
use crate::usecases::journal::JournalOptions;

/// Top-level journal configuration.
///
/// Loaded from `config.toml` at startup and validated before any
/// command runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Identity and logging.
  pub journal: JournalConfig,
  /// Where the journal file lives.
  pub storage: StorageConfig,
  /// Trade cap and balance defaults.
  pub limits: LimitsConfig,
  /// Report export settings.
  pub reports: ReportsConfig,
  /// Presentation knobs.
  pub display: DisplayConfig,
}

impl AppConfig {
  /// Options handed to `Journal::open`.
  pub const fn journal_options(&self) -> JournalOptions {
    JournalOptions {
      max_trades_per_day: self.limits.max_trades_per_day,
      default_starting_balance: self.limits.default_starting_balance,
    }
  }
}

/// Journal identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
  /// Human-readable journal name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for JournalConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  /// Directory holding the journal file.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
  /// Journal file name inside `data_dir`.
  #[serde(default = "default_file_name")]
  pub file_name: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
      file_name: default_file_name(),
    }
  }
}

/// Record-keeping limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
  /// Trades allowed per calendar day.
  #[serde(default = "default_max_trades_per_day")]
  pub max_trades_per_day: u8,
  /// Starting balance on first run and after a full reset.
  #[serde(default = "default_starting_balance")]
  pub default_starting_balance: Decimal,
}

impl Default for LimitsConfig {
  fn default() -> Self {
    Self {
      max_trades_per_day: default_max_trades_per_day(),
      default_starting_balance: default_starting_balance(),
    }
  }
}

/// Report export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
  /// Directory reports are written to.
  #[serde(default = "default_export_dir")]
  pub export_dir: String,
  /// Name printed in report footers.
  #[serde(default = "default_software_name")]
  pub software_name: String,
}

impl Default for ReportsConfig {
  fn default() -> Self {
    Self {
      export_dir: default_export_dir(),
      software_name: default_software_name(),
    }
  }
}

/// Presentation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
  /// Rows in the recent-activity listing.
  #[serde(default = "default_recent_activity_limit")]
  pub recent_activity_limit: usize,
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      recent_activity_limit: default_recent_activity_limit(),
    }
  }
}

// ── Default value functions ─────────────────────────

fn default_name() -> String {
  "Trading Journal".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_data_dir() -> String {
  "data".to_string()
}

fn default_file_name() -> String {
  "journal.json".to_string()
}

const fn default_max_trades_per_day() -> u8 {
  DEFAULT_MAX_TRADES_PER_DAY
}

const fn default_starting_balance() -> Decimal {
  DEFAULT_STARTING_BALANCE
}

fn default_export_dir() -> String {
  "reports".to_string()
}

fn default_software_name() -> String {
  DEFAULT_SOFTWARE_NAME.to_string()
}

const fn default_recent_activity_limit() -> usize {
  DEFAULT_RECENT_LIMIT
}

//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
///
/// A missing file is not an error: defaults are used.
pub fn load_config(path: &Path) -> Result<AppConfig> {
  if !path.exists() {
    let config = AppConfig::default();
    validate_config(&config)?;
    info!(path = %path.display(), "No config file found, using defaults");
    return Ok(config);
  }

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    data_dir = %config.storage.data_dir,
    max_trades_per_day = config.limits.max_trades_per_day,
    starting_balance = %config.limits.default_starting_balance,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A usable daily trade cap
/// - A positive default starting balance
/// - Non-empty paths
fn validate_config(config: &AppConfig) -> Result<()> {
  // Limits validation
  anyhow::ensure!(
    config.limits.max_trades_per_day > 0,
    "max_trades_per_day must be at least 1, got {}",
    config.limits.max_trades_per_day
  );
  anyhow::ensure!(
    config.limits.default_starting_balance > Decimal::ZERO,
    "default_starting_balance must be positive, got {}",
    config.limits.default_starting_balance
  );

  // Storage validation
  anyhow::ensure!(
    !config.storage.data_dir.trim().is_empty(),
    "storage.data_dir must not be empty"
  );
  anyhow::ensure!(
    !config.storage.file_name.trim().is_empty(),
    "storage.file_name must not be empty"
  );

  // Reports validation
  anyhow::ensure!(
    !config.reports.export_dir.trim().is_empty(),
    "reports.export_dir must not be empty"
  );

  // Display validation
  anyhow::ensure!(
    config.display.recent_activity_limit > 0,
    "recent_activity_limit must be at least 1"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_missing_file_uses_defaults() {
    let config = load_config(Path::new("nonexistent.toml")).unwrap();
    assert_eq!(config.limits.max_trades_per_day, 4);
    assert_eq!(config.limits.default_starting_balance, dec!(10000));
    assert_eq!(config.storage.file_name, "journal.json");
  }

  #[test]
  fn test_partial_file_keeps_other_defaults() {
    let config = parse_config(
      r#"
      [limits]
      max_trades_per_day = 6

      [reports]
      export_dir = "out"
      "#,
    )
    .unwrap();
    assert_eq!(config.limits.max_trades_per_day, 6);
    assert_eq!(config.limits.default_starting_balance, dec!(10000));
    assert_eq!(config.reports.export_dir, "out");
    assert_eq!(config.journal.log_level, "info");
    assert_eq!(config.display.recent_activity_limit, 5);
  }

  #[test]
  fn test_zero_cap_rejected() {
    let result = parse_config("[limits]\nmax_trades_per_day = 0\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_non_positive_starting_balance_rejected() {
    let result = parse_config("[limits]\ndefault_starting_balance = -1\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_unreadable_toml_rejected() {
    assert!(parse_config("limits = [").is_err());
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[storage]\ndata_dir = \"journal-data\"\n").unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.storage.data_dir, "journal-data");
  }
}

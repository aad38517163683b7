//! Storage Port - Key-Value Persistence Interface
//!
//! The journal persists every collection and setting as a JSON string
//! under a fixed key, mirroring browser local storage. Implementations
//! are synchronous; each call either completes or fails.

use crate::error::StorageError;

/// Persisted key names.
pub mod keys {
  /// JSON array of trades, newest first.
  pub const TRADES: &str = "trades";
  /// JSON array of goals, newest first.
  pub const GOALS: &str = "goals";
  /// JSON array of withdrawals, newest first.
  pub const WITHDRAWALS: &str = "withdrawals";
  /// Cached account balance (decimal string). Never read back as truth.
  pub const ACCOUNT_BALANCE: &str = "accountBalance";
  /// User-set baseline balance (decimal string).
  pub const STARTING_BALANCE: &str = "startingBalance";
  /// `light` or `dark`.
  pub const THEME: &str = "theme";
  /// Free-text trading rules.
  pub const TRADING_RULES: &str = "tradingRules";
  /// JSON object with the current user's profile.
  pub const CURRENT_USER: &str = "currentUser";

  /// Keys removed by a full reset.
  pub const RECORD_KEYS: [&str; 5] =
    [TRADES, GOALS, WITHDRAWALS, ACCOUNT_BALANCE, STARTING_BALANCE];
}

/// Trait for key-value storage backends.
///
/// Values are opaque strings; encoding is the caller's concern.
pub trait KeyValueStore {
  /// Read a value. `Ok(None)` when the key has never been written.
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

  /// Write a value, replacing any previous one.
  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

  /// Delete a key. Removing a missing key is not an error.
  fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

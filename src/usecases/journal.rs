//! Journal - Write-Through Record Keeping
//!
//! Loads the journal from a `KeyValueStore` once, applies every
//! mutation to the in-memory `JournalState`, then writes the touched
//! collection and the recomputed balance straight back.
//!
//! Loading fails closed: a missing or malformed key resets only that
//! collection (or falls back to its default) and logs a warning.
//! Saving does not roll back: when a write fails the in-memory change
//! stays and the storage error is returned to the caller.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::domain::balance::DEFAULT_STARTING_BALANCE;
use crate::domain::records::{
  DEFAULT_MAX_TRADES_PER_DAY, Goal, RecordId, Trade, TradeDraft, TradePatch, Withdrawal,
  WithdrawalDraft,
};
use crate::domain::settings::{Settings, Theme, UserProfile};
use crate::domain::state::JournalState;
use crate::error::{JournalError, StorageError, ValidationError};
use crate::ports::storage::{KeyValueStore, keys};

/// Limits applied when opening a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalOptions {
  /// Trades allowed per calendar day.
  pub max_trades_per_day: u8,
  /// Baseline used on first run, on a bad stored value and after a reset.
  pub default_starting_balance: Decimal,
}

impl Default for JournalOptions {
  fn default() -> Self {
    Self {
      max_trades_per_day: DEFAULT_MAX_TRADES_PER_DAY,
      default_starting_balance: DEFAULT_STARTING_BALANCE,
    }
  }
}

/// Journal use case over a key-value store.
pub struct Journal<S: KeyValueStore> {
  store: S,
  state: JournalState,
  options: JournalOptions,
}

impl<S: KeyValueStore> Journal<S> {
  /// Load every collection and setting from `store`.
  #[instrument(skip(store))]
  pub fn open(store: S, options: JournalOptions) -> Self {
    let trades: Vec<Trade> = load_json(&store, keys::TRADES).unwrap_or_default();
    let withdrawals: Vec<Withdrawal> =
      load_json(&store, keys::WITHDRAWALS).unwrap_or_default();
    let goals: Vec<Goal> = load_json(&store, keys::GOALS).unwrap_or_default();

    let starting_balance = load_raw(&store, keys::STARTING_BALANCE)
      .and_then(|raw| parse_decimal(&raw))
      .filter(|b| *b > Decimal::ZERO)
      .unwrap_or(options.default_starting_balance);

    let theme = load_raw(&store, keys::THEME)
      .and_then(|raw| match Theme::from_str(raw.trim_matches('"')) {
        Ok(theme) => Some(theme),
        Err(e) => {
          warn!(key = keys::THEME, error = %e, "Ignoring stored theme");
          None
        }
      })
      .unwrap_or_default();

    let settings = Settings {
      theme,
      trading_rules: load_raw(&store, keys::TRADING_RULES),
      user: load_json(&store, keys::CURRENT_USER).unwrap_or_default(),
    };

    let state = JournalState::from_parts(starting_balance, trades, withdrawals, goals)
      .with_daily_cap(options.max_trades_per_day)
      .with_settings(settings);

    info!(
      trades = state.trades().len(),
      withdrawals = state.withdrawals().len(),
      goals = state.goals().len(),
      starting_balance = %state.starting_balance(),
      balance = %state.account_balance(),
      "Journal loaded"
    );

    Self {
      store,
      state,
      options,
    }
  }

  pub const fn state(&self) -> &JournalState {
    &self.state
  }

  pub const fn store(&self) -> &S {
    &self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  // ── Trades ──────────────────────────────────

  #[instrument(skip(self, draft), fields(date = %draft.date, pair = %draft.pair))]
  pub fn add_trade(&mut self, draft: TradeDraft) -> Result<Trade, JournalError> {
    let trade = self.state.add_trade(draft)?.clone();
    info!(id = %trade.id, pnl = %trade.pnl, balance = %self.state.account_balance(), "Trade added");
    self.save_trades()?;
    Ok(trade)
  }

  #[instrument(skip(self, patch))]
  pub fn update_trade(&mut self, id: RecordId, patch: TradePatch) -> Result<Trade, JournalError> {
    let trade = self.state.update_trade(id, patch)?.clone();
    info!(%id, pnl = %trade.pnl, "Trade updated");
    self.save_trades()?;
    Ok(trade)
  }

  #[instrument(skip(self))]
  pub fn delete_trade(&mut self, id: RecordId) -> Result<Trade, JournalError> {
    let trade = self.state.remove_trade(id)?;
    info!(%id, balance = %self.state.account_balance(), "Trade deleted");
    self.save_trades()?;
    Ok(trade)
  }

  // ── Withdrawals ─────────────────────────────

  #[instrument(skip(self, draft), fields(amount = %draft.amount, broker = %draft.broker))]
  pub fn add_withdrawal(&mut self, draft: WithdrawalDraft) -> Result<Withdrawal, JournalError> {
    let withdrawal = self.state.add_withdrawal(draft)?.clone();
    info!(
      id = %withdrawal.id,
      before = %withdrawal.balance_before,
      after = %withdrawal.balance_after,
      "Withdrawal recorded"
    );
    self.save_withdrawals()?;
    Ok(withdrawal)
  }

  #[instrument(skip(self))]
  pub fn delete_withdrawal(&mut self, id: RecordId) -> Result<Withdrawal, JournalError> {
    let withdrawal = self.state.remove_withdrawal(id)?;
    info!(%id, balance = %self.state.account_balance(), "Withdrawal deleted");
    self.save_withdrawals()?;
    Ok(withdrawal)
  }

  // ── Goals ───────────────────────────────────

  #[instrument(skip(self, content))]
  pub fn add_goal(&mut self, content: &str, date: NaiveDate) -> Result<Goal, JournalError> {
    let goal = self.state.add_goal(content, date)?.clone();
    info!(id = %goal.id, "Goal added");
    write_json(&mut self.store, keys::GOALS, self.state.goals())?;
    Ok(goal)
  }

  #[instrument(skip(self, content))]
  pub fn update_goal(&mut self, id: RecordId, content: &str) -> Result<Goal, JournalError> {
    let goal = self.state.update_goal(id, content)?.clone();
    info!(%id, "Goal updated");
    write_json(&mut self.store, keys::GOALS, self.state.goals())?;
    Ok(goal)
  }

  #[instrument(skip(self))]
  pub fn delete_goal(&mut self, id: RecordId) -> Result<Goal, JournalError> {
    let goal = self.state.remove_goal(id)?;
    info!(%id, "Goal deleted");
    write_json(&mut self.store, keys::GOALS, self.state.goals())?;
    Ok(goal)
  }

  // ── Balance ─────────────────────────────────

  #[instrument(skip(self))]
  pub fn set_starting_balance(&mut self, amount: Decimal) -> Result<(), JournalError> {
    self.state.set_starting_balance(amount)?;
    info!(balance = %self.state.account_balance(), "Starting balance updated");
    self
      .store
      .set(keys::STARTING_BALANCE, &amount.to_string())?;
    self.save_balance()?;
    Ok(())
  }

  /// Delete every record and reset both balances. Settings are kept.
  #[instrument(skip(self))]
  pub fn clear_all(&mut self) -> Result<(), JournalError> {
    self.state.clear(self.options.default_starting_balance);
    warn!("All journal data cleared");

    for key in keys::RECORD_KEYS {
      self.store.remove(key)?;
    }
    write_json(&mut self.store, keys::TRADES, self.state.trades())?;
    write_json(&mut self.store, keys::GOALS, self.state.goals())?;
    write_json(&mut self.store, keys::WITHDRAWALS, self.state.withdrawals())?;
    self.save_balance()?;
    Ok(())
  }

  // ── Settings ────────────────────────────────

  pub fn set_theme(&mut self, theme: Theme) -> Result<(), JournalError> {
    self.state.settings_mut().theme = theme;
    info!(%theme, "Theme changed");
    self.store.set(keys::THEME, &theme.to_string())?;
    Ok(())
  }

  /// Save rules text; blank text removes the saved rules.
  pub fn set_trading_rules(&mut self, rules: &str) -> Result<(), JournalError> {
    if rules.trim().is_empty() {
      self.state.settings_mut().trading_rules = None;
      self.store.remove(keys::TRADING_RULES)?;
      info!("Trading rules cleared");
      return Ok(());
    }
    self.state.settings_mut().trading_rules = Some(rules.to_string());
    self.store.set(keys::TRADING_RULES, rules)?;
    info!(bytes = rules.len(), "Trading rules saved");
    Ok(())
  }

  /// Rename the current user.
  pub fn set_user_name(&mut self, name: &str) -> Result<(), JournalError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(ValidationError::MissingField("username").into());
    }
    self.state.settings_mut().user.name = name.to_string();
    self.save_user()
  }

  pub fn set_user(&mut self, user: UserProfile) -> Result<(), JournalError> {
    self.state.settings_mut().user = user;
    self.save_user()
  }

  // ── Persistence ─────────────────────────────

  fn save_trades(&mut self) -> Result<(), StorageError> {
    write_json(&mut self.store, keys::TRADES, self.state.trades())?;
    self.save_balance()
  }

  fn save_withdrawals(&mut self) -> Result<(), StorageError> {
    write_json(&mut self.store, keys::WITHDRAWALS, self.state.withdrawals())?;
    self.save_balance()
  }

  fn save_user(&mut self) -> Result<(), JournalError> {
    let user = self.state.settings().user.clone();
    write_json(&mut self.store, keys::CURRENT_USER, &user)?;
    info!(name = %user.name, "User profile saved");
    Ok(())
  }

  /// Cached balance, stored only for external readers.
  fn save_balance(&mut self) -> Result<(), StorageError> {
    let balance = self.state.account_balance().to_string();
    self.store.set(keys::ACCOUNT_BALANCE, &balance)
  }
}

/// Encode `value` as JSON and store it under `key`.
fn write_json<S: KeyValueStore, T: Serialize + ?Sized>(
  store: &mut S,
  key: &str,
  value: &T,
) -> Result<(), StorageError> {
  let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
    key: key.to_string(),
    source,
  })?;
  store.set(key, &json)
}

/// Raw stored string, or `None` on a missing key or read failure.
fn load_raw<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
  match store.get(key) {
    Ok(value) => value,
    Err(e) => {
      warn!(key, error = %e, "Storage read failed, using default");
      None
    }
  }
}

/// Decode a stored JSON value, or `None` when missing or malformed.
fn load_json<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
  let raw = load_raw(store, key)?;
  match serde_json::from_str(&raw) {
    Ok(value) => Some(value),
    Err(e) => {
      warn!(key, error = %e, "Malformed stored value, resetting to empty");
      None
    }
  }
}

/// Accepts `10000`, `"10000"` and `10000.50`.
fn parse_decimal(raw: &str) -> Option<Decimal> {
  let trimmed = raw.trim().trim_matches('"');
  match Decimal::from_str(trimmed) {
    Ok(value) => Some(value),
    Err(e) => {
      warn!(value = trimmed, error = %e, "Malformed stored balance, using default");
      None
    }
  }
}

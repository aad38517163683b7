//! In-memory journal state.
//!
//! Owns the three record collections, the starting balance and the
//! derived account balance. Every mutation goes through a method here,
//! and every method that touches trades, withdrawals or the starting
//! balance recomputes `account_balance` before returning. Collections
//! are stored newest-first by insertion, independent of the date field.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::activity::{ActivityItem, recent_activity};
use super::balance::{DEFAULT_STARTING_BALANCE, Growth, recompute_balance};
use super::calendar::{CalendarMonth, DayActivity, MonthGrid, day_activity, month_grid};
use super::records::{
    DEFAULT_MAX_TRADES_PER_DAY, Goal, IdGenerator, RecordId, RecordKind, Trade, TradeDraft,
    TradePatch, Withdrawal, WithdrawalDraft, goal_content,
};
use super::series::{EquitySeries, Period, build_series};
use super::settings::Settings;
use super::stats::StatsSummary;
use crate::error::{JournalError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalState {
    trades: Vec<Trade>,
    withdrawals: Vec<Withdrawal>,
    goals: Vec<Goal>,
    starting_balance: Decimal,
    /// Cached `starting + Σ pnl + Σ withdrawals`; never set directly.
    account_balance: Decimal,
    settings: Settings,
    ids: IdGenerator,
    daily_cap: u8,
}

impl Default for JournalState {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE)
    }
}

impl JournalState {
    /// Empty journal starting at `starting_balance`.
    pub fn new(starting_balance: Decimal) -> Self {
        Self::from_parts(starting_balance, Vec::new(), Vec::new(), Vec::new())
    }

    /// Rebuild state from loaded collections. The id generator continues
    /// after the largest stored id.
    pub fn from_parts(
        starting_balance: Decimal,
        trades: Vec<Trade>,
        withdrawals: Vec<Withdrawal>,
        goals: Vec<Goal>,
    ) -> Self {
        let last_id = trades
            .iter()
            .map(|t| t.id)
            .chain(withdrawals.iter().map(|w| w.id))
            .chain(goals.iter().map(|g| g.id))
            .max()
            .map_or(0, |id| id.0);

        let mut state = Self {
            trades,
            withdrawals,
            goals,
            starting_balance,
            account_balance: starting_balance,
            settings: Settings::default(),
            ids: IdGenerator::seeded(last_id),
            daily_cap: DEFAULT_MAX_TRADES_PER_DAY,
        };
        state.recompute();
        state
    }

    /// Override the per-day trade cap.
    #[must_use]
    pub const fn with_daily_cap(mut self, cap: u8) -> Self {
        self.daily_cap = cap;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    // ── Accessors ───────────────────────────────

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub const fn starting_balance(&self) -> Decimal {
        self.starting_balance
    }

    pub const fn account_balance(&self) -> Decimal {
        self.account_balance
    }

    pub const fn daily_cap(&self) -> u8 {
        self.daily_cap
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn growth(&self) -> Growth {
        Growth::between(self.account_balance, self.starting_balance)
    }

    /// Number of trades recorded on `date`.
    pub fn trades_on(&self, date: NaiveDate) -> usize {
        self.trades.iter().filter(|t| t.date == date).count()
    }

    pub fn trade(&self, id: RecordId) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn withdrawal(&self, id: RecordId) -> Option<&Withdrawal> {
        self.withdrawals.iter().find(|w| w.id == id)
    }

    pub fn goal(&self, id: RecordId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    // ── Trades ──────────────────────────────────

    /// Validate, enforce the daily cap, then prepend.
    pub fn add_trade(&mut self, draft: TradeDraft) -> Result<&Trade, JournalError> {
        draft.validate(self.daily_cap)?;
        if self.trades_on(draft.date) >= usize::from(self.daily_cap) {
            return Err(ValidationError::DailyCapReached {
                date: draft.date,
                cap: self.daily_cap,
            }
            .into());
        }

        let id = self.ids.next_id();
        self.trades.insert(0, draft.into_trade(id));
        self.recompute();
        Ok(&self.trades[0])
    }

    /// Apply `patch` to trade `id`. Only field shape is re-checked; the
    /// daily cap applies at creation time only.
    pub fn update_trade(&mut self, id: RecordId, patch: TradePatch) -> Result<&Trade, JournalError> {
        patch.validate(self.daily_cap)?;
        let idx = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or(JournalError::not_found(RecordKind::Trade, id))?;

        patch.apply(&mut self.trades[idx]);
        self.recompute();
        Ok(&self.trades[idx])
    }

    pub fn remove_trade(&mut self, id: RecordId) -> Result<Trade, JournalError> {
        let idx = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or(JournalError::not_found(RecordKind::Trade, id))?;
        let removed = self.trades.remove(idx);
        self.recompute();
        Ok(removed)
    }

    // ── Withdrawals ─────────────────────────────

    /// Validate against the current balance, snapshot it, then prepend.
    pub fn add_withdrawal(&mut self, draft: WithdrawalDraft) -> Result<&Withdrawal, JournalError> {
        draft.validate(self.account_balance)?;
        let id = self.ids.next_id();
        let withdrawal = draft.into_withdrawal(id, self.account_balance);
        self.withdrawals.insert(0, withdrawal);
        self.recompute();
        Ok(&self.withdrawals[0])
    }

    pub fn remove_withdrawal(&mut self, id: RecordId) -> Result<Withdrawal, JournalError> {
        let idx = self
            .withdrawals
            .iter()
            .position(|w| w.id == id)
            .ok_or(JournalError::not_found(RecordKind::Withdrawal, id))?;
        let removed = self.withdrawals.remove(idx);
        self.recompute();
        Ok(removed)
    }

    // ── Goals ───────────────────────────────────

    pub fn add_goal(&mut self, content: &str, date: NaiveDate) -> Result<&Goal, JournalError> {
        let content = goal_content(content)?;
        let id = self.ids.next_id();
        self.goals.insert(0, Goal { id, date, content });
        Ok(&self.goals[0])
    }

    /// Replace the goal's content; id and date are kept.
    pub fn update_goal(&mut self, id: RecordId, content: &str) -> Result<&Goal, JournalError> {
        let content = goal_content(content)?;
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(JournalError::not_found(RecordKind::Goal, id))?;
        goal.content = content;
        Ok(goal)
    }

    pub fn remove_goal(&mut self, id: RecordId) -> Result<Goal, JournalError> {
        let idx = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(JournalError::not_found(RecordKind::Goal, id))?;
        Ok(self.goals.remove(idx))
    }

    // ── Balance ─────────────────────────────────

    /// Set a new baseline (> 0). Withdrawal snapshots are left as recorded.
    pub fn set_starting_balance(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount {
                field: "starting balance",
                got: amount,
            });
        }
        self.starting_balance = amount;
        self.recompute();
        Ok(())
    }

    /// Drop every record and reset both balances to `starting_balance`.
    /// Settings survive.
    pub fn clear(&mut self, starting_balance: Decimal) {
        self.trades.clear();
        self.withdrawals.clear();
        self.goals.clear();
        self.starting_balance = starting_balance;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.account_balance =
            recompute_balance(self.starting_balance, &self.trades, &self.withdrawals);
    }

    // ── Views ───────────────────────────────────

    pub fn summary(&self, today: NaiveDate) -> StatsSummary {
        StatsSummary::compute(
            self.starting_balance,
            &self.trades,
            &self.withdrawals,
            self.daily_cap,
            today,
        )
    }

    pub fn series(&self, period: Period, today: NaiveDate) -> EquitySeries {
        build_series(period, self.starting_balance, &self.trades, &self.withdrawals, today)
    }

    pub fn month_grid(&self, month: CalendarMonth) -> MonthGrid {
        month_grid(month, &self.trades, &self.withdrawals)
    }

    pub fn day_activity(&self, date: NaiveDate) -> Option<DayActivity<'_>> {
        day_activity(date, &self.trades, &self.withdrawals)
    }

    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityItem<'_>> {
        recent_activity(&self.trades, &self.withdrawals, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn draft(date: NaiveDate, n: u8, pnl: Decimal) -> TradeDraft {
        TradeDraft {
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            trade_number: n,
            pair: "EUR/USD".to_string(),
            strategy: "Breakout".to_string(),
            pnl,
            notes: None,
        }
    }

    fn withdraw(amount: Decimal) -> WithdrawalDraft {
        WithdrawalDraft {
            date: day(17),
            time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            broker: "Oanda".to_string(),
            amount,
            notes: None,
        }
    }

    #[test]
    fn test_add_trade_prepends_and_recomputes() {
        let mut state = JournalState::default();
        let first = state.add_trade(draft(day(1), 1, dec!(100))).unwrap().id;
        let second = state.add_trade(draft(day(1), 2, dec!(-40))).unwrap().id;
        assert!(second > first);
        assert_eq!(state.trades()[0].id, second);
        assert_eq!(state.account_balance(), dec!(10060));
    }

    #[test]
    fn test_fifth_trade_on_same_date_rejected() {
        let mut state = JournalState::default();
        for n in 1..=4 {
            state.add_trade(draft(day(3), n, dec!(10))).unwrap();
        }
        let err = state.add_trade(draft(day(3), 1, dec!(10))).unwrap_err();
        assert!(matches!(
            err,
            JournalError::Validation(ValidationError::DailyCapReached { cap: 4, .. })
        ));
        assert_eq!(state.trades_on(day(3)), 4);
        assert_eq!(state.account_balance(), dec!(10040));
        // Another day is unaffected.
        assert!(state.add_trade(draft(day(4), 1, dec!(10))).is_ok());
    }

    #[test]
    fn test_custom_daily_cap() {
        let mut state = JournalState::default().with_daily_cap(2);
        state.add_trade(draft(day(3), 1, dec!(1))).unwrap();
        state.add_trade(draft(day(3), 2, dec!(1))).unwrap();
        assert!(state.add_trade(draft(day(3), 2, dec!(1))).is_err());
    }

    #[test]
    fn test_update_trade_keeps_id_and_recomputes() {
        let mut state = JournalState::default();
        let id = state.add_trade(draft(day(1), 1, dec!(100))).unwrap().id;
        let patch = TradePatch {
            pnl: Some(dec!(-25)),
            ..TradePatch::default()
        };
        let updated = state.update_trade(id, patch).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.pair, "EUR/USD");
        assert_eq!(state.account_balance(), dec!(9975));
    }

    #[test]
    fn test_update_missing_trade_is_not_found() {
        let mut state = JournalState::default();
        let err = state
            .update_trade(RecordId(5), TradePatch::default())
            .unwrap_err();
        assert!(matches!(err, JournalError::NotFound { kind: RecordKind::Trade, .. }));
    }

    #[test]
    fn test_withdrawal_over_balance_leaves_state_untouched() {
        let mut state = JournalState::new(dec!(500));
        let before = state.clone();
        let err = state.add_withdrawal(withdraw(dec!(500.01))).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(state, before);
    }

    #[test]
    fn test_withdrawal_snapshot_and_removal_restores_balance() {
        let mut state = JournalState::default();
        state.add_trade(draft(day(2), 1, dec!(250))).unwrap();
        let prior = state.account_balance();
        let w = state.add_withdrawal(withdraw(dec!(1000))).unwrap().clone();
        assert_eq!(w.balance_before, dec!(10250));
        assert_eq!(w.balance_after, dec!(9250));
        assert_eq!(state.account_balance(), dec!(9250));

        state.remove_withdrawal(w.id).unwrap();
        assert_eq!(state.account_balance(), prior);
    }

    #[test]
    fn test_starting_balance_change_keeps_snapshots() {
        let mut state = JournalState::default();
        let w = state.add_withdrawal(withdraw(dec!(100))).unwrap().id;
        state.set_starting_balance(dec!(20000)).unwrap();
        assert_eq!(state.account_balance(), dec!(19900));
        assert_eq!(state.withdrawal(w).unwrap().balance_before, dec!(10000));
        assert!(state.set_starting_balance(dec!(0)).is_err());
    }

    #[test]
    fn test_goals_lifecycle() {
        let mut state = JournalState::default();
        let id = state.add_goal("  Risk 1% per trade ", day(5)).unwrap().id;
        assert_eq!(state.goal(id).unwrap().content, "Risk 1% per trade");
        state.update_goal(id, "Risk 0.5% per trade").unwrap();
        assert_eq!(state.goals()[0].content, "Risk 0.5% per trade");
        assert!(state.add_goal("   ", day(5)).is_err());
        state.remove_goal(id).unwrap();
        assert!(state.remove_goal(id).is_err());
    }

    #[test]
    fn test_from_parts_seeds_ids_past_stored_max() {
        let far_future = u64::MAX / 2;
        let trade = draft(day(1), 1, dec!(5)).into_trade(RecordId(far_future));
        let mut state = JournalState::from_parts(dec!(100), vec![trade], Vec::new(), Vec::new());
        assert_eq!(state.account_balance(), dec!(105));
        let id = state.add_goal("new", day(1)).unwrap().id;
        assert_eq!(id, RecordId(far_future + 1));
    }

    #[test]
    fn test_clear_resets_everything_but_settings() {
        let mut state = JournalState::default();
        state.settings_mut().trading_rules = Some("No revenge trades".to_string());
        state.add_trade(draft(day(1), 1, dec!(5))).unwrap();
        state.add_goal("g", day(1)).unwrap();
        state.clear(dec!(10000));
        assert!(state.trades().is_empty());
        assert!(state.goals().is_empty());
        assert_eq!(state.account_balance(), dec!(10000));
        assert!(state.settings().trading_rules.is_some());
    }
}

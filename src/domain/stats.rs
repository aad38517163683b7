//! Statistics aggregator.
//!
//! Windowed net sums, win/loss counts, win rate and the daily trade cap
//! progress shown on the dashboard.
//!
//! Windows compare calendar dates only. `NaiveDate` orders exactly like
//! an ISO `YYYY-MM-DD` string, so "weekly" means `date >= today - 7 days`
//! with no time-of-day component, recomputed on every call.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::balance::{Growth, recompute_balance};
use super::records::{Trade, TradeOutcome, Withdrawal};

/// Sliding look-back window anchored at "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Records dated today.
    Today,
    /// Records dated on or after today − 7 days.
    Weekly,
    /// Records dated on or after today − 30 days.
    Monthly,
}

impl Window {
    /// Earliest date included in the window.
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        let back = match self {
            Self::Today => 0,
            Self::Weekly => 7,
            Self::Monthly => 30,
        };
        today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::Today => date == today,
            Self::Weekly | Self::Monthly => date >= self.start(today),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

/// Trades inside the window, in stored (newest-first) order.
pub fn trades_in_window(trades: &[Trade], window: Window, today: NaiveDate) -> Vec<&Trade> {
    trades
        .iter()
        .filter(|t| window.contains(t.date, today))
        .collect()
}

/// Withdrawals inside the window, in stored order.
pub fn withdrawals_in_window(
    withdrawals: &[Withdrawal],
    window: Window,
    today: NaiveDate,
) -> Vec<&Withdrawal> {
    withdrawals
        .iter()
        .filter(|w| window.contains(w.date, today))
        .collect()
}

/// Σ trade P&L + Σ withdrawal amounts dated inside the window.
pub fn net_for_window(
    trades: &[Trade],
    withdrawals: &[Withdrawal],
    window: Window,
    today: NaiveDate,
) -> Decimal {
    let pnl: Decimal = trades_in_window(trades, window, today)
        .into_iter()
        .map(|t| t.pnl)
        .sum();
    let withdrawn: Decimal = withdrawals_in_window(withdrawals, window, today)
        .into_iter()
        .map(|w| w.amount)
        .sum();
    pnl + withdrawn
}

/// Win / loss / break-even counts over a set of trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub winning: usize,
    pub losing: usize,
    pub break_even: usize,
}

impl OutcomeCounts {
    pub fn tally<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        trades
            .into_iter()
            .fold(Self::default(), |mut acc, t| {
                match t.outcome() {
                    TradeOutcome::Win => acc.winning += 1,
                    TradeOutcome::Loss => acc.losing += 1,
                    TradeOutcome::BreakEven => acc.break_even += 1,
                }
                acc
            })
    }

    /// Trades that either won or lost.
    pub const fn decisive(&self) -> usize {
        self.winning + self.losing
    }

    pub const fn total(&self) -> usize {
        self.winning + self.losing + self.break_even
    }

    /// `winning / (winning + losing) * 100`; break-even trades are ignored.
    /// Returns 0 when no trade was decisive.
    pub fn win_rate(&self) -> Decimal {
        if self.decisive() == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.winning) / Decimal::from(self.decisive()) * Decimal::ONE_HUNDRED
    }

    /// Raw `"W:L"` counts.
    pub fn ratio_label(&self) -> String {
        format!("{}:{}", self.winning, self.losing)
    }
}

/// Win rate in percent over `trades`.
pub fn win_rate(trades: &[Trade]) -> Decimal {
    OutcomeCounts::tally(trades).win_rate()
}

/// Win/loss ratio label over `trades`.
pub fn win_loss_ratio(trades: &[Trade]) -> String {
    OutcomeCounts::tally(trades).ratio_label()
}

/// Progress towards the daily trade cap, clamped to 100%.
pub fn daily_cap_progress(today_count: usize, cap: u8) -> Decimal {
    if cap == 0 {
        return Decimal::ONE_HUNDRED;
    }
    let ratio = (Decimal::from(today_count) / Decimal::from(cap)).min(Decimal::ONE);
    ratio * Decimal::ONE_HUNDRED
}

/// Gross profit and loss totals (both positive numbers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfitLoss {
    /// Σ P&L of winning trades.
    pub total_profit: Decimal,
    /// |Σ P&L of losing trades|.
    pub total_loss: Decimal,
}

impl ProfitLoss {
    pub fn of(trades: &[Trade]) -> Self {
        let total_profit = trades
            .iter()
            .filter(|t| t.pnl > Decimal::ZERO)
            .map(|t| t.pnl)
            .sum();
        let loss: Decimal = trades
            .iter()
            .filter(|t| t.pnl < Decimal::ZERO)
            .map(|t| t.pnl)
            .sum();
        Self {
            total_profit,
            total_loss: loss.abs(),
        }
    }

    pub fn net(&self) -> Decimal {
        self.total_profit - self.total_loss
    }
}

/// Total withdrawn as a positive number.
pub fn total_withdrawn(withdrawals: &[Withdrawal]) -> Decimal {
    withdrawals.iter().map(|w| w.amount).sum::<Decimal>().abs()
}

/// Rollup for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStats {
    pub window: Window,
    pub net: Decimal,
    pub trade_count: usize,
    pub withdrawal_count: usize,
}

impl WindowStats {
    pub fn compute(
        trades: &[Trade],
        withdrawals: &[Withdrawal],
        window: Window,
        today: NaiveDate,
    ) -> Self {
        Self {
            window,
            net: net_for_window(trades, withdrawals, window, today),
            trade_count: trades_in_window(trades, window, today).len(),
            withdrawal_count: withdrawals_in_window(withdrawals, window, today).len(),
        }
    }
}

/// Everything the dashboard summary cards show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummary {
    pub balance: Decimal,
    pub starting_balance: Decimal,
    pub growth: Growth,
    pub today: WindowStats,
    pub weekly: WindowStats,
    pub monthly: WindowStats,
    pub daily_cap: u8,
    pub cap_progress: Decimal,
    pub outcomes: OutcomeCounts,
    pub profit_loss: ProfitLoss,
    pub total_withdrawn: Decimal,
}

impl StatsSummary {
    pub fn compute(
        starting_balance: Decimal,
        trades: &[Trade],
        withdrawals: &[Withdrawal],
        daily_cap: u8,
        today: NaiveDate,
    ) -> Self {
        let balance = recompute_balance(starting_balance, trades, withdrawals);
        let today_stats = WindowStats::compute(trades, withdrawals, Window::Today, today);
        let cap_progress = daily_cap_progress(today_stats.trade_count, daily_cap);

        Self {
            balance,
            starting_balance,
            growth: Growth::between(balance, starting_balance),
            weekly: WindowStats::compute(trades, withdrawals, Window::Weekly, today),
            monthly: WindowStats::compute(trades, withdrawals, Window::Monthly, today),
            today: today_stats,
            daily_cap,
            cap_progress,
            outcomes: OutcomeCounts::tally(trades),
            profit_loss: ProfitLoss::of(trades),
            total_withdrawn: total_withdrawn(withdrawals),
        }
    }

    pub fn win_rate(&self) -> Decimal {
        self.outcomes.win_rate()
    }
}

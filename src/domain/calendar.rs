//! Calendar month grid and per-day activity.
//!
//! Feeds the dashboard calendar: one summary cell per day of the month,
//! Sunday-first, plus the detail listing for a single day.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use super::balance::Polarity;
use super::records::{Trade, Withdrawal};

/// A calendar month being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    /// `month` is 1-based. Returns `None` for an invalid month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub const fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Month after this one; rolls December into January.
    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Month before this one; rolls January into December.
    pub fn prev(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Move by `offset` months (negative goes back).
    pub fn shift(&self, offset: i32) -> Self {
        let months = Months::new(offset.unsigned_abs());
        let first = if offset >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        Self {
            first: first.unwrap_or(self.first),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        self.next()
            .first
            .pred_opt()
            .map_or(31, |last| last.day())
    }

    /// Blank cells before day 1 in a Sunday-first grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Heading such as `October 2026`.
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month()).filter_map(|d| self.first.with_day(d))
    }
}

/// Summary cell for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub trade_count: usize,
    pub withdrawal_count: usize,
    /// Σ trade P&L + Σ withdrawal amounts for the day.
    pub net: Decimal,
}

impl DaySummary {
    pub fn compute(date: NaiveDate, trades: &[Trade], withdrawals: &[Withdrawal]) -> Self {
        let day_trades = trades.iter().filter(|t| t.date == date);
        let day_withdrawals = withdrawals.iter().filter(|w| w.date == date);
        let (trade_count, pnl) = day_trades.fold((0, Decimal::ZERO), |(n, sum), t| (n + 1, sum + t.pnl));
        let (withdrawal_count, withdrawn) = day_withdrawals
            .fold((0, Decimal::ZERO), |(n, sum), w| (n + 1, sum + w.amount));
        Self {
            date,
            trade_count,
            withdrawal_count,
            net: pnl + withdrawn,
        }
    }

    pub const fn activity_count(&self) -> usize {
        self.trade_count + self.withdrawal_count
    }

    pub const fn has_activity(&self) -> bool {
        self.activity_count() > 0
    }

    /// Colouring for the cell; `None` on days without activity.
    pub fn polarity(&self) -> Option<Polarity> {
        self.has_activity().then(|| Polarity::of(self.net))
    }
}

/// Month grid ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: CalendarMonth,
    pub leading_blanks: u32,
    pub days: Vec<DaySummary>,
}

impl MonthGrid {
    /// Net across every day of the month.
    pub fn month_net(&self) -> Decimal {
        self.days.iter().map(|d| d.net).sum()
    }

    pub fn active_days(&self) -> impl Iterator<Item = &DaySummary> {
        self.days.iter().filter(|d| d.has_activity())
    }
}

pub fn month_grid(month: CalendarMonth, trades: &[Trade], withdrawals: &[Withdrawal]) -> MonthGrid {
    MonthGrid {
        month,
        leading_blanks: month.leading_blanks(),
        days: month
            .days()
            .map(|date| DaySummary::compute(date, trades, withdrawals))
            .collect(),
    }
}

/// Everything recorded on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayActivity<'a> {
    pub date: NaiveDate,
    pub trades: Vec<&'a Trade>,
    pub withdrawals: Vec<&'a Withdrawal>,
    pub net: Decimal,
}

/// Activity on `date`, or `None` when nothing was recorded.
pub fn day_activity<'a>(
    date: NaiveDate,
    trades: &'a [Trade],
    withdrawals: &'a [Withdrawal],
) -> Option<DayActivity<'a>> {
    let day_trades: Vec<&Trade> = trades.iter().filter(|t| t.date == date).collect();
    let day_withdrawals: Vec<&Withdrawal> =
        withdrawals.iter().filter(|w| w.date == date).collect();

    if day_trades.is_empty() && day_withdrawals.is_empty() {
        return None;
    }

    let net = day_trades.iter().map(|t| t.pnl).sum::<Decimal>()
        + day_withdrawals.iter().map(|w| w.amount).sum::<Decimal>();

    Some(DayActivity {
        date,
        trades: day_trades,
        withdrawals: day_withdrawals,
        net,
    })
}

//! Time-series builder for the equity chart.
//!
//! Turns trades and withdrawals into a cumulative balance series seeded
//! at the starting balance. Daily periods bucket by exact date; the
//! 12-month period buckets by calendar month. The output is plain
//! `(label, balance)` pairs; drawing belongs to the chart collaborator.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::records::{Trade, Withdrawal};
use crate::error::ValidationError;

/// Label of the synthetic first point.
pub const STARTING_LABEL: &str = "Starting";

/// Label used when a daily period has no activity at all.
pub const EMPTY_SERIES_LABEL: &str = "Starting Balance";

/// Months shown by the 12-month view.
const MONTH_BUCKETS: u32 = 12;

/// Chart period selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Period {
    /// Dates after today − 7 days, i.e. the last seven days.
    #[default]
    SevenDays,
    /// Dates after today − 1 calendar month.
    OneMonth,
    /// Twelve calendar months ending with the current one.
    TwelveMonths,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SevenDays => write!(f, "7d"),
            Self::OneMonth => write!(f, "1m"),
            Self::TwelveMonths => write!(f, "12m"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(Self::SevenDays),
            "1m" => Ok(Self::OneMonth),
            "12m" => Ok(Self::TwelveMonths),
            other => Err(ValidationError::Unparseable {
                field: "period",
                value: other.to_string(),
            }),
        }
    }
}

/// One chart point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub balance: Decimal,
}

impl SeriesPoint {
    fn new(label: impl Into<String>, balance: Decimal) -> Self {
        Self {
            label: label.into(),
            balance,
        }
    }
}

/// Cumulative balance series for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquitySeries {
    pub period: String,
    pub points: Vec<SeriesPoint>,
}

impl EquitySeries {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.balance).collect()
    }

    /// Balance at the last point.
    pub fn closing_balance(&self) -> Option<Decimal> {
        self.points.last().map(|p| p.balance)
    }
}

/// Short day label, e.g. `Oct 7`.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Month label, e.g. `Oct 26`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %y").to_string()
}

/// Build the equity series for `period` as of `today`.
pub fn build_series(
    period: Period,
    starting_balance: Decimal,
    trades: &[Trade],
    withdrawals: &[Withdrawal],
    today: NaiveDate,
) -> EquitySeries {
    let points = match period {
        Period::SevenDays => {
            let start = today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
            daily_points(starting_balance, trades, withdrawals, start)
        }
        Period::OneMonth => {
            let start = today
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN);
            daily_points(starting_balance, trades, withdrawals, start)
        }
        Period::TwelveMonths => monthly_points(starting_balance, trades, withdrawals, today),
    };

    EquitySeries {
        period: period.to_string(),
        points,
    }
}

/// Net effect per exact date, ascending.
pub fn daily_net(trades: &[Trade], withdrawals: &[Withdrawal]) -> BTreeMap<NaiveDate, Decimal> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for trade in trades {
        *by_date.entry(trade.date).or_default() += trade.pnl;
    }
    for withdrawal in withdrawals {
        *by_date.entry(withdrawal.date).or_default() += withdrawal.amount;
    }
    by_date
}

fn daily_points(
    starting_balance: Decimal,
    trades: &[Trade],
    withdrawals: &[Withdrawal],
    after: NaiveDate,
) -> Vec<SeriesPoint> {
    let by_date = daily_net(trades, withdrawals);
    let in_window: Vec<(NaiveDate, Decimal)> = by_date
        .range((Excluded(after), Unbounded))
        .map(|(d, net)| (*d, *net))
        .collect();

    if in_window.is_empty() {
        return vec![SeriesPoint::new(EMPTY_SERIES_LABEL, starting_balance)];
    }

    let mut balance = starting_balance;
    let mut points = Vec::with_capacity(in_window.len() + 1);
    points.push(SeriesPoint::new(STARTING_LABEL, balance));
    for (date, net) in in_window {
        balance += net;
        points.push(SeriesPoint::new(short_date(date), balance));
    }
    points
}

fn monthly_points(
    starting_balance: Decimal,
    trades: &[Trade],
    withdrawals: &[Withdrawal],
    today: NaiveDate,
) -> Vec<SeriesPoint> {
    let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for (date, net) in daily_net(trades, withdrawals) {
        *by_month.entry((date.year(), date.month())).or_default() += net;
    }

    let current = first_of_month(today);
    let first = current
        .checked_sub_months(Months::new(MONTH_BUCKETS - 1))
        .unwrap_or(current);

    let mut balance = starting_balance;
    let mut points = Vec::with_capacity(MONTH_BUCKETS as usize + 1);
    points.push(SeriesPoint::new(STARTING_LABEL, balance));
    for i in 0..MONTH_BUCKETS {
        let Some(month) = first.checked_add_months(Months::new(i)) else {
            break;
        };
        balance += by_month
            .get(&(month.year(), month.month()))
            .copied()
            .unwrap_or_default();
        points.push(SeriesPoint::new(month_label(month), balance));
    }
    points
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

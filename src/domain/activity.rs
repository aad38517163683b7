//! Recent activity feed merging trades and withdrawals.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use super::records::{RecordId, Trade, Withdrawal};

/// Entries shown in the recent-activity table by default.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// A trade or a withdrawal, viewed as one activity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityItem<'a> {
    Trade(&'a Trade),
    Withdrawal(&'a Withdrawal),
}

impl ActivityItem<'_> {
    pub const fn id(&self) -> RecordId {
        match self {
            Self::Trade(t) => t.id,
            Self::Withdrawal(w) => w.id,
        }
    }

    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Trade(t) => t.date,
            Self::Withdrawal(w) => w.date,
        }
    }

    pub const fn time(&self) -> NaiveTime {
        match self {
            Self::Trade(t) => t.time,
            Self::Withdrawal(w) => w.time,
        }
    }

    /// Signed effect on the balance.
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Trade(t) => t.pnl,
            Self::Withdrawal(w) => w.amount,
        }
    }

    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Trade(_) => "Trade",
            Self::Withdrawal(_) => "Withdrawal",
        }
    }

    /// `pair - strategy` for trades, broker for withdrawals.
    pub fn description(&self) -> String {
        match self {
            Self::Trade(t) => format!("{} - {}", t.pair, t.strategy),
            Self::Withdrawal(w) => w.broker.clone(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Trade(t) => t.status_label(),
            Self::Withdrawal(_) => "PROCESSED",
        }
    }
}

/// Newest `limit` activities by (date, time), most recent first.
pub fn recent_activity<'a>(
    trades: &'a [Trade],
    withdrawals: &'a [Withdrawal],
    limit: usize,
) -> Vec<ActivityItem<'a>> {
    let mut items: Vec<ActivityItem<'a>> = trades
        .iter()
        .map(ActivityItem::Trade)
        .chain(withdrawals.iter().map(ActivityItem::Withdrawal))
        .collect();
    items.sort_by(|a, b| (b.date(), b.time()).cmp(&(a.date(), a.time())));
    items.truncate(limit);
    items
}

//! Journal record types.
//!
//! Defines the three record collections owned by the journal: trades,
//! withdrawals and goals, plus the draft/patch inputs used to create
//! and edit them. Persisted field names are camelCase.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Trades allowed per calendar day unless configured otherwise.
pub const DEFAULT_MAX_TRADES_PER_DAY: u8 = 4;

/// Note stored when the user leaves the notes field empty.
pub const DEFAULT_NOTE: &str = "No notes provided";

// ────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────

/// Record identifier. Values issued by `IdGenerator` are creation
/// timestamps in Unix milliseconds, bumped to stay strictly increasing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::Unparseable {
                field: "id",
                value: s.to_string(),
            })
    }
}

/// Monotonic id source: `next = max(now_ms, last + 1)`.
///
/// Seed it with the largest id already stored so ids issued after a
/// reload never collide with persisted ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Generator continuing after `last`.
    pub const fn seeded(last: u64) -> Self {
        Self { last }
    }

    /// Issue an id for a record created at `now_ms`.
    pub fn next_at(&mut self, now_ms: u64) -> RecordId {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        RecordId(id)
    }

    /// Issue an id stamped with the current wall clock.
    pub fn next_id(&mut self) -> RecordId {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_at(now_ms)
    }

    /// Last id handed out (or the seed).
    pub const fn last(&self) -> u64 {
        self.last
    }
}

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Trade,
    Withdrawal,
    Goal,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trade => write!(f, "trade"),
            Self::Withdrawal => write!(f, "withdrawal"),
            Self::Goal => write!(f, "goal"),
        }
    }
}

// ────────────────────────────────────────────
// Trades
// ────────────────────────────────────────────

/// Win/loss classification of a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeOutcome {
    Win,
    Loss,
    BreakEven,
}

impl TradeOutcome {
    /// Classify a P&L amount: `> 0` wins, `< 0` loses, `0` breaks even.
    pub fn of(pnl: Decimal) -> Self {
        if pnl > Decimal::ZERO {
            Self::Win
        } else if pnl < Decimal::ZERO {
            Self::Loss
        } else {
            Self::BreakEven
        }
    }
}

/// A recorded trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: RecordId,
    /// Calendar day of the trade.
    pub date: NaiveDate,
    /// Time of day the trade was taken.
    pub time: NaiveTime,
    /// Sequence number within the day (1..=cap).
    pub trade_number: u8,
    /// Currency pair label, e.g. `EUR/USD`.
    pub pair: String,
    pub strategy: String,
    /// Realized profit or loss (signed).
    pub pnl: Decimal,
    pub notes: String,
}

impl Trade {
    pub fn outcome(&self) -> TradeOutcome {
        TradeOutcome::of(self.pnl)
    }

    /// Status badge shown next to the trade. Break-even counts as a win
    /// for display, never for win-rate.
    pub fn status_label(&self) -> &'static str {
        if self.pnl >= Decimal::ZERO { "WIN" } else { "LOSS" }
    }
}

/// User input for a new trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeDraft {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub trade_number: u8,
    pub pair: String,
    pub strategy: String,
    pub pnl: Decimal,
    pub notes: Option<String>,
}

impl TradeDraft {
    /// Field-level checks; the daily cap is checked against the store.
    pub fn validate(&self, max_per_day: u8) -> Result<(), ValidationError> {
        validate_trade_number(self.trade_number, max_per_day)?;
        require("pair", &self.pair)?;
        require("strategy", &self.strategy)?;
        Ok(())
    }

    /// Materialize the draft under a freshly issued id.
    pub fn into_trade(self, id: RecordId) -> Trade {
        Trade {
            id,
            date: self.date,
            time: self.time,
            trade_number: self.trade_number,
            pair: self.pair.trim().to_string(),
            strategy: self.strategy.trim().to_string(),
            pnl: self.pnl,
            notes: note_or_default(self.notes),
        }
    }
}

/// Partial edit of an existing trade. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradePatch {
    pub time: Option<NaiveTime>,
    pub trade_number: Option<u8>,
    pub pair: Option<String>,
    pub strategy: Option<String>,
    pub pnl: Option<Decimal>,
    pub notes: Option<String>,
}

impl TradePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self, max_per_day: u8) -> Result<(), ValidationError> {
        if let Some(n) = self.trade_number {
            validate_trade_number(n, max_per_day)?;
        }
        if let Some(pair) = &self.pair {
            require("pair", pair)?;
        }
        if let Some(strategy) = &self.strategy {
            require("strategy", strategy)?;
        }
        Ok(())
    }

    /// Apply listed fields; id and date are never touched.
    pub fn apply(self, trade: &mut Trade) {
        if let Some(time) = self.time {
            trade.time = time;
        }
        if let Some(n) = self.trade_number {
            trade.trade_number = n;
        }
        if let Some(pair) = self.pair {
            trade.pair = pair.trim().to_string();
        }
        if let Some(strategy) = self.strategy {
            trade.strategy = strategy.trim().to_string();
        }
        if let Some(pnl) = self.pnl {
            trade.pnl = pnl;
        }
        if let Some(notes) = self.notes {
            trade.notes = note_or_default(Some(notes));
        }
    }
}

// ────────────────────────────────────────────
// Withdrawals
// ────────────────────────────────────────────

/// Money taken out of the account.
///
/// `amount` is stored negative. The balance snapshots are captured when
/// the withdrawal is created and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: RecordId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub broker: String,
    /// Signed effect on the balance (always `<= 0`).
    pub amount: Decimal,
    pub notes: String,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

impl Withdrawal {
    /// Withdrawn amount as a positive number.
    pub fn withdrawn(&self) -> Decimal {
        self.amount.abs()
    }
}

/// User input for a new withdrawal. `amount` is the positive sum taken out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalDraft {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub broker: String,
    pub amount: Decimal,
    pub notes: Option<String>,
}

impl WithdrawalDraft {
    /// Field checks plus the balance rule against `balance`.
    pub fn validate(&self, balance: Decimal) -> Result<(), ValidationError> {
        require("broker", &self.broker)?;
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount {
                field: "withdrawal amount",
                got: self.amount,
            });
        }
        if self.amount > balance {
            return Err(ValidationError::ExceedsBalance {
                requested: self.amount,
                available: balance,
            });
        }
        Ok(())
    }

    /// Materialize with the balance snapshot taken at creation time.
    pub fn into_withdrawal(self, id: RecordId, balance: Decimal) -> Withdrawal {
        let amount = self.amount.abs();
        Withdrawal {
            id,
            date: self.date,
            time: self.time,
            broker: self.broker.trim().to_string(),
            amount: -amount,
            notes: note_or_default(self.notes),
            balance_before: balance,
            balance_after: balance - amount,
        }
    }
}

// ────────────────────────────────────────────
// Goals
// ────────────────────────────────────────────

/// A free-text trading goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    /// Day the goal was written.
    pub date: NaiveDate,
    pub content: String,
}

/// Trimmed goal text, rejected when empty.
pub fn goal_content(content: &str) -> Result<String, ValidationError> {
    require("goal", content)?;
    Ok(content.trim().to_string())
}

// ────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

const fn validate_trade_number(n: u8, max: u8) -> Result<(), ValidationError> {
    if n == 0 || n > max {
        return Err(ValidationError::InvalidTradeNumber { got: n, max });
    }
    Ok(())
}

fn note_or_default(notes: Option<String>) -> String {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_NOTE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn draft() -> TradeDraft {
        TradeDraft {
            date: d("2026-10-17"),
            time: t("09:30"),
            trade_number: 1,
            pair: " EUR/USD ".to_string(),
            strategy: "Breakout".to_string(),
            pnl: dec!(125.50),
            notes: None,
        }
    }

    #[test]
    fn test_id_generator_is_strictly_increasing() {
        let mut ids = IdGenerator::seeded(1_000);
        assert_eq!(ids.next_at(500), RecordId(1_001));
        assert_eq!(ids.next_at(500), RecordId(1_002));
        assert_eq!(ids.next_at(5_000), RecordId(5_000));
        assert_eq!(ids.next_at(5_000), RecordId(5_001));
    }

    #[test]
    fn test_record_id_parse() {
        assert_eq!("  77 ".parse::<RecordId>(), Ok(RecordId(77)));
        assert!("abc".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_trade_draft_defaults_notes_and_trims() {
        let trade = draft().into_trade(RecordId(1));
        assert_eq!(trade.pair, "EUR/USD");
        assert_eq!(trade.notes, DEFAULT_NOTE);
    }

    #[test]
    fn test_trade_draft_rejects_bad_trade_number() {
        let mut bad = draft();
        bad.trade_number = 5;
        assert_eq!(
            bad.validate(4),
            Err(ValidationError::InvalidTradeNumber { got: 5, max: 4 })
        );
        bad.trade_number = 0;
        assert!(bad.validate(4).is_err());
    }

    #[test]
    fn test_trade_draft_requires_pair() {
        let mut bad = draft();
        bad.pair = "   ".to_string();
        assert_eq!(bad.validate(4), Err(ValidationError::MissingField("pair")));
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(TradeOutcome::of(dec!(0.01)), TradeOutcome::Win);
        assert_eq!(TradeOutcome::of(dec!(-3)), TradeOutcome::Loss);
        assert_eq!(TradeOutcome::of(dec!(0)), TradeOutcome::BreakEven);
    }

    #[test]
    fn test_patch_keeps_unlisted_fields() {
        let mut trade = draft().into_trade(RecordId(9));
        TradePatch {
            pnl: Some(dec!(-40)),
            ..TradePatch::default()
        }
        .apply(&mut trade);
        assert_eq!(trade.id, RecordId(9));
        assert_eq!(trade.pnl, dec!(-40));
        assert_eq!(trade.pair, "EUR/USD");
        assert_eq!(trade.status_label(), "LOSS");
    }

    #[test]
    fn test_patch_blank_notes_fall_back_to_default() {
        let mut trade = draft().into_trade(RecordId(3));
        TradePatch {
            notes: Some("  Held through news  ".to_string()),
            ..TradePatch::default()
        }
        .apply(&mut trade);
        assert_eq!(trade.notes, "Held through news");

        TradePatch {
            notes: Some("   ".to_string()),
            ..TradePatch::default()
        }
        .apply(&mut trade);
        assert_eq!(trade.notes, DEFAULT_NOTE);
    }

    #[test]
    fn test_withdrawal_snapshot_and_sign() {
        let draft = WithdrawalDraft {
            date: d("2026-10-17"),
            time: t("12:00"),
            broker: "IC Markets".to_string(),
            amount: dec!(250),
            notes: Some(String::new()),
        };
        assert!(draft.validate(dec!(1000)).is_ok());
        let w = draft.into_withdrawal(RecordId(3), dec!(1000));
        assert_eq!(w.amount, dec!(-250));
        assert_eq!(w.balance_before, dec!(1000));
        assert_eq!(w.balance_after, dec!(750));
        assert_eq!(w.withdrawn(), dec!(250));
        assert_eq!(w.notes, DEFAULT_NOTE);
    }

    #[test]
    fn test_withdrawal_over_balance_rejected() {
        let draft = WithdrawalDraft {
            date: d("2026-10-17"),
            time: t("12:00"),
            broker: "IC Markets".to_string(),
            amount: dec!(1000.01),
            notes: None,
        };
        assert!(matches!(
            draft.validate(dec!(1000)),
            Err(ValidationError::ExceedsBalance { .. })
        ));
    }

    #[test]
    fn test_trade_serializes_camel_case() {
        let trade = draft().into_trade(RecordId(1_700_000_000_000));
        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["tradeNumber"], 1);
        assert_eq!(json["date"], "2026-10-17");
        assert_eq!(json["id"], 1_700_000_000_000_u64);
    }

    #[test]
    fn test_trade_accepts_numeric_pnl_and_short_time() {
        let json = r#"{"id":1,"date":"2026-10-01","time":"14:05","tradeNumber":2,
            "pair":"GBP/USD","strategy":"Scalp","pnl":-12.5,"notes":"late entry"}"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.pnl, dec!(-12.5));
        assert_eq!(trade.time, t("14:05"));
    }

    #[test]
    fn test_goal_content_trimmed() {
        assert_eq!(goal_content("  hit 10%  ").unwrap(), "hit 10%");
        assert!(goal_content("  ").is_err());
    }
}

//! Balance engine.
//!
//! The account balance is never stored as a source of truth: it is
//! always `starting + Σ trade.pnl + Σ withdrawal.amount`, recomputed
//! after every change to trades, withdrawals or the starting balance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::records::{Trade, Withdrawal};

/// Starting balance used when none has been set.
pub const DEFAULT_STARTING_BALANCE: Decimal = dec!(10000);

/// Display polarity used for amounts, growth and calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Profit,
    Loss,
}

impl Polarity {
    /// Non-negative amounts are `Profit`.
    pub fn of(amount: Decimal) -> Self {
        if amount >= Decimal::ZERO {
            Self::Profit
        } else {
            Self::Loss
        }
    }

    /// CSS-style class name the presentation layer keys off.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Profit => "profit",
            Self::Loss => "loss",
        }
    }
}

/// Recompute the current balance from first principles.
///
/// Withdrawal amounts already carry a negative sign.
pub fn recompute_balance(
    starting_balance: Decimal,
    trades: &[Trade],
    withdrawals: &[Withdrawal],
) -> Decimal {
    let pnl: Decimal = trades.iter().map(|t| t.pnl).sum();
    let withdrawn: Decimal = withdrawals.iter().map(|w| w.amount).sum();
    starting_balance + pnl + withdrawn
}

/// Growth of the account relative to its starting balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Growth {
    /// `balance - starting`.
    pub absolute: Decimal,
    /// `absolute / starting * 100`, or 0 when starting is not positive.
    pub percentage: Decimal,
}

impl Growth {
    pub fn between(balance: Decimal, starting_balance: Decimal) -> Self {
        let absolute = balance - starting_balance;
        let percentage = if starting_balance > Decimal::ZERO {
            absolute / starting_balance * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        Self {
            absolute,
            percentage,
        }
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.absolute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::RecordId;
    use chrono::{NaiveDate, NaiveTime};

    fn trade(pnl: Decimal) -> Trade {
        Trade {
            id: RecordId(1),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            trade_number: 1,
            pair: "EUR/USD".to_string(),
            strategy: "Trend".to_string(),
            pnl,
            notes: String::new(),
        }
    }

    fn withdrawal(amount: Decimal) -> Withdrawal {
        Withdrawal {
            id: RecordId(2),
            date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            broker: "Broker".to_string(),
            amount,
            notes: String::new(),
            balance_before: Decimal::ZERO,
            balance_after: Decimal::ZERO,
        }
    }

    #[test]
    fn test_recompute_balance() {
        let trades = vec![trade(dec!(100)), trade(dec!(-50)), trade(dec!(0))];
        let withdrawals = vec![withdrawal(dec!(-25))];
        assert_eq!(
            recompute_balance(dec!(10000), &trades, &withdrawals),
            dec!(10025)
        );
    }

    #[test]
    fn test_recompute_balance_empty() {
        assert_eq!(recompute_balance(dec!(500), &[], &[]), dec!(500));
    }

    #[test]
    fn test_growth_profit() {
        let g = Growth::between(dec!(11000), dec!(10000));
        assert_eq!(g.absolute, dec!(1000));
        assert_eq!(g.percentage, dec!(10));
        assert_eq!(g.polarity(), Polarity::Profit);
    }

    #[test]
    fn test_growth_loss() {
        let g = Growth::between(dec!(9500), dec!(10000));
        assert_eq!(g.absolute, dec!(-500));
        assert_eq!(g.percentage, dec!(-5));
        assert_eq!(g.polarity().class(), "loss");
    }

    #[test]
    fn test_growth_zero_starting_balance() {
        let g = Growth::between(dec!(100), Decimal::ZERO);
        assert_eq!(g.percentage, Decimal::ZERO);
    }

    #[test]
    fn test_zero_growth_is_profit() {
        assert_eq!(Polarity::of(Decimal::ZERO), Polarity::Profit);
    }
}

//! Display formatting for money, percentages and dates.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.56`, always unsigned.
pub fn format_currency(amount: Decimal) -> String {
    format!("${}", grouped(amount.abs()))
}

/// `+$1,234.56` for `>= 0`, `-$1,234.56` otherwise. The sign follows
/// the cent-rounded value, so `-0.004` is `+$0.00`.
pub fn format_currency_with_sign(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if cents >= Decimal::ZERO { '+' } else { '-' };
    format!("{sign}{}", format_currency(cents))
}

/// One decimal place, e.g. `66.7%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

/// Percentage with an explicit sign, e.g. `+5.0%`.
pub fn format_percent_with_sign(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+{}", format_percent(value))
    } else {
        format_percent(value)
    }
}

/// `Oct 17, 2026`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Two fractional digits with comma thousands separators.
fn grouped(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{rounded:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

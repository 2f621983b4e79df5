//! Parsing and formatting of monetary amounts.
//!
//! Amounts are [Decimal]s so that sums over many small transactions do not
//! drift. They are stored as TEXT in SQLite and rendered with exactly two
//! fraction digits.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// The largest amount accepted for a single transaction, budget or goal.
///
/// Keeps sums over any realistic ledger far away from [Decimal::MAX].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Parse a decimal from a string, accepting plain and scientific notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Parse a decimal from a JSON number or numeric string.
///
/// Anything else (booleans, objects, empty strings, NaN-like strings) yields `None`.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(string) => parse_decimal(string),
        _ => None,
    }
}

/// Parse a strictly positive amount no larger than [MAX_AMOUNT].
pub fn positive_amount_from_json(value: &Value) -> Option<Decimal> {
    decimal_from_json(value).filter(|amount| *amount > Decimal::ZERO && *amount <= MAX_AMOUNT)
}

/// Render `amount` with exactly two fraction digits, rounding half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    format!("{rounded:.2}")
}

/// Round a ratio in `[0, 1]` to a whole percentage.
pub fn ratio_to_percent(ratio: Decimal) -> u32 {
    use rust_decimal::prelude::ToPrimitive;

    (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

//! Yen amounts as written to payment files.

use crate::error::{GenError, GenResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Whole yen, truncated toward zero. Fractions of a yen are never billed.
pub fn exact_yen(amount: Decimal) -> GenResult<i64> {
    amount
        .trunc()
        .to_i64()
        .ok_or_else(|| GenError::validation(format!("amount {amount} is out of range")))
}

/// Negative invoice totals are credit balances and are settled elsewhere.
pub fn is_negative(amount: Decimal) -> bool {
    amount.is_sign_negative() && !amount.is_zero()
}

/// Number of characters in the decimal rendering of `value`.
pub fn digit_len(value: i64) -> usize {
    value.to_string().len()
}

/// Thousands-separated amount, e.g. `1,020` or `-1,121,231,232.11`.
/// The fractional part is kept only when it is non-zero.
pub fn format_currency(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let digits = normalized.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if is_negative(normalized) {
        out.push('-');
    }
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

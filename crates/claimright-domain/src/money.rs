//! Exact decimal helpers for monetary amounts.
//!
//! All arithmetic is performed on [`Decimal`]; nothing in the amortization path
//! touches floating point, so the sum of a split always equals its total.

use rust_decimal::{Decimal, RoundingStrategy};

/// Default number of fractional digits for currencies not listed below.
pub const DEFAULT_MINOR_UNITS: u32 = 2;

const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "VND", "CLP", "ISK", "UGX", "XAF", "XOF"];
const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "KWD", "OMR", "JOD", "TND", "IQD", "LYD"];

/// Normalizes a currency code to its upper-case ISO 4217 form.
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Returns the ISO 4217 minor-unit exponent for `currency`.
pub fn minor_units(currency: &str) -> u32 {
    let code = normalize_currency(currency);
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        3
    } else {
        DEFAULT_MINOR_UNITS
    }
}

/// Truncates `amount` towards negative infinity at `scale` fractional digits.
pub fn floor_to_scale(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::ToNegativeInfinity)
}

/// Result of splitting a total into equal floored shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvenSplit {
    /// Amount assigned to every part except the last.
    pub share: Decimal,
    /// Amount assigned to the last part; absorbs the rounding remainder.
    pub last: Decimal,
    pub parts: u32,
}

impl EvenSplit {
    /// Expands the split into one amount per part, in order.
    pub fn amounts(&self) -> Vec<Decimal> {
        let mut amounts = vec![self.share; self.parts.saturating_sub(1) as usize];
        if self.parts > 0 {
            amounts.push(self.last);
        }
        amounts
    }
}

/// Divides `total` into `parts` shares floored to `scale` digits, with the last
/// share receiving `total - sum(previous shares)`.
///
/// Returns `None` when `parts` is zero or the arithmetic would overflow.
pub fn divide_with_remainder(total: Decimal, parts: u32, scale: u32) -> Option<EvenSplit> {
    if parts == 0 {
        return None;
    }
    let divisor = Decimal::from(parts);
    let share = floor_to_scale(total.checked_div(divisor)?, scale);
    let allocated = share.checked_mul(Decimal::from(parts - 1))?;
    let last = total.checked_sub(allocated)?;
    Some(EvenSplit { share, last, parts })
}

/// Sums amounts without panicking on overflow.
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

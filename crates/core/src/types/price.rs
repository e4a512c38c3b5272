//! Type-safe price representation using decimal arithmetic.
//!
//! Prices coming from the catalog API (and read back from form fields) are
//! loosely typed: numbers, numeric strings, `null`, or garbage. [`Price::coerce`]
//! turns those into a [`Price`] the same way a browser's `Number(...)` would,
//! and [`format_money`] renders an amount for display.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency glyph prefixed to every displayed amount (Bangladeshi taka).
pub const CURRENCY_SYMBOL: &str = "৳";

/// Maximum number of fractional digits shown by [`format_money`].
const MAX_FRACTION_DIGITS: u32 = 3;

/// A non-currency-tagged monetary amount.
///
/// The storefront only ever deals in one currency, so the amount is all that
/// is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Coerce a loosely typed JSON value into a price.
    ///
    /// - numbers are taken as-is
    /// - strings are trimmed and parsed (plain or scientific notation); an
    ///   empty string is zero
    /// - booleans are one or zero
    /// - `null`, arrays, objects and unparseable strings yield `None`
    #[must_use]
    pub fn coerce(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => parse_decimal(&n.to_string()).map(Self),
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Bool(b) => Some(if *b { Self::from_units(1) } else { Self::ZERO }),
            _ => None,
        }
    }

    /// Parse a price from text, e.g. a form field. Empty input is zero.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(Self::ZERO);
        }
        parse_decimal(trimmed).map(Self)
    }

    /// This unit price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(Some(*self)))
    }
}

/// Format an amount for display, e.g. `৳1,300`.
///
/// A missing amount is shown as zero. The integer part is grouped in
/// thousands; at most three fractional digits are kept (rounded half away
/// from zero) and trailing zeros are dropped.
#[must_use]
pub fn format_money(amount: Option<Price>) -> String {
    let amount = amount.unwrap_or(Price::ZERO).0;
    let rounded = amount
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    if rounded.is_zero() {
        return format!("{CURRENCY_SYMBOL}0");
    }

    let text = rounded.abs().to_string();
    let (integer, fraction) = text.split_once('.').map_or((text.as_str(), None), |(i, f)| (i, Some(f)));

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 4);
    out.push_str(CURRENCY_SYMBOL);
    if rounded.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

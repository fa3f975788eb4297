//! Money type for transaction amounts
//!
//! Internally stores amounts in cents (i64) so that summing thousands of
//! exported rows never drifts the way floating-point sums do.

use std::fmt;
use std::ops::{Add, AddAssign, Neg};

/// A monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units, truncated toward zero
    pub const fn whole_units(&self) -> i64 {
        self.0 / 100
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse a money amount as it appears in a bank export
    ///
    /// Accepts "10.50", "-10.50", "$1,024.50", "(10.50)" (accounting negative),
    /// plain integers (taken as whole units) and exponent notation such as
    /// "1e3". Digits past the second decimal place are dropped; exponent
    /// values are rounded to the nearest cent.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
            .collect();

        let (negative, value) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
            (true, &cleaned[1..cleaned.len() - 1])
        } else if let Some(stripped) = cleaned.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, cleaned.as_str())
        };

        if value.is_empty() {
            return Err(invalid());
        }

        let cents = if value.contains(['e', 'E']) {
            parse_exponent(value).ok_or_else(invalid)?
        } else {
            parse_decimal(value).ok_or_else(invalid)?
        };

        Ok(Self(if negative { -cents } else { cents }))
    }
}

/// Cents from plain decimal notation; `None` on any stray character or overflow
fn parse_decimal(value: &str) -> Option<i64> {
    let (units, fraction) = value.split_once('.').unwrap_or((value, ""));

    if units.is_empty() && fraction.is_empty() {
        return None;
    }
    if !units.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let units: i64 = if units.is_empty() { 0 } else { units.parse().ok()? };

    // Pad or truncate to 2 digits
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction[..2].parse().ok()?,
    };

    units.checked_mul(100)?.checked_add(fraction)
}

/// Cents from exponent notation; only digits, one `.`, the exponent marker
/// and an exponent sign are allowed
fn parse_exponent(value: &str) -> Option<i64> {
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let cents = (value.parse::<f64>().ok()? * 100.0).round();
    if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

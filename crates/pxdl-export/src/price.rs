//! Fixed-point two-decimal prices.
//!
//! Provider values arrive as `f64`. Rounding happens once, on the value's
//! shortest decimal representation, so `101.505` rounds the way a reader of
//! the number expects (`101.51`) rather than the way its binary neighbour
//! would. After that everything is integer cents: formatting never goes back
//! through floating point.

use std::fmt;
use std::str::FromStr;

/// A price in hundredths of the quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Round to two decimals, half away from zero.
    ///
    /// Returns `None` for NaN, infinities and magnitudes that do not fit in
    /// `i64` cents.
    pub fn round_from(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // `Display` for f64 is the shortest round-trip form and never uses
        // exponent notation.
        round_decimal_text(&value.to_string())
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Error returned when a string is not a plain decimal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCentsError(String);

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a decimal price: '{}'", self.0)
    }
}

impl std::error::Error for ParseCentsError {}

impl FromStr for Cents {
    type Err = ParseCentsError;

    /// Parse `[-]digits[.digits]`, rounding half away from zero past two
    /// decimals. Used to read exported CSV back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        round_decimal_text(s.trim()).ok_or_else(|| ParseCentsError(s.to_string()))
    }
}

fn round_decimal_text(text: &str) -> Option<Cents> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = int_part.parse().ok()?;
    let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
    let tenths = frac.next().unwrap_or(0);
    let hundredths = frac.next().unwrap_or(0);
    let round_up = frac.next().is_some_and(|d| d >= 5);

    let mut cents = whole.checked_mul(100)?.checked_add(tenths * 10 + hundredths)?;
    if round_up {
        cents = cents.checked_add(1)?;
    }
    Some(Cents(if negative { -cents } else { cents }))
}

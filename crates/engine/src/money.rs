use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Basis points in one whole (100%).
pub const BPS_SCALE: i64 = 10_000;

/// US dollar amount in integer cents.
///
/// Prices, order totals, tax and commission cuts are all `MoneyCents`; rates
/// are basis points and only meet an amount through [`MoneyCents::portion_floor`]
/// or [`MoneyCents::portion_half_up`].
///
/// ```rust
/// use engine::MoneyCents;
///
/// let price: MoneyCents = "$500".parse().unwrap();
/// assert_eq!(price.cents(), 50_000);
/// assert_eq!(price.portion_half_up(800).to_string(), "$40.00");
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: i64) -> Option<MoneyCents> {
        self.0.checked_mul(quantity).map(MoneyCents)
    }

    /// Share of the amount at `rate_bps`, truncated toward zero, so that
    /// `amount - share` never goes below the complementary share.
    #[must_use]
    pub fn portion_floor(self, rate_bps: i64) -> MoneyCents {
        let value = i128::from(self.0) * i128::from(rate_bps) / i128::from(BPS_SCALE);
        MoneyCents(value as i64)
    }

    /// Share of the amount at `rate_bps`, rounded half-up to the cent.
    #[must_use]
    pub fn portion_half_up(self, rate_bps: i64) -> MoneyCents {
        let scale = i128::from(BPS_SCALE);
        let value = (i128::from(self.0) * i128::from(rate_bps) + scale / 2) / scale;
        MoneyCents(value as i64)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Accepts `500`, `$500`, `12.5` and `12.50`. Negative amounts and more
    /// than two decimals are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidAmount(format!("{reason}: '{s}'"));

        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(invalid("invalid amount"));
        }

        let cents = match frac.len() {
            0 => 0,
            1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
            2 => frac.parse::<i64>().map_err(|_| invalid("invalid amount"))?,
            _ => return Err(invalid("too many decimals")),
        };
        whole
            .parse::<i64>()
            .ok()
            .and_then(|dollars| dollars.checked_mul(100))
            .and_then(|value| value.checked_add(cents))
            .map(MoneyCents)
            .ok_or_else(|| invalid("amount too large"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_usd() {
        assert_eq!(MoneyCents::new(1).to_string(), "$0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "$10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-$10.50");
    }

    #[test]
    fn parse_accepts_dollar_prefix() {
        assert_eq!("$500".parse::<MoneyCents>().unwrap().cents(), 50_000);
        assert_eq!(" 2.3 ".parse::<MoneyCents>().unwrap().cents(), 230);
        assert!("-1".parse::<MoneyCents>().is_err());
        assert!("0.001".parse::<MoneyCents>().is_err());
        assert!(".50".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn portions_round_as_documented() {
        let amount = MoneyCents::new(999);
        assert_eq!(amount.portion_floor(5_000).cents(), 499);
        assert_eq!(amount.portion_half_up(5_000).cents(), 500);
        assert_eq!(MoneyCents::new(50_000).portion_half_up(800).cents(), 4_000);
    }
}

use std::fmt;

use serde::{Serialize, Serializer};

/// Fixed-point decimal with 10 decimal places, stored as a scaled integer.
///
/// Prices are whole cents, and applying two basis-point rates to a cent value
/// needs at most 10 decimals, so tax and discount amounts stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000_000_000;
    const CENT: i64 = Self::SCALE / 100;

    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents * Self::CENT)
    }

    pub const fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    /// Portion of this amount given by `rate`.
    pub fn apply_rate(self, rate: Rate) -> Self {
        let scaled = self.0 as i128 * rate.basis_points() as i128;
        Amount(div_round(scaled, Rate::ONE as i128) as i64)
    }

    /// Round to whole cents, half away from zero.
    pub fn round_cents(self) -> Self {
        let cents = div_round(self.0 as i128, Self::CENT as i128) as i64;
        Amount::from_cents(cents)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

fn div_round(value: i128, divisor: i128) -> i128 {
    let half = divisor / 2;
    if value >= 0 {
        (value + half) / divisor
    } else {
        (value - half) / divisor
    }
}

/// Displays at least two decimals, more only when the value needs them.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = abs / scale;
        let frac = format!("{:010}", abs % scale);
        let trimmed = frac.trim_end_matches('0');
        let frac = if trimmed.len() < 2 { &frac[..2] } else { trimmed };
        write!(f, "{sign}{whole}.{frac}")
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

/// A percentage stored in basis points (`1300` is 13%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Rate(u32);

impl Rate {
    const ONE: u32 = 10_000;

    pub const ZERO: Rate = Rate(0);
    pub const FULL: Rate = Rate(Self::ONE);

    pub const fn from_basis_points(bp: u32) -> Self {
        Rate(bp)
    }

    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent * 100)
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        match self.0 % 100 {
            0 => write!(f, "{whole}%"),
            frac if frac % 10 == 0 => write!(f, "{whole}.{}%", frac / 10),
            frac => write!(f, "{whole}.{frac:02}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_scales() {
        assert_eq!(Amount::from_cents(2599), Amount::from_scaled(259_900_000_000));
        assert_eq!(Amount::from_cents(0), Amount::ZERO);
    }

    #[test]
    fn apply_rate_keeps_full_precision() {
        let subtotal = Amount::from_cents(3598);
        let tax = subtotal.apply_rate(Rate::from_percent(13));
        assert_eq!(tax.to_string(), "4.6774");
    }

    #[test]
    fn apply_rate_twice_is_exact() {
        let taxed = Amount::from_cents(3598) + Amount::from_cents(3598).apply_rate(Rate::from_percent(13));
        let discount = taxed.apply_rate(Rate::from_percent(10));
        assert_eq!(discount.to_string(), "4.06574");
    }

    #[test]
    fn round_cents_half_away_from_zero() {
        assert_eq!(Amount::from_scaled(406_574_000_000).round_cents(), Amount::from_cents(4066));
        assert_eq!(Amount::from_scaled(406_550_000_000).round_cents(), Amount::from_cents(4066));
        assert_eq!(Amount::from_scaled(406_549_999_999).round_cents(), Amount::from_cents(4065));
        assert_eq!(Amount::from_scaled(-50_000_000).round_cents(), Amount::from_cents(-1));
    }

    #[test]
    fn display_formats_at_least_two_decimals() {
        assert_eq!(Amount::from_cents(4066).to_string(), "40.66");
        assert_eq!(Amount::from_cents(150).to_string(), "1.50");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert_eq!(Amount::from_scaled(1).to_string(), "0.0000000001");
    }

    #[test]
    fn display_formats_negative() {
        assert_eq!(Amount::from_cents(-5025).to_string(), "-50.25");
    }

    #[test]
    fn serializes_as_json_number() {
        let json = serde_json::to_string(&Amount::from_cents(4066)).unwrap();
        assert_eq!(json, "40.66");
    }

    #[test]
    fn add_and_sub() {
        let a = Amount::from_cents(100);
        let b = Amount::from_cents(50);
        assert_eq!(a + b, Amount::from_cents(150));
        assert_eq!(a - b, Amount::from_cents(50));
    }

    #[test]
    fn rate_display() {
        assert_eq!(Rate::from_percent(13).to_string(), "13%");
        assert_eq!(Rate::from_basis_points(1250).to_string(), "12.5%");
        assert_eq!(Rate::from_basis_points(1205).to_string(), "12.05%");
        assert_eq!(Rate::ZERO.to_string(), "0%");
    }
}

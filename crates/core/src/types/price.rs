//! Money and loyalty point amounts.
//!
//! All prices are Korean won held as [`Decimal`] so that the implied unit
//! price of a cart line (`total / quantity`) can be carried without binary
//! floating point error. Display rounds to whole won.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A won amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero won.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a whole number of won.
    #[must_use]
    pub fn won(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Wrap an arbitrary decimal amount.
    #[must_use]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `self - rhs`, floored at zero.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }

    /// Divide by a quantity, keeping full decimal precision.
    ///
    /// Returns `None` for a zero divisor.
    #[must_use]
    pub fn checked_div(self, quantity: u32) -> Option<Self> {
        self.0.checked_div(Decimal::from(quantity)).map(Self)
    }

    /// Amount rounded half-up to whole won.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display, e.g. `11,000원`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.rounded();
        let digits = rounded.abs().trunc().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{grouped}원")
        } else {
            format!("{grouped}원")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Loyalty points. One point spends as one won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(u32);

impl Points {
    /// No points.
    pub const ZERO: Self = Self(0);

    /// Create a point amount.
    #[must_use]
    pub const fn new(points: u32) -> Self {
        Self(points)
    }

    /// Get the raw point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The won value of these points.
    #[must_use]
    pub fn as_price(&self) -> Price {
        Price::won(i64::from(self.0))
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}P", Price::won(i64::from(self.0)).display().trim_end_matches('원'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::won(0).display(), "0원");
        assert_eq!(Price::won(500).display(), "500원");
        assert_eq!(Price::won(4500).display(), "4,500원");
        assert_eq!(Price::won(1_234_567).display(), "1,234,567원");
    }

    #[test]
    fn test_display_rounds_to_whole_won() {
        let price = Price::from_decimal(Decimal::new(99_995, 1));
        assert_eq!(price.display(), "10,000원");
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        assert_eq!(Price::won(3000).saturating_sub(Price::won(5000)), Price::ZERO);
        assert_eq!(Price::won(5000).saturating_sub(Price::won(3000)), Price::won(2000));
    }

    #[test]
    fn test_checked_div_by_zero() {
        assert_eq!(Price::won(1000).checked_div(0), None);
        assert_eq!(Price::won(1000).checked_div(4), Some(Price::won(250)));
    }

    #[test]
    fn test_sum_and_mul() {
        let total: Price = [Price::won(1000), Price::won(2500)].iter().sum();
        assert_eq!(total * 2, Price::won(7000));
    }

    #[test]
    fn test_points_display() {
        assert_eq!(Points::new(12_500).to_string(), "12,500P");
        assert_eq!(Points::new(300).as_price(), Price::won(300));
    }
}

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub, Mul, Div};
use std::fmt;

/// Rupee amount. Kept unrounded; display rounding happens at the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub const fn from_f64(value: f64) -> Self {
        Price(value)
    }

    pub fn to_f64(&self) -> f64 {
        self.0
    }

    pub fn zero() -> Self {
        Price(0.0)
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    pub fn abs(&self) -> Self {
        Price(self.0.abs())
    }

    /// Parses a provider amount, tolerating grouping separators ("1,59,000", "2 65 000").
    pub fn parse_grouped(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            return None;
        }

        cleaned.parse::<f64>().ok().filter(|v| v.is_finite()).map(Price)
    }
}

impl Add for Price {
    type Output = Price;
    fn add(self, other: Price) -> Price {
        Price(self.0 + other.0)
    }
}

impl Sub for Price {
    type Output = Price;
    fn sub(self, other: Price) -> Price {
        Price(self.0 - other.0)
    }
}

impl Mul<f64> for Price {
    type Output = Price;
    fn mul(self, scalar: f64) -> Price {
        Price(self.0 * scalar)
    }
}

impl Div<f64> for Price {
    type Output = Price;
    fn div(self, scalar: f64) -> Price {
        Price(self.0 / scalar)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_indian_grouping() {
        assert_eq!(Price::parse_grouped("1,59,000"), Some(Price::from_f64(159000.0)));
        assert_eq!(Price::parse_grouped(" 2,65,000.50 "), Some(Price::from_f64(265000.5)));
        assert_eq!(Price::parse_grouped("159000"), Some(Price::from_f64(159000.0)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(Price::parse_grouped(""), None);
        assert_eq!(Price::parse_grouped("N/A"), None);
        assert_eq!(Price::parse_grouped(",,"), None);
        assert_eq!(Price::parse_grouped("inf"), None);
    }

    #[test]
    fn positivity_excludes_zero_and_nan() {
        assert!(Price::from_f64(1.0).is_positive());
        assert!(!Price::zero().is_positive());
        assert!(!Price::from_f64(-5.0).is_positive());
        assert!(!Price::from_f64(f64::NAN).is_positive());
    }
}

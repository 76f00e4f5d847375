//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront API serializes product prices as decimal strings
//! (`"12.50"`), but report aggregates computed server-side can arrive as
//! bare JSON numbers. [`Price`] deserializes from either form and always
//! serializes back as a string, which is what the API accepts on writes.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount in the store's currency.
///
/// Wraps [`Decimal`] so money never round-trips through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, e.g. to compute a cart line total.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse::<Decimal>()
                    .map(Price)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Decimal::from_f64(v)
                    .map(Price)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                Ok(Price(Decimal::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price(Decimal::from(v)))
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let price: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(price.to_string(), "12.50");
    }

    #[test]
    fn test_deserialize_from_number() {
        let price: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(price.to_string(), "12.50");

        let price: Price = serde_json::from_str("40").unwrap();
        assert_eq!(price.to_string(), "40.00");
    }

    #[test]
    fn test_serialize_as_string() {
        let price = Price::new(Decimal::new(1250, 2));
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"12.50\"");
    }

    #[test]
    fn test_times_is_exact() {
        // 0.1 * 3 must be 0.30, not 0.30000000000000004
        let price: Price = serde_json::from_str("\"0.10\"").unwrap();
        assert_eq!(price.times(3).to_string(), "0.30");
    }

    #[test]
    fn test_sum() {
        let total: Price = ["\"1.25\"", "\"2.75\""]
            .iter()
            .map(|s| serde_json::from_str::<Price>(s).unwrap())
            .sum();
        assert_eq!(total.to_string(), "4.00");
    }

    #[test]
    fn test_rejects_garbage_string() {
        assert!(serde_json::from_str::<Price>("\"not-a-price\"").is_err());
    }
}

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const NGN_CURRENCY_CODE: &str = "NGN";
pub const NGN_CURRENCY_CODE_LOWER: &str = "ngn";

const KOBO_PER_NAIRA: i64 = 100;

//--------------------------------------      Naira       ------------------------------------------------------------
/// A monetary amount in Nigerian Naira, held internally as an integer number of kobo so that sums over cart lines and
/// gateway-confirmed totals never accumulate floating point error.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Naira(i64);

op!(binary Naira, Add, add);
op!(binary Naira, Sub, sub);
op!(scalar Naira, Mul, mul);
op!(inplace Naira, SubAssign, sub_assign);
op!(unary Naira, Neg, neg);

impl Sum for Naira {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in kobo: {0}")]
pub struct NairaConversionError(String);

impl From<i64> for Naira {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Naira {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Naira {}

impl TryFrom<f64> for Naira {
    type Error = NairaConversionError;

    /// Converts an amount of whole naira (the unit the gateway reports in) into kobo.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let kobo = (value * KOBO_PER_NAIRA as f64).round();
        if !kobo.is_finite() || kobo.abs() >= i64::MAX as f64 {
            return Err(NairaConversionError(format!("{value} naira is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(kobo as i64))
    }
}

impl Display for Naira {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let naira = self.0 / KOBO_PER_NAIRA;
        let kobo = (self.0 % KOBO_PER_NAIRA).abs();
        write!(f, "₦{naira}.{kobo:02}")
    }
}

impl Naira {
    /// The raw value in kobo.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_naira(naira: i64) -> Self {
        Self(naira * KOBO_PER_NAIRA)
    }

    /// The amount in whole naira, as the gateway expects it on outgoing requests.
    pub fn to_naira_f64(&self) -> f64 {
        self.0 as f64 / KOBO_PER_NAIRA as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cart_total_arithmetic() {
        let total: Naira = [Naira::from_naira(5_000) * 2, Naira::from_naira(3_000)].into_iter().sum();
        assert_eq!(total, Naira::from_naira(13_000));
        assert_eq!(total.to_string(), "₦13000.00");
    }

    #[test]
    fn gateway_amounts_round_trip() {
        let amount = Naira::try_from(13_000.0).unwrap();
        assert_eq!(amount, Naira::from_naira(13_000));
        assert_eq!(amount.to_naira_f64(), 13_000.0);
        let fractional = Naira::try_from(99.99).unwrap();
        assert_eq!(fractional.value(), 9_999);
    }
}

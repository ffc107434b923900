// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::str::FromStr;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, ToPrimitive};
use serde::ser::Serializer;
use serde::Serialize;

use crate::Rc;

/// Numeric payload of the dynamic [`Value`](crate::Value).
///
/// Integers that fit a machine word are stored inline; larger ones are kept
/// exactly as big integers. Numbers compare by the quantity they denote, so
/// `1` and `1.0` address the same map entry and `1e20` equals the integer
/// `100000000000000000000`.
#[derive(Clone)]
pub enum Number {
    UInt(u64),
    Int(i64),
    Float(f64),
    BigInt(Rc<BigInt>),
}

impl Number {
    fn from_bigint_owned(value: BigInt) -> Self {
        if value.is_negative() {
            if let Some(i) = value.to_i64() {
                return Number::Int(i);
            }
        } else if let Some(u) = value.to_u64() {
            return Number::UInt(u);
        }
        Number::BigInt(Rc::new(value))
    }

    /// The exact integer this number denotes, or the float itself when it
    /// is fractional, infinite or NaN.
    fn integral(&self) -> Result<BigInt, f64> {
        match self {
            Number::UInt(v) => Ok(BigInt::from(*v)),
            Number::Int(v) => Ok(BigInt::from(*v)),
            Number::BigInt(v) => Ok((**v).clone()),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                BigInt::from_f64(*f).ok_or(*f)
            }
            Number::Float(f) => Err(*f),
        }
    }

    pub fn format_decimal(&self) -> String {
        match self {
            Number::UInt(v) => v.to_string(),
            Number::Int(v) => v.to_string(),
            Number::BigInt(v) => v.to_string(),
            Number::Float(f) if f.is_nan() => "NaN".to_string(),
            Number::Float(f) => f.to_string(),
        }
    }
}

// Orders an integer against a float that is not an integer. NaN sorts above
// every other number.
fn cmp_int_float(int: &BigInt, float: f64) -> Ordering {
    if float.is_nan() || float == f64::INFINITY {
        return Ordering::Less;
    }
    if float == f64::NEG_INFINITY {
        return Ordering::Greater;
    }
    // floor(f) < f < floor(f) + 1, so the floor decides.
    match BigInt::from_f64(float.floor()) {
        Some(floor) if *int <= floor => Ordering::Less,
        Some(_) => Ordering::Greater,
        None => Ordering::Less,
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::UInt(v) => serializer.serialize_u64(*v),
            Number::Int(v) => serializer.serialize_i64(*v),
            Number::Float(v) => serializer.serialize_f64(*v),
            // Wider than 128 bits only happens for computed keys. Decimal
            // text keeps them exact.
            Number::BigInt(v) => match (v.to_i128(), v.to_u128()) {
                (Some(i), _) => serializer.serialize_i128(i),
                (_, Some(u)) => serializer.serialize_u128(u),
                _ => serializer.collect_str(v),
            },
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::from_bigint_owned(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::UInt(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<u128> for Number {
    fn from(value: u128) -> Self {
        Number::from_bigint_owned(BigInt::from(value))
    }
}

impl From<i128> for Number {
    fn from(value: i128) -> Self {
        Number::from_bigint_owned(BigInt::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseNumberError;

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit()) {
            return BigInt::from_str(s)
                .map(Number::from_bigint_owned)
                .map_err(|_| ParseNumberError);
        }
        s.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| ParseNumberError)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.integral(), other.integral()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(a), Err(b)) => cmp_int_float(&a, b),
            (Err(a), Ok(b)) => cmp_int_float(&b, a).reverse(),
            (Err(a), Err(b)) => a
                .partial_cmp(&b)
                .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan())),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

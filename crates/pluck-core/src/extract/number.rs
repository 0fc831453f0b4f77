//! Numeric targets: signed and unsigned integers, floats, and exact
//! decimals.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{Context, Scalar};
use crate::error::{PluckError, Result};

fn strip_thousands(found: &str) -> String {
    found.chars().filter(|&c| c != ',').collect()
}

fn parse_decimal(found: &str, target: &'static str) -> Result<Decimal> {
    Decimal::from_str(&strip_thousands(found)).map_err(|e| PluckError::Parse {
        value: found.to_string(),
        target,
        reason: e.to_string(),
    })
}

fn first_decimal(text: &str, cx: &Context<'_>, target: &'static str) -> Result<Option<Decimal>> {
    cx.table()
        .number()
        .find(text)
        .map(|m| parse_decimal(m.as_str(), target))
        .transpose()
}

fn all_decimals(text: &str, cx: &Context<'_>, target: &'static str) -> Result<Vec<Decimal>> {
    cx.table()
        .number()
        .find_iter(text)
        .map(|m| parse_decimal(m.as_str(), target))
        .collect()
}

/// Round to a whole number, halves away from zero, then narrow to the
/// target width.
fn narrow<T: TryFrom<i64>>(value: Decimal, target: &'static str) -> Result<T> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .and_then(|wide| T::try_from(wide).ok())
        .ok_or_else(|| PluckError::Parse {
            value: value.to_string(),
            target,
            reason: "out of range".to_string(),
        })
}

fn parse_unsigned<T: TryFrom<u64>>(found: &str, target: &'static str) -> Result<T> {
    let wide = u64::from_str(&strip_thousands(found)).map_err(|e| PluckError::Parse {
        value: found.to_string(),
        target,
        reason: e.to_string(),
    })?;
    T::try_from(wide).map_err(|_| PluckError::Parse {
        value: found.to_string(),
        target,
        reason: "out of range".to_string(),
    })
}

fn represent<T>(converted: Option<T>, value: Decimal, target: &'static str) -> Result<T> {
    converted.ok_or_else(|| PluckError::Parse {
        value: value.to_string(),
        target,
        reason: "not representable".to_string(),
    })
}

macro_rules! signed_targets {
    ($($target:ty),* $(,)?) => {$(
        impl Scalar for $target {
            const TARGET: &'static str = stringify!($target);

            fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
                first_decimal(text, cx, Self::TARGET)?
                    .map(|d| narrow(d, Self::TARGET))
                    .transpose()
            }

            fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
                all_decimals(text, cx, Self::TARGET)?
                    .into_iter()
                    .map(|d| narrow(d, Self::TARGET))
                    .collect()
            }

            fn fallback() -> Self {
                0
            }
        }
    )*};
}

signed_targets!(i16, i32, i64);

macro_rules! unsigned_targets {
    ($($target:ty),* $(,)?) => {$(
        impl Scalar for $target {
            const TARGET: &'static str = stringify!($target);

            fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
                cx.table()
                    .unsigned_number()
                    .find(text)
                    .map(|m| parse_unsigned(m.as_str(), Self::TARGET))
                    .transpose()
            }

            fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
                cx.table()
                    .unsigned_number()
                    .find_iter(text)
                    .map(|m| parse_unsigned(m.as_str(), Self::TARGET))
                    .collect()
            }

            fn fallback() -> Self {
                0
            }
        }
    )*};
}

unsigned_targets!(u16, u32, u64);

macro_rules! float_targets {
    ($(($target:ty, $convert:ident)),* $(,)?) => {$(
        impl Scalar for $target {
            const TARGET: &'static str = stringify!($target);

            fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
                first_decimal(text, cx, Self::TARGET)?
                    .map(|d| represent(d.$convert(), d, Self::TARGET))
                    .transpose()
            }

            fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
                all_decimals(text, cx, Self::TARGET)?
                    .into_iter()
                    .map(|d| represent(d.$convert(), d, Self::TARGET))
                    .collect()
            }

            fn fallback() -> Self {
                0.0
            }
        }
    )*};
}

float_targets!((f32, to_f32), (f64, to_f64));

impl Scalar for Decimal {
    const TARGET: &'static str = "decimal";

    fn first(text: &str, cx: &Context<'_>) -> Result<Option<Self>> {
        first_decimal(text, cx, Self::TARGET)
    }

    fn all(text: &str, cx: &Context<'_>) -> Result<Vec<Self>> {
        all_decimals(text, cx, Self::TARGET)
    }

    fn fallback() -> Self {
        Decimal::ZERO
    }
}

/// Approximate float equality: exact for identical values, absolute within
/// `epsilon` near zero, relative to combined magnitude otherwise.
pub fn nearly_equal(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    if a == 0.0 || b == 0.0 || diff < f64::MIN_POSITIVE {
        diff < epsilon
    } else {
        diff / (a.abs() + b.abs()) < epsilon
    }
}

//! Conversions between JSON numbers and exact decimals.
//!
//! Prices travel as plain JSON numbers. They are read into `Decimal` through their
//! shortest textual form, so `12.99` becomes exactly `12.99` rather than the nearest
//! binary float.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// Read a decimal from a JSON number or numeric string.
///
/// Returns `None` for any other JSON type or for text that is not a number.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Write a decimal as a JSON number.
///
/// Goes through the decimal's text form so the JSON number is the float nearest to
/// the exact value, the same one a JSON parser would produce for `21.99`. Falls back
/// to the lossy float conversion, and to `Value::Null` if even that fails.
pub fn decimal_to_value(value: Decimal) -> Value {
    let value = value.normalize();
    Number::from_str(&value.to_string())
        .ok()
        .or_else(|| value.to_f64().and_then(Number::from_f64))
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

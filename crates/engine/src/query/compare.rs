//! Equality and ordering rules shared by filters and sorting
//!
//! - Two numbers are equal when they differ by less than [`NUMERIC_EPSILON`].
//! - Two numbers order numerically.
//! - Any other pairing compares the canonical string forms.

use std::cmp::Ordering;

use mpdb_core::Value;

/// Absolute tolerance for numeric equality
pub const NUMERIC_EPSILON: f64 = 1e-5;

/// Tolerant equality used by `$eq`, `$ne`, `$in`, `$nin` and literal matches
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x - y).abs() < NUMERIC_EPSILON,
        _ => a.canonical_string() == b.canonical_string(),
    }
}

/// Ordering used by `$gt`, `$gte`, `$lt`, `$lte`
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => a.canonical_string().cmp(&b.canonical_string()),
    }
}

/// Total ordering for sort keys.
///
/// Same as [`compare_values`] except that in a number/non-number pairing
/// the number sorts first, which keeps the order transitive.
pub fn sort_key_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => a.canonical_string().cmp(&b.canonical_string()),
    }
}

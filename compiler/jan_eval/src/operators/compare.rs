//! Ordered comparison: `< <= > >=`.
//!
//! A fixed list of typed comparers is tried in order; the first one whose
//! operand types both match decides. There is no implicit conversion
//! beyond what the comparers themselves do (int against float, date
//! against datetime).

use jan_values::{cannot_compare, ComparisonResult, EvalError, Value};

type Comparer = fn(&Value, &Value) -> Option<ComparisonResult>;

const COMPARERS: [Comparer; 10] = [
    int_int,
    duration_duration,
    datetime_datetime,
    date_date,
    string_string,
    datetime_date,
    date_datetime,
    int_float,
    float_float,
    float_int,
];

/// Compare two values with the first matching comparer, or fail with a
/// NotImplemented error naming both class tags.
pub fn compare_values(left: &Value, right: &Value) -> Result<ComparisonResult, EvalError> {
    let left = left.unpack();
    let right = right.unpack();
    COMPARERS
        .iter()
        .find_map(|comparer| comparer(&left, &right))
        .ok_or_else(|| cannot_compare(left.class_name(), right.class_name()))
}

fn int_int(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b).into()),
        _ => None,
    }
}

fn duration_duration(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Duration(a), Value::Duration(b)) => Some(a.cmp(b).into()),
        _ => None,
    }
}

fn datetime_datetime(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b).into()),
        _ => None,
    }
}

fn date_date(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b).into()),
        _ => None,
    }
}

fn string_string(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str()).into()),
        _ => None,
    }
}

// Dates and datetimes share one packed scale, so a date compares as its
// midnight.

fn datetime_date(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::DateTime(a), Value::Date(b)) => Some(a.packed().cmp(&b.packed()).into()),
        _ => None,
    }
}

fn date_datetime(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Date(a), Value::DateTime(b)) => Some(a.packed().cmp(&b.packed()).into()),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
fn int_float(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) => Some((*a as f64).total_cmp(b).into()),
        _ => None,
    }
}

fn float_float(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b).into()),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
fn float_int(left: &Value, right: &Value) -> Option<ComparisonResult> {
    match (left, right) {
        (Value::Float(a), Value::Int(b)) => Some(a.total_cmp(&(*b as f64)).into()),
        _ => None,
    }
}

//! Arithmetic: `+ - * / %`.
//!
//! Every operator funnels into [`numeric_operation`], which walks a fixed,
//! ordered list of operand pairs. Strings are handled before that: `+`
//! concatenates host strings when either side is a string and `*` repeats
//! a string by an int on either side.

use jan_ir::{BinaryOp, DurationUnit};
use jan_values::{
    binary_type_mismatch, division_by_zero, float_to_exact_int, integer_overflow,
    string_too_long, temporal_out_of_range, Duration, EvalError, PackedDate, PackedDateTime, Value,
};

use super::OpResult;
use crate::limits::MAX_STRING_BYTES;

pub(super) fn add(left: &Value, right: &Value) -> OpResult {
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        return Ok(Value::string(format!("{left}{right}")));
    }
    numeric_operation(BinaryOp::Add, left, right)
}

pub(super) fn subtract(left: &Value, right: &Value) -> OpResult {
    numeric_operation(BinaryOp::Sub, left, right)
}

pub(super) fn multiply(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => repeat(s.as_str(), *n),
        _ => numeric_operation(BinaryOp::Mul, left, right),
    }
}

pub(super) fn divide(left: &Value, right: &Value) -> OpResult {
    numeric_operation(BinaryOp::Div, left, right)
}

pub(super) fn modulo(left: &Value, right: &Value) -> OpResult {
    numeric_operation(BinaryOp::Mod, left, right)
}

/// `n` copies of `s`; zero or negative counts yield the empty string.
/// Results past [`MAX_STRING_BYTES`] fail.
fn repeat(s: &str, n: i64) -> OpResult {
    let Ok(count) = usize::try_from(n) else {
        return Ok(Value::string(""));
    };
    match s.len().checked_mul(count) {
        None => Err(integer_overflow("string repetition")),
        Some(len) if len > MAX_STRING_BYTES => {
            Err(string_too_long("string repetition", MAX_STRING_BYTES))
        }
        Some(_) => Ok(Value::string(s.repeat(count))),
    }
}

fn numeric_operation(op: BinaryOp, left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_operation(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_operation(op, *a, *b),
        #[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
        (Value::Int(a), Value::Float(b)) => float_operation(op, *a as f64, *b),
        #[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
        (Value::Float(a), Value::Int(b)) => float_operation(op, *a, *b as f64),

        (Value::DateTime(a), Value::DateTime(b)) if op == BinaryOp::Sub => {
            let seconds = a.seconds_since(*b).ok_or_else(temporal_out_of_range)?;
            Ok(Value::duration(seconds, DurationUnit::Seconds))
        }
        (Value::Date(a), Value::Date(b)) if op == BinaryOp::Sub => {
            let days = a.days_since(*b).ok_or_else(temporal_out_of_range)?;
            Ok(Value::duration(days, DurationUnit::Days))
        }
        (Value::DateTime(dt), Value::Duration(d)) if is_additive(op) => {
            shift_datetime(*dt, signed(op, *d)?)
        }
        (Value::Duration(d), Value::DateTime(dt)) if op == BinaryOp::Add => shift_datetime(*dt, *d),
        (Value::Date(date), Value::Duration(d)) if is_additive(op) => shift_date(*date, signed(op, *d)?),
        (Value::Duration(d), Value::Date(date)) if op == BinaryOp::Add => shift_date(*date, *d),

        (Value::Duration(a), Value::Duration(b)) if is_additive(op) => {
            combine_durations(*a, signed(op, *b)?)
        }
        (Value::Duration(d), Value::Int(_) | Value::Float(_))
            if matches!(op, BinaryOp::Mul | BinaryOp::Div) =>
        {
            scale_duration(op, *d, right)
        }
        (Value::Int(_) | Value::Float(_), Value::Duration(d)) if op == BinaryOp::Mul => {
            scale_duration(op, *d, left)
        }

        _ => Err(binary_type_mismatch(op.as_symbol(), left.class_name(), right.class_name())),
    }
}

fn is_additive(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Add | BinaryOp::Sub)
}

/// The duration as added: negated for subtraction.
fn signed(op: BinaryOp, d: Duration) -> Result<Duration, EvalError> {
    if op == BinaryOp::Sub {
        let amount = d.amount.checked_neg().ok_or_else(temporal_out_of_range)?;
        Ok(Duration::new(amount, d.unit))
    } else {
        Ok(d)
    }
}

fn int_operation(op: BinaryOp, a: i64, b: i64) -> OpResult {
    let result = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(|| integer_overflow("addition")),
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(|| integer_overflow("subtraction")),
        BinaryOp::Mul => a.checked_mul(b).ok_or_else(|| integer_overflow("multiplication")),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => a.checked_div(b).ok_or_else(|| integer_overflow("division")),
        BinaryOp::Mod if b == 0 => Err(division_by_zero()),
        BinaryOp::Mod => a.checked_rem(b).ok_or_else(|| integer_overflow("remainder")),
        _ => return Err(binary_type_mismatch(op.as_symbol(), "int", "int")),
    };
    result.map(Value::Int)
}

fn float_operation(op: BinaryOp, a: f64, b: f64) -> OpResult {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div | BinaryOp::Mod if b == 0.0 => return Err(division_by_zero()),
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        _ => return Err(binary_type_mismatch(op.as_symbol(), "float", "float")),
    };
    Ok(Value::Float(result))
}

/// A zero-length duration leaves the date alone. Calendar units keep a
/// date a date; time units turn it into a datetime starting at midnight.
fn shift_date(date: PackedDate, d: Duration) -> OpResult {
    if d.amount == 0 {
        return Ok(Value::Date(date));
    }
    if d.unit.is_calendar() {
        date.add(d).map(Value::Date).ok_or_else(temporal_out_of_range)
    } else {
        shift_datetime(date.start_of_day(), d)
    }
}

fn shift_datetime(dt: PackedDateTime, d: Duration) -> OpResult {
    if d.amount == 0 {
        return Ok(Value::DateTime(dt));
    }
    dt.add(d).map(Value::DateTime).ok_or_else(temporal_out_of_range)
}

/// Same units add amounts; mixed units add seconds.
fn combine_durations(a: Duration, b: Duration) -> OpResult {
    if a.unit == b.unit {
        let amount = a.amount.checked_add(b.amount).ok_or_else(temporal_out_of_range)?;
        return Ok(Value::Duration(Duration::new(amount, a.unit)));
    }
    let seconds = a
        .seconds()
        .zip(b.seconds())
        .and_then(|(x, y)| x.checked_add(y))
        .ok_or_else(temporal_out_of_range)?;
    Ok(Value::Duration(Duration::from_seconds(seconds)))
}

/// Multiply or divide a duration by a number.
///
/// Integral results keep the duration's unit; anything else is rounded to
/// whole seconds.
fn scale_duration(op: BinaryOp, d: Duration, factor: &Value) -> OpResult {
    match (op, factor) {
        (BinaryOp::Mul, Value::Int(n)) => {
            let amount = d.amount.checked_mul(*n).ok_or_else(temporal_out_of_range)?;
            Ok(Value::Duration(Duration::new(amount, d.unit)))
        }
        (BinaryOp::Div, Value::Int(0)) => Err(division_by_zero()),
        (BinaryOp::Div, Value::Int(n)) => {
            if d.amount.checked_rem(*n) == Some(0) {
                let amount = d.amount.checked_div(*n).ok_or_else(temporal_out_of_range)?;
                return Ok(Value::Duration(Duration::new(amount, d.unit)));
            }
            let seconds = d
                .seconds()
                .and_then(|s| s.checked_div(*n))
                .ok_or_else(temporal_out_of_range)?;
            Ok(Value::Duration(Duration::from_seconds(seconds)))
        }
        (_, Value::Float(f)) => {
            if op == BinaryOp::Div && *f == 0.0 {
                return Err(division_by_zero());
            }
            #[expect(clippy::cast_precision_loss, reason = "durations are far below 2^53 seconds")]
            let seconds = d.seconds().ok_or_else(temporal_out_of_range)? as f64;
            let scaled = if op == BinaryOp::Mul { seconds * f } else { seconds / f };
            let seconds = float_to_exact_int(scaled.round()).ok_or_else(temporal_out_of_range)?;
            Ok(Value::Duration(Duration::from_seconds(seconds)))
        }
        _ => Err(binary_type_mismatch(op.as_symbol(), "duration", factor.class_name())),
    }
}

//! Properties of `int` and `float`.

use jan_values::{
    float_to_exact_int, integer_overflow, temporal_out_of_range, DispatchTable, EvalError,
    PackedDateTime, Value,
};

pub(super) fn install_int(table: &mut DispatchTable) {
    table
        .property("int", |n| Ok(n.clone()))
        .property("epoch", from_epoch);
}

/// Seconds since 1970-01-01 00:00:00 as a datetime, the inverse of
/// `datetime.epoch`.
fn from_epoch(seconds: &Value) -> Result<Value, EvalError> {
    let Value::Int(seconds) = seconds else {
        return Ok(seconds.clone());
    };
    PackedDateTime::from_epoch_seconds(*seconds)
        .map(Value::datetime)
        .ok_or_else(temporal_out_of_range)
}

pub(super) fn install_float(table: &mut DispatchTable) {
    table.property("int", truncate);
}

/// Toward zero; NaN and out-of-range floats are an overflow.
fn truncate(f: &Value) -> Result<Value, EvalError> {
    let Value::Float(f) = f else {
        return Ok(f.clone());
    };
    float_to_exact_int(f.trunc())
        .map(Value::int)
        .ok_or_else(|| integer_overflow("float to int"))
}

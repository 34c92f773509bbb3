//! Binary and unary operator semantics.
//!
//! Operators are pure functions over values. The operand pair is matched
//! directly against the supported combinations; the type set is fixed, so
//! pattern matching beats a registry of operator objects. Wrapper values
//! are unpacked before any operator sees them.
//!
//! `and`/`or` short-circuit and are evaluated by the interpreter; they are
//! accepted here only for already-evaluated operands.

mod arithmetic;
mod compare;
mod matching;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use jan_ir::{BinaryOp, IncDecOp, UnaryOp};
use jan_values::{integer_overflow, unary_type_mismatch, EvalError, Value};

pub use compare::compare_values;
pub use matching::RegexCache;

/// Result of a pure operator application.
pub type OpResult = Result<Value, EvalError>;

/// Apply a binary operator to two evaluated operands.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp, regexes: &mut RegexCache) -> OpResult {
    let left = left.unpack();
    let right = right.unpack();
    match op {
        BinaryOp::Add => arithmetic::add(&left, &right),
        BinaryOp::Sub => arithmetic::subtract(&left, &right),
        BinaryOp::Mul => arithmetic::multiply(&left, &right),
        BinaryOp::Div => arithmetic::divide(&left, &right),
        BinaryOp::Mod => arithmetic::modulo(&left, &right),
        BinaryOp::Lt => Ok(Value::bool(compare_values(&left, &right)?.is_lt())),
        BinaryOp::LtEq => Ok(Value::bool(compare_values(&left, &right)?.is_le())),
        BinaryOp::Gt => Ok(Value::bool(compare_values(&left, &right)?.is_gt())),
        BinaryOp::GtEq => Ok(Value::bool(compare_values(&left, &right)?.is_ge())),
        BinaryOp::Eq => Ok(Value::bool(values_equal(&left, &right))),
        BinaryOp::NotEq => Ok(Value::bool(!values_equal(&left, &right))),
        BinaryOp::Match => regexes.pattern_match(&left, &right, op).map(Value::bool),
        BinaryOp::NotMatch => regexes.pattern_match(&left, &right, op).map(|m| Value::bool(!m)),
        BinaryOp::And => Ok(Value::bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(if left.is_truthy() { left } else { right }),
    }
}

/// Structural equality on host-visible value; same identity is always equal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    left.identical(right) || left.unpack() == right.unpack()
}

pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> OpResult {
    let operand = operand.unpack();
    match op {
        UnaryOp::Not => Ok(Value::bool(!operand.is_truthy())),
        UnaryOp::Neg => match operand {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| integer_overflow("negation")),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Duration(d) => d
                .amount
                .checked_neg()
                .map(|amount| Value::duration(amount, d.unit))
                .ok_or_else(|| integer_overflow("negation")),
            other => Err(unary_type_mismatch("-", other.class_name())),
        },
    }
}

/// `++`/`--`; only integers step.
pub fn evaluate_inc_dec(operand: &Value, op: IncDecOp) -> OpResult {
    match operand.unpack() {
        Value::Int(n) => n
            .checked_add(op.delta())
            .map(Value::Int)
            .ok_or_else(|| integer_overflow(op.as_symbol())),
        other => Err(unary_type_mismatch(op.as_symbol(), other.class_name())),
    }
}

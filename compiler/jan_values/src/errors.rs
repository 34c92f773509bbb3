//! Runtime error taxonomy and control-flow signals.
//!
//! Errors carry a [`EvalErrorKind`] category plus a human-readable message.
//! Factory functions are the public construction API; each one fixes both
//! the category and the wording so the same condition always reads the same
//! way, wherever it is raised.
//!
//! Non-local exits (`break`, `continue`, `return`, `throw`) are not errors.
//! They travel up the evaluator as [`ControlAction`] alongside errors and
//! are consumed by the construct that handles them.

use std::fmt;

use jan_ir::Location;

use crate::Value;

/// Result of evaluating an expression or invoking a callable.
pub type EvalResult = Result<Value, ControlAction>;

/// Error category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    /// Unresolved identifier, attribute or module.
    Name,
    /// Operator or assignment applied to incompatible variants.
    Type,
    /// Wrong arity or argument type in a call.
    Argument,
    /// Division by zero, overflow.
    Arithmetic,
    /// Recognised operation without a coercion path, e.g. unordered comparison.
    NotImplemented,
    /// Invariant violation, such as a loop signal escaping its loop.
    Internal,
    /// Failed script-level `assert`.
    Assertion,
    /// Failure reported by a host-provided native function.
    Native,
    /// A value raised by `throw` that nothing caught.
    Thrown,
}

impl EvalErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EvalErrorKind::Name => "name error",
            EvalErrorKind::Type => "type error",
            EvalErrorKind::Argument => "argument error",
            EvalErrorKind::Arithmetic => "arithmetic error",
            EvalErrorKind::NotImplemented => "not implemented",
            EvalErrorKind::Internal => "internal error",
            EvalErrorKind::Assertion => "assertion error",
            EvalErrorKind::Native => "native error",
            EvalErrorKind::Thrown => "uncaught exception",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    /// Where the error surfaced. Filled in by the evaluator from the
    /// process's current location when the error leaves its statement.
    pub location: Option<Location>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach `location` unless one is already recorded.
    #[must_use]
    pub fn with_location_if_missing(mut self, location: Option<Location>) -> Self {
        if self.location.is_none() {
            self.location = location;
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{} at {loc}: {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for EvalError {}

/// Non-local exit travelling up the evaluator.
///
/// Loops consume `Break` and `Continue`, the call boundary consumes
/// `Return`, `try`/`catch` consumes `Throw` and `Error`. Whatever escapes
/// the script becomes the run's result (`Return`) or failure (the rest).
#[derive(Clone, Debug)]
pub enum ControlAction {
    Break,
    Continue,
    Return(Value),
    Throw(Value),
    Error(Box<EvalError>),
}

impl ControlAction {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ControlAction::Error(_))
    }

    /// Stamp a location on an error that has none; signals pass through.
    #[must_use]
    pub fn with_location_if_missing(self, location: Option<Location>) -> Self {
        match self {
            ControlAction::Error(err) => {
                ControlAction::Error(Box::new(err.with_location_if_missing(location)))
            }
            other => other,
        }
    }

    /// Convert a signal that escaped every handler into an error.
    ///
    /// `Return` is never an error at script level; callers handle it before
    /// getting here, so it maps to an internal error like the loop signals.
    pub fn into_eval_error(self) -> EvalError {
        match self {
            ControlAction::Error(err) => *err,
            ControlAction::Break => invalid_control_flow("break"),
            ControlAction::Continue => invalid_control_flow("continue"),
            ControlAction::Return(_) => invalid_control_flow("return"),
            ControlAction::Throw(value) => EvalError::new(EvalErrorKind::Thrown, value.to_string()),
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

// Names and attributes

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Name, format!("name '{name}' is not defined"))
}

#[cold]
pub fn no_such_attribute(class_name: &str, attribute: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Name,
        format!("{class_name} has no attribute '{attribute}'"),
    )
}

#[cold]
pub fn no_such_module(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Name, format!("no such module: {name}"))
}

// Types

#[cold]
pub fn binary_type_mismatch(op: &str, left: &str, right: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("operator `{op}` cannot be applied to {left} and {right}"),
    )
}

#[cold]
pub fn unary_type_mismatch(op: &str, operand: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("operator `{op}` cannot be applied to {operand}"),
    )
}

#[cold]
pub fn not_callable(class_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Type, format!("{class_name} is not callable"))
}

#[cold]
pub fn cannot_assign(target: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Type, format!("cannot assign to {target}"))
}

#[cold]
pub fn cannot_index(class_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Type, format!("{class_name} cannot be indexed"))
}

// Arguments

#[cold]
pub fn wrong_arg_count(function: &str, min: usize, max: Option<usize>, got: usize) -> EvalError {
    let expected = match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{min} to {max}"),
        None => format!("at least {min}"),
    };
    let noun = if expected == "1" { "argument" } else { "arguments" };
    EvalError::new(
        EvalErrorKind::Argument,
        format!("{function}() expects {expected} {noun}, got {got}"),
    )
}

#[cold]
pub fn wrong_arg_type(function: &str, index: usize, expected: &str, got: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Argument,
        format!("{function}() argument {} must be {expected}, not {got}", index + 1),
    )
}

#[cold]
pub fn missing_argument(function: &str, param: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Argument,
        format!("{function}() missing argument '{param}'"),
    )
}

#[cold]
pub fn unexpected_keyword(function: &str, keyword: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Argument,
        format!("{function}() got an unexpected keyword argument '{keyword}'"),
    )
}

#[cold]
pub fn not_iterable(class_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Argument, format!("{class_name} is not iterable"))
}

#[cold]
pub fn invalid_range() -> EvalError {
    EvalError::new(
        EvalErrorKind::Argument,
        "invalid range: bounds must be integers",
    )
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::Argument,
        format!("index {index} out of bounds for length {len}"),
    )
}

#[cold]
pub fn invalid_argument(function: &str, message: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::Argument, format!("{function}(): {message}"))
}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::Arithmetic, "division by zero")
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Arithmetic,
        format!("integer overflow in {operation}"),
    )
}

#[cold]
pub fn string_too_long(operation: &str, limit: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::Arithmetic,
        format!("{operation} would exceed {limit} bytes"),
    )
}

#[cold]
pub fn temporal_out_of_range() -> EvalError {
    EvalError::new(EvalErrorKind::Arithmetic, "date arithmetic out of range")
}

// Comparison

#[cold]
pub fn cannot_compare(left: &str, right: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::NotImplemented,
        format!("cannot compare {left} with {right}"),
    )
}

// Internal

#[cold]
pub fn invalid_control_flow(signal: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Internal,
        format!("invalid control flow: '{signal}' outside of its construct"),
    )
}

#[cold]
pub fn call_budget_exceeded(calls: u32, budget: u32) -> EvalError {
    EvalError::new(
        EvalErrorKind::Internal,
        format!("call budget exceeded: {calls} calls (budget {budget})"),
    )
}

#[cold]
pub fn recursion_limit_exceeded() -> EvalError {
    EvalError::new(EvalErrorKind::Internal, "maximum recursion depth exceeded")
}

// Assertions and host failures

#[cold]
pub fn assertion_failed(message: Option<&str>) -> EvalError {
    let message = match message {
        Some(msg) => format!("assertion failed: {msg}"),
        None => "assertion failed!".to_string(),
    };
    EvalError::new(EvalErrorKind::Assertion, message)
}

#[cold]
pub fn native_failure(function: &str, message: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::Native, format!("{function}: {message}"))
}

#[cfg(test)]
mod tests;

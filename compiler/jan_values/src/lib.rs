//! Janitor Values - runtime model of the Janitor scripting language.
//!
//! This crate provides:
//! - Runtime values (`Value`, `Heap`, dates, durations, host objects)
//! - Evaluation errors and control-flow signals (`EvalError`, `ControlAction`)
//! - Per-type attribute dispatch (`DispatchTable`, `DispatchRegistry`)
//! - Lexical scopes (`Scope`, `ScopeRef`)
//! - Call binding helpers for native code (`CallArgs`, `TemporaryAssignable`)
//!
//! # Architecture
//!
//! Everything here is independent of the syntax tree walker. The evaluator
//! in `jan_eval` drives these types through the [`ScriptContext`] seam,
//! which is also how native functions call back into a running script.

mod assignable;
mod call_args;
mod comparison;
mod context;
mod dispatch;
mod errors;
mod scope;
mod value;

pub use assignable::{Setter, TemporaryAssignable};
pub use call_args::CallArgs;
pub use comparison::ComparisonResult;
pub use context::ScriptContext;
pub use dispatch::{
    CastFn, DispatchRegistry, DispatchTable, FallbackFn, GetterFn, Handler, MethodFn, Resolved,
    SetterFn,
};
pub use errors::{
    assertion_failed, binary_type_mismatch, call_budget_exceeded, cannot_assign, cannot_compare,
    cannot_index, division_by_zero, index_out_of_bounds, integer_overflow, invalid_argument,
    invalid_control_flow, invalid_range, missing_argument, native_failure, no_such_attribute,
    no_such_module, not_callable, not_iterable, recursion_limit_exceeded, string_too_long,
    temporal_out_of_range,
    unary_type_mismatch, undefined_variable, unexpected_keyword, wrong_arg_count, wrong_arg_type,
    ControlAction, EvalError, EvalErrorKind, EvalResult,
};
pub use scope::{LocalScope, Scope, ScopeRef, WeakScope};
pub use value::{
    float_to_exact_int, BoundMethod, Duration, FunctionValue, Heap, HostObject, ListRef, MapRef,
    ModuleValue, NativeFn, NativeFunction, PackedDate, PackedDateTime, ScriptString, SetRef,
    Value, ValueKind,
};

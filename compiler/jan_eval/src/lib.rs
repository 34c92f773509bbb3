//! Janitor Eval - evaluator and embedding API for the Janitor scripting
//! language.
//!
//! # Architecture
//!
//! - [`Environment`]: built once per host, shared through an `Arc`. Holds
//!   the interner, the dispatch tables, host globals, modules and limits.
//! - [`Runtime`]: compiles source into a [`RunnableScript`] and owns the
//!   [`ScriptOutput`] that printed lines and warnings go to.
//! - [`ScriptProcess`]: one run of one script; the tree walker lives in
//!   `interpreter` as methods on it.
//! - `builtins`: dispatch tables for the builtin classes and the global
//!   functions of the builtin scope.
//!
//! Runtime values and the dispatch machinery come from `jan_values` and
//! are re-exported here, so a host needs only this crate.

mod builtins;
pub mod diagnostics;
mod environment;
pub mod errors;
mod indexing;
mod interpreter;
mod limits;
mod operators;
mod output;
mod process;
mod runtime;
mod validate;

pub use environment::{Environment, EnvironmentBuilder, GlobalFactory, ModuleDef};
pub use errors::{CompileFailure, ScriptFailure};
pub use limits::{RunLimits, DEFAULT_MAX_DEPTH, MAX_STRING_BYTES};
pub use operators::{compare_values, evaluate_binary, evaluate_unary, values_equal, RegexCache};
pub use output::{
    capture_output, hook_output, silent_output, stdout_output, ScriptOutput, SharedOutput,
    Transcript,
};
pub use process::ScriptProcess;
pub use runtime::{Globals, RunnableScript, Runtime};

pub use jan_values::{
    native_failure, CallArgs, ControlAction, DispatchTable, Duration, EvalError, EvalErrorKind,
    EvalResult, Handler, HostObject, NativeFunction, PackedDate, PackedDateTime, ScopeRef,
    ScriptContext, TemporaryAssignable, Value, ValueKind,
};

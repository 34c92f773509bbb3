//! Host-facing failures.
//!
//! Inside the evaluator everything travels as [`ControlAction`]. What
//! reaches the host is one of two error types: [`CompileFailure`] when a
//! script does not compile, [`ScriptFailure`] when a run ends in an error or
//! an uncaught `throw`.

use jan_ir::Location;
use jan_parse::ParseError;
use jan_values::{ControlAction, EvalErrorKind, Value};

use crate::diagnostics::BacktraceFrame;

/// A script that did not compile.
#[derive(Debug, Clone, thiserror::Error)]
#[error("script '{name}' failed to compile: {}", messages.join("; "))]
pub struct CompileFailure {
    pub name: String,
    /// Every problem, rendered as `line:column: message`.
    pub messages: Vec<String>,
    /// The first syntax error, when the failure came from the parser.
    #[source]
    pub cause: Option<ParseError>,
}

/// A run that ended in a runtime error or an uncaught `throw`.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "{kind} in {script}{}: {message}",
    .location.map(|loc| format!(" at {loc}")).unwrap_or_default()
)]
pub struct ScriptFailure {
    pub script: String,
    pub kind: EvalErrorKind,
    pub message: String,
    pub location: Option<Location>,
    /// The value of an uncaught `throw`.
    pub thrown: Option<Value>,
    /// Calls active when the error first left a function, most recent
    /// first. Empty for errors raised at top level.
    pub backtrace: Vec<BacktraceFrame>,
}

impl ScriptFailure {
    pub(crate) fn from_signal(
        script: &str,
        signal: ControlAction,
        location: Option<Location>,
        backtrace: Vec<BacktraceFrame>,
    ) -> Self {
        let thrown = match &signal {
            ControlAction::Throw(value) => Some(value.clone()),
            _ => None,
        };
        let err = signal.with_location_if_missing(location).into_eval_error();
        ScriptFailure {
            script: script.to_owned(),
            kind: err.kind,
            message: err.message,
            location: err.location.or(location),
            thrown,
            backtrace,
        }
    }

    /// The failure with its backtrace, one frame per line.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        for frame in &self.backtrace {
            out.push_str("\n    in ");
            out.push_str(&frame.to_string());
        }
        out
    }
}

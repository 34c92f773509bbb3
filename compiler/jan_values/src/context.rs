//! What native code may ask of the running script.

use jan_ir::{Location, StringInterner};

use crate::{DispatchRegistry, EvalResult, Value};

/// The running script process, as seen from native functions and dispatch
/// handlers.
pub trait ScriptContext {
    /// Call a script or native function value.
    fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult;

    /// Report a non-fatal problem.
    fn warn(&mut self, message: String);

    /// Write one line through the runtime's print hook.
    fn print(&mut self, text: &str);

    fn interner(&self) -> &StringInterner;

    fn registry(&self) -> &DispatchRegistry;

    /// Source location of the statement being executed.
    fn location(&self) -> Option<Location>;
}

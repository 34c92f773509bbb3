//! The script process: one execution of one script.
//!
//! A process owns everything mutable about a run: the current scope, the
//! closure stack, the current source location, the call stack and budget,
//! regexes compiled so far and modules imported so far. It borrows the
//! environment and the script. The tree walker itself lives in
//! [`interpreter`](crate::interpreter) as methods on [`ScriptProcess`].
//!
//! # Resolution
//!
//! An identifier is looked up in the current scope's own bindings, then in
//! each active closure scope (most recent first, walking that closure's
//! parent chain), then along the current scope's parent chain. Assignment
//! finds its owner the same way and binds in the current scope when no
//! scope owns the name yet.

use jan_ir::{Location, Name, Script, Span, StringInterner};
use jan_values::{
    no_such_module, ControlAction, DispatchRegistry, EvalResult, Scope, ScopeRef, ScriptContext,
    Value, WeakScope,
};
use rustc_hash::FxHashMap;

use crate::diagnostics::{BacktraceFrame, CallStack};
use crate::environment::Environment;
use crate::errors::ScriptFailure;
use crate::interpreter::Kwargs;
use crate::limits::CallBudget;
use crate::operators::RegexCache;
use crate::output::SharedOutput;

pub struct ScriptProcess<'a> {
    pub(crate) env: &'a Environment,
    pub(crate) script: &'a Script,
    output: SharedOutput,
    pub(crate) scope: ScopeRef,
    pub(crate) closures: Vec<ScopeRef>,
    pub(crate) location: Option<Location>,
    pub(crate) call_stack: CallStack,
    pub(crate) budget: CallBudget,
    pub(crate) regexes: RegexCache,
    /// Value of the last expression statement executed.
    pub(crate) result: Value,
    /// Calls active when an uncaught error first crossed a call boundary.
    pub(crate) pending_backtrace: Option<Vec<BacktraceFrame>>,
    warnings: Vec<String>,
    modules: FxHashMap<Name, Value>,
    captured: Vec<WeakScope<Scope>>,
}

impl<'a> ScriptProcess<'a> {
    /// A process executing `script` with `globals` as its global scope.
    pub fn new(
        env: &'a Environment,
        script: &'a Script,
        output: SharedOutput,
        globals: ScopeRef,
    ) -> Self {
        let limits = env.limits();
        ScriptProcess {
            env,
            script,
            output,
            scope: globals,
            closures: Vec::new(),
            location: None,
            call_stack: CallStack::new(limits.max_depth),
            budget: CallBudget::new(limits.call_budget),
            regexes: RegexCache::new(),
            result: Value::Null,
            pending_backtrace: None,
            warnings: Vec::new(),
            modules: FxHashMap::default(),
            captured: Vec::new(),
        }
    }

    /// Execute the script's top-level statements in the global scope.
    ///
    /// A top-level `return` ends the run with its value; otherwise the
    /// result is the value of the last expression statement executed.
    pub fn run(&mut self) -> Result<Value, ScriptFailure> {
        let script = self.script;
        tracing::debug!(script = %script.name, statements = script.body.len(), "run");
        match self.exec_stmts(&script.body) {
            Ok(()) => Ok(self.result.clone()),
            Err(ControlAction::Return(value)) => Ok(value.unpack()),
            Err(signal) => {
                let backtrace = self.pending_backtrace.take().unwrap_or_default();
                Err(ScriptFailure::from_signal(&script.name, signal, self.location, backtrace))
            }
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn calls(&self) -> u32 {
        self.budget.calls()
    }

    pub(crate) fn name_of(&self, name: Name) -> &'static str {
        self.env.interner().lookup(name)
    }

    pub(crate) fn location_of(&self, span: Span) -> Location {
        self.script.location(span)
    }

    // Resolution

    pub(crate) fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.scope.get_local(name) {
            return Some(value);
        }
        self.closures
            .iter()
            .rev()
            .find_map(|closure| closure.lookup(name))
            .or_else(|| self.scope.lookup(name))
    }

    fn owner_of(&self, name: Name) -> Option<ScopeRef> {
        if self.scope.borrow().contains(name) {
            return Some(self.scope.clone());
        }
        self.closures
            .iter()
            .rev()
            .find_map(|closure| closure.owner_of(name))
            .or_else(|| self.scope.owner_of(name))
    }

    /// Store `value` under `name` in the scope that owns the name, or
    /// define it in the current scope.
    ///
    /// Builtins cannot be reassigned; the assignment shadows the builtin
    /// in the current scope instead.
    pub(crate) fn assign_name(&mut self, name: Name, value: Value) {
        match self.owner_of(name) {
            Some(owner) if owner.is_sealed() => {
                let text = self.name_of(name);
                self.warn(format!("assignment to builtin '{text}' defines a local variable"));
                self.scope.bind(name, value);
            }
            Some(owner) => owner.bind(name, value),
            None => self.scope.bind(name, value),
        }
    }

    /// The current scope, recorded so the reference cycle between it and
    /// the function values it will hold can be broken after the run.
    pub(crate) fn capture_scope(&mut self) -> ScopeRef {
        let already = self
            .captured
            .last()
            .and_then(WeakScope::upgrade)
            .is_some_and(|scope| scope.ptr_eq(&self.scope));
        if !already {
            self.captured.push(self.scope.downgrade());
        }
        self.scope.clone()
    }

    /// Drop the bindings of every scope a function value captured.
    pub(crate) fn release_captured(&mut self) {
        for weak in self.captured.drain(..) {
            if let Some(scope) = weak.upgrade() {
                scope.clear();
            }
        }
    }

    /// The module value for `name`; each module is instantiated once per
    /// process.
    pub(crate) fn import(&mut self, name: Name) -> EvalResult {
        if let Some(module) = self.modules.get(&name) {
            return Ok(module.clone());
        }
        let text = self.name_of(name);
        let def = self.env.module(name).ok_or_else(|| no_such_module(text))?;
        tracing::debug!(module = text, "import");
        let module = def.instantiate(self.env.interner());
        self.modules.insert(name, module.clone());
        Ok(module)
    }

    /// Snapshot the call stack the first time an error leaves a call.
    pub(crate) fn note_backtrace(&mut self, signal: &ControlAction) {
        if self.pending_backtrace.is_none()
            && matches!(signal, ControlAction::Error(_) | ControlAction::Throw(_))
        {
            self.pending_backtrace = Some(self.call_stack.capture());
        }
    }
}

impl ScriptContext for ScriptProcess<'_> {
    fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        self.call_value(callee, args, Kwargs::new())
    }

    fn warn(&mut self, message: String) {
        tracing::warn!(script = %self.script.name, location = ?self.location, "{message}");
        self.output.warn(&message);
        self.warnings.push(message);
    }

    fn print(&mut self, text: &str) {
        self.output.print(text);
    }

    fn interner(&self) -> &StringInterner {
        self.env.interner()
    }

    fn registry(&self) -> &DispatchRegistry {
        self.env.registry()
    }

    fn location(&self) -> Option<Location> {
        self.location
    }
}

//! The embedding API: compile scripts, run them, collect their output.
//!
//! ```text
//! let env = Environment::standard();
//! let runtime = Runtime::new(env);
//! let script = runtime.compile("hello", "print('hi'); 1 + 2")?;
//! let value = script.run(|_| {})?;
//! ```
//!
//! A [`RunnableScript`] is immutable and may be run any number of times,
//! from any number of threads. Each run gets a fresh global scope whose
//! parent is the environment's sealed builtin scope, so nothing a run
//! defines is visible to the next one unless the host keeps the scope
//! with [`RunnableScript::run_and_keep_globals`].

use std::fmt;
use std::sync::Arc;

use jan_ir::{Script, StringInterner};
use jan_values::{ScopeRef, Value};
use parking_lot::Mutex;

use crate::environment::Environment;
use crate::errors::{CompileFailure, ScriptFailure};
use crate::output::{stdout_output, SharedOutput};
use crate::process::ScriptProcess;
use crate::validate::literal_errors;

/// Compiles scripts against one environment and owns the output their
/// prints and warnings go to.
#[derive(Clone)]
pub struct Runtime {
    env: Arc<Environment>,
    output: SharedOutput,
}

impl Runtime {
    /// A runtime printing to stdout.
    pub fn new(env: Arc<Environment>) -> Self {
        Runtime {
            env,
            output: stdout_output(),
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: SharedOutput) -> Self {
        self.output = output;
        self
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    /// Parse and check `source`.
    ///
    /// Any syntax error, invalid regex literal or impossible date literal
    /// fails the whole script.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn compile(&self, name: &str, source: &str) -> Result<RunnableScript, CompileFailure> {
        let parsed = jan_parse::parse(name, source, self.env.interner());
        let mut messages = parsed.messages();
        let cause = parsed.errors.first().cloned();
        messages.extend(
            literal_errors(&parsed.script)
                .into_iter()
                .map(|(span, message)| format!("{}: {message}", parsed.script.location(span))),
        );
        if !messages.is_empty() {
            tracing::debug!(errors = messages.len(), "compile failed");
            return Err(CompileFailure {
                name: name.to_owned(),
                messages,
                cause,
            });
        }
        Ok(RunnableScript {
            env: Arc::clone(&self.env),
            script: Arc::new(parsed.script),
            output: Arc::clone(&self.output),
            warnings: Mutex::new(Vec::new()),
        })
    }

    /// Compile problems in `source` as `line:column: message`, empty when
    /// the script is fine.
    pub fn check(&self, source: &str) -> Vec<String> {
        match self.compile("check", source) {
            Ok(_) => Vec::new(),
            Err(failure) => failure.messages,
        }
    }

    /// Run `f`, logging a failure under `title` instead of returning it.
    pub fn protect<T, E, F>(&self, title: &str, f: F) -> Option<T>
    where
        E: fmt::Display,
        F: FnOnce(&Runtime) -> Result<T, E>,
    {
        match f(self) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(title, "{err}");
                None
            }
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime").field("env", &self.env).finish_non_exhaustive()
    }
}

/// The global scope of a run, as handed to the host before the run starts.
pub struct Globals<'a> {
    scope: &'a ScopeRef,
    interner: &'a StringInterner,
}

impl Globals<'_> {
    /// Bind `name` for the script; builtins of the same name are shadowed.
    pub fn bind(&mut self, name: &str, value: Value) -> &mut Self {
        self.scope.bind(self.interner.intern(name), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.interner.get(name).and_then(|name| self.scope.get_local(name))
    }
}

/// A compiled script.
pub struct RunnableScript {
    env: Arc<Environment>,
    script: Arc<Script>,
    output: SharedOutput,
    warnings: Mutex<Vec<String>>,
}

impl RunnableScript {
    pub fn name(&self) -> &str {
        &self.script.name
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Run in a fresh global scope prepared by `prepare_globals`.
    ///
    /// Function values created by the run are unreachable afterwards and
    /// the scopes they captured are cleared.
    pub fn run<F>(&self, prepare_globals: F) -> Result<Value, ScriptFailure>
    where
        F: FnOnce(&mut Globals<'_>),
    {
        let globals = self.prepare(prepare_globals);
        self.execute(globals, true)
    }

    /// Run like [`run`](Self::run) and hand back the global scope, with
    /// everything the script defined still bound.
    pub fn run_and_keep_globals<F>(&self, prepare_globals: F) -> Result<(Value, ScopeRef), ScriptFailure>
    where
        F: FnOnce(&mut Globals<'_>),
    {
        let globals = self.prepare(prepare_globals);
        let value = self.execute(globals.clone(), false)?;
        Ok((value, globals))
    }

    /// Run with `scope` as the global scope, e.g. one kept from an earlier
    /// run of this or another script.
    pub fn run_in_scope(&self, scope: &ScopeRef) -> Result<Value, ScriptFailure> {
        self.execute(scope.clone(), false)
    }

    /// Warnings raised by the most recent run.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    /// A fresh global scope below the builtins, seeded by the host.
    pub fn new_globals<F>(&self, prepare_globals: F) -> ScopeRef
    where
        F: FnOnce(&mut Globals<'_>),
    {
        self.prepare(prepare_globals)
    }

    fn prepare<F>(&self, prepare_globals: F) -> ScopeRef
    where
        F: FnOnce(&mut Globals<'_>),
    {
        let builtins = self.env.builtin_scope();
        let scope = ScopeRef::child(&builtins, None);
        prepare_globals(&mut Globals {
            scope: &scope,
            interner: self.env.interner(),
        });
        scope
    }

    fn execute(&self, globals: ScopeRef, release: bool) -> Result<Value, ScriptFailure> {
        let mut process = ScriptProcess::new(&self.env, &self.script, Arc::clone(&self.output), globals);
        let result = process.run();
        if let Err(failure) = &result {
            tracing::debug!(script = %self.script.name, "{failure}");
        }
        tracing::debug!(script = %self.script.name, calls = process.calls(), "run finished");
        *self.warnings.lock() = process.take_warnings();
        if release {
            process.release_captured();
        }
        result
    }
}

impl fmt::Debug for RunnableScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnableScript")
            .field("name", &self.script.name)
            .field("statements", &self.script.body.len())
            .finish_non_exhaustive()
    }
}

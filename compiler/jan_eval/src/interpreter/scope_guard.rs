//! RAII scope guards for the script process.
//!
//! [`ScopedProcess`] holds `&mut ScriptProcess` and implements
//! `Deref`/`DerefMut`, so the guarded code calls process methods directly.
//! Dropping the guard restores the previous scope and runs the leave-scope
//! hooks of the scope being left. Every exit path goes through `Drop`:
//! normal completion, errors, `break`/`continue`/`return` and `throw` alike,
//! which is what fires each hook exactly once while a signal unwinds.

use std::ops::{Deref, DerefMut};

use jan_ir::Location;
use jan_values::ScopeRef;

use crate::process::ScriptProcess;

pub(crate) struct ScopedProcess<'guard, 'a> {
    process: &'guard mut ScriptProcess<'a>,
    saved: Option<ScopeRef>,
    /// A call pushed its closure scope, pop it on drop.
    pushed_closure: bool,
}

impl Drop for ScopedProcess<'_, '_> {
    fn drop(&mut self) {
        if self.pushed_closure {
            self.process.closures.pop();
        }
        if let Some(saved) = self.saved.take() {
            let left = std::mem::replace(&mut self.process.scope, saved);
            tracing::debug!(depth = left.depth(), bindings = left.borrow().len(), "scope exit");
            left.exit();
        }
    }
}

impl<'a> Deref for ScopedProcess<'_, 'a> {
    type Target = ScriptProcess<'a>;

    fn deref(&self) -> &Self::Target {
        self.process
    }
}

impl DerefMut for ScopedProcess<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.process
    }
}

impl<'a> ScriptProcess<'a> {
    /// Enter a child of the current scope until the guard drops.
    pub(crate) fn scoped(&mut self, location: Option<Location>) -> ScopedProcess<'_, 'a> {
        let child = ScopeRef::child(&self.scope, location);
        let saved = std::mem::replace(&mut self.scope, child);
        ScopedProcess {
            process: self,
            saved: Some(saved),
            pushed_closure: false,
        }
    }

    /// Enter a call: a child of the caller's scope, with the callee's
    /// closure scope on top of the closure stack.
    pub(crate) fn scoped_call(&mut self, closure: ScopeRef, location: Option<Location>) -> ScopedProcess<'_, 'a> {
        self.closures.push(closure);
        let mut scoped = self.scoped(location);
        scoped.pushed_closure = true;
        scoped
    }

    /// Run `f` inside a child scope.
    pub(crate) fn with_scope<T, F>(&mut self, location: Option<Location>, f: F) -> T
    where
        F: FnOnce(&mut ScopedProcess<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped(location);
        f(&mut scoped)
    }
}

#[cfg(test)]
mod tests {
    use jan_ir::Script;
    use jan_values::{ScopeRef, Value};
    use pretty_assertions::assert_eq;

    use crate::environment::Environment;
    use crate::output::silent_output;
    use crate::process::ScriptProcess;

    #[test]
    fn guard_restores_the_previous_scope() {
        let env = Environment::standard();
        let script = Script::new("guard", "", Vec::new());
        let globals = ScopeRef::root();
        let mut process = ScriptProcess::new(&env, &script, silent_output(), globals.clone());
        let x = env.interner().intern("x");
        process.with_scope(None, |scoped| {
            scoped.scope.bind(x, Value::int(1));
            assert_eq!(scoped.lookup(x), Some(Value::int(1)));
            assert!(!scoped.scope.ptr_eq(&globals));
        });
        assert!(process.scope.ptr_eq(&globals));
        assert_eq!(process.lookup(x), None);
    }

    #[test]
    fn call_guard_pops_the_closure_scope() {
        let env = Environment::standard();
        let script = Script::new("guard", "", Vec::new());
        let mut process = ScriptProcess::new(&env, &script, silent_output(), ScopeRef::root());
        let closure = ScopeRef::root();
        let y = env.interner().intern("y");
        closure.bind(y, Value::int(2));
        {
            let scoped = process.scoped_call(closure, None);
            assert_eq!(scoped.closures.len(), 1);
            assert_eq!(scoped.lookup(y), Some(Value::int(2)));
        }
        assert!(process.closures.is_empty());
        assert_eq!(process.lookup(y), None);
    }
}

//! Tree-walking evaluator.
//!
//! Statements execute for their effect and report non-local exits as
//! [`ControlAction`]; expressions evaluate to a [`Value`]. Each construct
//! consumes exactly the signals it owns:
//! - loops consume `Break` and `Continue`
//! - the call boundary consumes `Return`
//! - `try`/`catch` consumes `Throw` and runtime errors
//!
//! Everything else passes through, unwinding scope guards on the way.
//!
//! # Module Organization
//!
//! - `expr`: expression evaluation
//! - `call`: calls and parameter binding
//! - `access`: attribute lookup and attribute places
//! - `assign`: assignment targets and `++`/`--`
//! - `scope_guard`: RAII scope management

mod access;
mod assign;
mod call;
mod expr;
mod scope_guard;


use jan_ir::{Block, Expr, Name, Stmt, StmtKind, TryStmt};
use jan_stack::ensure_sufficient_stack;
use jan_values::{invalid_range, not_iterable, ControlAction, EvalError, Value, ValueKind};

use crate::process::ScriptProcess;

pub(crate) use call::Kwargs;

/// Outcome of executing a statement.
pub(crate) type ExecResult = Result<(), ControlAction>;

/// What a loop does after one pass through its body.
enum LoopStep {
    Next,
    Exit,
}

/// Sort a body's signal into the loop's own and everybody else's.
fn loop_step(outcome: ExecResult) -> Result<LoopStep, ControlAction> {
    match outcome {
        Ok(()) | Err(ControlAction::Continue) => Ok(LoopStep::Next),
        Err(ControlAction::Break) => Ok(LoopStep::Exit),
        Err(other) => Err(other),
    }
}

impl ScriptProcess<'_> {
    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt]) -> ExecResult {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// Execute a `{ }` block in its own scope.
    pub(crate) fn exec_block(&mut self, block: &Block) -> ExecResult {
        let location = Some(self.location_of(block.span));
        let mut scoped = self.scoped(location);
        scoped.exec_stmts(&block.stmts)
    }

    /// Execute one statement, stamping escaping errors with its location.
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        ensure_sufficient_stack(|| {
            let location = self.location_of(stmt.span);
            self.location = Some(location);
            tracing::trace!(%location, "statement");
            self.exec_stmt_inner(stmt)
                .map_err(|signal| signal.with_location_if_missing(Some(location)))
        })
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                self.result = value.unpack();
                Ok(())
            }
            StmtKind::Assign { target, op, value } => self.exec_assign(target, *op, value),
            StmtKind::Function(def) => {
                let value = self.make_function(def);
                if let Some(name) = def.name {
                    self.scope.bind(name, value);
                }
                Ok(())
            }
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => {
                if self.eval_expr(cond)?.unpack().is_truthy() {
                    self.exec_block(then_block)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(())
                }
            }
            StmtKind::While { cond, body } => self.exec_while(cond, body),
            StmtKind::DoWhile { body, cond } => self.exec_do_while(body, cond),
            StmtKind::For {
                var,
                iterable,
                body,
            } => self.exec_for(*var, iterable, body),
            StmtKind::ForRange {
                var,
                start,
                end,
                body,
            } => self.exec_for_range(*var, start, end, body),
            StmtKind::Break => Err(ControlAction::Break),
            StmtKind::Continue => Err(ControlAction::Continue),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?.unpack(),
                    None => Value::Null,
                };
                Err(ControlAction::Return(value))
            }
            StmtKind::Throw(expr) => {
                let value = self.eval_expr(expr)?.unpack();
                Err(ControlAction::Throw(value))
            }
            StmtKind::Try(stmt) => self.exec_try(stmt),
            StmtKind::Block(block) => self.exec_block(block),
            StmtKind::Import { module, alias } => {
                let value = self.import(*module)?;
                self.scope.bind(alias.unwrap_or(*module), value);
                Ok(())
            }
        }
    }

    // Loops

    fn exec_while(&mut self, cond: &Expr, body: &Block) -> ExecResult {
        while self.eval_expr(cond)?.unpack().is_truthy() {
            if let LoopStep::Exit = loop_step(self.exec_block(body))? {
                break;
            }
        }
        Ok(())
    }

    fn exec_do_while(&mut self, body: &Block, cond: &Expr) -> ExecResult {
        loop {
            if let LoopStep::Exit = loop_step(self.exec_block(body))? {
                break;
            }
            if !self.eval_expr(cond)?.unpack().is_truthy() {
                break;
            }
        }
        Ok(())
    }

    fn exec_for(&mut self, var: Name, iterable: &Expr, body: &Block) -> ExecResult {
        let items = iteration_items(&self.eval_expr(iterable)?)?;
        for item in items {
            if let LoopStep::Exit = loop_step(self.exec_iteration(var, item, body))? {
                break;
            }
        }
        Ok(())
    }

    /// `for (i from a to b)`: both bounds inclusive, counting up.
    fn exec_for_range(&mut self, var: Name, start: &Expr, end: &Expr, body: &Block) -> ExecResult {
        let start = self.eval_expr(start)?.coerce(ValueKind::Int);
        let end = self.eval_expr(end)?.coerce(ValueKind::Int);
        let (Some(Value::Int(start)), Some(Value::Int(end))) = (start, end) else {
            return Err(invalid_range().into());
        };
        for i in start..=end {
            if let LoopStep::Exit = loop_step(self.exec_iteration(var, Value::int(i), body))? {
                break;
            }
        }
        Ok(())
    }

    /// One pass through a loop body, with the loop variable bound in a
    /// scope of its own, so closures created in the body see this pass's
    /// value.
    fn exec_iteration(&mut self, var: Name, item: Value, body: &Block) -> ExecResult {
        let location = Some(self.location_of(body.span));
        self.with_scope(location, |scoped| {
            scoped.scope.bind(var, item);
            scoped.exec_stmts(&body.stmts)
        })
    }

    // Exceptions

    /// `try`/`catch`/`finally`.
    ///
    /// The catch block sees a thrown value as itself and a runtime error as
    /// a map with `kind` and `message`. The finally block always runs; if
    /// it raises, its signal replaces the one in flight.
    fn exec_try(&mut self, stmt: &TryStmt) -> ExecResult {
        let outcome = match (self.exec_block(&stmt.body), &stmt.catch) {
            (Err(signal), Some((name, handler))) if is_catchable(&signal) => {
                self.pending_backtrace = None;
                let caught = caught_value(signal);
                let location = Some(self.location_of(handler.span));
                self.with_scope(location, |scoped| {
                    scoped.scope.bind(*name, caught);
                    scoped.exec_stmts(&handler.stmts)
                })
            }
            (outcome, _) => outcome,
        };
        if let Some(finally) = &stmt.finally {
            self.exec_block(finally)?;
        }
        outcome
    }
}

fn is_catchable(signal: &ControlAction) -> bool {
    matches!(signal, ControlAction::Throw(_) | ControlAction::Error(_))
}

fn caught_value(signal: ControlAction) -> Value {
    match signal {
        ControlAction::Throw(value) => value,
        ControlAction::Error(err) => error_value(&err),
        ControlAction::Break | ControlAction::Continue | ControlAction::Return(_) => Value::Null,
    }
}

/// A runtime error as scripts see it in a catch block.
fn error_value(err: &EvalError) -> Value {
    Value::map_from([
        (Value::string("kind"), Value::string(err.kind.as_str())),
        (Value::string("message"), Value::string(err.message.as_str())),
    ])
}

/// Snapshot of the elements a `for` loop visits.
///
/// Lists and sets yield their elements, maps their keys, strings their
/// characters and binaries their bytes. The loop works on a copy, so the
/// body may modify the collection.
fn iteration_items(value: &Value) -> Result<Vec<Value>, EvalError> {
    match value.unpack() {
        Value::List(items) => Ok(items.borrow().clone()),
        Value::Set(items) => Ok(items.borrow().iter().cloned().collect()),
        Value::Map(map) => Ok(map.borrow().keys().cloned().collect()),
        Value::Str(s) => Ok(s
            .as_str()
            .chars()
            .map(|c| Value::string(c.to_string()))
            .collect()),
        Value::Binary(bytes) => Ok(bytes.iter().map(|b| Value::int(i64::from(*b))).collect()),
        other => Err(not_iterable(other.class_name())),
    }
}

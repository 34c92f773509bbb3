//! Calls: script functions, native functions and bound methods.
//!
//! Every call charges the run's call budget and pushes a call frame; the
//! depth limit is checked by the push. A script function runs in a fresh
//! child of the caller's scope with its closure scope on the closure stack,
//! so its body resolves names in its own scope, then its defining
//! environment, then the caller's chain.

use jan_ir::{Arg, Expr, FunctionBody, ParamKind};
use jan_values::{
    invalid_control_flow, missing_argument, not_callable, unexpected_keyword, wrong_arg_count,
    BoundMethod, CallArgs, ControlAction, EvalResult, FunctionValue, NativeFunction, Value,
};
use smallvec::SmallVec;

use crate::diagnostics::CallFrame;
use crate::process::ScriptProcess;

/// Keyword arguments of one call, names resolved.
pub(crate) type Kwargs = SmallVec<[(&'static str, Value); 4]>;

impl<'a> ScriptProcess<'a> {
    pub(crate) fn eval_call(&mut self, callee: &Expr, args: &[Arg]) -> EvalResult {
        let callee = self.eval_expr(callee)?;
        let mut positional = Vec::with_capacity(args.len());
        let mut named = Kwargs::new();
        for arg in args {
            let value = self.eval_expr(&arg.value)?.unpack();
            match arg.name {
                Some(name) => named.push((self.name_of(name), value)),
                None => positional.push(value),
            }
        }
        self.call_value(&callee, positional, named)
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn call_value(&mut self, callee: &Value, args: Vec<Value>, kwargs: Kwargs) -> EvalResult {
        self.budget.charge()?;
        match callee {
            Value::Function(func) => self.call_function(func, args, kwargs),
            Value::Native(func) => self.call_native(func, &args, &kwargs),
            Value::Method(method) => self.call_method(method, &args, &kwargs),
            other => match other.unpack() {
                inner if inner.is_callable() => self.call_value(&inner, args, kwargs),
                _ => Err(not_callable(other.class_name()).into()),
            },
        }
    }

    /// Run `f` inside a call frame named `name`.
    ///
    /// The caller's location is restored afterwards, and an error leaving
    /// the frame snapshots the call stack for the host's backtrace.
    fn framed<F>(&mut self, name: &str, f: F) -> EvalResult
    where
        F: FnOnce(&mut ScriptProcess<'a>) -> EvalResult,
    {
        let call_site = self.location;
        self.call_stack.push(CallFrame {
            name: name.to_owned(),
            call_site,
        })?;
        let result = f(self);
        if let Err(signal) = &result {
            self.note_backtrace(signal);
        }
        self.call_stack.pop();
        self.location = call_site;
        result
    }

    fn call_function(&mut self, func: &FunctionValue, args: Vec<Value>, kwargs: Kwargs) -> EvalResult {
        tracing::debug!(function = func.display_name(), args = args.len(), "call");
        self.framed(func.display_name(), |process| {
            let location = Some(process.location_of(func.def.span));
            let mut scoped = process.scoped_call(func.closure.clone(), location);
            scoped.bind_params(func, args, kwargs)?;
            let outcome = match &func.def.body {
                FunctionBody::Block(block) => scoped.exec_stmts(&block.stmts).map(|()| Value::Null),
                FunctionBody::Expr(expr) => scoped.eval_expr(expr).map(|value| value.unpack()),
            };
            drop(scoped);
            match outcome {
                Err(ControlAction::Return(value)) => Ok(value),
                Err(ControlAction::Break) => Err(invalid_control_flow("break").into()),
                Err(ControlAction::Continue) => Err(invalid_control_flow("continue").into()),
                other => other,
            }
        })
    }

    /// Bind arguments to parameters in the current (call) scope.
    ///
    /// Positional arguments fill parameters in order; a parameter without
    /// a positional argument takes a keyword argument of its name, then
    /// its default. `*rest` collects surplus positionals as a list,
    /// `**kw` collects unclaimed keywords as a map.
    fn bind_params(&mut self, func: &FunctionValue, args: Vec<Value>, mut kwargs: Kwargs) -> Result<(), ControlAction> {
        let def = &func.def;
        let function = func.display_name();
        let given = args.len();
        let mut args = args.into_iter();
        for param in &def.params {
            let name = self.name_of(param.name);
            let value = match &param.kind {
                ParamKind::Positional => match args.next().or_else(|| take_kwarg(&mut kwargs, name)) {
                    Some(value) => value,
                    None => return Err(missing_argument(function, name).into()),
                },
                ParamKind::Default(default) => match args.next().or_else(|| take_kwarg(&mut kwargs, name)) {
                    Some(value) => value,
                    None => self.eval_expr(default)?.unpack(),
                },
                ParamKind::VarArgs => Value::list(args.by_ref().collect()),
                ParamKind::KwArgs => Value::map_from(
                    kwargs
                        .drain(..)
                        .map(|(key, value)| (Value::string(key), value)),
                ),
            };
            self.scope.bind(param.name, value);
        }
        if args.next().is_some() {
            return Err(wrong_arg_count(function, def.required_params(), Some(def.params.len()), given).into());
        }
        if let Some((keyword, _)) = kwargs.first() {
            return Err(unexpected_keyword(function, keyword).into());
        }
        Ok(())
    }

    fn call_native(&mut self, func: &NativeFunction, args: &[Value], kwargs: &[(&'static str, Value)]) -> EvalResult {
        self.framed(func.name(), |process| {
            let mut call_args = CallArgs::new(func.name(), args, kwargs, process);
            func.call(&mut call_args)
        })
    }

    /// A bound method; builder methods hand back their receiver.
    fn call_method(&mut self, method: &BoundMethod, args: &[Value], kwargs: &[(&'static str, Value)]) -> EvalResult {
        let result = self.framed(method.name, |process| {
            let mut call_args = CallArgs::new(method.name, args, kwargs, process);
            (method.method)(&method.receiver, &mut call_args)
        })?;
        Ok(if method.builder {
            method.receiver.clone()
        } else {
            result
        })
    }
}

fn take_kwarg(kwargs: &mut Kwargs, name: &str) -> Option<Value> {
    let position = kwargs.iter().position(|(key, _)| *key == name)?;
    Some(kwargs.remove(position).1)
}

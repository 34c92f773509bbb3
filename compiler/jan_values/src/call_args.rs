//! Argument access for native functions and builtin methods.

use jan_ir::DurationUnit;
use regex::Regex;

use crate::{
    wrong_arg_count, wrong_arg_type, Duration, EvalError, EvalResult, ListRef, MapRef,
    PackedDate, PackedDateTime, ScriptContext, SetRef, Value, ValueKind,
};

/// Arguments of one call, plus the process making it.
///
/// The argument list is read-only. Typed getters coerce where a lossless
/// conversion exists (see [`Value::coerce`]) and otherwise fail with an
/// Argument error naming the expected and actual class.
pub struct CallArgs<'a> {
    function: &'a str,
    args: &'a [Value],
    kwargs: &'a [(&'static str, Value)],
    ctx: &'a mut dyn ScriptContext,
}

impl<'a> CallArgs<'a> {
    pub fn new(
        function: &'a str,
        args: &'a [Value],
        kwargs: &'a [(&'static str, Value)],
        ctx: &'a mut dyn ScriptContext,
    ) -> Self {
        CallArgs {
            function,
            args,
            kwargs,
            ctx,
        }
    }

    /// Name of the function being called, for messages.
    pub fn function(&self) -> &'a str {
        self.function
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn values(&self) -> &'a [Value] {
        self.args
    }

    pub fn kwargs(&self) -> &'a [(&'static str, Value)] {
        self.kwargs
    }

    pub fn kwarg(&self, name: &str) -> Option<&'a Value> {
        self.kwargs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn context(&mut self) -> &mut dyn ScriptContext {
        &mut *self.ctx
    }

    /// Call back into the script, e.g. for `list.filter(fn)`.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        self.ctx.call(callee, args)
    }

    pub fn warn(&mut self, message: String) {
        self.ctx.warn(message);
    }

    /// Require exactly `count` arguments.
    pub fn require(&self, count: usize) -> Result<(), EvalError> {
        self.require_between(count, count)
    }

    /// Require between `min` and `max` arguments, inclusive.
    pub fn require_between(&self, min: usize, max: usize) -> Result<(), EvalError> {
        let got = self.args.len();
        if got < min || got > max {
            return Err(wrong_arg_count(self.function, min, Some(max), got));
        }
        Ok(())
    }

    pub fn require_at_least(&self, min: usize) -> Result<(), EvalError> {
        let got = self.args.len();
        if got < min {
            return Err(wrong_arg_count(self.function, min, None, got));
        }
        Ok(())
    }

    /// Argument `index`; missing arguments are an Argument error.
    pub fn get(&self, index: usize) -> Result<&'a Value, EvalError> {
        let args: &'a [Value] = self.args;
        args.get(index)
            .ok_or_else(|| wrong_arg_count(self.function, index + 1, None, args.len()))
    }

    /// Argument `index`, or `None` when absent or null.
    pub fn get_nullable(&self, index: usize) -> Option<&'a Value> {
        let args: &'a [Value] = self.args;
        args.get(index).filter(|value| !value.is_null())
    }

    /// Argument `index` coerced to `kind`.
    pub fn get_as(&self, index: usize, kind: ValueKind) -> Result<Value, EvalError> {
        let value = self.get(index)?;
        value.coerce(kind).ok_or_else(|| self.mismatch(index, kind.class_name(), value))
    }

    pub fn get_int(&self, index: usize) -> Result<i64, EvalError> {
        match self.get_as(index, ValueKind::Int)? {
            Value::Int(n) => Ok(n),
            other => Err(self.mismatch(index, "int", &other)),
        }
    }

    pub fn get_optional_int(&self, index: usize) -> Result<Option<i64>, EvalError> {
        match self.get_nullable(index) {
            Some(_) => self.get_int(index).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_float(&self, index: usize) -> Result<f64, EvalError> {
        match self.get_as(index, ValueKind::Float)? {
            Value::Float(f) => Ok(f),
            other => Err(self.mismatch(index, "float", &other)),
        }
    }

    pub fn get_bool(&self, index: usize) -> Result<bool, EvalError> {
        match self.get(index)? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch(index, "bool", other)),
        }
    }

    pub fn get_str(&self, index: usize) -> Result<&'a str, EvalError> {
        match self.get(index)? {
            Value::Str(s) => Ok(s.as_str()),
            other => Err(self.mismatch(index, "string", other)),
        }
    }

    pub fn get_optional_str(&self, index: usize) -> Result<Option<&'a str>, EvalError> {
        match self.get_nullable(index) {
            Some(_) => self.get_str(index).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_list(&self, index: usize) -> Result<&'a ListRef, EvalError> {
        match self.get(index)? {
            Value::List(items) => Ok(items),
            other => Err(self.mismatch(index, "list", other)),
        }
    }

    pub fn get_map(&self, index: usize) -> Result<&'a MapRef, EvalError> {
        match self.get(index)? {
            Value::Map(map) => Ok(map),
            other => Err(self.mismatch(index, "map", other)),
        }
    }

    pub fn get_set(&self, index: usize) -> Result<&'a SetRef, EvalError> {
        match self.get(index)? {
            Value::Set(set) => Ok(set),
            other => Err(self.mismatch(index, "set", other)),
        }
    }

    pub fn get_regex(&self, index: usize) -> Result<&'a Regex, EvalError> {
        match self.get(index)? {
            Value::Regex(re) => Ok(re),
            other => Err(self.mismatch(index, "regex", other)),
        }
    }

    pub fn get_date(&self, index: usize) -> Result<PackedDate, EvalError> {
        match self.get(index)? {
            Value::Date(date) => Ok(*date),
            other => Err(self.mismatch(index, "date", other)),
        }
    }

    /// Datetime argument; a date is accepted as its midnight.
    pub fn get_datetime(&self, index: usize) -> Result<PackedDateTime, EvalError> {
        match self.get_as(index, ValueKind::DateTime)? {
            Value::DateTime(dt) => Ok(dt),
            other => Err(self.mismatch(index, "datetime", &other)),
        }
    }

    /// Duration argument; a bare int is read as seconds.
    pub fn get_duration(&self, index: usize) -> Result<Duration, EvalError> {
        match self.get(index)? {
            Value::Duration(d) => Ok(*d),
            Value::Int(n) => Ok(Duration::new(*n, DurationUnit::Seconds)),
            other => Err(self.mismatch(index, "duration", other)),
        }
    }

    /// Any callable argument.
    pub fn get_callable(&self, index: usize) -> Result<&'a Value, EvalError> {
        let value = self.get(index)?;
        if value.is_callable() {
            Ok(value)
        } else {
            Err(self.mismatch(index, "function", value))
        }
    }

    #[cold]
    fn mismatch(&self, index: usize, expected: &str, got: &Value) -> EvalError {
        wrong_arg_type(self.function, index, expected, got.class_name())
    }
}

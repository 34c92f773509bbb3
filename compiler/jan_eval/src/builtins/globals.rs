//! Functions of the builtin scope: `print`, `assert`, `len`, `str`, `int`,
//! `float`, `list`, `set`, `map` and `type`.

use jan_values::{
    assertion_failed, float_to_exact_int, integer_overflow, invalid_argument, wrong_arg_type,
    CallArgs, EvalResult, NativeFunction, Value,
};

use super::native;

pub(crate) fn global_functions() -> Vec<NativeFunction> {
    vec![
        native("print", print),
        native("assert", assert),
        native("len", len),
        native("str", str),
        native("int", int),
        native("float", float),
        native("list", list),
        native("set", set),
        native("map", map),
        native("type", type_of),
    ]
}

/// Host strings of the arguments, separated by spaces, as one line.
fn print(args: &mut CallArgs<'_>) -> EvalResult {
    let line = args
        .values()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    args.context().print(&line);
    Ok(Value::Null)
}

/// Returns the condition when it holds.
fn assert(args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    let condition = args.get(0)?.unpack();
    if condition.is_truthy() {
        return Ok(condition);
    }
    let message = args.get_optional_str(1).ok().flatten().filter(|m| !m.trim().is_empty());
    Err(assertion_failed(message).into())
}

fn count(n: usize) -> Value {
    Value::int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn len(args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let value = args.get(0)?.unpack();
    Ok(match &value {
        Value::Str(s) => count(s.as_str().chars().count()),
        Value::Binary(bytes) => count(bytes.len()),
        Value::List(items) => count(items.borrow().len()),
        Value::Map(map) => count(map.borrow().len()),
        Value::Set(set) => count(set.borrow().len()),
        other => return Err(wrong_arg_type(args.function(), 0, "string, binary or collection", other.class_name()).into()),
    })
}

fn str(args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    Ok(Value::string(args.get(0)?.unpack().to_string()))
}

/// Floats truncate toward zero; blank strings read as zero.
fn int(args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let value = args.get(0)?.unpack();
    match &value {
        Value::Int(_) => Ok(value),
        Value::Bool(b) => Ok(Value::int(i64::from(*b))),
        Value::Float(f) => float_to_exact_int(f.trunc())
            .map(Value::int)
            .ok_or_else(|| integer_overflow("float to int").into()),
        Value::Str(s) if s.as_str().trim().is_empty() => Ok(Value::int(0)),
        Value::Str(s) => s.as_str().trim().parse::<i64>().map(Value::int).map_err(|err| {
            invalid_argument(args.function(), format!("invalid value for int conversion: '{}': {err}", s.as_str())).into()
        }),
        other => Err(wrong_arg_type(args.function(), 0, "number or string", other.class_name()).into()),
    }
}

fn float(args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let value = args.get(0)?.unpack();
    match &value {
        Value::Float(_) => Ok(value),
        #[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
        Value::Int(n) => Ok(Value::float(*n as f64)),
        Value::Str(s) if s.as_str().trim().is_empty() => Ok(Value::float(0.0)),
        Value::Str(s) => s.as_str().trim().parse::<f64>().map(Value::float).map_err(|err| {
            invalid_argument(args.function(), format!("invalid value for float conversion: '{}': {err}", s.as_str())).into()
        }),
        other => Err(wrong_arg_type(args.function(), 0, "number or string", other.class_name()).into()),
    }
}

/// Items of a single list or set argument, otherwise the arguments.
fn items_of(args: &CallArgs<'_>) -> Vec<Value> {
    match args.values() {
        [Value::List(items)] => items.borrow().clone(),
        [Value::Set(set)] => set.borrow().iter().cloned().collect(),
        values => values.iter().map(Value::unpack).collect(),
    }
}

fn list(args: &mut CallArgs<'_>) -> EvalResult {
    Ok(Value::list(items_of(args)))
}

fn set(args: &mut CallArgs<'_>) -> EvalResult {
    Ok(Value::set(items_of(args)))
}

/// `map()`, a copy of `map(m)`, and keyword arguments as string keys.
fn map(args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let mut entries = match args.get_nullable(0) {
        Some(_) => args.get_map(0)?.borrow().clone(),
        None => rustc_hash::FxHashMap::default(),
    };
    for (key, value) in args.kwargs() {
        entries.insert(Value::string(*key), value.clone());
    }
    Ok(Value::map(entries))
}

fn type_of(args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    Ok(Value::string(args.get(0)?.class_name()))
}

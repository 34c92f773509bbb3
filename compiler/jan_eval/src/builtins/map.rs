//! Methods of `map`, and attribute access to string keys.

use jan_values::{CallArgs, DispatchTable, EvalResult, MapRef, TemporaryAssignable, Value};

use super::json;

pub(super) fn install(table: &mut DispatchTable) {
    table
        .method("get", get)
        .builder("put", put)
        .builder("remove", remove)
        .method("size", size)
        .method("isEmpty", is_empty)
        .method("keys", keys)
        .method("values", values)
        .method("containsKey", contains_key)
        .method("toJson", to_json)
        .builder("parseJson", parse_json)
        .fallback(key_attribute);
}

fn entries(receiver: &Value) -> Option<&MapRef> {
    match receiver {
        Value::Map(map) => Some(map),
        _ => None,
    }
}

/// `m.name` reads key `"name"` (null when absent); assigning through it
/// stores under that key.
fn key_attribute(receiver: &Value, name: &str) -> Option<TemporaryAssignable> {
    let map = entries(receiver)?.clone();
    let key = Value::string(name);
    let current = map.borrow().get(&key).cloned().unwrap_or(Value::Null);
    Some(TemporaryAssignable::new(
        current,
        format!("map.{name}"),
        Box::new(move |value| {
            map.borrow_mut().insert(key, value.unpack());
            Ok(())
        }),
    ))
}

/// `get(k)` or `get(k, default)`.
fn get(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    let key = args.get(0)?.unpack();
    let found = entries(map).and_then(|map| map.borrow().get(&key).cloned());
    Ok(match found {
        Some(value) => value,
        None => args.get_nullable(1).cloned().unwrap_or(Value::Null),
    })
}

fn put(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    if let Some(entries) = entries(map) {
        entries
            .borrow_mut()
            .insert(args.get(0)?.unpack(), args.get(1)?.unpack());
    }
    Ok(Value::Null)
}

fn remove(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    if let Some(entries) = entries(map) {
        entries.borrow_mut().remove(&args.get(0)?.unpack());
    }
    Ok(Value::Null)
}

fn size(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let len = entries(map).map_or(0, |map| map.borrow().len());
    Ok(Value::int(i64::try_from(len).unwrap_or(i64::MAX)))
}

fn is_empty(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::bool(entries(map).is_none_or(|map| map.borrow().is_empty())))
}

fn keys(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let keys = entries(map).map(|map| map.borrow().keys().cloned().collect()).unwrap_or_default();
    Ok(Value::list(keys))
}

fn values(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let values = entries(map).map(|map| map.borrow().values().cloned().collect()).unwrap_or_default();
    Ok(Value::list(values))
}

fn contains_key(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let key = args.get(0)?.unpack();
    Ok(Value::bool(entries(map).is_some_and(|map| map.borrow().contains_key(&key))))
}

fn to_json(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(json::write(args.function(), map)?))
}

/// Store the members of a JSON object under string keys; a blank text
/// stores nothing.
fn parse_json(map: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let Some(parsed) = json::read(args.function(), args.get_str(0)?)? else {
        return Ok(Value::Null);
    };
    let members = match parsed {
        serde_json::Value::Object(members) => members,
        other => return Err(json::expected(args.function(), "an object", &other).into()),
    };
    if let Some(entries) = entries(map) {
        let mut entries = entries.borrow_mut();
        for (key, value) in members {
            entries.insert(Value::string(key), json::import(value));
        }
    }
    Ok(Value::Null)
}

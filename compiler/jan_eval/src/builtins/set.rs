//! Methods of `set`.

use jan_values::{CallArgs, DispatchTable, EvalResult, SetRef, Value};

pub(super) fn install(table: &mut DispatchTable) {
    table
        .builder("add", add)
        .builder("remove", remove)
        .method("contains", contains)
        .method("toList", to_list)
        .method("toSet", to_set)
        .method("size", size)
        .method("isEmpty", is_empty);
}

fn members(receiver: &Value) -> Option<&SetRef> {
    match receiver {
        Value::Set(set) => Some(set),
        _ => None,
    }
}

fn snapshot(receiver: &Value) -> Vec<Value> {
    members(receiver)
        .map(|set| set.borrow().iter().cloned().collect())
        .unwrap_or_default()
}

fn add(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    if let Some(members) = members(set) {
        members.borrow_mut().insert(args.get(0)?.unpack());
    }
    Ok(Value::Null)
}

fn remove(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    if let Some(members) = members(set) {
        members.borrow_mut().remove(&args.get(0)?.unpack());
    }
    Ok(Value::Null)
}

fn contains(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let needle = args.get(0)?.unpack();
    Ok(Value::bool(members(set).is_some_and(|set| set.borrow().contains(&needle))))
}

fn to_list(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::list(snapshot(set)))
}

fn to_set(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::set(snapshot(set)))
}

fn size(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let len = members(set).map_or(0, |set| set.borrow().len());
    Ok(Value::int(i64::try_from(len).unwrap_or(i64::MAX)))
}

fn is_empty(set: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::bool(members(set).is_none_or(|set| set.borrow().is_empty())))
}

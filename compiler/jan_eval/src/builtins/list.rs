//! Methods of `list`.
//!
//! Callbacks (`filter`, `map`) run over a snapshot of the elements, so a
//! callback that mutates the list does not invalidate the iteration.

use std::cmp::Ordering;

use jan_values::{
    index_out_of_bounds, CallArgs, DispatchTable, EvalError, EvalResult, ListRef, Value,
};

use rand::seq::index::sample;

use super::json;
use crate::indexing::{element_index, slice};
use crate::operators::{compare_values, values_equal};

pub(super) fn install(table: &mut DispatchTable) {
    table
        .method("size", size)
        .method("isEmpty", is_empty)
        .method("contains", contains)
        .builder("add", add)
        .builder("addAll", add_all)
        .builder("put", put)
        .builder("remove", remove)
        .builder("removeAll", remove_all)
        .builder("sort", sort)
        .method("get", get)
        .method("count", count)
        .method("filter", filter)
        .method("map", map)
        .method("join", join)
        .method("toSet", to_set)
        .method("toList", to_list)
        .method("randomSublist", random_sublist)
        .method("toJson", to_json)
        .builder("parseJson", parse_json);
}

fn items(receiver: &Value) -> Option<&ListRef> {
    match receiver {
        Value::List(items) => Some(items),
        _ => None,
    }
}

fn snapshot(receiver: &Value) -> Vec<Value> {
    items(receiver).map(|items| items.borrow().clone()).unwrap_or_default()
}

fn len_value(len: usize) -> Value {
    Value::int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn size(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(len_value(items(list).map_or(0, |items| items.borrow().len())))
}

fn is_empty(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::bool(items(list).is_none_or(|items| items.borrow().is_empty())))
}

fn contains(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let needle = args.get(0)?;
    Ok(Value::bool(snapshot(list).iter().any(|item| values_equal(item, needle))))
}

fn count(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let needle = args.get(0)?;
    let found = snapshot(list).iter().filter(|item| values_equal(item, needle)).count();
    Ok(len_value(found))
}

/// `add(x)` appends, `add(i, x)` inserts before position `i`.
fn add(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    let Some(items) = items(list) else {
        return Ok(Value::Null);
    };
    if args.len() == 1 {
        items.borrow_mut().push(args.get(0)?.unpack());
        return Ok(Value::Null);
    }
    let raw = args.get_int(0)?;
    let value = args.get(1)?.unpack();
    let mut items = items.borrow_mut();
    let len = items.len();
    let position = usize::try_from(raw)
        .ok()
        .filter(|position| *position <= len)
        .ok_or_else(|| index_out_of_bounds(raw, len))?;
    items.insert(position, value);
    Ok(Value::Null)
}

fn add_all(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let extra = args.get_list(0)?.borrow().clone();
    if let Some(items) = items(list) {
        items.borrow_mut().extend(extra);
    }
    Ok(Value::Null)
}

/// Replace the element at `i`; negative positions count from the end.
fn put(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    let raw = args.get_int(0)?;
    let value = args.get(1)?.unpack();
    if let Some(items) = items(list) {
        let mut items = items.borrow_mut();
        let len = items.len();
        let position = element_index(raw, len).ok_or_else(|| index_out_of_bounds(raw, len))?;
        items[position] = value;
    }
    Ok(Value::Null)
}

/// Remove the first element equal to the argument, if any.
fn remove(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let needle = args.get(0)?;
    if let Some(items) = items(list) {
        let mut items = items.borrow_mut();
        if let Some(position) = items.iter().position(|item| values_equal(item, needle)) {
            items.remove(position);
        }
    }
    Ok(Value::Null)
}

fn remove_all(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let doomed = args.get_list(0)?.borrow().clone();
    if let Some(items) = items(list) {
        items
            .borrow_mut()
            .retain(|item| !doomed.iter().any(|gone| values_equal(item, gone)));
    }
    Ok(Value::Null)
}

/// Sort in place by the ordering of `<`; mixed lists that cannot be
/// compared fail and stay unsorted.
fn sort(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let mut sorted = snapshot(list);
    let mut failure: Option<EvalError> = None;
    sorted.sort_by(|a, b| match compare_values(a, b) {
        Ok(order) => order.to_ordering(),
        Err(err) => {
            failure.get_or_insert(err);
            Ordering::Equal
        }
    });
    if let Some(err) = failure {
        return Err(err.into());
    }
    if let Some(items) = items(list) {
        *items.borrow_mut() = sorted;
    }
    Ok(Value::Null)
}

/// `get(i)` is an element, `get(a, b)` a sub-list; null bounds mean the
/// start and the end.
fn get(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    if args.len() == 1 {
        let raw = args.get_int(0)?;
        let items = snapshot(list);
        let position = element_index(raw, items.len()).ok_or_else(|| index_out_of_bounds(raw, items.len()))?;
        return Ok(items[position].clone());
    }
    Ok(slice(list, args.get(0)?, args.get(1)?)?)
}

fn filter(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let callback = args.get_callable(0)?;
    let mut kept = Vec::new();
    for item in snapshot(list) {
        if args.call(callback, vec![item.clone()])?.unpack().is_truthy() {
            kept.push(item);
        }
    }
    Ok(Value::list(kept))
}

fn map(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let callback = args.get_callable(0)?;
    let items = snapshot(list);
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(args.call(callback, vec![item])?.unpack());
    }
    Ok(Value::list(mapped))
}

/// Host strings of the elements; the separator defaults to a space.
fn join(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let separator = args.get_optional_str(0)?.unwrap_or(" ");
    let parts: Vec<String> = snapshot(list).iter().map(ToString::to_string).collect();
    Ok(Value::string(parts.join(separator)))
}

fn to_set(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::set(snapshot(list)))
}

fn to_list(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::list(snapshot(list)))
}

/// `n` distinct elements picked at random, kept in list order; a copy of
/// the whole list when `n` reaches its size.
fn random_sublist(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let count = usize::try_from(args.get_int(0)?).unwrap_or(0);
    let items = snapshot(list);
    if count >= items.len() {
        return Ok(Value::list(items));
    }
    let mut picked = sample(&mut rand::thread_rng(), items.len(), count).into_vec();
    picked.sort_unstable();
    Ok(Value::list(picked.into_iter().map(|i| items[i].clone()).collect()))
}

fn to_json(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(json::write(args.function(), list)?))
}

/// Append the elements of a JSON array; a blank text appends nothing.
fn parse_json(list: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let Some(parsed) = json::read(args.function(), args.get_str(0)?)? else {
        return Ok(Value::Null);
    };
    let elements = match parsed {
        serde_json::Value::Array(elements) => elements,
        other => return Err(json::expected(args.function(), "an array", &other).into()),
    };
    let elements: Vec<Value> = elements.into_iter().map(json::import).collect();
    if let Some(items) = items(list) {
        items.borrow_mut().extend(elements);
    }
    Ok(Value::Null)
}

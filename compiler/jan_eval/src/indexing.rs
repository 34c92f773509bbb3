//! `x[i]` and `x[a:b]`.
//!
//! Indices are ints; a negative index counts from the end. Element access
//! out of range is an Argument error, slice bounds are clamped. Strings
//! index by character.

use jan_values::{
    cannot_index, index_out_of_bounds, wrong_arg_type, EvalError, TemporaryAssignable, Value,
    ValueKind,
};

/// Position of element `index` in a sequence of `len` elements.
pub(crate) fn element_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index.checked_add(len)? } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

/// The half-open range selected by `[from:to]` on `len` elements.
pub(crate) fn slice_range(from: Option<i64>, to: Option<i64>, len: usize) -> std::ops::Range<usize> {
    let clamp = |bound: i64| -> usize {
        let len_i = i64::try_from(len).unwrap_or(i64::MAX);
        let bound = if bound < 0 { bound.saturating_add(len_i) } else { bound };
        usize::try_from(bound.clamp(0, len_i)).unwrap_or(len)
    };
    let start = from.map_or(0, clamp);
    let end = to.map_or(len, clamp);
    start..end.max(start)
}

fn int_index(index: &Value, what: &str) -> Result<i64, EvalError> {
    match index.coerce(ValueKind::Int) {
        Some(Value::Int(n)) => Ok(n),
        _ => Err(wrong_arg_type(what, 0, "int", index.class_name())),
    }
}

fn optional_bound(bound: &Value) -> Result<Option<i64>, EvalError> {
    if bound.is_null() {
        Ok(None)
    } else {
        int_index(bound, "slice").map(Some)
    }
}

/// `object[index]` as a place: lists and maps are assignable through it,
/// strings and binaries are read-only.
pub(crate) fn index_place(object: &Value, index: &Value) -> Result<TemporaryAssignable, EvalError> {
    let index = index.unpack();
    match object.unpack() {
        Value::List(items) => {
            let raw = int_index(&index, "list index")?;
            let len = items.borrow().len();
            let position = element_index(raw, len).ok_or_else(|| index_out_of_bounds(raw, len))?;
            let current = items.borrow()[position].clone();
            let target = items.clone();
            Ok(TemporaryAssignable::new(
                current,
                format!("list[{raw}]"),
                Box::new(move |value| {
                    let mut items = target.borrow_mut();
                    let len = items.len();
                    let slot = items.get_mut(position).ok_or_else(|| index_out_of_bounds(raw, len))?;
                    *slot = value.unpack();
                    Ok(())
                }),
            ))
        }
        Value::Map(map) => {
            let current = map.borrow().get(&index).cloned().unwrap_or(Value::Null);
            let target = map.clone();
            let key = index.clone();
            Ok(TemporaryAssignable::new(
                current,
                format!("map[{index}]"),
                Box::new(move |value| {
                    target.borrow_mut().insert(key, value.unpack());
                    Ok(())
                }),
            ))
        }
        Value::Str(s) => {
            let raw = int_index(&index, "string index")?;
            let len = s.as_str().chars().count();
            let position = element_index(raw, len).ok_or_else(|| index_out_of_bounds(raw, len))?;
            let c = s.as_str().chars().nth(position).map(String::from).unwrap_or_default();
            Ok(TemporaryAssignable::read_only(Value::string(c), format!("string[{raw}]")))
        }
        Value::Binary(bytes) => {
            let raw = int_index(&index, "binary index")?;
            let position = element_index(raw, bytes.len()).ok_or_else(|| index_out_of_bounds(raw, bytes.len()))?;
            Ok(TemporaryAssignable::read_only(
                Value::int(i64::from(bytes[position])),
                format!("binary[{raw}]"),
            ))
        }
        other => Err(cannot_index(other.class_name())),
    }
}

/// `object[from:to]`; null bounds mean the start and the end.
pub(crate) fn slice(object: &Value, from: &Value, to: &Value) -> Result<Value, EvalError> {
    let from = optional_bound(&from.unpack())?;
    let to = optional_bound(&to.unpack())?;
    match object.unpack() {
        Value::List(items) => {
            let items = items.borrow();
            let range = slice_range(from, to, items.len());
            Ok(Value::list(items[range].to_vec()))
        }
        Value::Str(s) => {
            let len = s.as_str().chars().count();
            let range = slice_range(from, to, len);
            let text: String = s.as_str().chars().skip(range.start).take(range.len()).collect();
            Ok(Value::string(text))
        }
        Value::Binary(bytes) => {
            let range = slice_range(from, to, bytes.len());
            Ok(Value::binary(bytes[range].to_vec()))
        }
        other => Err(cannot_index(other.class_name())),
    }
}

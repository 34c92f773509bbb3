//! JSON text for lists and maps.
//!
//! Arrays read as lists and objects as maps with string keys. Whole
//! numbers read as ints. Writing names map keys by their host string and
//! leaves out entries whose value is null or an empty map.

use jan_values::{float_to_exact_int, native_failure, EvalError, Value};
use serde_json::{Map as JsonMap, Number, Value as Json};

const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

pub(super) fn write(function: &str, value: &Value) -> Result<String, EvalError> {
    let mut open = Vec::new();
    Ok(export(function, value, &mut open)?.to_string())
}

/// Parse `text`; a blank text is `None`.
pub(super) fn read(function: &str, text: &str) -> Result<Option<Json>, EvalError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|err| native_failure(function, format!("error parsing json: {err}")))
}

pub(super) fn expected(function: &str, what: &str, found: &Json) -> EvalError {
    let kind = match found {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    };
    native_failure(function, format!("error parsing json: expected {what}, found {kind}"))
}

pub(super) fn import(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::bool(b),
        Json::Number(n) => number(&n),
        Json::String(s) => Value::string(s),
        Json::Array(items) => Value::list(items.into_iter().map(import).collect()),
        Json::Object(entries) => Value::map_from(
            entries
                .into_iter()
                .map(|(key, value)| (Value::string(key), import(value))),
        ),
    }
}

fn number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::int(i);
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    float_to_exact_int(f).map_or_else(|| Value::float(f), Value::int)
}

fn export(function: &str, value: &Value, open: &mut Vec<Value>) -> Result<Json, EvalError> {
    let value = value.unpack();
    let cannot = || native_failure(function, format!("cannot write {} as json", value.class_name()));
    Ok(match &value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::from(*n),
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).ok_or_else(cannot)?,
        Value::Str(s) => Json::String(s.as_str().to_owned()),
        Value::Date(d) => d.to_naive().map_or(Json::Null, |d| Json::String(d.to_string())),
        Value::DateTime(dt) => dt
            .to_naive()
            .map_or(Json::Null, |dt| Json::String(dt.format(DATETIME_LAYOUT).to_string())),
        Value::List(_) | Value::Set(_) | Value::Map(_) => {
            if open.iter().any(|outer| outer.identical(&value)) {
                return Err(native_failure(function, "cannot write a container that holds itself as json"));
            }
            open.push(value.clone());
            let json = export_container(function, &value, open);
            open.pop();
            json?
        }
        _ => return Err(cannot()),
    })
}

fn export_container(function: &str, value: &Value, open: &mut Vec<Value>) -> Result<Json, EvalError> {
    Ok(match value {
        Value::List(items) => {
            let items = items.borrow().clone();
            Json::Array(items.iter().map(|item| export(function, item, open)).collect::<Result<_, _>>()?)
        }
        Value::Set(members) => {
            let members: Vec<Value> = members.borrow().iter().cloned().collect();
            Json::Array(members.iter().map(|item| export(function, item, open)).collect::<Result<_, _>>()?)
        }
        Value::Map(map) => {
            let entries: Vec<(Value, Value)> =
                map.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let mut object = JsonMap::new();
            for (key, value) in entries {
                if is_omitted(&value) {
                    continue;
                }
                object.insert(key.to_string(), export(function, &value, open)?);
            }
            Json::Object(object)
        }
        _ => Json::Null,
    })
}

fn is_omitted(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Map(map) => map.borrow().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn whole_numbers_read_as_ints() {
        let json: Json = serde_json::from_str("[1, 2.0, 2.5, -7]").unwrap_or(Json::Null);
        assert_eq!(import(json).to_string(), "[1, 2, 2.5, -7]");
    }

    #[test]
    fn unwritable_values_name_their_class() {
        let err = write("toJson", &Value::list(vec![Value::binary(vec![1])])).err();
        assert_eq!(err.map(|err| err.message), Some("toJson: cannot write binary as json".to_owned()));
    }
}

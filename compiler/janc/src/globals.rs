//! `--global name=value` arguments.
//!
//! Values are parsed once into a literal and turned into a fresh script
//! value for every run.

use jan_eval::Value;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GlobalLiteral {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl GlobalLiteral {
    /// `null`, `true`, `false`, integers and floats keep their type;
    /// anything else is a string. Quotes force a string.
    fn parse(text: &str) -> Self {
        match text {
            "null" => return GlobalLiteral::Null,
            "true" => return GlobalLiteral::Bool(true),
            "false" => return GlobalLiteral::Bool(false),
            _ => {}
        }
        if let Some(inner) = strip_quotes(text) {
            return GlobalLiteral::Str(inner.to_owned());
        }
        if let Ok(n) = text.parse::<i64>() {
            return GlobalLiteral::Int(n);
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => GlobalLiteral::Float(f),
            _ => GlobalLiteral::Str(text.to_owned()),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            GlobalLiteral::Null => Value::Null,
            GlobalLiteral::Bool(b) => Value::bool(*b),
            GlobalLiteral::Int(n) => Value::int(*n),
            GlobalLiteral::Float(f) => Value::float(*f),
            GlobalLiteral::Str(s) => Value::string(s.as_str()),
        }
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GlobalArg {
    pub name: String,
    pub value: GlobalLiteral,
}

pub(crate) fn parse_global(arg: &str) -> Result<GlobalArg, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(format!("'{name}' is not a valid global name"));
    }
    Ok(GlobalArg {
        name: name.to_owned(),
        value: GlobalLiteral::parse(value),
    })
}

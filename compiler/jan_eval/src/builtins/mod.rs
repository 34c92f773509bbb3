//! Builtin dispatch tables and global functions.
//!
//! Every builtin class gets one table, parented to the root `object` table
//! so that `x.class` answers for every value. Tables are built once per
//! environment and shared by all of its processes.

mod binary;
mod globals;
mod json;
mod list;
mod map;
mod numbers;
mod regex;
mod set;
mod string;
mod temporal;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::sync::Arc;

use jan_values::{
    CallArgs, DispatchRegistry, DispatchTable, EvalError, EvalResult, NativeFunction, Value,
    ValueKind,
};

pub(crate) use globals::global_functions;

/// Class name tag, as `x.class` and `type(x)` report it.
fn class_of(value: &Value) -> Result<Value, EvalError> {
    Ok(Value::string(value.class_name()))
}

fn root_table() -> DispatchTable {
    let mut table = DispatchTable::new("object");
    table.property("class", class_of);
    table
}

/// Builtin tables delegate to the root with the receiver unchanged.
fn same_value(value: &Value) -> Option<Value> {
    Some(value.clone())
}

fn child_table(kind: ValueKind, root: &Arc<DispatchTable>) -> DispatchTable {
    DispatchTable::with_parent(kind.class_name(), Arc::clone(root), same_value)
}

/// The registry every new environment starts from.
pub(crate) fn registry() -> DispatchRegistry {
    let root = Arc::new(root_table());
    let mut registry = DispatchRegistry::new(Arc::clone(&root));
    let tables: [(ValueKind, fn(&mut DispatchTable)); 11] = [
        (ValueKind::String, string::install),
        (ValueKind::List, list::install),
        (ValueKind::Map, map::install),
        (ValueKind::Set, set::install),
        (ValueKind::Int, numbers::install_int),
        (ValueKind::Float, numbers::install_float),
        (ValueKind::Binary, binary::install),
        (ValueKind::Duration, temporal::install_duration),
        (ValueKind::Date, temporal::install_date),
        (ValueKind::DateTime, temporal::install_datetime),
        (ValueKind::Regex, regex::install),
    ];
    for (kind, install) in tables {
        let mut table = child_table(kind, &root);
        install(&mut table);
        registry.register(kind, Arc::new(table));
    }
    let mut matcher = DispatchTable::with_parent(regex::MATCHER_CLASS, Arc::clone(&root), same_value);
    regex::install_matcher(&mut matcher);
    registry.register_host(regex::MATCHER_CLASS, Arc::new(matcher));
    registry
}

/// Wrap a plain function as a named native.
fn native(name: &'static str, func: fn(&mut CallArgs<'_>) -> EvalResult) -> NativeFunction {
    NativeFunction::new(name, func)
}

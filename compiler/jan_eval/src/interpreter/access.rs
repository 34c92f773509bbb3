//! Attribute access: `object.name`.
//!
//! Resolution order:
//! 1. a module's own bindings
//! 2. the dispatch table for the value, local entries then parents
//! 3. the table's fallback (maps read unknown names as keys)
//! 4. the host object's own attributes
//!
//! Anything else is a Name error naming the class and the attribute.

use jan_ir::Name;
use jan_values::{
    no_such_attribute, EvalError, Handler, Resolved, TemporaryAssignable, Value,
};

use crate::process::ScriptProcess;

impl ScriptProcess<'_> {
    pub(crate) fn get_attribute(&self, object: &Value, name: Name) -> Result<Value, EvalError> {
        self.attribute_place(object, name).map(TemporaryAssignable::into_value)
    }

    /// `object.name` as a place; read-write properties and map keys are
    /// assignable through it.
    pub(crate) fn attribute_place(&self, object: &Value, name: Name) -> Result<TemporaryAssignable, EvalError> {
        let text = self.name_of(name);
        if let Value::Module(module) = object {
            return module
                .scope
                .get_local(name)
                .map(|value| TemporaryAssignable::read_only(value, format!("{}.{text}", module.name)))
                .ok_or_else(|| no_such_attribute(&format!("module {}", module.name), text));
        }
        self.resolve_attribute(object, text)?
            .ok_or_else(|| no_such_attribute(object.class_name(), text))
    }

    fn resolve_attribute(&self, object: &Value, text: &'static str) -> Result<Option<TemporaryAssignable>, EvalError> {
        let table = self.env.registry().table_for(object);
        if let Some(Resolved { handler, receiver }) = table.resolve(object, text) {
            let target = format!("{}.{text}", object.class_name());
            let place = match handler {
                Handler::Method(method) => TemporaryAssignable::read_only(
                    Value::bound_method(receiver, text, method, false),
                    target,
                ),
                Handler::Builder(method) => TemporaryAssignable::read_only(
                    Value::bound_method(receiver, text, method, true),
                    target,
                ),
                Handler::Property(get) => TemporaryAssignable::read_only(get(&receiver)?, target),
                Handler::PropertyRw { get, set } => {
                    let current = get(&receiver)?;
                    TemporaryAssignable::new(current, target, Box::new(move |value| set(&receiver, value)))
                }
                Handler::Forward(cast) => match cast(&receiver) {
                    Some(inner) => return self.resolve_attribute(&inner, text),
                    None => return Ok(None),
                },
            };
            return Ok(Some(place));
        }
        if let Some(place) = table.resolve_fallback(object, text) {
            return Ok(Some(place));
        }
        if let Value::Object(host) = object {
            return Ok(host
                .get_attribute(text)
                .map(|value| TemporaryAssignable::read_only(value, format!("{}.{text}", host.class_name()))));
        }
        Ok(None)
    }
}

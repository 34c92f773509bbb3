//! Host-provided value types.

use std::any::Any;
use std::fmt;

use super::Value;

/// A value type contributed by the embedding application.
///
/// Only `class_name` and `as_any` are required. The class name selects the
/// dispatch table registered for the type (see
/// [`DispatchRegistry::register_host`](crate::DispatchRegistry::register_host)),
/// and `as_any` lets handlers in that table downcast back to the concrete
/// type.
pub trait HostObject: fmt::Debug {
    fn class_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Text used by `print`, string concatenation and diagnostics.
    fn to_host_string(&self) -> String {
        format!("<{}>", self.class_name())
    }

    fn is_truthy(&self) -> bool {
        true
    }

    /// Inner value of a wrapper-like object. Operators and comparisons see
    /// the inner value instead of the wrapper.
    fn unpack(&self) -> Option<Value> {
        None
    }

    /// Attributes answered by the object itself, consulted after its
    /// dispatch table.
    fn get_attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Called when a scope holding this object is left, or when a binding
    /// holding it is replaced.
    fn leave_scope(&self) {}
}

//! Read results that can also be assigned to.

use std::fmt;

use crate::{cannot_assign, EvalError, Value};

/// Callback storing a new value into the place a [`TemporaryAssignable`]
/// was read from.
pub type Setter = Box<dyn FnOnce(Value) -> Result<(), EvalError>>;

/// Short-lived handle returned by indexed and property reads that are also
/// valid assignment targets (`list[i]`, `map[k]`, `obj.prop`).
///
/// It carries the value currently stored plus a setter. Reading through it
/// yields the value; assigning invokes the setter once.
pub struct TemporaryAssignable {
    value: Value,
    target: String,
    setter: Option<Setter>,
}

impl TemporaryAssignable {
    pub fn new(value: Value, target: impl Into<String>, setter: Setter) -> Self {
        TemporaryAssignable {
            value,
            target: target.into(),
            setter: Some(setter),
        }
    }

    /// A handle that refuses assignment, e.g. `s[0]` on a string.
    pub fn read_only(value: Value, target: impl Into<String>) -> Self {
        TemporaryAssignable {
            value,
            target: target.into(),
            setter: None,
        }
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Description of the place, for error messages (`list[3]`).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_assignable(&self) -> bool {
        self.setter.is_some()
    }

    /// Store `value`, or fail with a Type error naming the target.
    pub fn assign(self, value: Value) -> Result<(), EvalError> {
        match self.setter {
            Some(setter) => setter(value),
            None => Err(cannot_assign(&self.target)),
        }
    }
}

impl fmt::Debug for TemporaryAssignable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryAssignable")
            .field("target", &self.target)
            .field("value", &self.value)
            .field("assignable", &self.is_assignable())
            .finish()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::EvalErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignment_goes_through_the_setter() {
        let list = Value::list(vec![Value::int(1), Value::int(2)]);
        let Value::List(items) = &list else {
            unreachable!()
        };
        let target = items.clone();
        let handle = TemporaryAssignable::new(
            items.borrow()[1].clone(),
            "list[1]",
            Box::new(move |value| {
                target.borrow_mut()[1] = value;
                Ok(())
            }),
        );
        assert_eq!(handle.value(), &Value::int(2));
        handle.assign(Value::int(9)).unwrap();
        assert_eq!(list, Value::list(vec![Value::int(1), Value::int(9)]));
    }

    #[test]
    fn read_only_handles_refuse_assignment() {
        let handle = TemporaryAssignable::read_only(Value::string("a"), "string[0]");
        assert!(!handle.is_assignable());
        let err = handle.assign(Value::string("b")).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::Type);
        assert_eq!(err.message, "cannot assign to string[0]");
    }
}

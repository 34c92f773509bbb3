//! Function values: script functions, native functions, bound methods and
//! module namespaces.

use std::fmt;
use std::sync::Arc;

use jan_ir::FunctionDef;

use super::Value;
use crate::{CallArgs, EvalResult, MethodFn, ScopeRef};

/// Signature of a host-provided function.
pub type NativeFn = dyn Fn(&mut CallArgs<'_>) -> EvalResult + Send + Sync;

/// A function implemented by the host.
///
/// The function itself is `Send + Sync` so one instance can be registered on
/// a shared environment and handed to every script process.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<Arc<str>>,
        func: impl Fn(&mut CallArgs<'_>) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        NativeFunction {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn call(&self, args: &mut CallArgs<'_>) -> EvalResult {
        (self.func)(args)
    }

    pub(crate) fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// A function declared in a script, with the scope it was created in.
///
/// The closure scope is shared: it stays alive as long as any function value
/// created in it does, independent of the block that created it.
#[derive(Clone)]
pub struct FunctionValue {
    pub def: Arc<FunctionDef>,
    pub closure: ScopeRef,
    /// Display name; `None` for lambdas.
    pub name: Option<&'static str>,
}

impl FunctionValue {
    pub fn display_name(&self) -> &str {
        self.name.unwrap_or("<lambda>")
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.display_name())
    }
}

/// A method looked up on a receiver, `s.trim` before it is called.
#[derive(Clone)]
pub struct BoundMethod {
    pub receiver: Value,
    pub name: &'static str,
    pub method: MethodFn,
    /// Builder methods return the receiver instead of their own result.
    pub builder: bool,
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundMethod({}.{})", self.receiver.class_name(), self.name)
    }
}

/// An imported module: a name plus the scope holding its members.
#[derive(Debug)]
pub struct ModuleValue {
    pub name: Arc<str>,
    pub scope: ScopeRef,
}

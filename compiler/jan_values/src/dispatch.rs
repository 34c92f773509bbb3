//! Per-type attribute dispatch.
//!
//! Each value kind has a [`DispatchTable`] mapping attribute names to
//! handlers. A table may name one parent table together with a cast from
//! the child's representation to the parent's; lookup tries local entries
//! first and then walks the parent chain, so a local definition always
//! shadows the parent's. This is single inheritance without a class
//! hierarchy: the tables are built once when the environment starts and
//! are read-only afterwards, which is what lets one registry be shared by
//! every script process.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{CallArgs, EvalError, EvalResult, TemporaryAssignable, Value, ValueKind};

/// Method body: receiver plus call arguments.
pub type MethodFn = fn(&Value, &mut CallArgs<'_>) -> EvalResult;
/// Computed property read.
pub type GetterFn = fn(&Value) -> Result<Value, EvalError>;
/// Computed property write.
pub type SetterFn = fn(&Value, Value) -> Result<(), EvalError>;
/// View of a receiver as the representation a parent table or an inner
/// value expects. `None` when the receiver has no such view.
pub type CastFn = fn(&Value) -> Option<Value>;
/// Last-resort attribute resolution for names no table defines. Maps use
/// this to read unknown attribute names as keys.
pub type FallbackFn = fn(&Value, &str) -> Option<TemporaryAssignable>;

/// The five handler shapes.
#[derive(Copy, Clone)]
pub enum Handler {
    /// Plain method; calling it returns the method's result.
    Method(MethodFn),
    /// Fluent method; calling it returns the receiver.
    Builder(MethodFn),
    /// Read-only property.
    Property(GetterFn),
    /// Read-write property; reads as an assignable.
    PropertyRw { get: GetterFn, set: SetterFn },
    /// Resolve the same name on the inner value produced by the cast.
    Forward(CastFn),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Handler::Method(_) => "Method",
            Handler::Builder(_) => "Builder",
            Handler::Property(_) => "Property",
            Handler::PropertyRw { .. } => "PropertyRw",
            Handler::Forward(_) => "Forward",
        };
        f.write_str(shape)
    }
}

/// A handler together with the receiver as seen by the table defining it.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub handler: Handler,
    pub receiver: Value,
}

pub struct DispatchTable {
    class_name: &'static str,
    entries: FxHashMap<&'static str, Handler>,
    parent: Option<(Arc<DispatchTable>, CastFn)>,
    fallback: Option<FallbackFn>,
}

impl DispatchTable {
    pub fn new(class_name: &'static str) -> Self {
        DispatchTable {
            class_name,
            entries: FxHashMap::default(),
            parent: None,
            fallback: None,
        }
    }

    /// Table delegating unknown names to `parent`, viewing receivers
    /// through `cast`.
    pub fn with_parent(class_name: &'static str, parent: Arc<DispatchTable>, cast: CastFn) -> Self {
        DispatchTable {
            parent: Some((parent, cast)),
            ..DispatchTable::new(class_name)
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn define(&mut self, name: &'static str, handler: Handler) -> &mut Self {
        self.entries.insert(name, handler);
        self
    }

    pub fn method(&mut self, name: &'static str, method: MethodFn) -> &mut Self {
        self.define(name, Handler::Method(method))
    }

    pub fn builder(&mut self, name: &'static str, method: MethodFn) -> &mut Self {
        self.define(name, Handler::Builder(method))
    }

    pub fn property(&mut self, name: &'static str, get: GetterFn) -> &mut Self {
        self.define(name, Handler::Property(get))
    }

    pub fn property_rw(&mut self, name: &'static str, get: GetterFn, set: SetterFn) -> &mut Self {
        self.define(name, Handler::PropertyRw { get, set })
    }

    pub fn forward(&mut self, name: &'static str, cast: CastFn) -> &mut Self {
        self.define(name, Handler::Forward(cast))
    }

    pub fn fallback(&mut self, fallback: FallbackFn) -> &mut Self {
        self.fallback = Some(fallback);
        self
    }

    /// Whether this table itself (not a parent) defines `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Find the handler for `name`: local entries, then the parent chain.
    ///
    /// A cast that has no view of the receiver stops the walk.
    pub fn resolve(&self, receiver: &Value, name: &str) -> Option<Resolved> {
        let mut table = self;
        let mut receiver = receiver.clone();
        loop {
            if let Some(handler) = table.entries.get(name) {
                return Some(Resolved {
                    handler: *handler,
                    receiver,
                });
            }
            let (parent, cast) = table.parent.as_ref()?;
            receiver = cast(&receiver)?;
            table = &**parent;
        }
    }

    /// Run the nearest fallback on the chain.
    pub fn resolve_fallback(&self, receiver: &Value, name: &str) -> Option<TemporaryAssignable> {
        let mut table = self;
        let mut receiver = receiver.clone();
        loop {
            if let Some(fallback) = table.fallback {
                return fallback(&receiver, name);
            }
            let (parent, cast) = table.parent.as_ref()?;
            receiver = cast(&receiver)?;
            table = &**parent;
        }
    }

    /// Names visible through this table, parents included, sorted.
    pub fn attribute_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut table = Some(self);
        while let Some(current) = table {
            names.extend(current.entries.keys().copied());
            table = current.parent.as_ref().map(|(parent, _)| &**parent);
        }
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("class_name", &self.class_name)
            .field("entries", &self.entries.len())
            .field("parent", &self.parent.as_ref().map(|(p, _)| p.class_name))
            .finish_non_exhaustive()
    }
}

/// Every dispatch table of an environment.
///
/// Builtin kinds are keyed by [`ValueKind`], host objects by class name.
/// Values without a table of their own use the root table.
#[derive(Debug)]
pub struct DispatchRegistry {
    root: Arc<DispatchTable>,
    builtin: FxHashMap<ValueKind, Arc<DispatchTable>>,
    host: FxHashMap<String, Arc<DispatchTable>>,
}

impl DispatchRegistry {
    pub fn new(root: Arc<DispatchTable>) -> Self {
        DispatchRegistry {
            root,
            builtin: FxHashMap::default(),
            host: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> &Arc<DispatchTable> {
        &self.root
    }

    pub fn register(&mut self, kind: ValueKind, table: Arc<DispatchTable>) {
        self.builtin.insert(kind, table);
    }

    pub fn register_host(&mut self, class_name: impl Into<String>, table: Arc<DispatchTable>) {
        self.host.insert(class_name.into(), table);
    }

    pub fn builtin(&self, kind: ValueKind) -> Option<&Arc<DispatchTable>> {
        self.builtin.get(&kind)
    }

    /// The table that answers attribute lookups on `value`.
    pub fn table_for(&self, value: &Value) -> &DispatchTable {
        let table = match value {
            Value::Object(obj) => self.host.get(obj.class_name()),
            other => self.builtin.get(&other.kind()),
        };
        table.unwrap_or(&self.root)
    }
}

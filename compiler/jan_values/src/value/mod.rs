//! Runtime values.
//!
//! # Variants
//!
//! Scalars (`Null`, `Bool`, `Int`, `Float`, dates, durations) are stored
//! inline. Everything else lives behind a [`Heap`] handle whose constructor
//! is private to this crate, so heap values are only built through the
//! factory methods below (`Value::string`, `Value::list`, ...).
//!
//! Lists, maps and sets are the only mutable values. Their handles share
//! one allocation on clone, so aliasing is visible: a list stored in two
//! variables is one list.
//!
//! # Capabilities
//!
//! Every value answers truthiness ([`Value::is_truthy`]), a host string
//! (`Display`), a class tag ([`Value::class_name`]), an optional unwrap to an
//! inner value ([`Value::unpack`]) and coercion to a requested kind
//! ([`Value::coerce`]). Attribute lookup goes through the
//! [`DispatchRegistry`](crate::DispatchRegistry).
//!
//! # Threads
//!
//! Values use `Rc` and are confined to the script process that created
//! them. Data shared between processes (dispatch tables, native functions)
//! is `Send + Sync` and never holds a `Value`.

mod callable;
mod cycle;
mod heap;
mod host;
mod string;
mod temporal;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use jan_ir::{DurationUnit, FunctionDef};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

pub use callable::{BoundMethod, FunctionValue, ModuleValue, NativeFn, NativeFunction};
pub use heap::Heap;
pub use host::HostObject;
pub use string::ScriptString;
pub use temporal::{Duration, PackedDate, PackedDateTime};

use crate::{CallArgs, EvalResult, MethodFn, ScopeRef};
use cycle::{Visit, Walk, visit};

pub type ListRef = Heap<RefCell<Vec<Value>>>;
pub type MapRef = Heap<RefCell<FxHashMap<Value, Value>>>;
pub type SetRef = Heap<RefCell<FxHashSet<Value>>>;

/// Runtime value of a script.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(PackedDate),
    DateTime(PackedDateTime),
    Duration(Duration),

    Str(Heap<ScriptString>),
    Binary(Heap<Vec<u8>>),
    Regex(Heap<Regex>),
    List(ListRef),
    Map(MapRef),
    Set(SetRef),

    Function(FunctionValue),
    Native(NativeFunction),
    Method(Heap<BoundMethod>),
    Module(Heap<ModuleValue>),
    /// Value contributed by the host application.
    Object(Rc<dyn HostObject>),
}

/// Class tag of a value, without the payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Date,
    DateTime,
    Duration,
    String,
    Binary,
    Regex,
    List,
    Map,
    Set,
    Function,
    Module,
    Object,
}

impl ValueKind {
    /// Class name as scripts see it (`x.class`, `type(x)`).
    ///
    /// Host objects report their own class name; `Object` here is only the
    /// generic fallback used in argument errors.
    pub const fn class_name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Date => "date",
            ValueKind::DateTime => "datetime",
            ValueKind::Duration => "duration",
            ValueKind::String => "string",
            ValueKind::Binary => "binary",
            ValueKind::Regex => "regex",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Set => "set",
            ValueKind::Function => "function",
            ValueKind::Module => "module",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

// Factory methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn string(s: impl Into<Box<str>>) -> Self {
        Value::Str(Heap::new(ScriptString::new(s)))
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        Value::Binary(Heap::new(bytes))
    }

    pub fn regex(regex: Regex) -> Self {
        Value::Regex(Heap::new(regex))
    }

    pub fn date(date: PackedDate) -> Self {
        Value::Date(date)
    }

    pub fn datetime(dt: PackedDateTime) -> Self {
        Value::DateTime(dt)
    }

    pub fn duration(amount: i64, unit: DurationUnit) -> Self {
        Value::Duration(Duration::new(amount, unit))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(RefCell::new(items)))
    }

    pub fn map(entries: FxHashMap<Value, Value>) -> Self {
        Value::Map(Heap::new(RefCell::new(entries)))
    }

    pub fn map_from(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::map(entries.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Heap::new(RefCell::new(items.into_iter().collect())))
    }

    /// Host function value.
    pub fn native(
        name: impl Into<Arc<str>>,
        func: impl Fn(&mut CallArgs<'_>) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Value::Native(NativeFunction::new(name, func))
    }

    pub fn function(def: Arc<FunctionDef>, closure: ScopeRef, name: Option<&'static str>) -> Self {
        Value::Function(FunctionValue { def, closure, name })
    }

    pub fn bound_method(receiver: Value, name: &'static str, method: MethodFn, builder: bool) -> Self {
        Value::Method(Heap::new(BoundMethod {
            receiver,
            name,
            method,
            builder,
        }))
    }

    pub fn module(name: impl Into<Arc<str>>, scope: ScopeRef) -> Self {
        Value::Module(Heap::new(ModuleValue {
            name: name.into(),
            scope,
        }))
    }

    pub fn object(object: impl HostObject + 'static) -> Self {
        Value::Object(Rc::new(object))
    }
}

// Capabilities

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Date(_) => ValueKind::Date,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Duration(_) => ValueKind::Duration,
            Value::Str(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::Regex(_) => ValueKind::Regex,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Set(_) => ValueKind::Set,
            Value::Function(_) | Value::Native(_) | Value::Method(_) => ValueKind::Function,
            Value::Module(_) => ValueKind::Module,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Class tag used by `x.class` and error messages.
    pub fn class_name(&self) -> &str {
        match self {
            Value::Object(obj) => obj.class_name(),
            other => other.kind().class_name(),
        }
    }

    /// Empty strings and containers, `false`, zero numbers, the empty date
    /// and zero-length durations are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Date(d) => !d.is_empty(),
            Value::DateTime(dt) => !dt.is_empty(),
            Value::Duration(d) => d.amount != 0,
            Value::Str(s) => !s.as_str().is_empty(),
            Value::Binary(b) => !b.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Map(map) => !map.borrow().is_empty(),
            Value::Set(set) => !set.borrow().is_empty(),
            Value::Object(obj) => obj.is_truthy(),
            Value::Regex(_)
            | Value::Function(_)
            | Value::Native(_)
            | Value::Method(_)
            | Value::Module(_) => true,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Native(_) | Value::Method(_)
        )
    }

    /// The value a wrapper stands for; other values unpack to themselves.
    pub fn unpack(&self) -> Value {
        match self {
            Value::Object(obj) => obj.unpack().unwrap_or_else(|| self.clone()),
            other => other.clone(),
        }
    }

    /// Convert to `kind` where a lossless conversion exists.
    ///
    /// Ints widen to floats, integral floats narrow to ints and dates widen
    /// to midnight datetimes. Wrapped host values are unpacked first.
    pub fn coerce(&self, kind: ValueKind) -> Option<Value> {
        let value = self.unpack();
        if value.kind() == kind {
            return Some(value);
        }
        match (&value, kind) {
            #[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
            (Value::Int(n), ValueKind::Float) => Some(Value::Float(*n as f64)),
            (Value::Float(f), ValueKind::Int) => float_to_exact_int(*f).map(Value::Int),
            (Value::Date(d), ValueKind::DateTime) => Some(Value::DateTime(d.start_of_day())),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as `f64`, promoting ints.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[expect(clippy::cast_precision_loss, reason = "int to float promotion")]
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Downcast a host object to its concrete type.
    pub fn downcast_object<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Run the host cleanup hook for a value leaving scope.
    pub fn leave_scope(&self) {
        if let Value::Object(obj) = self {
            obj.leave_scope();
        }
    }

    /// Same object, not merely equal.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Heap::ptr_eq(a, b),
            (Value::Binary(a), Value::Binary(b)) => Heap::ptr_eq(a, b),
            (Value::Regex(a), Value::Regex(b)) => Heap::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Heap::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Heap::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Heap::ptr_eq(a, b),
            (Value::Method(a), Value::Method(b)) => Heap::ptr_eq(a, b),
            (Value::Module(a), Value::Module(b)) => Heap::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => {
                Arc::ptr_eq(&a.def, &b.def) && a.closure.ptr_eq(&b.closure)
            }
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (a, b) => a == b,
        }
    }
}

/// `f` as an `i64` if it is integral and in range.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "range and integrality checked before the cast"
)]
pub fn float_to_exact_int(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// Trait implementations

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Date(d) => write!(f, "Date({d})"),
            Value::DateTime(dt) => write!(f, "DateTime({dt})"),
            Value::Duration(d) => write!(f, "Duration({d})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Binary(b) => write!(f, "Binary({:?})", &**b),
            Value::Regex(re) => write!(f, "Regex({:?})", re.as_str()),
            Value::List(items) => match visit(items, Walk::Display) {
                Some((_visit, items)) => write!(f, "List({:?})", &*items),
                None => f.write_str("List([...])"),
            },
            Value::Map(map) => match visit(map, Walk::Display) {
                Some((_visit, map)) => write!(f, "Map({:?})", &*map),
                None => f.write_str("Map({...})"),
            },
            Value::Set(set) => match visit(set, Walk::Display) {
                Some((_visit, set)) => write!(f, "Set({:?})", &*set),
                None => f.write_str("Set([...])"),
            },
            Value::Function(func) => write!(f, "{func:?}"),
            Value::Native(func) => write!(f, "{func:?}"),
            Value::Method(method) => write!(f, "{:?}", &**method),
            Value::Module(module) => write!(f, "Module({})", module.name),
            Value::Object(obj) => write!(f, "Object({obj:?})"),
        }
    }
}

/// Host string: what `print` writes and `+` concatenates.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write_float(f, *n),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Duration(d) => write!(f, "{d}"),
            Value::Str(s) => f.write_str(s.as_str()),
            Value::Binary(bytes) => write_seq(f, "[", "]", bytes.iter()),
            Value::Regex(re) => write!(f, "re/{}/", re.as_str()),
            Value::List(items) => match visit(items, Walk::Display) {
                Some((_visit, items)) => write_seq(f, "[", "]", items.iter()),
                None => f.write_str("[...]"),
            },
            Value::Set(items) => match visit(items, Walk::Display) {
                Some((_visit, items)) => write_seq(f, "[", "]", items.iter()),
                None => f.write_str("[...]"),
            },
            Value::Map(map) => {
                let Some((_visit, map)) = visit(map, Walk::Display) else {
                    return f.write_str("{...}");
                };
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                f.write_str("}")
            }
            Value::Function(func) => write!(f, "<function {}>", func.display_name()),
            Value::Native(func) => write!(f, "<function {}>", func.name()),
            Value::Method(method) => {
                write!(f, "<method {}.{}>", method.receiver.class_name(), method.name)
            }
            Value::Module(module) => write!(f, "<module {}>", module.name),
            Value::Object(obj) => f.write_str(&obj.to_host_string()),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        write!(f, "{n:.1}")
    } else {
        write!(f, "{n}")
    }
}

fn write_seq<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

/// Equality on host-visible value.
///
/// Numbers compare by numeric value across int and float, durations by
/// length, containers element-wise. Functions, modules and host objects
/// are equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                float_to_exact_int(*f) == Some(*i)
            }
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a.as_str() == b.as_str(),
            (Value::Binary(a), Value::Binary(b)) => **a == **b,
            (Value::Regex(a), Value::Regex(b)) => a.as_str() == b.as_str(),
            (Value::List(a), Value::List(b)) => containers_eq(a, b),
            (Value::Map(a), Value::Map(b)) => containers_eq(a, b),
            (Value::Set(a), Value::Set(b)) => containers_eq(a, b),
            (Value::Method(a), Value::Method(b)) => {
                Heap::ptr_eq(a, b) || (a.name == b.name && a.receiver.identical(&b.receiver))
            }
            (a, b) => a.identical_reference(b),
        }
    }
}

impl Value {
    fn identical_reference(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Function(_), Value::Function(_))
            | (Value::Native(_), Value::Native(_))
            | (Value::Module(_), Value::Module(_))
            | (Value::Object(_), Value::Object(_)) => self.identical(other),
            _ => false,
        }
    }
}

/// Element-wise comparison of two shared containers.
///
/// A container that is being written to (a map receiving itself as a key)
/// is only equal to itself. Meeting the same pair again while it is still
/// being compared means both sides repeat the same way from there on.
fn containers_eq<T: PartialEq>(a: &Heap<RefCell<T>>, b: &Heap<RefCell<T>>) -> bool {
    if Heap::ptr_eq(a, b) {
        return true;
    }
    let Some(_visit) = Visit::enter(a.addr(), Walk::Eq(b.addr())) else {
        return true;
    };
    match (a.try_borrow(), b.try_borrow()) {
        (Ok(a), Ok(b)) => *a == *b,
        _ => false,
    }
}

/// Map keys and set members rely on this; NaN never finds itself.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => match float_to_exact_int(*f) {
                Some(n) => n.hash(state),
                None => f.to_bits().hash(state),
            },
            Value::Date(d) => d.hash(state),
            Value::DateTime(dt) => dt.hash(state),
            Value::Duration(d) => d.hash(state),
            Value::Str(s) => s.as_str().hash(state),
            Value::Binary(b) => b.hash(state),
            Value::Regex(re) => re.as_str().hash(state),
            Value::List(items) => {
                if let Some((_visit, items)) = visit(items, Walk::Hash) {
                    for item in items.iter() {
                        item.hash(state);
                    }
                } else {
                    usize::MAX.hash(state);
                }
            }
            // A map or set being written to hashes like any other busy container.
            Value::Map(map) => map.try_borrow().map_or(usize::MAX, |map| map.len()).hash(state),
            Value::Set(set) => set.try_borrow().map_or(usize::MAX, |set| set.len()).hash(state),
            Value::Function(func) => Arc::as_ptr(&func.def).hash(state),
            Value::Native(func) => func.addr().hash(state),
            Value::Method(method) => method.name.hash(state),
            Value::Module(module) => module.addr().hash(state),
            Value::Object(obj) => Rc::as_ptr(obj).cast::<()>().hash(state),
        }
    }
}

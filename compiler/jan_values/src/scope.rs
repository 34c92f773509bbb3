//! Lexical scopes.
//!
//! A scope maps names to values and points at one parent. Scopes form a
//! tree rooted at the builtin scope; blocks, calls and imports create
//! children and leave them again when they finish. A scope captured by a
//! function value outlives its construct: the function holds a shared
//! reference, and the scope lives as long as its longest holder.
//!
//! Resolution across the closure stack is the evaluator's job; this module
//! only offers single-scope and parent-chain lookups.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use jan_ir::{Location, Name};
use rustc_hash::FxHashMap;

use crate::Value;

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through [`LocalScope::new`]. The handle is not
/// `Send`: a scope tree belongs to the script process that built it.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakScope<T> {
        WeakScope(Rc::downgrade(&self.0))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f.debug_tuple("LocalScope").field(&*inner).finish(),
            Err(_) => f.write_str("LocalScope(<borrowed>)"),
        }
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Non-owning scope handle.
pub struct WeakScope<T>(Weak<RefCell<T>>);

impl<T> WeakScope<T> {
    pub fn upgrade(&self) -> Option<LocalScope<T>> {
        self.0.upgrade().map(LocalScope)
    }
}

pub type ScopeRef = LocalScope<Scope>;

/// One lexical environment.
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<ScopeRef>,
    location: Option<Location>,
    /// Sealed scopes (the builtin scope) refuse new bindings; the evaluator
    /// binds in the current scope instead and warns.
    sealed: bool,
}

impl Scope {
    fn new(parent: Option<ScopeRef>, location: Option<Location>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent,
            location,
            sealed: false,
        }
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.bindings.get(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn parent(&self) -> Option<&ScopeRef> {
        self.parent.as_ref()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.bindings.iter().map(|(name, value)| (*name, value))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.bindings.keys().map(|n| n.raw()).collect();
        names.sort_unstable();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("has_parent", &self.parent.is_some())
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl LocalScope<Scope> {
    /// A scope without parent.
    pub fn root() -> Self {
        LocalScope::new(Scope::new(None, None))
    }

    pub fn child(parent: &ScopeRef, location: Option<Location>) -> Self {
        LocalScope::new(Scope::new(Some(parent.clone()), location))
    }

    pub fn parent_scope(&self) -> Option<ScopeRef> {
        self.borrow().parent.clone()
    }

    /// Binding in this scope only.
    pub fn get_local(&self, name: Name) -> Option<Value> {
        self.borrow().bindings.get(&name).cloned()
    }

    /// Binding in this scope or the nearest ancestor that has one.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            let inner = scope.borrow();
            if let Some(value) = inner.bindings.get(&name) {
                return Some(value.clone());
            }
            current = inner.parent.clone();
        }
        None
    }

    /// The nearest scope on the parent chain binding `name`.
    pub fn owner_of(&self, name: Name) -> Option<ScopeRef> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            if scope.borrow().bindings.contains_key(&name) {
                return Some(scope);
            }
            current = scope.borrow().parent.clone();
        }
        None
    }

    /// Bind `name` here. A replaced value leaves scope, unless it is the
    /// very object being bound again.
    pub fn bind(&self, name: Name, value: Value) {
        let old = self.borrow_mut().bindings.insert(name, value.clone());
        if let Some(old) = old {
            if !old.identical(&value) {
                old.leave_scope();
            }
        }
    }

    pub fn remove(&self, name: Name) -> Option<Value> {
        self.borrow_mut().bindings.remove(&name)
    }

    pub fn seal(&self) {
        self.borrow_mut().sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.borrow().sealed
    }

    /// Run the leave-scope hook of every value bound here.
    ///
    /// Bindings stay in place: a closure created in this scope may still
    /// read them after the construct that opened the scope has finished.
    pub fn exit(&self) {
        let values: Vec<Value> = self.borrow().bindings.values().cloned().collect();
        for value in &values {
            value.leave_scope();
        }
    }

    /// Drop every binding. Used to break reference cycles between scopes
    /// and the function values stored in them once a run is over.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut self.borrow_mut().bindings);
        drop(bindings);
    }

    /// Depth below the root, for diagnostics.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent_scope();
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent_scope();
        }
        depth
    }
}

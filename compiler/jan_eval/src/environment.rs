//! The environment shared by every script process.
//!
//! An [`Environment`] is built once through [`EnvironmentBuilder`] and is
//! immutable afterwards. It owns the string interner, the dispatch
//! registry, the module registry, host globals and the run limits; script
//! processes on any number of threads read it through an `Arc`.
//!
//! Values are `Rc`-based and confined to one process, so the environment
//! never stores a [`Value`]. Host globals and module members are kept as
//! native functions or value factories and materialised into each
//! process's builtin scope.

use std::fmt;
use std::sync::Arc;

use jan_ir::{Name, SharedInterner, StringInterner};
use jan_values::{
    CallArgs, DispatchRegistry, DispatchTable, EvalResult, NativeFunction, ScopeRef, Value,
    ValueKind,
};
use rustc_hash::FxHashMap;

use crate::builtins;
use crate::limits::RunLimits;

/// Produces a fresh value for every script process.
pub type GlobalFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// A global or module member, as stored on the environment.
#[derive(Clone)]
enum Binding {
    Function(NativeFunction),
    Value(GlobalFactory),
}

impl Binding {
    fn materialize(&self) -> Value {
        match self {
            Binding::Function(func) => Value::Native(func.clone()),
            Binding::Value(factory) => factory(),
        }
    }
}

/// A host module, imported by scripts with `import name`.
#[derive(Clone)]
pub struct ModuleDef {
    name: Arc<str>,
    members: Vec<(String, Binding)>,
}

impl ModuleDef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ModuleDef {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a native function member.
    #[must_use]
    pub fn function(
        mut self,
        name: &str,
        func: impl Fn(&mut CallArgs<'_>) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        let qualified = format!("{}.{name}", self.name);
        self.members
            .push((name.to_owned(), Binding::Function(NativeFunction::new(qualified, func))));
        self
    }

    /// Add a value member, built fresh for every import.
    #[must_use]
    pub fn value(mut self, name: &str, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.members.push((name.to_owned(), Binding::Value(Arc::new(factory))));
        self
    }

    /// Member names, in registration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    /// A module value whose scope holds every member.
    pub(crate) fn instantiate(&self, interner: &StringInterner) -> Value {
        let scope = ScopeRef::root();
        for (name, binding) in &self.members {
            scope.bind(interner.intern(name), binding.materialize());
        }
        scope.seal();
        Value::module(Arc::clone(&self.name), scope)
    }
}

impl fmt::Debug for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDef")
            .field("name", &self.name)
            .field("members", &self.members.len())
            .finish()
    }
}

/// Everything a script process needs from its host, shared and read-only.
pub struct Environment {
    interner: SharedInterner,
    registry: DispatchRegistry,
    globals: Vec<(Name, Binding)>,
    modules: FxHashMap<Name, ModuleDef>,
    limits: RunLimits,
}

impl Environment {
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::new()
    }

    /// The builtin tables and globals, nothing from the host.
    pub fn standard() -> Arc<Environment> {
        EnvironmentBuilder::new().build()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn shared_interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn registry(&self) -> &DispatchRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &RunLimits {
        &self.limits
    }

    pub fn module(&self, name: Name) -> Option<&ModuleDef> {
        self.modules.get(&name)
    }

    /// A fresh builtin scope for one process: builtin functions and host
    /// globals, sealed against script assignment.
    pub(crate) fn builtin_scope(&self) -> ScopeRef {
        let scope = ScopeRef::root();
        for (name, binding) in &self.globals {
            scope.bind(*name, binding.materialize());
        }
        scope.seal();
        scope
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("globals", &self.globals.len())
            .field("modules", &self.modules.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Builder for an [`Environment`].
///
/// Starts out with the builtin dispatch tables and global functions; host
/// registrations are layered on top. A host global with a builtin's name
/// replaces the builtin.
pub struct EnvironmentBuilder {
    interner: SharedInterner,
    registry: DispatchRegistry,
    globals: Vec<(String, Binding)>,
    modules: Vec<ModuleDef>,
    limits: RunLimits,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        EnvironmentBuilder {
            interner: StringInterner::shared(),
            registry: builtins::registry(),
            globals: builtins::global_functions()
                .into_iter()
                .map(|func| (func.name().to_owned(), Binding::Function(func)))
                .collect(),
            modules: Vec::new(),
            limits: RunLimits::default(),
        }
    }

    /// Share an interner with other environments or a parser.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = interner;
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn global_function(
        mut self,
        name: &str,
        func: impl Fn(&mut CallArgs<'_>) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        self.globals
            .push((name.to_owned(), Binding::Function(NativeFunction::new(name, func))));
        self
    }

    /// A global value, created anew for every run.
    #[must_use]
    pub fn global_value(mut self, name: &str, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.globals.push((name.to_owned(), Binding::Value(Arc::new(factory))));
        self
    }

    #[must_use]
    pub fn module(mut self, module: ModuleDef) -> Self {
        self.modules.push(module);
        self
    }

    /// The builtin table for `kind`, for host tables that extend it.
    pub fn builtin_table(&self, kind: ValueKind) -> Arc<DispatchTable> {
        self.registry
            .builtin(kind)
            .map_or_else(|| Arc::clone(self.registry.root()), Arc::clone)
    }

    /// The root `object` table, the default parent of host tables.
    pub fn root_table(&self) -> Arc<DispatchTable> {
        Arc::clone(self.registry.root())
    }

    /// Register the dispatch table answering attribute lookups on host
    /// objects whose class name is `class_name`.
    #[must_use]
    pub fn host_type(mut self, class_name: &str, table: DispatchTable) -> Self {
        self.registry.register_host(class_name, Arc::new(table));
        self
    }

    pub fn build(self) -> Arc<Environment> {
        let interner = self.interner;
        let globals = self
            .globals
            .into_iter()
            .map(|(name, binding)| (interner.intern(&name), binding))
            .collect();
        let modules = self
            .modules
            .into_iter()
            .map(|module| (interner.intern(module.name()), module))
            .collect();
        tracing::debug!(limits = ?self.limits, "environment built");
        Arc::new(Environment {
            interner,
            registry: self.registry,
            globals,
            modules,
            limits: self.limits,
        })
    }
}

impl Default for EnvironmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

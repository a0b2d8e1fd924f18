//! Runtime Module - Shared Runtime and Per-Thread Evaluation Context
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! [`Runtime`] owns everything shared between evaluating threads: the
//! configuration, the symbol table and the method table. It is built once,
//! optionally extended with [`Runtime::define_method`], then wrapped in an
//! `Arc` and handed to every thread.
//!
//! [`Env`] is the per-thread side: it holds a handle to the runtime plus
//! state that belongs to one evaluation, which here is the last-match
//! register (`$~`). An `Env` is never shared between threads.
//!
//! ============================================================================
//! DISPATCH
//! ============================================================================
//!
//! ```text
//! send(receiver, name, args)
//!   ├── methods[(class of receiver, name)]   native method
//!   ├── methods[(Object, name)]              shared fallback
//!   ├── receiver is an object with field `name`       read attribute
//!   ├── receiver is an object, `name` ends in `=`     write attribute
//!   └── NoMethod
//! ```

use rustc_hash::FxHashMap;
use std::sync::Arc;

use garnet_util::{InternerStats, Symbol, SymbolTable};

use crate::args::Args;
use crate::builtins;
use crate::config::RuntimeConfig;
use crate::error::{ConfigError, RunError, RunResult};
use crate::proc_object::ProcObject;
use crate::value::Value;

/// A method implemented in Rust
pub type NativeMethod = fn(&mut Env, &Value, Args<'_>) -> RunResult<Value>;

/// Class used for the shared fallback table
pub const OBJECT_CLASS: &str = "Object";

/// Native methods keyed by (class name, method name)
#[derive(Default)]
pub struct MethodTable {
    methods: FxHashMap<(Symbol, Symbol), NativeMethod>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method`, replacing any previous definition
    pub fn define(&mut self, class: Symbol, name: Symbol, method: NativeMethod) {
        self.methods.insert((class, name), method);
    }

    pub fn get(&self, class: &Symbol, name: &Symbol) -> Option<NativeMethod> {
        self.methods.get(&(class.clone(), name.clone())).copied()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// State shared by every thread evaluating against one runtime
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    symbols: SymbolTable,
    methods: MethodTable,
    object_class: Symbol,
}

impl Runtime {
    /// Build a runtime with the builtin method set.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RuntimeConfig) -> Self {
        let mut symbols = if config.preintern_known_symbols {
            SymbolTable::with_known_symbols(config.symbol_capacity)
        } else {
            SymbolTable::with_capacity(config.symbol_capacity)
        };
        symbols.set_track_stats(config.track_interner_stats);
        let object_class = symbols.intern(OBJECT_CLASS);

        let mut runtime = Self {
            config,
            symbols,
            methods: MethodTable::new(),
            object_class,
        };
        builtins::register(&mut runtime);
        log::debug!(
            "runtime ready: {} methods, {} symbols",
            runtime.methods.len(),
            runtime.symbols.len()
        );
        runtime
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    /// Snapshot of every interned symbol (`Symbol.all_symbols`)
    pub fn all_symbols(&self) -> Vec<Symbol> {
        self.symbols.all_symbols()
    }

    pub fn interner_stats(&self) -> InternerStats {
        self.symbols.stats()
    }

    /// Define `name` on `class`. Only possible before the runtime is shared.
    pub fn define_method(&mut self, class: &str, name: &str, method: NativeMethod) {
        let class = self.symbols.intern(class);
        let name = self.symbols.intern(name);
        self.methods.define(class, name, method);
    }

    /// Class symbol for a value
    pub fn class_of(&self, value: &Value) -> Symbol {
        match value {
            Value::Object(object) => object.class().clone(),
            other => self.symbols.intern(other.class_name()),
        }
    }

    /// Method `name` for `receiver`, falling back to the `Object` table
    pub fn find_method(&self, receiver: &Value, name: &Symbol) -> Option<NativeMethod> {
        let class = self.class_of(receiver);
        self.methods
            .get(&class, name)
            .or_else(|| self.methods.get(&self.object_class, name))
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::build(RuntimeConfig::default())
    }
}

static_assertions::assert_impl_all!(Runtime: Send, Sync);

/// Per-thread evaluation context
#[derive(Debug, Clone)]
pub struct Env {
    runtime: Arc<Runtime>,
    last_match: Value,
}

impl Env {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            last_match: Value::Nil,
        }
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.runtime.intern(name)
    }

    /// The last-match register (`$~`)
    pub fn last_match(&self) -> &Value {
        &self.last_match
    }

    pub fn set_last_match(&mut self, value: Value) {
        self.last_match = value;
    }

    /// Send `name` to `receiver`.
    pub fn send(&mut self, receiver: &Value, name: &Symbol, args: Args<'_>) -> RunResult<Value> {
        if let Some(method) = self.runtime.find_method(receiver, name) {
            return method(self, receiver, args);
        }

        if let Value::Object(object) = receiver {
            if object.has_field(name) {
                args.ensure_argc_is(0)?;
                return Ok(object.get(name).unwrap_or_default());
            }
            if let Some(field) = name.as_str().strip_suffix('=') {
                if !field.is_empty() {
                    args.ensure_argc_is(1)?;
                    let value = args.at(0).clone();
                    object.set(self.intern(field), value.clone());
                    return Ok(value);
                }
            }
        }

        log::debug!("no method '{}' for {}", name, receiver.class_name());
        Err(RunError::NoMethod {
            name: name.as_str().to_string(),
            class: receiver.class_name().to_string(),
        })
    }

    pub fn send_str(&mut self, receiver: &Value, name: &str, args: Args<'_>) -> RunResult<Value> {
        let name = self.intern(name);
        self.send(receiver, &name, args)
    }

    /// Whether `send(receiver, name, ..)` would find a method or attribute
    pub fn respond_to(&self, receiver: &Value, name: &Symbol) -> bool {
        if self.runtime.find_method(receiver, name).is_some() {
            return true;
        }
        match receiver {
            Value::Object(object) => object.has_field(name),
            _ => false,
        }
    }

    pub fn respond_to_str(&self, receiver: &Value, name: &str) -> bool {
        let name = self.intern(name);
        self.respond_to(receiver, &name)
    }

    /// Invoke a proc with `args`
    pub fn call_proc(&mut self, proc_object: &ProcObject, args: Args<'_>) -> RunResult<Value> {
        proc_object.call(self, args)
    }
}

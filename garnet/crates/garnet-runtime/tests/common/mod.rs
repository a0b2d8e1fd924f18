//! Shared fixtures for the runtime integration tests.

#![allow(dead_code)]

use garnet_runtime::{Env, RObject, Runtime, RuntimeConfig, Value};
use std::sync::Arc;

/// A runtime and one env bound to it
pub struct RuntimeFixture {
    pub runtime: Arc<Runtime>,
    pub env: Env,
}

impl RuntimeFixture {
    pub fn with_defaults() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let runtime = Arc::new(Runtime::new(config).expect("fixture config is valid"));
        let env = Env::new(Arc::clone(&runtime));
        Self { runtime, env }
    }

    /// A fresh env on the same runtime, as another thread would have
    pub fn new_env(&self) -> Env {
        Env::new(Arc::clone(&self.runtime))
    }

    pub fn sym(&self, name: &str) -> Value {
        Value::Symbol(self.runtime.intern(name))
    }

    /// Plain attribute object of class `class`
    pub fn object(&self, class: &str, fields: &[(&str, Value)]) -> Value {
        let fields = fields
            .iter()
            .map(|(name, value)| (self.runtime.intern(name), value.clone()));
        Value::object(RObject::with_fields(self.runtime.intern(class), fields))
    }
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Integer).collect()
}

//! garnet-runtime - Object Model and Core Methods
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! The dynamic half of Garnet: values, message dispatch, and the native
//! methods behind `Symbol`, `String`, `Proc`, and friends.
//!
//! - [`runtime`]: the shared [`Runtime`] (symbol table, method table, config)
//!   and the per-thread [`Env`] that sends messages
//! - [`value`]: the [`Value`] enum and plain attribute objects
//! - [`args`]: borrowed argument lists and block parameter binding
//! - [`coerce`]: the `to_ary` / `to_str` / `to_int` implicit conversions
//! - [`proc_object`]: callable procs, including `Symbol#to_proc`
//! - [`builtins`]: native method implementations, one module per class
//! - `etc`: user, group, and system configuration lookups (unix only)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use garnet_runtime::{Args, Env, Runtime, Value};
//!
//! let runtime = Arc::new(Runtime::default());
//! let mut env = Env::new(runtime);
//!
//! let name = Value::Symbol(env.intern("upcase"));
//! let upcase = env.send_str(&name, "to_proc", Args::empty()).unwrap();
//!
//! let input = [Value::string("abc")];
//! let result = env.send_str(&upcase, "call", Args::positional(&input)).unwrap();
//! assert_eq!(result, Value::string("ABC"));
//! ```
//
// ============================================================================
// THREADING
// ============================================================================
//
// `Runtime` is immutable after construction apart from its symbol table,
// which is safe to intern into from any thread. Share it behind an `Arc`.
//
// `Env` is not shared. It carries per-thread interpreter state, currently
// just the last regexp match (`$~`), and is what every native method
// receives as its first argument.

pub mod args;
pub mod builtins;
pub mod coerce;
pub mod config;
pub mod error;
#[cfg(unix)]
pub mod etc;
pub mod match_data;
pub mod proc_object;
pub mod runtime;
pub mod value;

pub use args::Args;
pub use config::{RuntimeConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, ErrorKind, ExpectedArity, RunError, RunResult};
pub use match_data::MatchData;
pub use proc_object::{Block, ProcBody, ProcObject};
pub use runtime::{Env, MethodTable, NativeMethod, Runtime, OBJECT_CLASS};
pub use value::{RObject, Value};

pub use garnet_util::{Symbol, SymbolTable};

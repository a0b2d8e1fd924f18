//! Builtin method set.
//!
//! Each submodule exposes its operations as plain Rust functions and
//! registers thin dispatch wrappers for them in [`register`].

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{RunError, RunResult};
use crate::runtime::Runtime;
use crate::value::Value;

pub mod array;
pub mod hash;
pub mod match_data;
pub mod numeric;
pub mod object;
pub mod proc;
pub mod string;
pub mod symbol;

pub(crate) fn register(runtime: &mut Runtime) {
    object::register(runtime);
    numeric::register(runtime);
    string::register(runtime);
    symbol::register(runtime);
    array::register(runtime);
    hash::register(runtime);
    proc::register(runtime);
    match_data::register(runtime);
    #[cfg(unix)]
    crate::etc::register(runtime);
}

/// `<=>` result as an integer value
pub(crate) fn ordering_value(ordering: Ordering) -> Value {
    Value::Integer(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

pub(crate) fn wrong_argument_type(value: &Value, expected: &str) -> RunError {
    RunError::TypeMismatch(format!(
        "wrong argument type {} (expected {})",
        value.class_name(),
        expected
    ))
}

pub(crate) fn expect_string(value: &Value) -> RunResult<&Arc<str>> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(wrong_argument_type(other, "String")),
    }
}

/// Resolve a possibly negative index against `len`
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

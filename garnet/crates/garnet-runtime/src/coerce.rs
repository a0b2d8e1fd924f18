//! Implicit conversion protocols (`to_ary`, `to_str`, `to_int`).
//!
//! Each conversion accepts the target type directly, otherwise asks the
//! value through dispatch and checks the shape of the answer.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::args::Args;
use crate::error::{RunError, RunResult};
use crate::runtime::Env;
use crate::value::{ArrayRef, Value};

fn bad_conversion(value: &Value, result: &Value, into: &str, method: &str) -> RunError {
    let class = value.class_name();
    RunError::TypeMismatch(format!(
        "can't convert {} to {} ({}#{} gives {})",
        class,
        into,
        class,
        method,
        result.class_name()
    ))
}

/// Convert `value` to an array.
///
/// Arrays pass through unchanged (same storage). A value answering `to_ary`
/// is converted; a `nil` answer, or no `to_ary` at all, wraps the value in
/// a new one-element array. Any other answer raises when
/// `raise_for_non_array` is set and is wrapped otherwise.
pub fn to_ary(env: &mut Env, value: &Value, raise_for_non_array: bool) -> RunResult<ArrayRef> {
    if let Value::Array(array) = value {
        return Ok(Arc::clone(array));
    }

    let wrap = || Arc::new(RwLock::new(vec![value.clone()]));
    if !env.respond_to_str(value, "to_ary") {
        return Ok(wrap());
    }

    let result = env.send_str(value, "to_ary", Args::empty())?;
    match result {
        Value::Array(array) => Ok(array),
        Value::Nil => Ok(wrap()),
        other if raise_for_non_array => Err(bad_conversion(value, &other, "Array", "to_ary")),
        _ => Ok(wrap()),
    }
}

/// Convert `value` to a string through `to_str`.
pub fn to_str(env: &mut Env, value: &Value) -> RunResult<Arc<str>> {
    if let Value::String(s) = value {
        return Ok(Arc::clone(s));
    }

    if !env.respond_to_str(value, "to_str") {
        return Err(RunError::no_implicit_conversion(&implicit_name(value), "String"));
    }

    match env.send_str(value, "to_str", Args::empty())? {
        Value::String(s) => Ok(s),
        other => Err(bad_conversion(value, &other, "String", "to_str")),
    }
}

/// Convert `value` to an integer through `to_int`.
pub fn to_int(env: &mut Env, value: &Value) -> RunResult<i64> {
    match value {
        Value::Integer(n) => return Ok(*n),
        Value::Nil => {
            return Err(RunError::TypeMismatch(
                "no implicit conversion from nil to integer".to_string(),
            ))
        }
        _ => {}
    }

    if !env.respond_to_str(value, "to_int") {
        return Err(RunError::no_implicit_conversion(&implicit_name(value), "Integer"));
    }

    match env.send_str(value, "to_int", Args::empty())? {
        Value::Integer(n) => Ok(n),
        other => Err(bad_conversion(value, &other, "Integer", "to_int")),
    }
}

/// How a value is named in "no implicit conversion" messages
fn implicit_name(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.class_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;

    fn env() -> Env {
        Env::new(Arc::new(Runtime::default()))
    }

    #[test]
    fn test_to_ary_passes_arrays_through() {
        let mut env = env();
        let array = Value::array(vec![Value::Integer(1)]);
        let converted = to_ary(&mut env, &array, true).unwrap();
        assert!(Arc::ptr_eq(&converted, array.as_array().unwrap()));
    }

    #[test]
    fn test_to_ary_wraps_other_values() {
        let mut env = env();
        let converted = to_ary(&mut env, &Value::Integer(3), true).unwrap();
        assert_eq!(*converted.read(), vec![Value::Integer(3)]);
    }

    #[test]
    fn test_to_str() {
        let mut env = env();
        assert_eq!(&*to_str(&mut env, &Value::string("abc")).unwrap(), "abc");

        let err = to_str(&mut env, &Value::Integer(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatchError);
        assert_eq!(err.to_string(), "no implicit conversion of Integer into String");

        let err = to_str(&mut env, &Value::Nil).unwrap_err();
        assert_eq!(err.to_string(), "no implicit conversion of nil into String");
    }

    #[test]
    fn test_to_int() {
        let mut env = env();
        assert_eq!(to_int(&mut env, &Value::Integer(-4)).unwrap(), -4);
        assert_eq!(to_int(&mut env, &Value::Float(2.9)).unwrap(), 2);

        let err = to_int(&mut env, &Value::Nil).unwrap_err();
        assert_eq!(err.to_string(), "no implicit conversion from nil to integer");

        let err = to_int(&mut env, &Value::string("1")).unwrap_err();
        assert_eq!(err.to_string(), "no implicit conversion of String into Integer");
    }
}

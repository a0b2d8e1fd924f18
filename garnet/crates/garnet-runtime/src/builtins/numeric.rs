//! Integer and Float methods used by conversions and by `Symbol#to_proc`
//! callers.

use crate::args::Args;
use crate::builtins::ordering_value;
use crate::error::{RunError, RunResult};
use crate::runtime::{Env, Runtime};
use crate::value::{float_to_s, Value};

fn coerce_failure(value: &Value, into: &str) -> RunError {
    let name = match value {
        Value::Nil => "nil".to_string(),
        other => other.class_name().to_string(),
    };
    RunError::TypeMismatch(format!("{} can't be coerced into {}", name, into))
}

fn int_receiver(value: &Value) -> RunResult<i64> {
    value
        .as_integer()
        .ok_or_else(|| crate::builtins::wrong_argument_type(value, "Integer"))
}

fn int_to_s(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::from(int_receiver(receiver)?.to_string()))
}

fn int_to_i(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    int_receiver(receiver)?;
    Ok(receiver.clone())
}

fn int_succ(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    let n = int_receiver(receiver)?;
    n.checked_add(1)
        .map(Value::Integer)
        .ok_or_else(|| RunError::Argument("integer overflow".to_string()))
}

fn int_plus(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let n = int_receiver(receiver)?;
    match args.at(0) {
        Value::Integer(m) => n
            .checked_add(*m)
            .map(Value::Integer)
            .ok_or_else(|| RunError::Argument("integer overflow".to_string())),
        Value::Float(f) => Ok(Value::Float(n as f64 + f)),
        other => Err(coerce_failure(other, "Integer")),
    }
}

fn int_minus(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let n = int_receiver(receiver)?;
    match args.at(0) {
        Value::Integer(m) => n
            .checked_sub(*m)
            .map(Value::Integer)
            .ok_or_else(|| RunError::Argument("integer overflow".to_string())),
        Value::Float(f) => Ok(Value::Float(n as f64 - f)),
        other => Err(coerce_failure(other, "Integer")),
    }
}

fn int_eq(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let n = int_receiver(receiver)?;
    Ok(Value::Bool(match args.at(0) {
        Value::Integer(m) => n == *m,
        Value::Float(f) => n as f64 == *f,
        _ => false,
    }))
}

fn int_cmp(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let n = int_receiver(receiver)?;
    Ok(match args.at(0) {
        Value::Integer(m) => ordering_value(n.cmp(m)),
        Value::Float(f) => (n as f64).partial_cmp(f).map_or(Value::Nil, ordering_value),
        _ => Value::Nil,
    })
}

fn float_receiver(value: &Value) -> RunResult<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        other => Err(crate::builtins::wrong_argument_type(other, "Float")),
    }
}

fn flo_to_s(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::from(float_to_s(float_receiver(receiver)?)))
}

/// `Float#to_i`: truncation toward zero
fn flo_to_i(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    let f = float_receiver(receiver)?;
    if !f.is_finite() {
        return Err(RunError::Argument(format!("{} out of range of integer", float_to_s(f))));
    }
    if f >= i64::MAX as f64 || f < i64::MIN as f64 {
        return Err(RunError::Argument(format!("{} out of range of integer", float_to_s(f))));
    }
    Ok(Value::Integer(f.trunc() as i64))
}

fn flo_eq(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let f = float_receiver(receiver)?;
    Ok(Value::Bool(match args.at(0) {
        Value::Float(g) => f == *g,
        Value::Integer(n) => f == *n as f64,
        _ => false,
    }))
}

pub(crate) fn register(runtime: &mut Runtime) {
    runtime.define_method("Integer", "to_s", int_to_s);
    runtime.define_method("Integer", "inspect", int_to_s);
    runtime.define_method("Integer", "to_i", int_to_i);
    runtime.define_method("Integer", "to_int", int_to_i);
    runtime.define_method("Integer", "succ", int_succ);
    runtime.define_method("Integer", "next", int_succ);
    runtime.define_method("Integer", "+", int_plus);
    runtime.define_method("Integer", "-", int_minus);
    runtime.define_method("Integer", "==", int_eq);
    runtime.define_method("Integer", "<=>", int_cmp);

    runtime.define_method("Float", "to_s", flo_to_s);
    runtime.define_method("Float", "inspect", flo_to_s);
    runtime.define_method("Float", "to_i", flo_to_i);
    runtime.define_method("Float", "to_int", flo_to_i);
    runtime.define_method("Float", "==", flo_eq);
}

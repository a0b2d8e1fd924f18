//! Array methods needed by the conversion protocols and block binding.

use crate::args::Args;
use crate::builtins::{normalize_index, wrong_argument_type};
use crate::coerce;
use crate::error::RunResult;
use crate::runtime::{Env, Runtime};
use crate::value::{ArrayRef, Value};

fn expect_array(value: &Value) -> RunResult<&ArrayRef> {
    value
        .as_array()
        .ok_or_else(|| wrong_argument_type(value, "Array"))
}

fn ary_to_ary(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    expect_array(receiver)?;
    Ok(receiver.clone())
}

fn ary_size(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Integer(expect_array(receiver)?.read().len() as i64))
}

fn ary_ref(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let array = expect_array(receiver)?;
    let index = coerce::to_int(env, args.at(0))?;
    let items = array.read();
    Ok(normalize_index(index, items.len())
        .map(|i| items[i].clone())
        .unwrap_or_default())
}

fn ary_first(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(expect_array(receiver)?.read().first().cloned().unwrap_or_default())
}

fn ary_last(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(expect_array(receiver)?.read().last().cloned().unwrap_or_default())
}

/// Shallow copy with new storage
fn ary_dup(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    let items = expect_array(receiver)?.read().clone();
    Ok(Value::array(items))
}

fn ary_push(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    expect_array(receiver)?.write().extend(args.iter().cloned());
    Ok(receiver.clone())
}

fn ary_eq(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    expect_array(receiver)?;
    Ok(Value::Bool(receiver == args.at(0)))
}

pub(crate) fn register(runtime: &mut Runtime) {
    const CLASS: &str = "Array";
    runtime.define_method(CLASS, "to_ary", ary_to_ary);
    runtime.define_method(CLASS, "to_a", ary_to_ary);
    runtime.define_method(CLASS, "size", ary_size);
    runtime.define_method(CLASS, "length", ary_size);
    runtime.define_method(CLASS, "[]", ary_ref);
    runtime.define_method(CLASS, "first", ary_first);
    runtime.define_method(CLASS, "last", ary_last);
    runtime.define_method(CLASS, "dup", ary_dup);
    runtime.define_method(CLASS, "push", ary_push);
    runtime.define_method(CLASS, "<<", ary_push);
    runtime.define_method(CLASS, "==", ary_eq);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_indexing() {
        let mut env = Env::new(Arc::new(Runtime::default()));
        let array = Value::array(vec![1.into(), 2.into(), 3.into()]);
        let index = [Value::Integer(-1)];
        assert_eq!(
            env.send_str(&array, "[]", Args::positional(&index)).unwrap(),
            Value::Integer(3)
        );
        let index = [Value::Integer(9)];
        assert_eq!(env.send_str(&array, "[]", Args::positional(&index)).unwrap(), Value::Nil);
        assert_eq!(env.send_str(&array, "first", Args::empty()).unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_dup_has_new_storage() {
        let mut env = Env::new(Arc::new(Runtime::default()));
        let array = Value::array(vec![1.into()]);
        let copy = env.send_str(&array, "dup", Args::empty()).unwrap();
        let more = [Value::Integer(2)];
        env.send_str(&copy, "push", Args::positional(&more)).unwrap();
        assert_eq!(env.send_str(&array, "size", Args::empty()).unwrap(), Value::Integer(1));
        assert_eq!(env.send_str(&copy, "size", Args::empty()).unwrap(), Value::Integer(2));
    }
}

//! Hash methods; keyword hashes are ordinary hashes with symbol keys.

use crate::args::Args;
use crate::builtins::wrong_argument_type;
use crate::error::RunResult;
use crate::runtime::{Env, Runtime};
use crate::value::{HashRef, Value};

fn expect_hash(value: &Value) -> RunResult<&HashRef> {
    value
        .as_hash()
        .ok_or_else(|| wrong_argument_type(value, "Hash"))
}

/// `[]`: the stored value, `nil` for a missing key
fn hash_ref(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let hash = expect_hash(receiver)?;
    let value = hash.read().get(args.at(0)).cloned();
    Ok(value.unwrap_or_default())
}

fn hash_set(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(2)?;
    let value = args.at(1).clone();
    expect_hash(receiver)?
        .write()
        .insert(args.at(0).clone(), value.clone());
    Ok(value)
}

fn hash_has_key(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let found = expect_hash(receiver)?.read().contains_key(args.at(0));
    Ok(Value::Bool(found))
}

fn hash_size(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Integer(expect_hash(receiver)?.read().len() as i64))
}

fn hash_keys(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    let keys = expect_hash(receiver)?.read().keys().cloned().collect();
    Ok(Value::array(keys))
}

fn hash_values(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    let values = expect_hash(receiver)?.read().values().cloned().collect();
    Ok(Value::array(values))
}

fn hash_eq(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    expect_hash(receiver)?;
    Ok(Value::Bool(receiver == args.at(0)))
}

pub(crate) fn register(runtime: &mut Runtime) {
    const CLASS: &str = "Hash";
    runtime.define_method(CLASS, "[]", hash_ref);
    runtime.define_method(CLASS, "[]=", hash_set);
    runtime.define_method(CLASS, "key?", hash_has_key);
    runtime.define_method(CLASS, "has_key?", hash_has_key);
    runtime.define_method(CLASS, "include?", hash_has_key);
    runtime.define_method(CLASS, "size", hash_size);
    runtime.define_method(CLASS, "length", hash_size);
    runtime.define_method(CLASS, "keys", hash_keys);
    runtime.define_method(CLASS, "values", hash_values);
    runtime.define_method(CLASS, "==", hash_eq);
}

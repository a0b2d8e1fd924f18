//! Methods every value answers through the `Object` fallback table.

use crate::args::Args;
use crate::error::RunResult;
use crate::runtime::{Env, Runtime, OBJECT_CLASS};
use crate::value::Value;

fn obj_inspect(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::from(receiver.inspect()))
}

fn obj_to_s(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::from(receiver.to_display()))
}

fn obj_equal(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    Ok(Value::Bool(receiver.same(args.at(0))))
}

fn obj_not_equal(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let equal = env.send_str(receiver, "==", args)?;
    Ok(Value::Bool(!equal.is_truthy()))
}

fn obj_is_nil(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Bool(receiver.is_nil()))
}

fn obj_respond_to(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_between(1, 2)?;
    let name = match args.at(0) {
        Value::Symbol(sym) => sym.clone(),
        Value::String(s) => env.intern(s),
        other => {
            return Err(crate::error::RunError::TypeMismatch(format!(
                "{} is not a symbol nor a string",
                other.inspect()
            )))
        }
    };
    Ok(Value::Bool(env.respond_to(receiver, &name)))
}

pub(crate) fn register(runtime: &mut Runtime) {
    runtime.define_method(OBJECT_CLASS, "inspect", obj_inspect);
    runtime.define_method(OBJECT_CLASS, "to_s", obj_to_s);
    runtime.define_method(OBJECT_CLASS, "==", obj_equal);
    runtime.define_method(OBJECT_CLASS, "equal?", obj_equal);
    runtime.define_method(OBJECT_CLASS, "!=", obj_not_equal);
    runtime.define_method(OBJECT_CLASS, "nil?", obj_is_nil);
    runtime.define_method(OBJECT_CLASS, "respond_to?", obj_respond_to);
}

//! Proc methods.

use std::sync::Arc;

use crate::args::Args;
use crate::builtins::wrong_argument_type;
use crate::error::RunResult;
use crate::proc_object::ProcObject;
use crate::runtime::{Env, Runtime};
use crate::value::Value;

fn expect_proc(value: &Value) -> RunResult<&Arc<ProcObject>> {
    match value {
        Value::Proc(p) => Ok(p),
        other => Err(wrong_argument_type(other, "Proc")),
    }
}

fn proc_call(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let proc_object = Arc::clone(expect_proc(receiver)?);
    env.call_proc(&proc_object, args)
}

fn proc_arity(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Integer(expect_proc(receiver)?.arity()))
}

fn proc_is_lambda(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Bool(expect_proc(receiver)?.is_lambda()))
}

fn proc_to_proc(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    expect_proc(receiver)?;
    Ok(receiver.clone())
}

pub(crate) fn register(runtime: &mut Runtime) {
    const CLASS: &str = "Proc";
    runtime.define_method(CLASS, "call", proc_call);
    runtime.define_method(CLASS, "yield", proc_call);
    runtime.define_method(CLASS, "[]", proc_call);
    runtime.define_method(CLASS, "arity", proc_arity);
    runtime.define_method(CLASS, "lambda?", proc_is_lambda);
    runtime.define_method(CLASS, "to_proc", proc_to_proc);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc_object::Block;

    #[test]
    fn test_call_through_dispatch() {
        let mut env = Env::new(Arc::new(Runtime::default()));
        let block = Block::new(1, Some(1), false, |_env, params| Ok(params[0].clone()));
        let value = Value::proc(ProcObject::from_block(block));

        let args = [Value::Integer(7), Value::Integer(8)];
        assert_eq!(
            env.send_str(&value, "call", Args::positional(&args)).unwrap(),
            Value::Integer(7)
        );
        assert_eq!(env.send_str(&value, "arity", Args::empty()).unwrap(), Value::Integer(1));
        assert_eq!(
            env.send_str(&value, "lambda?", Args::empty()).unwrap(),
            Value::Bool(false)
        );
    }
}

//! MatchData methods, for reading `$~` after a symbol or string match.

use std::sync::Arc;

use crate::args::Args;
use crate::builtins::wrong_argument_type;
use crate::coerce;
use crate::error::{RunError, RunResult};
use crate::match_data::MatchData;
use crate::runtime::{Env, Runtime};
use crate::value::Value;

fn expect_match(value: &Value) -> RunResult<&Arc<MatchData>> {
    match value {
        Value::MatchData(m) => Ok(m),
        other => Err(wrong_argument_type(other, "MatchData")),
    }
}

fn optional_string(text: Option<&str>) -> Value {
    text.map_or(Value::Nil, Value::string)
}

fn md_ref(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let m = expect_match(receiver)?;
    match args.at(0) {
        Value::String(name) => Ok(optional_string(m.named(name))),
        Value::Symbol(name) => Ok(optional_string(m.named(name.as_str()))),
        index => {
            let index = coerce::to_int(env, index)?;
            let index = if index < 0 { index + m.len() as i64 } else { index };
            Ok(optional_string(usize::try_from(index).ok().and_then(|i| m.get(i))))
        }
    }
}

fn md_to_s(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::string(expect_match(receiver)?.matched()))
}

fn md_pre_match(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::string(expect_match(receiver)?.pre_match()))
}

fn md_post_match(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::string(expect_match(receiver)?.post_match()))
}

fn md_captures(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    let captures = expect_match(receiver)?
        .captures()
        .into_iter()
        .map(optional_string)
        .collect();
    Ok(Value::array(captures))
}

fn md_begin(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let m = expect_match(receiver)?;
    let index = coerce::to_int(env, args.at(0))?;
    let group = usize::try_from(index)
        .ok()
        .filter(|i| *i < m.len())
        .ok_or_else(|| RunError::Argument(format!("index {} out of matches", index)))?;
    Ok(m.begin(group)
        .map_or(Value::Nil, |offset| Value::Integer(offset as i64)))
}

pub(crate) fn register(runtime: &mut Runtime) {
    const CLASS: &str = "MatchData";
    runtime.define_method(CLASS, "[]", md_ref);
    runtime.define_method(CLASS, "to_s", md_to_s);
    runtime.define_method(CLASS, "pre_match", md_pre_match);
    runtime.define_method(CLASS, "post_match", md_post_match);
    runtime.define_method(CLASS, "captures", md_captures);
    runtime.define_method(CLASS, "begin", md_begin);
}

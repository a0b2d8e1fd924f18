//! Symbol methods.
//!
//! Comparison, display and conversion work directly on [`Symbol`]. The
//! derived-name operations (`succ`, `upcase`, ...) go through the string
//! form and dispatch, so whatever `String` does for them is what a symbol
//! does, and the result is interned back into the runtime's table.

use std::sync::Arc;

use garnet_util::Symbol;

use crate::args::Args;
use crate::builtins::{ordering_value, string, wrong_argument_type};
use crate::error::{RunError, RunResult};
use crate::proc_object::ProcObject;
use crate::runtime::{Env, Runtime};
use crate::value::Value;

/// A new string with the symbol's name (`to_s`, `id2name`)
pub fn to_s(symbol: &Symbol) -> Value {
    Value::string(symbol.as_str())
}

/// The cached string form (`name`); the same string on every call
pub fn name(symbol: &Symbol) -> Value {
    Value::String(symbol.name_as_string())
}

pub fn inspect(symbol: &Symbol) -> Value {
    Value::from(symbol.inspect())
}

pub fn length(symbol: &Symbol) -> Value {
    Value::Integer(symbol.char_len() as i64)
}

/// `<=>`: byte order of the names, `nil` against a non-symbol
pub fn cmp(symbol: &Symbol, other: &Value) -> Value {
    match other {
        Value::Symbol(other) => ordering_value(symbol.cmp_name(other)),
        _ => Value::Nil,
    }
}

/// `casecmp`: ASCII case-insensitive order, `nil` against a non-symbol
pub fn casecmp(symbol: &Symbol, other: &Value) -> Value {
    match other {
        Value::Symbol(other) => ordering_value(symbol.casecmp(other)),
        _ => Value::Nil,
    }
}

/// `casecmp?`: ASCII case-insensitive equality, `nil` against a non-symbol
pub fn is_casecmp(symbol: &Symbol, other: &Value) -> Value {
    match other {
        Value::Symbol(other) => Value::Bool(symbol.casecmp_eq(other)),
        _ => Value::Nil,
    }
}

/// A lambda sending this symbol's name to its first argument
pub fn to_proc(symbol: &Symbol) -> Value {
    Value::proc(ProcObject::from_symbol(symbol.clone()))
}

/// Send `method` to the string form and intern the answer
fn transform(env: &mut Env, symbol: &Symbol, method: &str, args: Args<'_>) -> RunResult<Symbol> {
    let result = env.send_str(&to_s(symbol), method, args)?;
    match result {
        Value::String(s) => Ok(env.intern(&s)),
        other => Err(RunError::TypeMismatch(format!(
            "String#{} returned {} instead of a String",
            method,
            other.class_name()
        ))),
    }
}

pub fn succ(env: &mut Env, symbol: &Symbol) -> RunResult<Symbol> {
    transform(env, symbol, "succ", Args::empty())
}

pub fn upcase(env: &mut Env, symbol: &Symbol) -> RunResult<Symbol> {
    transform(env, symbol, "upcase", Args::empty())
}

pub fn downcase(env: &mut Env, symbol: &Symbol) -> RunResult<Symbol> {
    transform(env, symbol, "downcase", Args::empty())
}

pub fn swapcase(env: &mut Env, symbol: &Symbol) -> RunResult<Symbol> {
    transform(env, symbol, "swapcase", Args::empty())
}

pub fn capitalize(env: &mut Env, symbol: &Symbol) -> RunResult<Symbol> {
    transform(env, symbol, "capitalize", Args::empty())
}

pub fn start_with(env: &mut Env, symbol: &Symbol, args: Args<'_>) -> RunResult<bool> {
    string::start_with(env, &symbol.name_as_string(), args)
}

pub fn end_with(env: &mut Env, symbol: &Symbol, args: Args<'_>) -> RunResult<bool> {
    string::end_with(env, &symbol.name_as_string(), args)
}

/// `[]`: the string form's `[]`, called directly so that a regexp index
/// updates the last-match register
pub fn ref_(env: &mut Env, symbol: &Symbol, index: &Value, length: Option<&Value>) -> RunResult<Value> {
    let text: Arc<str> = Arc::from(symbol.as_str());
    string::ref_(env, &text, index, length)
}

/// `=~`: only a regexp operand is accepted
pub fn match_operator(env: &mut Env, symbol: &Symbol, other: &Value) -> RunResult<Value> {
    if !matches!(other, Value::Regexp(_)) {
        return Err(wrong_argument_type(other, "Regexp"));
    }
    string::match_operator(env, &symbol.name_as_string(), other)
}

fn expect_symbol(value: &Value) -> RunResult<&Symbol> {
    value
        .as_symbol()
        .ok_or_else(|| wrong_argument_type(value, "Symbol"))
}

fn sym_to_s(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(to_s(expect_symbol(receiver)?))
}

fn sym_name(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(name(expect_symbol(receiver)?))
}

fn sym_inspect(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(inspect(expect_symbol(receiver)?))
}

fn sym_to_sym(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    expect_symbol(receiver)?;
    Ok(receiver.clone())
}

fn sym_to_proc(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(to_proc(expect_symbol(receiver)?))
}

fn sym_length(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(length(expect_symbol(receiver)?))
}

fn sym_cmp(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    Ok(cmp(expect_symbol(receiver)?, args.at(0)))
}

fn sym_eq(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let symbol = expect_symbol(receiver)?;
    Ok(Value::Bool(args.at(0).as_symbol() == Some(symbol)))
}

fn sym_casecmp(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    Ok(casecmp(expect_symbol(receiver)?, args.at(0)))
}

fn sym_is_casecmp(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    Ok(is_casecmp(expect_symbol(receiver)?, args.at(0)))
}

/// Dispatch wrapper for the derived-name operations; options such as
/// `:ascii` are forwarded to the string method.
macro_rules! derived_name {
    ($fn_name:ident, $method:literal) => {
        fn $fn_name(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
            let symbol = expect_symbol(receiver)?;
            Ok(Value::Symbol(transform(env, symbol, $method, args)?))
        }
    };
}

derived_name!(sym_succ, "succ");
derived_name!(sym_upcase, "upcase");
derived_name!(sym_downcase, "downcase");
derived_name!(sym_swapcase, "swapcase");
derived_name!(sym_capitalize, "capitalize");

fn sym_start_with(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    Ok(Value::Bool(start_with(env, expect_symbol(receiver)?, args)?))
}

fn sym_end_with(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    Ok(Value::Bool(end_with(env, expect_symbol(receiver)?, args)?))
}

fn sym_ref(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_between(1, 2)?;
    ref_(env, expect_symbol(receiver)?, args.at(0), args.get(1))
}

fn sym_match_operator(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    match_operator(env, expect_symbol(receiver)?, args.at(0))
}

pub(crate) fn register(runtime: &mut Runtime) {
    const CLASS: &str = "Symbol";
    runtime.define_method(CLASS, "to_s", sym_to_s);
    runtime.define_method(CLASS, "id2name", sym_to_s);
    runtime.define_method(CLASS, "name", sym_name);
    runtime.define_method(CLASS, "inspect", sym_inspect);
    runtime.define_method(CLASS, "to_sym", sym_to_sym);
    runtime.define_method(CLASS, "to_proc", sym_to_proc);
    runtime.define_method(CLASS, "length", sym_length);
    runtime.define_method(CLASS, "size", sym_length);
    runtime.define_method(CLASS, "<=>", sym_cmp);
    runtime.define_method(CLASS, "==", sym_eq);
    runtime.define_method(CLASS, "casecmp", sym_casecmp);
    runtime.define_method(CLASS, "casecmp?", sym_is_casecmp);
    runtime.define_method(CLASS, "succ", sym_succ);
    runtime.define_method(CLASS, "next", sym_succ);
    runtime.define_method(CLASS, "upcase", sym_upcase);
    runtime.define_method(CLASS, "downcase", sym_downcase);
    runtime.define_method(CLASS, "swapcase", sym_swapcase);
    runtime.define_method(CLASS, "capitalize", sym_capitalize);
    runtime.define_method(CLASS, "start_with?", sym_start_with);
    runtime.define_method(CLASS, "end_with?", sym_end_with);
    runtime.define_method(CLASS, "[]", sym_ref);
    runtime.define_method(CLASS, "slice", sym_ref);
    runtime.define_method(CLASS, "=~", sym_match_operator);
}

//! String services.
//!
//! Case mapping, successor, prefix/suffix tests, indexing and regexp
//! matching. The regexp forms of `[]`, `=~` and `start_with?` store their
//! match (or `nil`) in the last-match register, which `Symbol#[]` and
//! `Symbol#=~` rely on.

use std::sync::Arc;

use crate::args::Args;
use crate::builtins::{expect_string, ordering_value, wrong_argument_type};
use crate::coerce;
use crate::error::{RunError, RunResult};
use crate::match_data::MatchData;
use crate::runtime::{Env, Runtime};
use crate::value::Value;

pub fn upcase(text: &str, ascii: bool) -> String {
    if ascii {
        text.to_ascii_uppercase()
    } else {
        text.to_uppercase()
    }
}

pub fn downcase(text: &str, ascii: bool) -> String {
    if ascii {
        text.to_ascii_lowercase()
    } else {
        text.to_lowercase()
    }
}

pub fn swapcase(text: &str, ascii: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if ascii {
            if c.is_ascii_lowercase() {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c.to_ascii_lowercase());
            }
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn capitalize(text: &str, ascii: bool) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = if ascii {
        first.to_ascii_uppercase().to_string()
    } else {
        first.to_uppercase().collect()
    };
    out.push_str(&downcase(chars.as_str(), ascii));
    out
}

/// `String#succ`.
///
/// The rightmost ASCII alphanumeric is incremented and carries into the
/// alphanumeric to its left, skipping other characters. Carrying stops
/// where a separator sits between a letter and a digit. A carry out of the
/// leftmost position inserts `1`, `a` or `A`. Without any alphanumerics the
/// last character is incremented by code point.
pub fn succ(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.iter().any(char::is_ascii_alphanumeric) {
        succ_alnum(&mut chars);
    } else {
        succ_code_point(&mut chars);
    }
    chars.into_iter().collect()
}

/// Next alphanumeric and whether it wrapped around
fn next_alnum(c: char) -> Option<(char, bool)> {
    match c {
        '9' => Some(('0', true)),
        'z' => Some(('a', true)),
        'Z' => Some(('A', true)),
        '0'..='8' | 'a'..='y' | 'A'..='Y' => Some(((c as u8 + 1) as char, false)),
        _ => None,
    }
}

fn carry_char(c: char) -> char {
    if c.is_ascii_digit() {
        '1'
    } else if c.is_ascii_lowercase() {
        'a'
    } else {
        'A'
    }
}

fn succ_alnum(chars: &mut Vec<char>) {
    let mut carry: Option<(usize, char)> = None;
    let mut last_alnum: Option<char> = None;
    let mut after_other = false;

    for i in (0..chars.len()).rev() {
        let c = chars[i];
        if after_other {
            if let Some(last) = last_alnum {
                let crosses_kind = (last.is_ascii_alphabetic() && c.is_ascii_digit())
                    || (last.is_ascii_digit() && c.is_ascii_alphabetic());
                if crosses_kind {
                    break;
                }
            }
        }
        match next_alnum(c) {
            None => after_other = true,
            Some((next, false)) => {
                chars[i] = next;
                return;
            }
            Some((next, true)) => {
                chars[i] = next;
                last_alnum = Some(next);
                carry = Some((i, carry_char(c)));
                after_other = false;
            }
        }
    }

    if let Some((position, c)) = carry {
        chars.insert(position, c);
    }
}

fn succ_code_point(chars: &mut Vec<char>) {
    for i in (0..chars.len()).rev() {
        let next = match chars[i] {
            '\u{D7FF}' => Some('\u{E000}'),
            char::MAX => None,
            c => char::from_u32(c as u32 + 1),
        };
        match next {
            Some(next) => {
                chars[i] = next;
                return;
            }
            None => chars[i] = '\0',
        }
    }
    chars.insert(0, '\u{1}');
}

/// Substring by character position
fn char_slice(text: &str, start: usize, len: usize) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let from = indices.nth(start).unwrap_or(text.len());
    let to = if len == 0 {
        from
    } else {
        indices.nth(len - 1).unwrap_or(text.len())
    };
    &text[from..to]
}

/// Run `pattern` against `text` and update the last-match register.
pub fn search(env: &mut Env, pattern: &Arc<regex::Regex>, text: &Arc<str>) -> Option<Arc<MatchData>> {
    let found = MatchData::search(pattern, text, 0).map(Arc::new);
    let register = found.clone().map_or(Value::Nil, Value::MatchData);
    env.set_last_match(register);
    found
}

/// `String#[]`: integer index, `(start, length)`, substring, or regexp
/// with an optional capture selector.
pub fn ref_(env: &mut Env, text: &Arc<str>, index: &Value, length: Option<&Value>) -> RunResult<Value> {
    match index {
        Value::Regexp(pattern) => {
            let Some(found) = search(env, pattern, text) else {
                return Ok(Value::Nil);
            };
            let group = match length {
                None => found.get(0),
                Some(Value::String(name)) => named_group(&found, name)?,
                Some(Value::Symbol(name)) => named_group(&found, name.as_str())?,
                Some(selector) => {
                    let n = coerce::to_int(env, selector)?;
                    let n = if n < 0 { n + found.len() as i64 } else { n };
                    usize::try_from(n).ok().and_then(|n| found.get(n))
                }
            };
            Ok(group.map_or(Value::Nil, Value::string))
        }
        Value::String(needle) => {
            if length.is_some() {
                return Err(RunError::no_implicit_conversion("String", "Integer"));
            }
            if text.contains(&**needle) {
                Ok(Value::string(&**needle))
            } else {
                Ok(Value::Nil)
            }
        }
        _ => {
            let start = coerce::to_int(env, index)?;
            let count = text.chars().count() as i64;
            let start = if start < 0 { start + count } else { start };
            match length {
                None => {
                    if start < 0 || start >= count {
                        return Ok(Value::Nil);
                    }
                    Ok(Value::string(char_slice(text, start as usize, 1)))
                }
                Some(length) => {
                    let length = coerce::to_int(env, length)?;
                    if start < 0 || start > count || length < 0 {
                        return Ok(Value::Nil);
                    }
                    let length = length.min(count - start);
                    Ok(Value::string(char_slice(text, start as usize, length as usize)))
                }
            }
        }
    }
}

fn named_group<'m>(found: &'m MatchData, name: &str) -> RunResult<Option<&'m str>> {
    if !found.regex().capture_names().any(|n| n == Some(name)) {
        return Err(RunError::Argument(format!(
            "undefined group name reference: {}",
            name
        )));
    }
    Ok(found.named(name))
}

/// `String#=~`: character offset of the first match, or `nil`
pub fn match_operator(env: &mut Env, text: &Arc<str>, pattern: &Value) -> RunResult<Value> {
    let Value::Regexp(pattern) = pattern else {
        return Err(wrong_argument_type(pattern, "Regexp"));
    };
    let found = search(env, pattern, text);
    Ok(found
        .and_then(|m| m.begin(0))
        .map_or(Value::Nil, |offset| Value::Integer(offset as i64)))
}

/// `String#start_with?`: any of the string or regexp prefixes
pub fn start_with(env: &mut Env, text: &Arc<str>, args: Args<'_>) -> RunResult<bool> {
    for pattern in args {
        if let Value::Regexp(regex) = pattern {
            let anchored = MatchData::search(regex, text, 0)
                .filter(|m| m.begin(0) == Some(0))
                .map(Arc::new);
            match anchored {
                Some(found) => {
                    env.set_last_match(Value::MatchData(found));
                    return Ok(true);
                }
                None => env.set_last_match(Value::Nil),
            }
            continue;
        }
        let prefix = coerce::to_str(env, pattern)?;
        if text.starts_with(&*prefix) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `String#end_with?`: any of the string suffixes
pub fn end_with(env: &mut Env, text: &Arc<str>, args: Args<'_>) -> RunResult<bool> {
    for pattern in args {
        let suffix = coerce::to_str(env, pattern)?;
        if text.ends_with(&*suffix) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parse case-mapping options; `true` selects ASCII-only mapping.
fn ascii_option(args: Args<'_>) -> RunResult<bool> {
    args.ensure_argc_between(0, 2)?;
    let mut ascii = false;
    for option in args {
        let valid = match option {
            Value::Symbol(sym) => match sym.as_str() {
                "ascii" => {
                    ascii = true;
                    true
                }
                "turkic" | "lithuanian" | "fold" => true,
                _ => false,
            },
            _ => false,
        };
        if !valid {
            return Err(RunError::Argument(format!("invalid option: {}", option.inspect())));
        }
    }
    Ok(ascii)
}

fn str_upcase(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let text = expect_string(receiver)?;
    Ok(Value::string(upcase(text, ascii_option(args)?)))
}

fn str_downcase(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let text = expect_string(receiver)?;
    Ok(Value::string(downcase(text, ascii_option(args)?)))
}

fn str_swapcase(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let text = expect_string(receiver)?;
    Ok(Value::string(swapcase(text, ascii_option(args)?)))
}

fn str_capitalize(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    let text = expect_string(receiver)?;
    Ok(Value::string(capitalize(text, ascii_option(args)?)))
}

fn str_succ(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::string(succ(expect_string(receiver)?)))
}

fn str_length(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Integer(expect_string(receiver)?.chars().count() as i64))
}

fn str_empty(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Bool(expect_string(receiver)?.is_empty()))
}

fn str_ref(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_between(1, 2)?;
    let text = expect_string(receiver)?;
    ref_(env, text, args.at(0), args.get(1))
}

fn str_match_operator(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    match_operator(env, expect_string(receiver)?, args.at(0))
}

fn str_start_with(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    Ok(Value::Bool(start_with(env, expect_string(receiver)?, args)?))
}

fn str_end_with(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    Ok(Value::Bool(end_with(env, expect_string(receiver)?, args)?))
}

fn str_to_s(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    expect_string(receiver)?;
    Ok(receiver.clone())
}

fn str_to_sym(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(0)?;
    Ok(Value::Symbol(env.intern(expect_string(receiver)?)))
}

fn str_eq(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let text = expect_string(receiver)?;
    Ok(Value::Bool(args.at(0).as_str() == Some(&**text)))
}

fn str_cmp(_env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let text = expect_string(receiver)?;
    Ok(match args.at(0) {
        Value::String(other) => ordering_value(text.as_bytes().cmp(other.as_bytes())),
        _ => Value::Nil,
    })
}

fn str_plus(env: &mut Env, receiver: &Value, args: Args<'_>) -> RunResult<Value> {
    args.ensure_argc_is(1)?;
    let text = expect_string(receiver)?;
    let other = coerce::to_str(env, args.at(0))?;
    let mut joined = String::with_capacity(text.len() + other.len());
    joined.push_str(text);
    joined.push_str(&other);
    Ok(Value::from(joined))
}

pub(crate) fn register(runtime: &mut Runtime) {
    const CLASS: &str = "String";
    runtime.define_method(CLASS, "upcase", str_upcase);
    runtime.define_method(CLASS, "downcase", str_downcase);
    runtime.define_method(CLASS, "swapcase", str_swapcase);
    runtime.define_method(CLASS, "capitalize", str_capitalize);
    runtime.define_method(CLASS, "succ", str_succ);
    runtime.define_method(CLASS, "next", str_succ);
    runtime.define_method(CLASS, "length", str_length);
    runtime.define_method(CLASS, "size", str_length);
    runtime.define_method(CLASS, "empty?", str_empty);
    runtime.define_method(CLASS, "[]", str_ref);
    runtime.define_method(CLASS, "slice", str_ref);
    runtime.define_method(CLASS, "=~", str_match_operator);
    runtime.define_method(CLASS, "start_with?", str_start_with);
    runtime.define_method(CLASS, "end_with?", str_end_with);
    runtime.define_method(CLASS, "to_s", str_to_s);
    runtime.define_method(CLASS, "to_str", str_to_s);
    runtime.define_method(CLASS, "to_sym", str_to_sym);
    runtime.define_method(CLASS, "intern", str_to_sym);
    runtime.define_method(CLASS, "==", str_eq);
    runtime.define_method(CLASS, "<=>", str_cmp);
    runtime.define_method(CLASS, "+", str_plus);
}

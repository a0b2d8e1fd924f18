//! Args Module - Call-Site Argument View
//!
//! [`Args`] is a borrowed, `Copy` view over the evaluated arguments of one
//! call plus a flag saying whether the last element is the keyword hash.
//! Copying a view never copies the arguments, so several views may alias
//! the same slice (`shift` does exactly that).
//!
//! # Binding Shapes
//!
//! Methods validate their argument count with the `ensure_argc_*` family,
//! which raise an arity error on mismatch. Blocks never raise on count:
//! [`Args::to_array_for_block`] truncates excess arguments and pads missing
//! ones with `nil`, and auto-spreads a single array argument across the
//! block's parameters.

use std::ops::Index;

use garnet_util::Symbol;

use crate::coerce;
use crate::error::{ExpectedArity, RunError, RunResult};
use crate::runtime::Env;
use crate::value::Value;

/// Borrowed argument list for a single call
#[derive(Debug, Clone, Copy, Default)]
pub struct Args<'a> {
    data: &'a [Value],
    has_keyword_hash: bool,
}

impl<'a> Args<'a> {
    /// View over `data`; the call site decides whether the tail is a keyword hash.
    pub fn new(data: &'a [Value], has_keyword_hash: bool) -> Self {
        Self {
            data,
            has_keyword_hash,
        }
    }

    /// Positional-only view
    pub fn positional(data: &'a [Value]) -> Self {
        Self::new(data, false)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Element `index`.
    ///
    /// # Panics
    ///
    /// When `index >= len()`. Callers validate arity first.
    pub fn at(&self, index: usize) -> &'a Value {
        debug_assert!(
            index < self.data.len(),
            "argument index {} out of bounds for {} arguments",
            index,
            self.data.len()
        );
        &self.data[index]
    }

    /// Element `index`, or `default` past the end
    pub fn at_or(&self, index: usize, default: Value) -> Value {
        self.data.get(index).cloned().unwrap_or(default)
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.data.get(index)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_keyword_hash(&self) -> bool {
        self.has_keyword_hash
    }

    pub fn as_slice(&self) -> &'a [Value] {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Value> {
        self.data.iter()
    }

    pub fn ensure_argc_is(&self, expected: usize) -> RunResult<()> {
        if self.len() != expected {
            return Err(RunError::arity(self.len(), ExpectedArity::Exact(expected)));
        }
        Ok(())
    }

    pub fn ensure_argc_between(&self, low: usize, high: usize) -> RunResult<()> {
        if self.len() < low || self.len() > high {
            return Err(RunError::arity(self.len(), ExpectedArity::Range(low, high)));
        }
        Ok(())
    }

    pub fn ensure_argc_at_least(&self, expected: usize) -> RunResult<()> {
        if self.len() < expected {
            return Err(RunError::arity(self.len(), ExpectedArity::AtLeast(expected)));
        }
        Ok(())
    }

    /// View over every argument but the first.
    ///
    /// Shifting the last argument off yields a fresh empty view, which does
    /// not carry the keyword flag.
    ///
    /// # Panics
    ///
    /// When the view is empty.
    pub fn shift(&self) -> Args<'a> {
        assert!(!self.data.is_empty(), "cannot shift an empty argument list");
        if self.data.len() == 1 {
            return Args::empty();
        }
        Args::new(&self.data[1..], self.has_keyword_hash)
    }

    /// Owned copy of the arguments
    pub fn to_vec(&self) -> Vec<Value> {
        self.data.to_vec()
    }

    /// Owned copy of the arguments as a new array value
    pub fn to_array(&self) -> Value {
        Value::array(self.to_vec())
    }

    /// Bind the arguments to a block's parameter list.
    ///
    /// `max` is `None` for a block with a splat parameter. With `spread` set
    /// and exactly one argument, that argument is converted with `to_ary`
    /// and copied, then cut down to `max` or padded up to `min`. Otherwise
    /// the leading `min(len, max)` arguments are taken and padded up to
    /// `min` with `nil`.
    pub fn to_array_for_block(
        &self,
        env: &mut Env,
        min: usize,
        max: Option<usize>,
        spread: bool,
    ) -> RunResult<Vec<Value>> {
        if spread && self.data.len() == 1 {
            let array = coerce::to_ary(env, &self.data[0], true)?;
            let mut items = array.read().clone();
            let count = items.len();
            match max {
                Some(max) if count > max => items.truncate(max),
                _ if count < min => items.resize(min, Value::Nil),
                _ => {}
            }
            return Ok(items);
        }

        let take = max.map_or(self.data.len(), |max| self.data.len().min(max));
        let mut items = self.data[..take].to_vec();
        if items.len() < min {
            items.resize(min, Value::Nil);
        }
        Ok(items)
    }

    /// Value for `name` in the trailing keyword hash.
    ///
    /// `None` when there is no keyword hash, the tail is not a hash, or the
    /// key is missing. Never raises and never modifies the hash.
    pub fn keyword_arg(&self, name: &Symbol) -> Option<Value> {
        if !self.has_keyword_hash {
            return None;
        }
        let hash = self.data.last()?.as_hash()?;
        let value = hash.read().get(&Value::Symbol(name.clone())).cloned();
        value
    }
}

impl Index<usize> for Args<'_> {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.at(index)
    }
}

impl<'a> IntoIterator for Args<'a> {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use quickcheck_macros::quickcheck;
    use std::sync::Arc;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Integer).collect()
    }

    fn env() -> Env {
        Env::new(Arc::new(Runtime::default()))
    }

    #[test]
    fn test_at_and_at_or() {
        let data = ints(&[1, 2]);
        let args = Args::positional(&data);
        assert_eq!(args.at(1), &Value::Integer(2));
        assert_eq!(args[0], Value::Integer(1));
        assert_eq!(args.at_or(5, Value::Nil), Value::Nil);
        assert_eq!(args.at_or(0, Value::Nil), Value::Integer(1));
        assert_eq!(args.get(2), None);
    }

    #[test]
    #[should_panic]
    fn test_at_out_of_bounds_panics() {
        let data = ints(&[1]);
        let args = Args::positional(&data);
        let _ = args.at(1);
    }

    #[test]
    fn test_ensure_argc_is() {
        let data = ints(&[1, 2]);
        let args = Args::positional(&data);
        assert!(args.ensure_argc_is(2).is_ok());
        let err = args.ensure_argc_is(3).unwrap_err();
        assert_eq!(err, RunError::arity(2, ExpectedArity::Exact(3)));
        assert_eq!(err.to_string(), "wrong number of arguments (given 2, expected 3)");
    }

    #[test]
    fn test_ensure_argc_between_and_at_least() {
        let data = ints(&[1, 2, 3]);
        let args = Args::positional(&data);
        assert!(args.ensure_argc_between(1, 3).is_ok());
        assert!(args.ensure_argc_between(3, 3).is_ok());
        assert_eq!(
            args.ensure_argc_between(0, 1).unwrap_err().to_string(),
            "wrong number of arguments (given 3, expected 0..1)"
        );
        assert!(args.ensure_argc_at_least(3).is_ok());
        assert_eq!(
            args.ensure_argc_at_least(4).unwrap_err().to_string(),
            "wrong number of arguments (given 3, expected 4+)"
        );
    }

    #[test]
    fn test_shift_aliases_storage() {
        let data = ints(&[1, 2, 3]);
        let args = Args::new(&data, true);
        let rest = args.shift();
        assert_eq!(rest.len(), 2);
        assert!(rest.has_keyword_hash());
        assert!(std::ptr::eq(rest.at(0), &data[1]));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_shift_last_argument_yields_empty_view() {
        let data = ints(&[1]);
        let rest = Args::new(&data, true).shift();
        assert!(rest.is_empty());
        assert!(!rest.has_keyword_hash());
    }

    #[test]
    #[should_panic(expected = "cannot shift")]
    fn test_shift_empty_panics() {
        let _ = Args::empty().shift();
    }

    #[test]
    fn test_to_vec_is_a_snapshot() {
        let mut data = ints(&[1, 2]);
        let snapshot = Args::positional(&data).to_vec();
        data[0] = Value::Nil;
        assert_eq!(snapshot, ints(&[1, 2]));
    }

    #[test]
    fn test_block_positional_truncates_and_pads() {
        let mut env = env();
        let data = ints(&[1, 2, 3]);
        let args = Args::positional(&data);
        assert_eq!(args.to_array_for_block(&mut env, 0, Some(2), false).unwrap(), ints(&[1, 2]));
        assert_eq!(
            args.to_array_for_block(&mut env, 4, None, false).unwrap(),
            vec![1.into(), 2.into(), 3.into(), Value::Nil]
        );
        assert_eq!(args.to_array_for_block(&mut env, 1, None, false).unwrap(), ints(&[1, 2, 3]));
    }

    #[test]
    fn test_block_spread_copies_the_array() {
        let mut env = env();
        let array = Value::array(ints(&[1, 2, 3, 4]));
        let data = vec![array.clone()];
        let args = Args::positional(&data);

        let bound = args.to_array_for_block(&mut env, 2, Some(2), true).unwrap();
        assert_eq!(bound, ints(&[1, 2]));
        assert_eq!(array, Value::array(ints(&[1, 2, 3, 4])));
    }

    #[test]
    fn test_block_spread_wraps_non_arrays() {
        let mut env = env();
        let data = vec![Value::Integer(7)];
        let args = Args::positional(&data);
        let bound = args.to_array_for_block(&mut env, 2, Some(2), true).unwrap();
        assert_eq!(bound, vec![Value::Integer(7), Value::Nil]);
    }

    #[test]
    fn test_block_spread_ignored_for_several_arguments() {
        let mut env = env();
        let data = vec![Value::array(ints(&[1, 2])), Value::Integer(3)];
        let args = Args::positional(&data);
        let bound = args.to_array_for_block(&mut env, 2, Some(2), true).unwrap();
        assert_eq!(bound, data);
    }

    #[test]
    fn test_keyword_arg() {
        let env = env();
        let a = env.intern("a");
        let b = env.intern("b");
        let data = vec![
            Value::Integer(1),
            Value::hash_from([(Value::Symbol(a.clone()), Value::Integer(10))]),
        ];

        let with_keywords = Args::new(&data, true);
        assert_eq!(with_keywords.keyword_arg(&a), Some(Value::Integer(10)));
        assert_eq!(with_keywords.keyword_arg(&b), None);

        let without_keywords = Args::new(&data, false);
        assert_eq!(without_keywords.keyword_arg(&a), None);
    }

    #[test]
    fn test_keyword_arg_non_hash_tail() {
        let env = env();
        let a = env.intern("a");
        let data = ints(&[1]);
        assert_eq!(Args::new(&data, true).keyword_arg(&a), None);
        assert_eq!(Args::new(&[], true).keyword_arg(&a), None);
    }

    #[quickcheck]
    fn prop_positional_block_binding_length(len: u8, min: u8, max: Option<u8>) -> bool {
        let mut env = env();
        let data = vec![Value::Nil; len as usize];
        let args = Args::positional(&data);
        let (min, max) = (min as usize, max.map(usize::from));
        let bound = match args.to_array_for_block(&mut env, min, max, false) {
            Ok(bound) => bound,
            Err(_) => return false,
        };
        let taken = max.map_or(len as usize, |max| (len as usize).min(max));
        bound.len() == taken.max(min)
    }
}

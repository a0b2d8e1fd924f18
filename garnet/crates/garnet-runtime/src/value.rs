//! Value Module - Runtime Value Representation
//!
//! Every value the runtime passes around is a [`Value`]. Scalars are stored
//! inline; everything else is reference counted so that cloning a value is
//! the equivalent of copying an object reference.
//!
//! Arrays, hashes and generic objects are shared and mutable, guarded by
//! `parking_lot::RwLock`. Strings are immutable `Arc<str>`: string methods
//! always return a new string.
//!
//! # Equality
//!
//! `PartialEq`/`Hash` implement `eql?`-style equality, which is what hash
//! keys need: values of different variants are never equal (so `1` and
//! `1.0` are distinct keys). Symbols, procs and objects compare by identity.

use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use garnet_util::escape::quote;
use garnet_util::Symbol;

use crate::match_data::MatchData;
use crate::proc_object::ProcObject;

/// Shared, mutable array storage
pub type ArrayRef = Arc<RwLock<Vec<Value>>>;

/// Shared, mutable, insertion-ordered hash storage
pub type HashRef = Arc<RwLock<IndexMap<Value, Value>>>;

/// A runtime value
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(Arc<str>),
    Symbol(Symbol),
    Array(ArrayRef),
    Hash(HashRef),
    Regexp(Arc<Regex>),
    MatchData(Arc<MatchData>),
    Proc(Arc<ProcObject>),
    Object(Arc<RObject>),
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::String(Arc::from(text.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(RwLock::new(items)))
    }

    pub fn hash(entries: IndexMap<Value, Value>) -> Self {
        Value::Hash(Arc::new(RwLock::new(entries)))
    }

    /// Build a hash from key/value pairs; later duplicates win.
    pub fn hash_from<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Value::hash(pairs.into_iter().collect())
    }

    pub fn regexp(regex: Regex) -> Self {
        Value::Regexp(Arc::new(regex))
    }

    pub fn proc(proc_object: ProcObject) -> Self {
        Value::Proc(Arc::new(proc_object))
    }

    pub fn object(object: RObject) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Everything except `nil` and `false` is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&HashRef> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Name of the class the value is an instance of
    pub fn class_name(&self) -> &str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Regexp(_) => "Regexp",
            Value::MatchData(_) => "MatchData",
            Value::Proc(_) => "Proc",
            Value::Object(object) => object.class().as_str(),
        }
    }

    /// Identity comparison (`equal?`)
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Hash(a), Value::Hash(b)) => Arc::ptr_eq(a, b),
            (Value::Regexp(a), Value::Regexp(b)) => Arc::ptr_eq(a, b),
            (Value::MatchData(a), Value::MatchData(b)) => Arc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    /// Display form (`to_s`)
    pub fn to_display(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::String(s) => s.to_string(),
            Value::Symbol(sym) => sym.as_str().to_string(),
            Value::Regexp(re) => format!("(?-mix:{})", re.as_str()),
            Value::MatchData(m) => m.matched().to_string(),
            _ => self.inspect(),
        }
    }

    /// Literal form (`inspect`)
    pub fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => float_to_s(*f),
            Value::String(s) => quote(s),
            Value::Symbol(sym) => sym.inspect(),
            Value::Array(array) => {
                let items: Vec<String> = array.read().iter().map(Value::inspect).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Hash(hash) => {
                let hash = hash.read();
                if hash.is_empty() {
                    return "{}".to_string();
                }
                let entries: Vec<String> = hash
                    .iter()
                    .map(|(k, v)| format!("{} => {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Regexp(re) => format!("/{}/", re.as_str()),
            Value::MatchData(m) => m.inspect(),
            Value::Proc(p) => {
                let lambda = if p.is_lambda() { " (lambda)" } else { "" };
                format!("#<Proc:{:#x}{}>", Arc::as_ptr(p) as usize, lambda)
            }
            Value::Object(object) => object.inspect(),
        }
    }
}

/// `Float#to_s`
pub fn float_to_s(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Arc::ptr_eq(a, b) || *a.read() == *b.read()
            }
            (Value::Hash(a), Value::Hash(b)) => {
                if Arc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Value::Regexp(a), Value::Regexp(b)) => a.as_str() == b.as_str(),
            (Value::MatchData(a), Value::MatchData(b)) => a == b,
            (Value::Proc(a), Value::Proc(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Integer(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Array(array) => {
                for item in array.read().iter() {
                    item.hash(state);
                }
            }
            // Order-independent, consistent with `eq`
            Value::Hash(hash) => hash.read().len().hash(state),
            Value::Regexp(re) => re.as_str().hash(state),
            Value::MatchData(m) => m.matched().hash(state),
            Value::Proc(p) => (Arc::as_ptr(p) as usize).hash(state),
            Value::Object(o) => (Arc::as_ptr(o) as usize).hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

/// A class-tagged object with named attributes.
///
/// Used for struct-like results (`Etc::Passwd`) and for ad-hoc responders.
/// Attributes are readable and writable through dispatch: `obj.name` and
/// `obj.name = value` resolve to the field when no method matches.
pub struct RObject {
    class: Symbol,
    fields: RwLock<IndexMap<Symbol, Value>>,
}

impl RObject {
    pub fn new(class: Symbol) -> Self {
        Self {
            class,
            fields: RwLock::new(IndexMap::new()),
        }
    }

    pub fn with_fields<I>(class: Symbol, fields: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, Value)>,
    {
        Self {
            class,
            fields: RwLock::new(fields.into_iter().collect()),
        }
    }

    pub fn class(&self) -> &Symbol {
        &self.class
    }

    pub fn get(&self, name: &Symbol) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    pub fn has_field(&self, name: &Symbol) -> bool {
        self.fields.read().contains_key(name)
    }

    pub fn set(&self, name: Symbol, value: Value) {
        self.fields.write().insert(name, value);
    }

    pub fn inspect(&self) -> String {
        let fields = self.fields.read();
        if fields.is_empty() {
            return format!("#<{}>", self.class);
        }
        let parts: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.inspect()))
            .collect();
        format!("#<{} {}>", self.class, parts.join(", "))
    }
}

impl fmt::Debug for RObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

static_assertions::assert_impl_all!(Value: Send, Sync);

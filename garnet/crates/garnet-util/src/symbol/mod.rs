//! Symbol module - canonical identifier objects.
//!
//! This module provides the [`Symbol`] type, a shared handle to an interned
//! name, and the [`SymbolTable`] that hands them out. Every distinct name
//! interned through one table maps to exactly one `Symbol` instance, so symbol
//! equality is pointer identity.
//!
//! # Overview
//!
//! - **Identity**: `intern(n)` returns the same instance for equal names,
//!   including under concurrent interning
//! - **Cached string form**: [`Symbol::name_as_string`] computes the string
//!   form once and hands out the same allocation afterwards
//! - **Display form**: [`Symbol::inspect`] renders `:name` or `:"name"`
//! - **No eviction**: a table owns its symbols until it is dropped
//!
//! # Performance Characteristics
//!
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `SymbolTable::intern()` (hit) | O(n) | Hash of the name, shard read lock |
//! | `SymbolTable::intern()` (miss) | O(n) | Shard write lock + allocation |
//! | `Symbol` equality | O(1) | Pointer comparison |
//! | `Symbol::as_str()` | O(1) | The symbol owns its name |
//! | `Symbol::cmp_name()` | O(n) | Bytewise |
//!
//! # Examples
//!
//! ```
//! use garnet_util::symbol::SymbolTable;
//!
//! let table = SymbolTable::new();
//! let s1 = table.intern("hello");
//! let s2 = table.intern("hello");
//! let s3 = table.intern("world");
//!
//! assert_eq!(s1, s2);  // Same instance for the same name
//! assert_ne!(s1, s3);
//! assert_eq!(s1.inspect(), ":hello");
//! ```

mod table;

pub use table::{SymbolTable, DEFAULT_CAPACITY, KNOWN_SYMBOLS};

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::escape;

/// Statistics about a symbol table for profiling
///
/// # Examples
///
/// ```
/// use garnet_util::symbol::InternerStats;
///
/// let stats = InternerStats::new(100, 200, 90, 10);
/// assert_eq!(stats.hit_rate(), 0.9);
/// assert_eq!(stats.load_factor(), 0.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InternerStats {
    /// Number of interned symbols
    pub count: usize,
    /// Map capacity
    pub capacity: usize,
    /// Number of lookups that found an existing symbol
    pub hits: usize,
    /// Number of lookups that had to register a new symbol
    pub misses: usize,
}

impl InternerStats {
    /// Create new stats with the given values
    pub const fn new(count: usize, capacity: usize, hits: usize, misses: usize) -> Self {
        Self {
            count,
            capacity,
            hits,
            misses,
        }
    }

    /// Calculate the load factor (count / capacity)
    ///
    /// Returns 0.0 if capacity is 0.
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    /// Calculate the hit rate (hits / (hits + misses))
    ///
    /// Returns 0.0 if no lookups have been performed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_operations();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get total number of interning operations
    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }
}

/// Symbol - a canonical, interned identifier
///
/// A `Symbol` is a cheap, cloneable handle. Clones share the same underlying
/// instance; equality and hashing use that instance's address, never the
/// name, so two symbols are equal exactly when they came from the same
/// registration.
///
/// Symbols hold no reference back to the table that created them.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

struct SymbolData {
    name: Box<str>,
    string: OnceLock<Arc<str>>,
}

/// Operator names that `inspect` renders without quotes.
const BARE_OPERATORS: &[&str] = &[
    "%", "==", "!", "!=", "+", "-", "/", "*", "**", "<", "<=", ">", ">=", "<<", ">>", "[]=",
    "[]", "&",
];

impl Symbol {
    /// Allocate a fresh symbol. Only the table may do this; everything else
    /// goes through [`SymbolTable::intern`].
    pub(crate) fn new(name: &str) -> Self {
        Self(Arc::new(SymbolData {
            name: name.into(),
            string: OnceLock::new(),
        }))
    }

    /// The interned name
    ///
    /// # Examples
    ///
    /// ```
    /// use garnet_util::symbol::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// assert_eq!(table.intern("hello").as_str(), "hello");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.name
    }

    /// The cached string form of this symbol.
    ///
    /// Computed on first use and memoized; every later call returns the
    /// same allocation (`Arc::ptr_eq` holds between any two results).
    /// Concurrent first calls race inside `OnceLock`, exactly one value is
    /// published.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use garnet_util::symbol::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// let sym = table.intern("name");
    /// let a = sym.name_as_string();
    /// let b = sym.name_as_string();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn name_as_string(&self) -> Arc<str> {
        Arc::clone(self.0.string.get_or_init(|| Arc::from(self.as_str())))
    }

    /// Whether the cached string form has been computed yet
    pub fn has_cached_string(&self) -> bool {
        self.0.string.get().is_some()
    }

    /// Length of the name in characters
    pub fn char_len(&self) -> usize {
        self.as_str().chars().count()
    }

    /// Length of the name in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Check if the name is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Stable identity of this instance, usable as an object id
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Total order by bytewise comparison of the names
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use garnet_util::symbol::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// let a = table.intern("a");
    /// let b = table.intern("b");
    /// assert_eq!(a.cmp_name(&b), Ordering::Less);
    /// ```
    pub fn cmp_name(&self, other: &Symbol) -> Ordering {
        self.as_str().as_bytes().cmp(other.as_str().as_bytes())
    }

    /// ASCII case-insensitive comparison of the names
    pub fn casecmp(&self, other: &Symbol) -> Ordering {
        let lhs = self.as_str().bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.as_str().bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }

    /// ASCII case-insensitive equality of the names
    pub fn casecmp_eq(&self, other: &Symbol) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }

    /// Whether `inspect` wraps the name in quotes.
    ///
    /// The rules apply in order:
    /// 1. quote unless the name has a bare-safe shape (special global,
    ///    identifier, or one of the fixed operators)
    /// 2. quote if any character lies outside printable ASCII (33..=126)
    /// 3. never quote a name longer than one byte that starts with `$`,
    ///    even when rule 2 fired
    pub fn needs_quotes(&self) -> bool {
        let name = self.as_str();
        let mut quote = !is_bare_safe(name);
        if name.chars().any(|c| !('!'..='~').contains(&c)) {
            quote = true;
        }
        if name.len() > 1 && name.starts_with('$') {
            quote = false;
        }
        quote
    }

    /// Display form: `:name`, or `:"name"` with the name escaped when the
    /// quoting rules call for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use garnet_util::symbol::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// assert_eq!(table.intern("foo").inspect(), ":foo");
    /// assert_eq!(table.intern("foo bar").inspect(), ":\"foo bar\"");
    /// assert_eq!(table.intern("+").inspect(), ":+");
    /// assert_eq!(table.intern("$1").inspect(), ":$1");
    /// ```
    pub fn inspect(&self) -> String {
        if self.needs_quotes() {
            format!(":{}", escape::quote(self.as_str()))
        } else {
            format!(":{}", self.as_str())
        }
    }

    /// Debug rendering, never quoted
    pub fn dbg_inspect(&self) -> String {
        format!(":{}", self.as_str())
    }
}

/// `$` followed by a single digit, `?`, `!` or `~`
fn is_special_global(name: &str) -> bool {
    match name.as_bytes() {
        [b'$', c] => c.is_ascii_digit() || matches!(c, b'?' | b'!' | b'~'),
        _ => false,
    }
}

/// Up to two `@` or one `$`, then `[a-z_][a-z0-9_]*`, then an optional
/// `?`, `!` or `=`
fn is_identifier(name: &str) -> bool {
    let rest = name
        .strip_prefix("@@")
        .or_else(|| name.strip_prefix('@'))
        .or_else(|| name.strip_prefix('$'))
        .unwrap_or(name);
    let rest = rest.strip_suffix(&['?', '!', '='][..]).unwrap_or(rest);
    let mut bytes = rest.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_lowercase() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

fn is_bare_safe(name: &str) -> bool {
    is_special_global(name) || is_identifier(name) || BARE_OPERATORS.contains(&name)
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl std::fmt::Debug for Symbol {
    /// Shows the debug rendering, e.g. `Symbol(:hello)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.dbg_inspect())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// Ensure Symbol is thread-safe
static_assertions::assert_impl_all!(Symbol: Send, Sync);

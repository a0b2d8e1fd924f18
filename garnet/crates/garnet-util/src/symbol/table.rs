//! Symbol table implementation using DashMap for concurrent access.
//!
//! The table maps each name to its one canonical [`Symbol`]:
//! - Sharded concurrent access via DashMap
//! - Fast hashing with ahash
//! - Hit/miss statistics for profiling
//! - Optional pre-interning of the names the runtime dispatches on itself
//!
//! # Thread Safety
//!
//! The table is `Sync + Send`. Lookups of existing names take a read lock on
//! one shard only. Registering a new name goes through the shard's entry API,
//! which holds that shard's write lock across the check-and-insert, so two
//! threads interning the same new name always receive the same instance.

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{InternerStats, Symbol};
use crate::error::{SymbolError, SymbolResult};

/// Initial capacity used by [`SymbolTable::new`]
pub const DEFAULT_CAPACITY: usize = 1024;

/// Names the runtime sends or looks up internally.
///
/// Pre-interning them keeps the hot dispatch paths on the hit side of the
/// table.
pub const KNOWN_SYMBOLS: &[&str] = &[
    // Conversion protocols
    "to_ary", "to_a", "to_str", "to_s", "to_int", "to_i", "to_sym", "to_proc",
    // Invocation
    "call", "new", "arity", "lambda?", "respond_to?",
    // String transforms
    "succ", "next", "upcase", "downcase", "swapcase", "capitalize", "ascii",
    // Queries
    "length", "size", "empty?", "start_with?", "end_with?", "inspect", "name",
    "casecmp", "casecmp?", "class",
    // Operators
    "[]", "[]=", "==", "<=>", "=~", "+", "-", "*", "/", "%", "<", ">", "<=", ">=",
];

/// Thread-safe symbol table
///
/// Owns every symbol it creates for its whole lifetime. Nothing is ever
/// evicted.
pub struct SymbolTable {
    /// Name to canonical symbol
    map: DashMap<Box<str>, Symbol, RandomState>,

    /// Whether hit/miss counters are maintained
    track_stats: bool,

    /// Number of lookups that found an existing symbol
    hits: AtomicUsize,

    /// Number of lookups that registered a new symbol
    misses: AtomicUsize,
}

impl SymbolTable {
    /// Create an empty table with [`DEFAULT_CAPACITY`]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty table with room for `capacity` symbols
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            track_stats: true,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Create a table with the [`KNOWN_SYMBOLS`] already registered
    pub fn with_known_symbols(capacity: usize) -> Self {
        let table = Self::with_capacity(capacity);
        table.initialize_known_symbols();
        table
    }

    /// Turn hit/miss accounting on or off
    pub fn set_track_stats(&mut self, enabled: bool) {
        self.track_stats = enabled;
    }

    fn initialize_known_symbols(&self) {
        for name in KNOWN_SYMBOLS {
            self.map
                .entry(Box::from(*name))
                .or_insert_with(|| Symbol::new(name));
        }
        log::debug!("symbol table pre-interned {} known symbols", self.map.len());
    }

    /// Intern a name, returning its canonical symbol
    ///
    /// If the name is already registered the existing instance is returned.
    /// Otherwise a new symbol is allocated and registered. Safe to call from
    /// any number of threads.
    ///
    /// # Examples
    ///
    /// ```
    /// use garnet_util::symbol::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// let a = table.intern("each");
    /// assert_eq!(table.intern("each"), a);
    /// ```
    pub fn intern(&self, name: &str) -> Symbol {
        // Fast path: shard read lock only
        if let Some(entry) = self.map.get(name) {
            self.count(&self.hits);
            return entry.value().clone();
        }

        // Slow path: the entry API re-checks under the shard write lock, so
        // a racing thread that registered the name first wins and we return
        // its instance. Only the thread that inserts counts a miss.
        let mut inserted = false;
        let symbol = self
            .map
            .entry(Box::from(name))
            .or_insert_with(|| {
                inserted = true;
                log::trace!("interning new symbol {:?}", name);
                Symbol::new(name)
            })
            .value()
            .clone();
        self.count(if inserted { &self.misses } else { &self.hits });
        symbol
    }

    /// Intern a raw byte name
    ///
    /// # Errors
    ///
    /// [`SymbolError::InvalidName`] if `bytes` is not valid UTF-8.
    pub fn intern_bytes(&self, bytes: &[u8]) -> SymbolResult<Symbol> {
        let name = std::str::from_utf8(bytes).map_err(|e| SymbolError::InvalidName {
            valid_up_to: e.valid_up_to(),
        })?;
        Ok(self.intern(name))
    }

    /// Look a name up without registering it
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).map(|entry| entry.value().clone())
    }

    /// Look a name up, failing if it was never interned
    ///
    /// # Errors
    ///
    /// [`SymbolError::NotFound`] if the name is not registered.
    pub fn require(&self, name: &str) -> SymbolResult<Symbol> {
        self.lookup(name)
            .ok_or_else(|| SymbolError::NotFound(name.to_string()))
    }

    /// Snapshot of every symbol interned so far, in no particular order
    ///
    /// Symbols registered before the call are all present exactly once.
    /// Symbols registered concurrently with the call may or may not appear.
    pub fn all_symbols(&self) -> Vec<Symbol> {
        self.map.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of interned symbols
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get statistics about the table for profiling
    pub fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.map.len(),
            capacity: self.map.capacity(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    #[inline]
    fn count(&self, counter: &AtomicUsize) {
        if self.track_stats {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.map.len())
            .field("stats", &self.stats())
            .finish()
    }
}

static_assertions::assert_impl_all!(SymbolTable: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rayon::prelude::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_intern_same_string() {
        let table = SymbolTable::new();
        let s1 = table.intern("hello");
        let s2 = table.intern("hello");
        assert_eq!(s1, s2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_intern_different_strings() {
        let table = SymbolTable::new();
        assert_ne!(table.intern("hello"), table.intern("world"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_and_unicode_names() {
        let table = SymbolTable::new();
        for name in ["", "你好", "🦀", "Привет"] {
            let sym = table.intern(name);
            assert_eq!(sym.as_str(), name);
            assert_eq!(table.intern(name), sym);
        }
    }

    #[test]
    fn test_intern_bytes() {
        let table = SymbolTable::new();
        let sym = table.intern_bytes(b"bytes").unwrap();
        assert_eq!(sym, table.intern("bytes"));

        let err = table.intern_bytes(b"ab\xff").unwrap_err();
        assert_eq!(err, SymbolError::InvalidName { valid_up_to: 2 });
    }

    #[test]
    fn test_lookup_does_not_register() {
        let table = SymbolTable::new();
        assert!(table.lookup("ghost").is_none());
        assert!(table.is_empty());
        assert_eq!(
            table.require("ghost").unwrap_err(),
            SymbolError::NotFound("ghost".to_string())
        );

        let sym = table.intern("ghost");
        assert_eq!(table.lookup("ghost"), Some(sym.clone()));
        assert_eq!(table.require("ghost").unwrap(), sym);
    }

    #[test]
    fn test_known_symbols_preinterned() {
        let table = SymbolTable::with_known_symbols(DEFAULT_CAPACITY);
        let unique: HashSet<&str> = KNOWN_SYMBOLS.iter().copied().collect();
        assert_eq!(table.len(), unique.len());
        assert!(table.lookup("to_ary").is_some());

        let before = table.stats();
        let _ = table.intern("to_ary");
        assert_eq!(table.stats().hits, before.hits + 1);
        assert_eq!(table.stats().misses, before.misses);
    }

    #[test]
    fn test_stats_tracking() {
        let table = SymbolTable::new();
        let _ = table.intern("new_unique_string");
        let _ = table.intern("new_unique_string");

        let stats = table.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.count, 1);
        assert!(stats.capacity >= stats.count);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_stats_disabled() {
        let mut table = SymbolTable::new();
        table.set_track_stats(false);
        let _ = table.intern("a");
        let _ = table.intern("a");
        assert_eq!(table.stats().total_operations(), 0);
    }

    #[test]
    fn test_all_symbols_snapshot() {
        let table = SymbolTable::new();
        let names = ["a", "b", "c", "d"];
        let interned: HashSet<Symbol> = names.iter().map(|n| table.intern(n)).collect();

        let all = table.all_symbols();
        assert_eq!(all.len(), names.len());
        let snapshot: HashSet<Symbol> = all.into_iter().collect();
        assert_eq!(snapshot, interned);
    }

    #[test]
    fn test_concurrent_same_new_name_registers_once() {
        let table = Arc::new(SymbolTable::new());
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let table = Arc::clone(&table);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    table.intern("concurrent_same")
                })
            })
            .collect();

        let results: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for symbol in &results[1..] {
            assert_eq!(results[0], *symbol);
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_concurrent_first_intern_counts_one_miss() {
        let table = Arc::new(SymbolTable::new());
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let table = Arc::clone(&table);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    table.intern("counted_once");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = table.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 15);
    }

    #[test]
    fn test_parallel_stress() {
        let table = SymbolTable::new();
        let symbols: Vec<(usize, Symbol)> = (0..4000usize)
            .into_par_iter()
            .map(|i| (i % 500, table.intern(&format!("stress_{}", i % 500))))
            .collect();

        assert_eq!(table.len(), 500);
        for (i, sym) in &symbols {
            assert_eq!(*sym, table.intern(&format!("stress_{}", i)));
        }
    }

    #[test]
    fn test_all_symbols_during_concurrent_interning() {
        let table = SymbolTable::new();
        let settled: Vec<Symbol> = (0..100).map(|i| table.intern(&format!("settled_{}", i))).collect();

        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..1000 {
                    table.intern(&format!("racing_{}", i));
                }
            });
            for _ in 0..20 {
                let snapshot = table.all_symbols();
                let unique: HashSet<Symbol> = snapshot.iter().cloned().collect();
                assert_eq!(unique.len(), snapshot.len(), "no duplicates");
                for sym in &settled {
                    assert!(unique.contains(sym), "settled symbol missing");
                }
            }
        });
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SymbolTable>();
    }

    #[quickcheck]
    fn prop_intern_is_idempotent(names: Vec<String>) -> bool {
        let table = SymbolTable::new();
        let first: Vec<Symbol> = names.iter().map(|n| table.intern(n)).collect();
        names
            .iter()
            .zip(&first)
            .all(|(n, sym)| table.intern(n) == *sym && sym.as_str() == n)
    }

    #[quickcheck]
    fn prop_distinct_names_distinct_symbols(a: String, b: String) -> bool {
        let table = SymbolTable::new();
        (table.intern(&a) == table.intern(&b)) == (a == b)
    }
}

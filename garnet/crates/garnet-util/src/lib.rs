//! garnet-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! Foundation types shared by every layer of the Garnet runtime. Nothing in
//! here knows about the value model or message dispatch.
//!
//! - [`symbol`]: canonical identifier objects and the concurrent table that
//!   interns them
//! - [`escape`]: the quoting convention used when a name or string has to be
//!   shown in its literal form
//! - [`error`]: error types for the above
//
// ============================================================================
// SYMBOL IDENTITY
// ============================================================================
//
// A symbol is the single canonical object for a name. Interning the same
// name twice through one table yields the same instance, so comparing two
// symbols is a pointer comparison and a symbol can be used as a hash key
// without touching its characters.
//
// The table is an explicit object rather than a process global: the runtime
// owns one, tests build as many as they like, and the lifetime of every
// symbol is the lifetime of the table that created it.
//
// CONCURRENCY:
// ------------
// Interning is insert-if-absent on a sharded map. Known names only need a
// read lock on one shard. A new name takes that shard's write lock for the
// duration of the check-and-insert, which is what guarantees one instance
// per name when several threads intern it at once.
//
// Each symbol memoizes its string form in a `OnceLock`; the first caller
// publishes it and everyone else gets the same allocation.

pub mod error;
pub mod escape;
pub mod symbol;

pub use error::{SymbolError, SymbolResult};
pub use symbol::{InternerStats, Symbol, SymbolTable};

//! Feature usage tracking.
//!
//! Lowering rules record every runtime-support construct they rely on at the
//! point of use. After traversal the preamble emitter reads the final set
//! once and emits only what was recorded. Flags are only ever added.

use std::collections::BTreeSet;

use bitflags::bitflags;

use crate::runtime::Helper;

bitflags! {
    /// Optional runtime-support units a program may need.
    ///
    /// A flag means "used somewhere in this program"; what it pulls into the
    /// preamble depends on the target.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Features: u64 {
        // === Collections (bits 0-7) ===

        /// Ordered sequences (`lista`).
        const LISTA = 1 << 0;
        /// Associative maps (`tabula`).
        const TABULA = 1 << 1;
        /// Unique sets (`copia`).
        const COPIA = 1 << 2;

        // === Error model (bits 8-15) ===

        /// Fatal raise (`mori`).
        const PANIC = 1 << 8;
        /// Recoverable raise (`iace`).
        const RAISE = 1 << 9;

        // === Concurrency (bits 16-23) ===

        /// Asynchronous functions or awaits.
        const ASYNC = 1 << 16;
        /// Generator functions.
        const GENERATOR = 1 << 17;
        /// Async stream iteration.
        const STREAM = 1 << 18;
        /// Event-loop entry points and combinators (Python `asyncio.run`,
        /// `asyncio.gather`).
        const ASYNCIO = 1 << 19;

        // === Language constructs (bits 24-31) ===

        /// Decimal literals or types.
        const DECIMAL = 1 << 24;
        /// `ordo` declarations.
        const ENUM = 1 << 25;
        /// `praefixum` blocks.
        const COMPTIME = 1 << 26;
        /// Record-like classes (Python dataclasses).
        const DATACLASS = 1 << 27;
        /// Structural interfaces (Python protocols).
        const PROTOCOL = 1 << 28;
        /// Function types in annotations.
        const CALLABLE = 1 << 29;
        /// The dynamic top type.
        const ANY = 1 << 30;

        // === Library units (bits 32-63) ===

        /// The target's standard library import (Zig `std`).
        const STD = 1 << 32;
        /// Formatted console output.
        const PRINT = 1 << 33;
        /// Owned strings.
        const STRING = 1 << 34;
        /// Fixed-width integers.
        const CSTDINT = 1 << 35;
        /// Optional values.
        const OPTIONAL = 1 << 36;
        /// Sum types.
        const VARIANT = 1 << 37;
        /// Type-erased callables.
        const FUNCTIONAL = 1 << 38;
        /// Generic algorithms.
        const ALGORITHM = 1 << 39;
        /// Numeric folds.
        const NUMERIC = 1 << 40;
        /// Range adaptors.
        const RANGES = 1 << 41;
        /// String formatting.
        const FORMAT = 1 << 42;
        /// Runtime assertions.
        const CASSERT = 1 << 43;
        /// Standard exception types.
        const STDEXCEPT = 1 << 44;
        /// Random numbers.
        const RANDOM = 1 << 45;
        /// Interpreter access (Python `sys`).
        const SYS = 1 << 46;
        /// Higher-order function utilities.
        const FUNCTOOLS = 1 << 47;
        /// Iterator and generator type annotations.
        const ITERATOR = 1 << 48;
        /// Futures.
        const FUTURE = 1 << 49;
        /// Process control (abort, exit).
        const CSTDLIB = 1 << 50;
        /// Scoped resource helpers (Python `contextlib`).
        const CONTEXT = 1 << 51;
    }
}

/// The feature tracker for one generation run.
///
/// Created empty, owned by exactly one generator context, and read once by
/// the preamble emitter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredFeatures {
    flags: Features,
    helpers: BTreeSet<Helper>,
}

impl RequiredFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `features` are used.
    #[inline]
    pub fn require(&mut self, features: Features) {
        self.flags |= features;
    }

    /// Record that a runtime helper function is used.
    #[inline]
    pub fn require_helper(&mut self, helper: Helper) {
        self.helpers.insert(helper);
    }

    /// Whether every flag in `features` has been recorded.
    #[inline]
    pub fn contains(&self, features: Features) -> bool {
        self.flags.contains(features)
    }

    #[inline]
    pub fn flags(&self) -> Features {
        self.flags
    }

    /// Recorded helpers, in a stable order.
    pub fn helpers(&self) -> impl Iterator<Item = Helper> + '_ {
        self.helpers.iter().copied()
    }

    /// Nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.helpers.is_empty()
    }
}

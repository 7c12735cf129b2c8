//! Stack growth for deeply nested trees.
//!
//! Lowering recurses once per nesting level. A generated or pathological
//! tree (long `a + b + c + ...` chains, deeply nested blocks) can exceed the
//! default thread stack, so recursive entry points run under
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets**: grow the stack on demand with `stacker`.
//! - **WASM**: plain call; the runtime manages its own stack.

/// If less than this remains, grow before recursing (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

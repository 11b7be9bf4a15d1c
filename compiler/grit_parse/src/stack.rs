//! Native stack headroom for deeply recursive grammars.
//!
//! The recursion ceiling in [`ParserConfig`](crate::ParserConfig) is what
//! should stop a runaway grammar. Each guarded rule body runs through
//! [`ensure_sufficient_stack`] so a ceiling of a few thousand levels does not
//! hit the thread's native stack limit first.
//!
//! On wasm32 the closure is called directly.

/// Grow when less than this much stack is left (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, switching to a fresh stack segment first if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

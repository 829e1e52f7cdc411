//! Stack growth for recursive reduction and evaluation.
//!
//! Parenthesized groups, index arguments, ternary branches and initializer
//! lists are each reduced by a recursive call, and evaluation walks the
//! resulting tree recursively. Both entry points wrap their recursion in
//! [`ensure_sufficient_stack`] so that a deeply nested expression grows the
//! stack instead of overflowing it.
//!
//! On `wasm32` the call is a passthrough.

/// Remaining stack below which we grow (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (1MB).
const SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;

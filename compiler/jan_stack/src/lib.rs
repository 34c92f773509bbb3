//! Stack growth for the recursive parser and evaluator.
//!
//! Janitor scripts are evaluated by walking the syntax tree recursively, and
//! script functions may recurse without bound. Every recursive entry point
//! (expression parsing, expression evaluation, function calls) runs its body
//! through [`ensure_sufficient_stack`], which grows the native stack in
//! segments once the remaining space drops under a red zone.
//!
//! On `wasm32` the call is a plain passthrough; the evaluator bounds call
//! depth there instead (see `RunLimits` in `jan_eval`).

/// Space that must remain before we grow (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Passthrough on `wasm32`.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Whether native stack growth is available on this target.
///
/// Hosts use this to decide whether an explicit recursion limit is needed.
pub const fn grows_stack() -> bool {
    cfg!(not(target_arch = "wasm32"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nesting_depth(text: &str) -> usize {
        fn walk(bytes: &[u8], pos: usize) -> usize {
            ensure_sufficient_stack(|| match bytes.get(pos) {
                Some(b'(') => 1 + walk(bytes, pos + 1),
                _ => 0,
            })
        }
        walk(text.as_bytes(), 0)
    }

    #[test]
    fn shallow_nesting() {
        assert_eq!(nesting_depth("((()))"), 3);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let text = "(".repeat(200_000);
        assert_eq!(nesting_depth(&text), 200_000);
    }

    #[test]
    fn passes_result_through() {
        let result: Result<i64, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn native_targets_grow() {
        assert_eq!(grows_stack(), cfg!(not(target_arch = "wasm32")));
    }
}

//! Stack growth for recursive walks over declaration shapes and type graphs.
//!
//! Shape translation, complexity measurement, deep copies and the inlining
//! chase all recurse once per nesting level. Declarations are written by
//! people and usually shallow, but generated sources can nest slices of
//! maps of pointers arbitrarily deep, so every recursive entry point wraps
//! its body in [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown through `stacker`; on WASM the
//! closure is called directly.

/// Remaining stack below which a new segment is allocated (64KB).
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn complexity(&self, id: NodeId) -> usize {
///     ensure_sufficient_stack(|| match self.kind(id) {
///         TypeKind::Slice(elem) => 1 + self.complexity(*elem),
///         _ => 1,
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_depth_survives() {
        fn nest(depth: u64) -> u64 {
            ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
        }

        assert_eq!(nest(100_000), 100_000);
    }

    #[test]
    fn passes_result_through() {
        let result: Result<u32, &str> = ensure_sufficient_stack(|| Ok(5));
        assert_eq!(result, Ok(5));
    }
}

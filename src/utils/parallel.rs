#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
use rayon::prelude::*;

/// Below this many items the work is done on the calling thread.
const PARALLEL_THRESHOLD: usize = 256;

/// Maps `f` over `collection`, returning results in input order.
///
/// Fans out over the rayon pool for large inputs when the `parallel` feature
/// is enabled; `f` must therefore be free of side effects that depend on call
/// order.
#[inline]
pub fn map_ordered<T, R, F>(collection: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        // Heuristic: Don't spin up Rayon for small grids
        if collection.len() > PARALLEL_THRESHOLD {
            collection.par_iter().map(f).collect()
        } else {
            collection.iter().map(f).collect()
        }
    }
    #[cfg(any(not(feature = "parallel"), target_arch = "wasm32"))]
    {
        collection.iter().map(f).collect()
    }
}

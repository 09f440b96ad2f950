//! Memory Arena

use bumpalo::Bump;

/// Default initial capacity of a worker's arena in bytes.
pub const DEFAULT_ARENA_CAPACITY: usize = 256 * 1024;

/// A per-worker bump allocator for data that only lives while a single pixel
/// sample is being evaluated. Allocations are never freed individually; the
/// whole arena is reset with `free_all()` once the sample's radiance has been
/// handed to the film. The largest chunk is retained across resets so steady
/// state rendering does not touch the global allocator.
///
/// `free_all()` requires exclusive access, so the borrow checker rejects any
/// reference into the arena that would outlive the sample it was made for.
pub struct MemoryArena {
    /// The backing bump allocator.
    bump: Bump,
}

impl MemoryArena {
    /// Create a new `MemoryArena`.
    ///
    /// * `capacity` - Initial capacity in bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Allocate a value in the arena and return a mutable reference to it.
    ///
    /// * `value` - The value to move into the arena.
    pub fn alloc<T>(&self, value: T) -> &mut T {
        self.bump.alloc(value)
    }

    /// Allocate a slice of `len` values produced by `f(index)`.
    ///
    /// * `len` - Number of elements.
    /// * `f`   - Produces the element for each index.
    pub fn alloc_slice_fill_with<T, F>(&self, len: usize, f: F) -> &mut [T]
    where
        F: FnMut(usize) -> T,
    {
        self.bump.alloc_slice_fill_with(len, f)
    }

    /// Allocate a copy of a slice.
    ///
    /// * `src` - The slice to copy.
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &mut [T] {
        self.bump.alloc_slice_copy(src)
    }

    /// Returns the underlying allocator for estimators that build their own
    /// arena-backed collections (e.g. `bumpalo::collections::Vec`).
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    /// Number of bytes currently handed out or reserved by the arena's chunks.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Invalidate every allocation made since the last reset. Destructors of
    /// values allocated in the arena are not run.
    pub fn free_all(&mut self) {
        self.bump.reset();
    }
}

impl Default for MemoryArena {
    /// Returns an arena with `DEFAULT_ARENA_CAPACITY`.
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_all_reuses_backing_storage() {
        let mut arena = MemoryArena::new(4096);

        let first = arena.alloc(0xdead_beef_u64) as *mut u64 as usize;
        arena.free_all();
        let value = arena.alloc(7_u64);
        let second = value as *mut u64 as usize;

        assert_eq!(first, second);
        assert_eq!(*value, 7);
    }

    #[test]
    fn reset_does_not_expose_previous_sample_data() {
        let mut arena = MemoryArena::new(4096);

        {
            let old = arena.alloc_slice_copy(&[1.0_f32, 2.0, 3.0]);
            old[0] = 42.0;
        }
        arena.free_all();

        let fresh = arena.alloc_slice_fill_with(3, |i| i as f32 * 10.0);
        assert_eq!(fresh, &[0.0, 10.0, 20.0]);
    }

    #[test]
    fn steady_state_does_not_grow() {
        let mut arena = MemoryArena::new(4096);
        arena.alloc_slice_fill_with(512, |i| i as u32);
        arena.free_all();
        let before = arena.allocated_bytes();
        for _ in 0..100 {
            arena.alloc_slice_fill_with(512, |i| i as u32);
            arena.free_all();
        }
        assert_eq!(arena.allocated_bytes(), before);
    }
}

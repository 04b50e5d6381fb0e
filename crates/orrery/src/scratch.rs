//! Bump-allocated scratch memory for per-tick temporaries.
//!
//! A [`ScratchArena`] hands out spans from a preallocated buffer by bumping an
//! offset. Nothing is freed individually: callers take a checkpoint, reserve
//! what they need, and roll the offset back when done. Used that way the arena
//! behaves like a stack and its high-water mark is bounded by the largest
//! single transient need, not by how many times it has been used.
//!
//! # Example
//!
//! ```
//! use orrery::scratch::ScratchArena;
//!
//! let mut arena: ScratchArena<f64> = ScratchArena::new(8);
//! {
//!     let mut scope = arena.checkpoint();
//!     let span = scope.reserve(4).unwrap();
//!     scope.slice_mut(span).fill(1.0);
//!     assert_eq!(scope.offset(), 4);
//! }
//! // Dropping the scope rolled the arena back
//! assert_eq!(arena.offset(), 0);
//! assert_eq!(arena.high_water_mark(), 4);
//! ```

use std::ops::{Deref, DerefMut, Range};

/// Default scratch capacity, in elements
pub const DEFAULT_SCRATCH_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scratch arena exhausted: requested {requested} elements, {available} available")]
pub struct ScratchError {
    pub requested: usize,
    pub available: usize,
}

/// A reserved region of a [`ScratchArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchSpan {
    start: usize,
    len: usize,
}

impl ScratchSpan {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Fixed-capacity bump allocator over elements of type `T`
#[derive(Debug, Clone)]
pub struct ScratchArena<T> {
    slots: Vec<T>,
    offset: usize,
    high_water: usize,
}

impl<T: Copy + Default> ScratchArena<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity],
            offset: 0,
            high_water: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current bump offset, usable later with [`ScratchArena::restore`]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn available(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Largest offset ever reached
    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    /// Bumps the offset by `len` elements. The returned span is zero-filled
    /// (`T::default()`).
    pub fn reserve(&mut self, len: usize) -> Result<ScratchSpan, ScratchError> {
        if len > self.available() {
            return Err(ScratchError {
                requested: len,
                available: self.available(),
            });
        }

        let span = ScratchSpan {
            start: self.offset,
            len,
        };
        self.slots[span.range()].fill(T::default());
        self.offset += len;
        self.high_water = self.high_water.max(self.offset);
        Ok(span)
    }

    /// Rolls the offset back to a value previously read from
    /// [`ScratchArena::offset`]. Offsets past the current one are ignored.
    pub fn restore(&mut self, offset: usize) {
        if offset <= self.offset {
            self.offset = offset;
        } else {
            log::warn!(
                "ignoring scratch restore forward from {} to {}",
                self.offset,
                offset
            );
        }
    }

    /// Records the current offset and restores it when the returned scope is
    /// dropped, whichever way the caller leaves.
    pub fn checkpoint(&mut self) -> ScratchScope<'_, T> {
        let mark = self.offset;
        ScratchScope { arena: self, mark }
    }

    pub fn slice_mut(&mut self, span: ScratchSpan) -> &mut [T] {
        debug_assert!(span.range().end <= self.offset, "span used after restore");
        &mut self.slots[span.range()]
    }

    /// Two disjoint spans as mutable slices at once.
    ///
    /// # Panics
    ///
    /// Panics if the spans overlap.
    pub fn pair_mut(&mut self, first: ScratchSpan, second: ScratchSpan) -> (&mut [T], &mut [T]) {
        let (lo, hi, swapped) = if first.start <= second.start {
            (first, second, false)
        } else {
            (second, first, true)
        };
        assert!(lo.range().end <= hi.start, "scratch spans overlap");

        let (head, tail) = self.slots.split_at_mut(hi.start);
        let lo_slice = &mut head[lo.range()];
        let hi_slice = &mut tail[..hi.len];
        if swapped {
            (hi_slice, lo_slice)
        } else {
            (lo_slice, hi_slice)
        }
    }
}

/// Guard returned by [`ScratchArena::checkpoint`].
///
/// Derefs to the arena, so reservations go through the scope. Everything
/// reserved through it is released on drop.
pub struct ScratchScope<'a, T: Copy + Default> {
    arena: &'a mut ScratchArena<T>,
    mark: usize,
}

impl<T: Copy + Default> ScratchScope<'_, T> {
    /// Offset the arena will return to
    pub fn mark(&self) -> usize {
        self.mark
    }
}

impl<T: Copy + Default> Deref for ScratchScope<'_, T> {
    type Target = ScratchArena<T>;

    fn deref(&self) -> &Self::Target {
        self.arena
    }
}

impl<T: Copy + Default> DerefMut for ScratchScope<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.arena
    }
}

impl<T: Copy + Default> Drop for ScratchScope<'_, T> {
    fn drop(&mut self) {
        self.arena.restore(self.mark);
    }
}

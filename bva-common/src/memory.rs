//! Typed-index arrays and heap-usage accounting
//!
//! The index type of an [Array](struct.Array.html) is part of its type, so
//! an occurrence table indexed by literals cannot accidentally be indexed
//! with a variable or a clause handle. Bounds checking is compile-time
//! configurable and off in release builds.

use crate::config;
use std::{
    marker::PhantomData,
    mem::size_of,
    ops::{Index, IndexMut},
    slice,
};

/// Trait for types that can be used as an array index.
pub trait Offset {
    fn as_offset(self) -> usize;
}

impl Offset for usize {
    fn as_offset(self) -> usize {
        self
    }
}

/// A trait for objects that can report their memory usage on the heap
pub trait HeapSpace {
    /// The number of bytes allocated on the heap that this owns.
    fn heap_space(&self) -> usize;
}

impl<T: HeapSpace> HeapSpace for Vec<T> {
    fn heap_space(&self) -> usize {
        self.capacity() * size_of::<T>()
            + self.iter().fold(0, |sum, item| sum + item.heap_space())
    }
}

impl HeapSpace for i8 {
    fn heap_space(&self) -> usize {
        0
    }
}

impl HeapSpace for u32 {
    fn heap_space(&self) -> usize {
        0
    }
}

impl HeapSpace for usize {
    fn heap_space(&self) -> usize {
        0
    }
}

/// Convert bytes to megabytes for readability.
pub fn format_memory_usage(bytes: usize) -> String {
    format!("{:12}", bytes >> 20) // MB
}

/// Check that an offset is below the given size.
/// # Panics
/// Panics if bounds checking is enabled and the index is out of bounds.
pub fn assert_in_bounds(size: usize, offset: usize) {
    if config::ENABLE_BOUNDS_CHECKING {
        assert!(
            offset < size,
            "array index out of bounds: {} (size is {})",
            offset,
            size
        );
    }
}

/// A growable array with strongly-typed indexing.
///
/// Unlike a plain `Vec` this can only be indexed by the type given as the
/// first template argument. [resize](#method.resize) grows the array when a
/// larger variable range is needed; it never shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Array<I: Offset, T> {
    data: Vec<T>,
    /// Zero-sized field, since `I` is not used in any other field.
    phantom: PhantomData<I>,
}

impl<I: Offset, T: Clone> Array<I, T> {
    /// Create a new array of size `size` with all elements set to `value`.
    pub fn new(value: T, size: usize) -> Array<I, T> {
        Array {
            data: vec![value; size],
            phantom: PhantomData,
        }
    }
    /// Grow the array to `new_size` elements, filling with `value`.
    pub fn resize(&mut self, new_size: usize, value: T) {
        requires!(new_size >= self.data.len());
        self.data.resize(new_size, value);
    }
}

impl<I: Offset, T> Array<I, T> {
    /// Returns the size of the array.
    pub fn size(&self) -> usize {
        self.data.len()
    }
    /// Iterate over the elements.
    pub fn iter(&self) -> slice::Iter<T> {
        self.data.iter()
    }
    /// Iterate mutably over the elements.
    pub fn iter_mut(&mut self) -> slice::IterMut<T> {
        self.data.iter_mut()
    }
}

impl<I: Offset, T> Index<I> for Array<I, T> {
    type Output = T;
    fn index(&self, key: I) -> &T {
        let offset = key.as_offset();
        assert_in_bounds(self.size(), offset);
        unsafe { self.data.get_unchecked(offset) }
    }
}

impl<I: Offset, T> IndexMut<I> for Array<I, T> {
    fn index_mut(&mut self, key: I) -> &mut T {
        let offset = key.as_offset();
        assert_in_bounds(self.size(), offset);
        unsafe { self.data.get_unchecked_mut(offset) }
    }
}

impl<I: Offset, T: HeapSpace> HeapSpace for Array<I, T> {
    fn heap_space(&self) -> usize {
        self.data.heap_space()
    }
}

//! Static field layout tables.
//!
//! Every protocol has exactly one table describing the byte offset and length
//! of its fixed-position fields. Fixed fields are literal constants, every
//! derived position is computed from the preceding field with
//! [`Field::followed_by()`] so that fields referencing each other cannot drift
//! apart. Tables are `const` items: evaluated at compile time, immutable and
//! shared by every frame instance.
//!
//! Fields within a table must neither overlap nor have negative offsets. This
//! holds by construction and is asserted at compile time in each table.

use core::ops::Range;

pub mod block_ack_request;
pub mod ethernet;
pub mod mac;

/// Byte offset and length of a field relative to the start of its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub length: usize,
}

impl Field {
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// The field of the given length immediately following this one.
    pub const fn followed_by(&self, length: usize) -> Self {
        Self::new(self.end(), length)
    }

    /// Index of the first byte after the field.
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }

    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Whether this field ends at or before the start of `other`.
    pub const fn precedes(&self, other: &Field) -> bool {
        self.end() <= other.offset
    }
}

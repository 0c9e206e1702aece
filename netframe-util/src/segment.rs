//! A zero-copy window over a byte buffer.
//!
//! All frames read and write their fields through a [`ByteSegment`]. A segment
//! is a backing buffer plus an offset and a logical length. The logical length
//! bounds what a frame may address, it may be shorter than the bytes
//! physically available behind the offset (e.g. an encapsulated frame only
//! sees its own part of the parent's buffer).
//!
//! Nested frames borrow sub-windows from their parent's segment. Writes
//! through a mutable sub-window are therefore visible to the parent. Growing a
//! segment requires exclusive access to its owner, i.e. no child view may be
//! alive at that moment. This is enforced by the borrow checker rather than
//! at runtime.
//!
//! Growth is copy-on-grow: when a window must become larger than its backing
//! buffer allows, a fresh buffer of exactly the requested length is allocated
//! and the window's current content is copied over.

use alloc::{vec, vec::Vec};
use core::ops::Range;

use byteorder::ByteOrder;

use crate::{debug, endian, Error, Result};

/// Backing storage that a segment can allocate from scratch.
pub trait SegmentBuffer: AsRef<[u8]> + AsMut<[u8]> + Sized {
    /// Allocates a zeroed buffer of exactly `length` bytes.
    fn allocate(length: usize) -> Result<Self>;
}

impl SegmentBuffer for Vec<u8> {
    fn allocate(length: usize) -> Result<Self> {
        Ok(vec![0; length])
    }
}

impl<const N: usize> SegmentBuffer for heapless::Vec<u8, N> {
    fn allocate(length: usize) -> Result<Self> {
        let mut buffer = heapless::Vec::new();
        buffer
            .resize(length, 0)
            .map_err(|_| Error::CapacityExceeded {
                requested: length,
                capacity: N,
            })?;
        Ok(buffer)
    }
}

/// Borrowed windows, e.g. a child frame's view into its parent, cannot be
/// reallocated. They can only be encoded in place.
impl SegmentBuffer for &mut [u8] {
    fn allocate(length: usize) -> Result<Self> {
        Err(Error::CapacityExceeded {
            requested: length,
            capacity: 0,
        })
    }
}

/// A bounds-delimited window over a byte buffer.
///
/// Invariant: `offset + length <= capacity` where `capacity` is the length of
/// the backing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSegment<Bytes> {
    bytes: Bytes,
    offset: usize,
    length: usize,
}

impl<Bytes: AsRef<[u8]>> ByteSegment<Bytes> {
    /// Wraps the complete buffer.
    pub fn new(bytes: Bytes) -> Self {
        let length = bytes.as_ref().len();
        Self {
            bytes,
            offset: 0,
            length,
        }
    }

    /// Wraps the window `offset..offset + length` of the given buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the window does not fit the buffer.
    pub fn wrap(bytes: Bytes, offset: usize, length: usize) -> Result<Self> {
        let capacity = bytes.as_ref().len();
        if !fits(offset, length, capacity) {
            return Err(Error::InvalidRange {
                offset,
                length,
                capacity,
            });
        }

        Ok(Self {
            bytes,
            offset,
            length,
        })
    }

    /// Offset of the window into the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Logical length of the window.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Length of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.bytes.as_ref().len()
    }

    /// The bytes of the window.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes.as_ref()[self.offset..self.offset + self.length]
    }

    /// The complete backing buffer, including bytes outside the window.
    pub fn buffer(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Updates the logical length without touching the backing buffer.
    ///
    /// Growing a window past its backing buffer requires
    /// [`Self::ensure_capacity()`] first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the new window would not fit.
    pub fn set_length(&mut self, length: usize) -> Result<()> {
        let capacity = self.capacity();
        if !fits(self.offset, length, capacity) {
            return Err(Error::InvalidRange {
                offset: self.offset,
                length,
                capacity,
            });
        }

        self.length = length;
        Ok(())
    }

    pub fn byte_at(&self, index: usize) -> Result<u8> {
        let range = self.range(index, 1)?;
        Ok(self.bytes.as_ref()[range.start])
    }

    pub fn slice(&self, start: usize, length: usize) -> Result<&[u8]> {
        let range = self.range(start, length)?;
        Ok(&self.bytes.as_ref()[range])
    }

    pub fn read_u16<E: ByteOrder>(&self, at: usize) -> Result<u16> {
        let range = self.range(at, 2)?;
        Ok(endian::read_u16::<E>(self.bytes.as_ref(), range.start))
    }

    pub fn read_u32<E: ByteOrder>(&self, at: usize) -> Result<u32> {
        let range = self.range(at, 4)?;
        Ok(endian::read_u32::<E>(self.bytes.as_ref(), range.start))
    }

    pub fn read_u64<E: ByteOrder>(&self, at: usize) -> Result<u64> {
        let range = self.range(at, 8)?;
        Ok(endian::read_u64::<E>(self.bytes.as_ref(), range.start))
    }

    /// Borrows a read-only child window sharing this segment's buffer.
    ///
    /// `start` is relative to this segment.
    pub fn sub_segment(&self, start: usize, length: usize) -> Result<ByteSegment<&[u8]>> {
        if !fits(start, length, self.length) {
            return Err(Error::InvalidRange {
                offset: start,
                length,
                capacity: self.length,
            });
        }

        Ok(ByteSegment {
            bytes: self.bytes.as_ref(),
            offset: self.offset + start,
            length,
        })
    }

    /// Converts a segment-relative range into an absolute buffer range.
    fn range(&self, start: usize, length: usize) -> Result<Range<usize>> {
        if !fits(start, length, self.length) {
            return Err(Error::OutOfRange {
                start,
                length,
                segment_length: self.length,
            });
        }

        let start = self.offset + start;
        Ok(start..start + length)
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ByteSegment<Bytes> {
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let range = self.offset..self.offset + self.length;
        &mut self.bytes.as_mut()[range]
    }

    pub fn set_byte(&mut self, index: usize, value: u8) -> Result<()> {
        let range = self.range(index, 1)?;
        self.bytes.as_mut()[range.start] = value;
        Ok(())
    }

    pub fn slice_mut(&mut self, start: usize, length: usize) -> Result<&mut [u8]> {
        let range = self.range(start, length)?;
        Ok(&mut self.bytes.as_mut()[range])
    }

    /// Copies `src` into the window starting at `start`.
    pub fn write_slice(&mut self, start: usize, src: &[u8]) -> Result<()> {
        self.slice_mut(start, src.len())?.copy_from_slice(src);
        Ok(())
    }

    pub fn write_u16<E: ByteOrder>(&mut self, at: usize, value: u16) -> Result<()> {
        let range = self.range(at, 2)?;
        endian::write_u16::<E>(self.bytes.as_mut(), range.start, value);
        Ok(())
    }

    pub fn write_u32<E: ByteOrder>(&mut self, at: usize, value: u32) -> Result<()> {
        let range = self.range(at, 4)?;
        endian::write_u32::<E>(self.bytes.as_mut(), range.start, value);
        Ok(())
    }

    pub fn write_u64<E: ByteOrder>(&mut self, at: usize, value: u64) -> Result<()> {
        let range = self.range(at, 8)?;
        endian::write_u64::<E>(self.bytes.as_mut(), range.start, value);
        Ok(())
    }

    /// Borrows a mutable child window sharing this segment's buffer.
    ///
    /// `start` is relative to this segment.
    pub fn sub_segment_mut(
        &mut self,
        start: usize,
        length: usize,
    ) -> Result<ByteSegment<&mut [u8]>> {
        if !fits(start, length, self.length) {
            return Err(Error::InvalidRange {
                offset: start,
                length,
                capacity: self.length,
            });
        }

        Ok(ByteSegment {
            offset: self.offset + start,
            bytes: self.bytes.as_mut(),
            length,
        })
    }
}

impl<Bytes: SegmentBuffer> ByteSegment<Bytes> {
    /// Allocates a fresh zeroed segment of exactly `length` bytes.
    pub fn allocate(length: usize) -> Result<Self> {
        Ok(Self {
            bytes: Bytes::allocate(length)?,
            offset: 0,
            length,
        })
    }

    /// Makes sure that the window can be extended to `length` bytes.
    ///
    /// If the backing buffer is too small, a new buffer of exactly `length`
    /// bytes is allocated, the current window is copied to its start and the
    /// segment is rebound to it. The logical length is not changed, use
    /// [`Self::set_length()`] afterwards.
    pub fn ensure_capacity(&mut self, length: usize) -> Result<()> {
        if fits(self.offset, length, self.capacity()) {
            return Ok(());
        }

        debug!("reallocating segment to {} bytes", length);
        let mut bytes = Bytes::allocate(length)?;
        bytes.as_mut()[..self.length].copy_from_slice(self.as_bytes());
        self.bytes = bytes;
        self.offset = 0;
        Ok(())
    }
}

impl<Bytes: AsRef<[u8]>> AsRef<[u8]> for ByteSegment<Bytes> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

const fn fits(offset: usize, length: usize, capacity: usize) -> bool {
    match offset.checked_add(length) {
        Some(end) => end <= capacity,
        None => false,
    }
}

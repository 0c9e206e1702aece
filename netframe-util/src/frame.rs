//! This module exposes the generic trait implemented by every buffer-backed
//! protocol frame, independent of the protocol layer.
//!
//! A frame is a structured view over a [`ByteSegment`]. Frames are either
//! parsed from the wire, in which case their fields are decoded lazily from
//! the segment on every access, or built from values, in which case no
//! segment exists until the frame is first recomputed.
//!
//! Reads and writes are asymmetric:
//! - Field getters are total. If the bytes of a field are missing (the frame
//!   was truncated on the wire) the getter returns the protocol's default
//!   value instead of failing.
//! - Field setters only update in-memory state. The segment is stale until
//!   [`Frame::recompute()`] re-encodes all fields, sizing the segment first.

use crate::{debug, ByteSegment, Result, SegmentBuffer};

/// Generic representation of a buffer-backed structured frame.
pub trait Frame {
    type Bytes: AsRef<[u8]>;

    /// Wraps an existing segment without decoding any field.
    fn parse(segment: ByteSegment<Self::Bytes>) -> Self
    where
        Self: Sized;

    /// The segment backing the frame, [`None`] for a frame built from values
    /// that has not been recomputed yet.
    fn segment(&self) -> Option<&ByteSegment<Self::Bytes>>;

    /// Releases the segment backing the frame.
    fn into_segment(self) -> Option<ByteSegment<Self::Bytes>>
    where
        Self: Sized;

    /// The exact number of bytes [`Self::recompute()`] will produce for the
    /// frame's current semantic state.
    fn frame_size(&self) -> usize;

    /// Re-encodes all semantic fields into the segment.
    ///
    /// If the frame has no segment yet or the segment is shorter than
    /// [`Self::frame_size()`], a fresh segment of exactly that size is
    /// allocated first. Afterwards the segment's length equals the frame size.
    /// Recomputing twice without intervening mutation yields identical bytes.
    /// If recomputing fails the frame keeps its segment and pending values.
    fn recompute(&mut self) -> Result<()>
    where
        Self::Bytes: SegmentBuffer;

    /// Recomputes the frame and returns its wire bytes.
    fn encode(&mut self) -> Result<&[u8]>
    where
        Self::Bytes: SegmentBuffer,
    {
        self.recompute()?;
        Ok(self
            .segment()
            .map(ByteSegment::as_bytes)
            .unwrap_or_default())
    }
}

/// Encodes a frame of `frame_size` bytes into the frame's segment.
///
/// The current segment is reused if it holds at least `frame_size` bytes.
/// Otherwise `encode` runs on a fresh zeroed segment, since bytes of a too
/// short segment belong to prior content. `encode` returns the end of the
/// last byte it wrote, which must be `frame_size`. Afterwards the segment's
/// length is `frame_size`.
///
/// If allocation or encoding fails the frame keeps its segment and its
/// length. A fresh segment is only installed once it is completely encoded.
///
/// # Panics
///
/// Panics if `encode` does not end exactly at `frame_size`.
pub fn encode_sized<Bytes, F>(
    segment: &mut Option<ByteSegment<Bytes>>,
    frame_size: usize,
    encode: F,
) -> Result<()>
where
    Bytes: SegmentBuffer,
    F: FnOnce(&mut ByteSegment<Bytes>) -> Result<usize>,
{
    match segment {
        Some(current) if current.len() >= frame_size => {
            let end = encode(current)?;
            assert_eq!(end, frame_size, "encoded frame size mismatch");
            current.set_length(frame_size)
        }
        _ => {
            debug!("allocating segment for a {} byte frame", frame_size);
            let mut fresh = ByteSegment::allocate(frame_size)?;
            let end = encode(&mut fresh)?;
            assert_eq!(end, frame_size, "encoded frame size mismatch");
            *segment = Some(fresh);
            Ok(())
        }
    }
}

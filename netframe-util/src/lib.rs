//! This crate contains generic utilities the netframe crates depend upon but
//! not directly related to any particular network protocol.
//!
//! The main pieces are the zero-copy [`segment::ByteSegment`] all frames read
//! and write through, the fixed-endianness [`endian`] codec and the generic
//! [`frame::Frame`] trait implemented by every protocol frame.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod endian;
pub mod frame;
pub mod segment;

pub mod log;

#[cfg(any(feature = "defmt", feature = "log"))]
pub use self::log::*;

pub use frame::Frame;
pub use segment::{ByteSegment, SegmentBuffer};

/// Errors surfaced by segment construction, resizing and checked field access.
///
/// Truncated fields are not represented here: frame getters
/// resolve them to protocol defaults instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A segment window does not fit its backing buffer.
    #[error("window {offset}+{length} exceeds buffer capacity {capacity}")]
    InvalidRange {
        offset: usize,
        length: usize,
        capacity: usize,
    },
    /// A segment-relative access lies outside the segment's logical length.
    #[error("access {start}+{length} outside segment of length {segment_length}")]
    OutOfRange {
        start: usize,
        length: usize,
        segment_length: usize,
    },
    /// A fixed-capacity backing buffer cannot hold the requested length.
    #[error("buffer of capacity {capacity} cannot hold {requested} bytes")]
    CapacityExceeded { requested: usize, capacity: usize },
    /// The frame has no address field for the given slot.
    #[error("address slot {slot} is absent")]
    AddressAbsent { slot: usize },
    /// A textual address could not be parsed.
    #[error("invalid address")]
    InvalidAddress,
}

/// A type alias for `Result<T, netframe_util::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

//! Lazy-decoding, zero-copy frame parsing and building for Ethernet and
//! IEEE 802.11.
//!
//! Frames are views over a [`ByteSegment`]. Parsing a frame never decodes
//! anything up front: every getter decodes its field from the segment on each
//! call and falls back to a default value if the frame is truncated. Setters
//! only change in-memory state, the segment is rewritten on
//! [`Frame::recompute()`]:
//!
//! ```
//! use netframe::{ethernet::{EtherType, EthernetFrame}, Frame};
//!
//! let mut frame = EthernetFrame::<Vec<u8>>::new(
//!     "aa:bb:cc:dd:ee:ff".parse().unwrap(),
//!     "11:22:33:44:55:66".parse().unwrap(),
//!     EtherType::Ipv4,
//! );
//!
//! assert_eq!(
//!     frame.encode().unwrap(),
//!     [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x08, 0x00]
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

extern crate alloc;

pub mod address;
pub mod ethernet;
pub mod fields;
pub mod ieee80211;

pub use address::MacAddress;
pub use netframe_util::{ByteSegment, Error, Frame, Result, SegmentBuffer};

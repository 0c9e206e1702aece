//! Fixed-endianness integer access at a byte offset.
//!
//! These functions are unchecked: callers must guarantee that
//! `offset + width <= buf.len()`, violations panic on slice indexing.
//! Segment-relative, bounds-checked access is provided by
//! [`crate::segment::ByteSegment`] on top of this module.
//!
//! The byte order is a type parameter so that one codec serves little-endian
//! link layers (IEEE 802.11) as well as network order fields (Ethernet).

pub use byteorder::{BigEndian, ByteOrder, LittleEndian, NetworkEndian, BE, LE};

pub fn read_u16<E: ByteOrder>(buf: &[u8], offset: usize) -> u16 {
    E::read_u16(&buf[offset..offset + 2])
}

pub fn read_u32<E: ByteOrder>(buf: &[u8], offset: usize) -> u32 {
    E::read_u32(&buf[offset..offset + 4])
}

pub fn read_u64<E: ByteOrder>(buf: &[u8], offset: usize) -> u64 {
    E::read_u64(&buf[offset..offset + 8])
}

pub fn write_u16<E: ByteOrder>(buf: &mut [u8], offset: usize, value: u16) {
    E::write_u16(&mut buf[offset..offset + 2], value)
}

pub fn write_u32<E: ByteOrder>(buf: &mut [u8], offset: usize, value: u32) {
    E::write_u32(&mut buf[offset..offset + 4], value)
}

pub fn write_u64<E: ByteOrder>(buf: &mut [u8], offset: usize, value: u64) {
    E::write_u64(&mut buf[offset..offset + 8], value)
}

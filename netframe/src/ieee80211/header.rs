//! State and encoding shared by every IEEE 802.11 frame variant.

use core::array;

use crc::{Crc, CRC_32_ISO_HDLC};
use netframe_util::{endian::LE, frame, trace, ByteSegment, Error, Result, SegmentBuffer};

use crate::{
    fields::{mac, Field},
    MacAddress,
};

use super::{resolve_address_field, FrameControl};

/// The 802.11 frame check sequence, transmitted little-endian.
const FCS: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// The MAC header common to all 802.11 frames: frame control, duration and
/// the address slots, plus the frame's optional segment.
///
/// Each field is either pending, i.e. set in memory and not yet encoded, or
/// decoded from the segment on every access. Recomputing the frame encodes
/// all pending values and clears them.
///
/// Address slots are resolved against the current frame control, unless the
/// frame variant pins them to fixed positions. Pinned slots keep a variant's
/// size independent of the frame control it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacHeader<Bytes> {
    segment: Option<ByteSegment<Bytes>>,
    frame_control: Option<FrameControl>,
    duration: Option<u16>,
    addresses: [Option<MacAddress>; 4],
    fixed_addresses: Option<usize>,
    append_fcs: bool,
}

impl<Bytes> MacHeader<Bytes> {
    pub(crate) fn from_segment(segment: ByteSegment<Bytes>) -> Self {
        Self {
            segment: Some(segment),
            frame_control: None,
            duration: None,
            addresses: [None; 4],
            fixed_addresses: None,
            append_fcs: false,
        }
    }

    pub(crate) fn from_frame_control(frame_control: FrameControl) -> Self {
        Self {
            segment: None,
            frame_control: Some(frame_control),
            duration: None,
            addresses: [None; 4],
            fixed_addresses: None,
            append_fcs: false,
        }
    }

    /// Pins the first `count` address slots to their fixed positions.
    pub(crate) fn with_fixed_addresses(mut self, count: usize) -> Self {
        self.fixed_addresses = Some(count.min(mac::ADDRESSES.len()));
        self
    }

    /// Sets a pending address without resolving the slot.
    pub(crate) fn with_address(mut self, slot: usize, address: MacAddress) -> Self {
        self.addresses[slot] = Some(address);
        self
    }

    pub(crate) fn set_address_in(&mut self, slot: usize, address: MacAddress) {
        self.addresses[slot] = Some(address);
    }

    pub fn segment(&self) -> Option<&ByteSegment<Bytes>> {
        self.segment.as_ref()
    }

    /// Gives direct access to the encoded bytes. Changes are reflected by all
    /// field getters whose value is not pending.
    pub fn segment_mut(&mut self) -> Option<&mut ByteSegment<Bytes>> {
        self.segment.as_mut()
    }

    pub fn into_segment(self) -> Option<ByteSegment<Bytes>> {
        self.segment
    }

    /// Whether a frame check sequence trails the frame.
    pub fn append_fcs(&self) -> bool {
        self.append_fcs
    }

    pub fn set_append_fcs(&mut self, append_fcs: bool) {
        self.append_fcs = append_fcs;
    }

    pub fn fcs_length(&self) -> usize {
        if self.append_fcs {
            mac::FCS_LENGTH
        } else {
            0
        }
    }
}

impl<Bytes: AsRef<[u8]>> MacHeader<Bytes> {
    pub fn frame_control(&self) -> FrameControl {
        self.frame_control
            .unwrap_or_else(|| self.encoded_frame_control())
    }

    /// The frame control as currently encoded in the segment, ignoring a
    /// pending value.
    pub fn encoded_frame_control(&self) -> FrameControl {
        FrameControl::from_bits(self.read_u16_or_default(mac::FRAME_CONTROL))
    }

    pub fn set_frame_control(&mut self, frame_control: FrameControl) {
        self.frame_control = Some(frame_control);
    }

    /// Duration or association ID.
    pub fn duration(&self) -> u16 {
        self.duration
            .unwrap_or_else(|| self.read_u16_or_default(mac::DURATION_ID))
    }

    pub fn set_duration(&mut self, duration: u16) {
        self.duration = Some(duration);
    }

    /// The position of an address slot, resolved against the current frame
    /// control unless the slots are pinned.
    pub fn address_field(&self, slot: usize) -> Option<Field> {
        match self.fixed_addresses {
            Some(count) if slot < count => Some(mac::ADDRESSES[slot]),
            Some(_) => None,
            None => {
                let fc = self.frame_control();
                resolve_address_field(slot, fc.frame_type(), fc.subtype(), fc.to_ds(), fc.from_ds())
            }
        }
    }

    /// The address in the given slot, all-zero if the slot's bytes are
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressAbsent`] if the frame has no such slot.
    pub fn address(&self, slot: usize) -> Result<MacAddress> {
        let field = self.address_field(slot).ok_or(Error::AddressAbsent { slot })?;
        Ok(self.address_in(slot, field))
    }

    /// # Errors
    ///
    /// Returns [`Error::AddressAbsent`] if the frame has no such slot.
    pub fn set_address(&mut self, slot: usize, address: MacAddress) -> Result<()> {
        self.address_field(slot)
            .ok_or(Error::AddressAbsent { slot })?;
        self.addresses[slot] = Some(address);
        Ok(())
    }

    /// The pending address of `slot`, otherwise the address decoded from
    /// `field`.
    pub(crate) fn address_in(&self, slot: usize, field: Field) -> MacAddress {
        self.addresses[slot].unwrap_or_else(|| self.read_address_or_default(field))
    }

    /// Decodes a little-endian word, zero if the segment is too short.
    pub(crate) fn read_u16_or_default(&self, field: Field) -> u16 {
        let Some(segment) = &self.segment else {
            return 0;
        };

        segment.read_u16::<LE>(field.offset).unwrap_or_else(|_| {
            trace!("truncated field at {}, {} bytes available", field.offset, segment.len());
            0
        })
    }

    pub(crate) fn read_address_or_default(&self, field: Field) -> MacAddress {
        self.segment
            .as_ref()
            .and_then(|segment| segment.slice(field.offset, field.length).ok())
            .and_then(MacAddress::from_bytes)
            .unwrap_or_else(|| {
                trace!("truncated address at {}", field.offset);
                MacAddress::ZERO
            })
    }

    /// The trailing frame check sequence of an encoded frame of the given
    /// size, [`None`] if no FCS is appended or its bytes are missing.
    pub(crate) fn fcs(&self, frame_size: usize) -> Option<u32> {
        if !self.append_fcs {
            return None;
        }

        self.segment
            .as_ref()?
            .read_u32::<LE>(frame_size.checked_sub(mac::FCS_LENGTH)?)
            .ok()
    }

    /// Checks the trailing frame check sequence against the bytes preceding
    /// it.
    pub(crate) fn is_fcs_valid(&self, frame_size: usize) -> bool {
        let Some(fcs) = self.fcs(frame_size) else {
            return false;
        };

        self.segment
            .as_ref()
            .and_then(|segment| segment.slice(0, frame_size - mac::FCS_LENGTH).ok())
            .is_some_and(|bytes| FCS.checksum(bytes) == fcs)
    }
}

impl<Bytes: SegmentBuffer> MacHeader<Bytes> {
    /// Encodes the header, the body written by `write_body` and the FCS into
    /// a segment of exactly `frame_size` bytes.
    ///
    /// `write_body` gets the end of the last header field written and returns
    /// the end of the body. The current segment is reused if it is large
    /// enough, otherwise a fresh one is allocated. On success no field is
    /// pending. On failure the frame keeps its segment and pending values.
    pub(crate) fn recompute<F>(&mut self, frame_size: usize, write_body: F) -> Result<()>
    where
        F: FnOnce(&mut ByteSegment<Bytes>, usize) -> Result<usize>,
    {
        let frame_control = self.frame_control();
        let duration = self.duration();
        let addresses: [Option<(Field, MacAddress)>; 4] = array::from_fn(|slot| {
            self.address_field(slot)
                .map(|field| (field, self.address_in(slot, field)))
        });
        let append_fcs = self.append_fcs;

        frame::encode_sized(&mut self.segment, frame_size, |segment| {
            segment.write_slice(mac::FRAME_CONTROL.offset, &frame_control.encode())?;
            segment.write_u16::<LE>(mac::DURATION_ID.offset, duration)?;

            let mut end = mac::DURATION_ID.end();
            for (field, address) in addresses.into_iter().flatten() {
                segment.write_slice(field.offset, address.as_ref())?;
                end = end.max(field.end());
            }

            let mut end = write_body(segment, end)?;
            if append_fcs {
                let fcs = FCS.checksum(segment.slice(0, end)?);
                segment.write_u32::<LE>(end, fcs)?;
                end += mac::FCS_LENGTH;
            }

            Ok(end)
        })?;

        self.frame_control = None;
        self.duration = None;
        self.addresses = [None; 4];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::ieee80211::FrameSubtype;

    const RA: MacAddress = MacAddress([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);
    const TA: MacAddress = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);

    #[test]
    fn pending_fields_shadow_segment() {
        let bytes = hex::decode("b4002c0166778899aabb001122334455").unwrap();
        let mut header = MacHeader::from_segment(ByteSegment::new(bytes));

        assert_eq!(header.frame_control().frame_subtype(), FrameSubtype::Rts);
        assert_eq!(header.duration(), 300);
        assert_eq!(header.address(0), Ok(RA));
        assert_eq!(header.address(1), Ok(TA));
        assert_eq!(header.address(2), Err(Error::AddressAbsent { slot: 2 }));

        header.set_duration(0);
        header.set_address(1, MacAddress::BROADCAST).unwrap();
        assert_eq!(header.duration(), 0);
        assert_eq!(header.address(1), Ok(MacAddress::BROADCAST));

        // The segment is stale until recomputed.
        assert_eq!(header.segment().unwrap().slice(2, 2).unwrap(), &[0x2c, 0x01]);

        header.recompute(16, |_, end| Ok(end)).unwrap();
        assert_eq!(
            header.segment().unwrap().as_bytes(),
            hex::decode("b400000066778899aabbffffffffffff").unwrap()
        );
    }

    #[test]
    fn truncated_fields_default() {
        let header = MacHeader::from_segment(ByteSegment::new(&[0xb4u8, 0x00, 0x2c][..]));

        assert_eq!(header.frame_control().frame_subtype(), FrameSubtype::Rts);
        assert_eq!(header.duration(), 0);
        assert_eq!(header.address(0), Ok(MacAddress::ZERO));
        assert_eq!(header.address(1), Ok(MacAddress::ZERO));
    }

    #[test]
    fn direct_segment_changes_are_visible() {
        let mut header = MacHeader::from_segment(ByteSegment::new(Vec::from([0u8; 10])));
        header
            .segment_mut()
            .unwrap()
            .write_slice(0, &[0xd4, 0x00, 0x01, 0x00])
            .unwrap();

        assert_eq!(header.frame_control().frame_subtype(), FrameSubtype::Ack);
        assert_eq!(header.duration(), 1);
    }

    #[test]
    fn fcs() {
        let mut header = MacHeader::<Vec<u8>>::from_frame_control(FrameControl::for_subtype(
            FrameSubtype::Ack,
        ));
        header.set_append_fcs(true);
        header.set_address(0, RA).unwrap();
        header.recompute(14, |_, end| Ok(end)).unwrap();

        let bytes = header.segment().unwrap().as_bytes().to_vec();
        let expected = FCS.checksum(&bytes[..10]);
        assert_eq!(bytes[10..], expected.to_le_bytes());
        assert_eq!(header.fcs(14), Some(expected));
        assert!(header.is_fcs_valid(14));

        header.segment_mut().unwrap().set_byte(4, 0x00).unwrap();
        assert!(!header.is_fcs_valid(14));

        header.set_append_fcs(false);
        assert_eq!(header.fcs(14), None);
    }

    #[test]
    fn failed_allocation_keeps_segment() {
        let mut buffer = [0u8; 8];
        let mut header = MacHeader::from_segment(ByteSegment::new(&mut buffer[..]));

        assert!(header.recompute(10, |_, end| Ok(end)).is_err());
        assert_eq!(header.segment().map(ByteSegment::len), Some(8));
    }

    #[test]
    fn fixed_addresses_ignore_frame_control() {
        let mut header =
            MacHeader::from_segment(ByteSegment::new(Vec::<u8>::new())).with_fixed_addresses(2);

        // An empty segment decodes a management frame control.
        assert_eq!(header.frame_control(), FrameControl::new());
        assert_eq!(header.address(1), Ok(MacAddress::ZERO));
        assert_eq!(header.address(2), Err(Error::AddressAbsent { slot: 2 }));

        header.set_frame_control(
            FrameControl::for_subtype(FrameSubtype::Data)
                .with_to_ds(true)
                .with_from_ds(true),
        );
        header.set_address(1, TA).unwrap();
        assert!(header.set_address(3, TA).is_err());

        header.recompute(16, |_, end| Ok(end)).unwrap();
        assert_eq!(
            header.segment().unwrap().as_bytes(),
            hex::decode("08030000000000000000001122334455").unwrap()
        );
    }

    #[test]
    fn failed_recompute_keeps_segment() {
        let bytes = hex::decode("d400000066778899aabb").unwrap();
        let mut header = MacHeader::from_segment(ByteSegment::new(bytes));
        header.set_duration(7);

        let result = header.recompute(10, |segment, end| {
            segment.write_u16::<LE>(end, 0)?;
            Ok(end + 2)
        });
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert_eq!(header.segment().map(ByteSegment::len), Some(10));
        assert_eq!(header.duration(), 7);
    }

    #[test]
    #[should_panic(expected = "encoded frame size mismatch")]
    fn size_mismatch_panics() {
        let mut header = MacHeader::<Vec<u8>>::from_frame_control(FrameControl::for_subtype(
            FrameSubtype::Ack,
        ));
        let _ = header.recompute(12, |_, end| Ok(end));
    }
}

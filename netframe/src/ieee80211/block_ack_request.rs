//! IEEE 802.11 block acknowledgment request (BlockAckReq) frame.

use core::fmt;

use bitfield_struct::bitfield;
use netframe_util::{endian::LE, ByteSegment, Frame, Result, SegmentBuffer};

use crate::{
    fields::{block_ack_request as fields, mac},
    MacAddress,
};

use super::{fmt_addresses, FrameControl, FrameSubtype, Ieee80211Frame, MacHeader};

/// Acknowledgment policy requested for the BlockAckReq itself.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum BlockAckPolicy {
    /// The recipient answers with a BlockAck immediately.
    Normal = 0,
    NoAck = 1,
}

impl BlockAckPolicy {
    // This has to be a const fn
    pub const fn into_bits(self) -> u8 {
        self as _
    }

    pub const fn from_bits(value: u8) -> Self {
        match value & 0b1 {
            0 => Self::Normal,
            _ => Self::NoAck,
        }
    }
}

/// BAR control field.
///
/// ```notrust
/// +------------+-----------+------------+----------+----------+
/// | Ack Policy | Multi-TID | Compressed | Reserved | TID_INFO |
/// |            |           |   Bitmap   |          |          |
/// +------------+-----------+------------+----------+----------+
///       b0          b1          b2        b3  b11    b12  b15
/// ```
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct BlockAckRequestControl {
    #[bits(1)]
    pub ack_policy: BlockAckPolicy,
    pub multi_tid: bool,
    pub compressed_bitmap: bool,
    #[bits(9)]
    __: u16,
    #[bits(4)]
    pub tid_info: u8,
}

/// Sequence control field.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct SequenceControl {
    #[bits(4)]
    pub fragment_number: u8,
    #[bits(12)]
    pub sequence_number: u16,
}

/// A BlockAckReq frame: receiver and transmitter address followed by the BAR
/// control and starting sequence control fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAckRequestFrame<Bytes> {
    header: MacHeader<Bytes>,
    control: Option<BlockAckRequestControl>,
    starting_sequence_control: Option<u16>,
}

impl<Bytes> BlockAckRequestFrame<Bytes> {
    /// Creates a frame with default control fields. No bytes are encoded
    /// before the frame is recomputed.
    pub fn new(transmitter: MacAddress, receiver: MacAddress) -> Self {
        Self {
            header: MacHeader::from_frame_control(FrameControl::for_subtype(
                FrameSubtype::BlockAckRequest,
            ))
            .with_fixed_addresses(2)
            .with_address(0, receiver)
            .with_address(1, transmitter),
            control: Some(BlockAckRequestControl::new()),
            starting_sequence_control: Some(0),
        }
    }
}

impl<Bytes: AsRef<[u8]>> BlockAckRequestFrame<Bytes> {
    pub fn receiver_address(&self) -> MacAddress {
        self.header.address_in(0, mac::ADDRESS_1)
    }

    pub fn set_receiver_address(&mut self, address: MacAddress) {
        self.header.set_address_in(0, address);
    }

    pub fn transmitter_address(&self) -> MacAddress {
        self.header.address_in(1, mac::ADDRESS_2)
    }

    pub fn set_transmitter_address(&mut self, address: MacAddress) {
        self.header.set_address_in(1, address);
    }

    pub fn control(&self) -> BlockAckRequestControl {
        self.control.unwrap_or_else(|| {
            BlockAckRequestControl::from_bits(self.header.read_u16_or_default(fields::BAR_CONTROL))
        })
    }

    pub fn set_control(&mut self, control: BlockAckRequestControl) {
        self.control = Some(control);
    }

    /// Raw starting sequence control, zero if truncated.
    pub fn starting_sequence_control(&self) -> u16 {
        self.starting_sequence_control.unwrap_or_else(|| {
            self.header
                .read_u16_or_default(fields::STARTING_SEQUENCE_CONTROL)
        })
    }

    pub fn set_starting_sequence_control(&mut self, starting_sequence_control: u16) {
        self.starting_sequence_control = Some(starting_sequence_control);
    }

    /// Sequence number of the first MSDU the block ack is requested for.
    pub fn starting_sequence_number(&self) -> u16 {
        SequenceControl::from_bits(self.starting_sequence_control()).sequence_number()
    }
}

impl<Bytes: AsRef<[u8]>> Frame for BlockAckRequestFrame<Bytes> {
    type Bytes = Bytes;

    fn parse(segment: ByteSegment<Bytes>) -> Self {
        Self {
            header: MacHeader::from_segment(segment).with_fixed_addresses(2),
            control: None,
            starting_sequence_control: None,
        }
    }

    fn segment(&self) -> Option<&ByteSegment<Bytes>> {
        self.header.segment()
    }

    fn into_segment(self) -> Option<ByteSegment<Bytes>> {
        self.header.into_segment()
    }

    fn frame_size(&self) -> usize {
        fields::FRAME_LENGTH + self.header.fcs_length()
    }

    fn recompute(&mut self) -> Result<()>
    where
        Self::Bytes: SegmentBuffer,
    {
        let control = self.control();
        let starting_sequence_control = self.starting_sequence_control();

        self.header.recompute(self.frame_size(), |segment, _| {
            segment.write_u16::<LE>(fields::BAR_CONTROL.offset, control.into_bits())?;
            segment.write_u16::<LE>(
                fields::STARTING_SEQUENCE_CONTROL.offset,
                starting_sequence_control,
            )?;
            Ok(fields::STARTING_SEQUENCE_CONTROL.end())
        })?;

        self.control = None;
        self.starting_sequence_control = None;
        Ok(())
    }
}

impl<Bytes: AsRef<[u8]>> Ieee80211Frame for BlockAckRequestFrame<Bytes> {
    fn header(&self) -> &MacHeader<Bytes> {
        &self.header
    }

    fn header_mut(&mut self) -> &mut MacHeader<Bytes> {
        &mut self.header
    }
}

impl<Bytes: AsRef<[u8]>> fmt::Display for BlockAckRequestFrame<Bytes> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_addresses(f, &self.header)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;

    const TA: MacAddress = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    const RA: MacAddress = MacAddress([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);

    #[test]
    fn build() {
        let mut frame = BlockAckRequestFrame::<Vec<u8>>::new(TA, RA);
        assert_eq!(frame.frame_size(), 20);
        assert!(frame.segment().is_none());

        frame.recompute().unwrap();
        let bytes = frame.segment().unwrap().as_bytes();
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[..2], [0x84, 0x00]);
        assert_eq!(bytes[4..10], RA.0);
        assert_eq!(bytes[10..16], TA.0);
        assert_eq!(bytes[16..], [0x00; 4]);

        assert_eq!(frame.receiver_address(), RA);
        assert_eq!(frame.transmitter_address(), TA);
        assert_eq!(frame.address(0), Ok(RA));
        assert_eq!(frame.address(1), Ok(TA));
    }

    #[test]
    fn parse() {
        let bytes = hex::decode("84003c0066778899aabb0011223344550590b004").unwrap();
        let frame = BlockAckRequestFrame::parse(ByteSegment::new(&bytes[..]));

        assert_eq!(frame.frame_control().frame_subtype(), FrameSubtype::BlockAckRequest);
        assert_eq!(frame.duration(), 60);
        assert_eq!(frame.receiver_address(), RA);
        assert_eq!(frame.transmitter_address(), TA);

        let control = frame.control();
        assert_eq!(control.ack_policy(), BlockAckPolicy::NoAck);
        assert!(!control.multi_tid());
        assert!(control.compressed_bitmap());
        assert_eq!(control.tid_info(), 9);

        assert_eq!(frame.starting_sequence_control(), 0x04b0);
        assert_eq!(frame.starting_sequence_number(), 0x4b);
        assert_eq!(
            frame.to_string(),
            "BlockAckRequest RA 66:77:88:99:aa:bb TA 00:11:22:33:44:55"
        );
    }

    #[test]
    fn truncated() {
        let bytes = hex::decode("8400000066778899aabb").unwrap();
        let frame = BlockAckRequestFrame::parse(ByteSegment::new(&bytes[..]));

        assert_eq!(frame.segment().unwrap().len(), 10);
        assert_eq!(frame.receiver_address(), RA);
        assert_eq!(frame.transmitter_address(), MacAddress::ZERO);
        assert_eq!(frame.control(), BlockAckRequestControl::new());
        assert_eq!(frame.starting_sequence_control(), 0);
    }

    #[test]
    fn mutate_and_recompute() {
        let bytes = hex::decode("84003c0066778899aabb0011223344550590b004").unwrap();
        let mut frame = BlockAckRequestFrame::parse(ByteSegment::new(bytes));

        frame.set_transmitter_address(MacAddress::BROADCAST);
        frame.set_control(frame.control().with_tid_info(3));
        frame.set_starting_sequence_control(
            SequenceControl::new().with_sequence_number(0x123).into_bits(),
        );

        // Setters are deferred.
        assert_eq!(frame.segment().unwrap().slice(10, 6).unwrap(), TA.0);

        frame.recompute().unwrap();
        let first = frame.segment().unwrap().as_bytes().to_vec();
        assert_eq!(
            first,
            hex::decode("84003c0066778899aabbffffffffffff05303012").unwrap()
        );

        frame.recompute().unwrap();
        assert_eq!(frame.segment().unwrap().as_bytes(), first);
        assert_eq!(frame.starting_sequence_number(), 0x123);
    }

    #[test]
    fn fcs_extends_frame() {
        let mut frame = BlockAckRequestFrame::<Vec<u8>>::new(TA, RA);
        frame.set_append_fcs(true);
        assert_eq!(frame.frame_size(), 24);

        frame.recompute().unwrap();
        assert_eq!(frame.segment().unwrap().len(), 24);
        assert!(frame.is_fcs_valid());
    }

    #[test]
    fn grows_from_short_segment() {
        for bytes in [Vec::new(), Vec::from([0x84u8])] {
            let mut frame = BlockAckRequestFrame::parse(ByteSegment::new(bytes));
            frame.set_receiver_address(MacAddress::BROADCAST);
            assert_eq!(frame.frame_size(), 20);

            frame.recompute().unwrap();
            assert_eq!(
                frame.segment().unwrap().as_bytes(),
                hex::decode("00000000ffffffffffff00000000000000000000").unwrap()
            );
        }
    }

    #[test]
    fn frame_control_does_not_move_addresses() {
        let mut frame = BlockAckRequestFrame::<Vec<u8>>::new(TA, RA);
        frame.recompute().unwrap();

        frame.set_frame_control(
            FrameControl::for_subtype(FrameSubtype::Data)
                .with_to_ds(true)
                .with_from_ds(true),
        );
        assert_eq!(frame.address(3), Err(netframe_util::Error::AddressAbsent { slot: 3 }));
        frame.recompute().unwrap();

        let bytes = frame.segment().unwrap().as_bytes();
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[..2], [0x08, 0x03]);
        assert_eq!(frame.receiver_address(), RA);
        assert_eq!(frame.transmitter_address(), TA);
    }

    #[test]
    fn failed_recompute_keeps_state() {
        let mut buffer = hex::decode("8400000066778899aabb001122334455").unwrap();
        let mut frame = BlockAckRequestFrame::parse(ByteSegment::new(&mut buffer[..]));
        frame.set_starting_sequence_control(0x1230);

        // A borrowed window cannot grow to the full 20 bytes.
        assert!(frame.recompute().is_err());
        assert_eq!(frame.segment().map(ByteSegment::len), Some(16));
        assert_eq!(frame.transmitter_address(), TA);
        assert_eq!(frame.starting_sequence_control(), 0x1230);
    }
}

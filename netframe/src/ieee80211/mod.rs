//! IEEE 802.11 MAC frames.
//!
//! Parsing starts with [`MacFrame`], which peeks the frame control field and
//! selects the matching frame variant:
//!
//! ```
//! use netframe::{ieee80211::{Ieee80211Frame, MacFrame}, ByteSegment, Frame};
//!
//! let bytes = [
//!     0xd4, 0x00, 0x00, 0x00, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb,
//! ];
//! let frame = MacFrame::parse(ByteSegment::new(&bytes[..]));
//! assert!(matches!(frame, MacFrame::Ack(_)));
//! assert_eq!(frame.address(0).unwrap().to_string(), "66:77:88:99:aa:bb");
//! ```

mod addressing;
mod block_ack_request;
mod control;
mod frame_control;
mod header;
mod unknown;

use core::fmt;

use netframe_util::{debug, endian::LE, trace, ByteSegment, Frame, Result, SegmentBuffer};

use crate::{fields::mac, MacAddress};

pub use addressing::{
    address_count, address_role, mac_header_length, resolve_address_field, AddressRole,
};
pub use block_ack_request::{
    BlockAckPolicy, BlockAckRequestControl, BlockAckRequestFrame, SequenceControl,
};
pub use control::{AckFrame, CtsFrame, RtsFrame};
pub use frame_control::{FrameControl, FrameControlFlags, FrameSubtype, FrameType};
pub use header::MacHeader;
pub use unknown::UnknownFrame;

/// Accessors shared by all IEEE 802.11 frames.
///
/// Getters decode lazily from the frame's segment unless a value was set
/// since the last recompute. Setters never touch the segment.
pub trait Ieee80211Frame: Frame {
    fn header(&self) -> &MacHeader<Self::Bytes>;

    fn header_mut(&mut self) -> &mut MacHeader<Self::Bytes>;

    fn frame_control(&self) -> FrameControl {
        self.header().frame_control()
    }

    fn set_frame_control(&mut self, frame_control: FrameControl) {
        self.header_mut().set_frame_control(frame_control)
    }

    fn duration(&self) -> u16 {
        self.header().duration()
    }

    fn set_duration(&mut self, duration: u16) {
        self.header_mut().set_duration(duration)
    }

    /// The address in the given slot, see [`resolve_address_field()`].
    fn address(&self, slot: usize) -> Result<MacAddress> {
        self.header().address(slot)
    }

    fn set_address(&mut self, slot: usize, address: MacAddress) -> Result<()> {
        self.header_mut().set_address(slot, address)
    }

    /// Whether the encoded frame ends with a frame check sequence.
    fn append_fcs(&self) -> bool {
        self.header().append_fcs()
    }

    fn set_append_fcs(&mut self, append_fcs: bool) {
        self.header_mut().set_append_fcs(append_fcs)
    }

    fn fcs(&self) -> Option<u32> {
        self.header().fcs(self.frame_size())
    }

    fn is_fcs_valid(&self) -> bool {
        self.header().is_fcs_valid(self.frame_size())
    }
}

/// Any IEEE 802.11 frame, selected by its `(type, subtype)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacFrame<Bytes> {
    BlockAckRequest(BlockAckRequestFrame<Bytes>),
    Ack(AckFrame<Bytes>),
    Cts(CtsFrame<Bytes>),
    Rts(RtsFrame<Bytes>),
    /// Any other frame, handled generically.
    Unknown(UnknownFrame<Bytes>),
}

macro_rules! dispatch {
    ($frame:expr, $inner:ident => $body:expr) => {
        match $frame {
            MacFrame::BlockAckRequest($inner) => $body,
            MacFrame::Ack($inner) => $body,
            MacFrame::Cts($inner) => $body,
            MacFrame::Rts($inner) => $body,
            MacFrame::Unknown($inner) => $body,
        }
    };
}

impl<Bytes: AsRef<[u8]>> MacFrame<Bytes> {
    pub fn frame_subtype(&self) -> FrameSubtype {
        self.frame_control().frame_subtype()
    }
}

impl<Bytes: AsRef<[u8]>> Frame for MacFrame<Bytes> {
    type Bytes = Bytes;

    /// Selects the frame variant from the frame control field. Frames of
    /// unsupported or reserved subtypes, including segments too short to
    /// hold a frame control field, are parsed as [`UnknownFrame`].
    fn parse(segment: ByteSegment<Bytes>) -> Self {
        let subtype = segment
            .read_u16::<LE>(mac::FRAME_CONTROL.offset)
            .map(FrameControl::from_bits)
            .unwrap_or(FrameControl::new())
            .frame_subtype();

        trace!("parsing {} byte 802.11 frame", segment.len());

        match subtype {
            FrameSubtype::BlockAckRequest => Self::BlockAckRequest(BlockAckRequestFrame::parse(segment)),
            FrameSubtype::Ack => Self::Ack(AckFrame::parse(segment)),
            FrameSubtype::Cts => Self::Cts(CtsFrame::parse(segment)),
            FrameSubtype::Rts => Self::Rts(RtsFrame::parse(segment)),
            _ => {
                debug!("no dedicated frame for subtype {}", subtype.into_parts().1);
                Self::Unknown(UnknownFrame::parse(segment))
            }
        }
    }

    fn segment(&self) -> Option<&ByteSegment<Bytes>> {
        dispatch!(self, frame => frame.segment())
    }

    fn into_segment(self) -> Option<ByteSegment<Bytes>> {
        dispatch!(self, frame => frame.into_segment())
    }

    fn frame_size(&self) -> usize {
        dispatch!(self, frame => frame.frame_size())
    }

    fn recompute(&mut self) -> Result<()>
    where
        Self::Bytes: SegmentBuffer,
    {
        dispatch!(self, frame => frame.recompute())
    }
}

impl<Bytes: AsRef<[u8]>> Ieee80211Frame for MacFrame<Bytes> {
    fn header(&self) -> &MacHeader<Bytes> {
        dispatch!(self, frame => frame.header())
    }

    fn header_mut(&mut self) -> &mut MacHeader<Bytes> {
        dispatch!(self, frame => frame.header_mut())
    }
}

impl<Bytes: AsRef<[u8]>> fmt::Display for MacFrame<Bytes> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, frame => fmt::Display::fmt(frame, f))
    }
}

/// Writes `subtype` followed by every present address labeled with its role.
fn fmt_addresses<Bytes: AsRef<[u8]>>(
    f: &mut fmt::Formatter<'_>,
    header: &MacHeader<Bytes>,
) -> fmt::Result {
    let fc = header.frame_control();
    write!(f, "{}", fc.frame_subtype())?;

    for slot in 0..4 {
        let role = address_role(slot, fc.frame_type(), fc.subtype(), fc.to_ds(), fc.from_ds());
        if let (Some(role), Ok(address)) = (role, header.address(slot)) {
            write!(f, " {} {}", role, address)?;
        }
    }

    Ok(())
}

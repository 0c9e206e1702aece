//! Ethernet II frames.

use alloc::vec::Vec;
use core::fmt;

use netframe_util::{
    endian::NetworkEndian, frame, trace, ByteSegment, Frame, Result, SegmentBuffer,
};

use crate::{
    fields::{ethernet as fields, Field},
    MacAddress,
};

/// Protocol carried in the payload of an Ethernet frame.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum EtherType {
    Ipv4,
    Arp,
    WakeOnLan,
    ReverseArp,
    AppleTalk,
    /// IEEE 802.1Q tagged frame.
    VlanTagged,
    Ipx,
    Ipv6,
    PppoeDiscovery,
    PppoeSession,
    MplsUnicast,
    Eapol,
    /// IEEE 802.1ad provider bridging.
    QinQ,
    Lldp,
    Unknown(u16),
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        match value {
            0x0800 => Self::Ipv4,
            0x0806 => Self::Arp,
            0x0842 => Self::WakeOnLan,
            0x8035 => Self::ReverseArp,
            0x809b => Self::AppleTalk,
            0x8100 => Self::VlanTagged,
            0x8137 => Self::Ipx,
            0x86dd => Self::Ipv6,
            0x8863 => Self::PppoeDiscovery,
            0x8864 => Self::PppoeSession,
            0x8847 => Self::MplsUnicast,
            0x888e => Self::Eapol,
            0x88a8 => Self::QinQ,
            0x88cc => Self::Lldp,
            value => Self::Unknown(value),
        }
    }
}

impl From<EtherType> for u16 {
    fn from(value: EtherType) -> Self {
        match value {
            EtherType::Ipv4 => 0x0800,
            EtherType::Arp => 0x0806,
            EtherType::WakeOnLan => 0x0842,
            EtherType::ReverseArp => 0x8035,
            EtherType::AppleTalk => 0x809b,
            EtherType::VlanTagged => 0x8100,
            EtherType::Ipx => 0x8137,
            EtherType::Ipv6 => 0x86dd,
            EtherType::PppoeDiscovery => 0x8863,
            EtherType::PppoeSession => 0x8864,
            EtherType::MplsUnicast => 0x8847,
            EtherType::Eapol => 0x888e,
            EtherType::QinQ => 0x88a8,
            EtherType::Lldp => 0x88cc,
            EtherType::Unknown(value) => value,
        }
    }
}

/// An Ethernet II frame: destination, source, type and payload.
///
/// The payload is everything behind the 14 byte header. It is handed out as a
/// sub-window of the frame's own segment so that an encapsulated frame can be
/// parsed from it without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame<Bytes> {
    segment: Option<ByteSegment<Bytes>>,
    destination: Option<MacAddress>,
    source: Option<MacAddress>,
    ether_type: Option<EtherType>,
    payload: Option<Vec<u8>>,
}

impl<Bytes> EthernetFrame<Bytes> {
    /// A frame with an empty payload. No bytes are encoded before the frame
    /// is recomputed.
    pub fn new(destination: MacAddress, source: MacAddress, ether_type: EtherType) -> Self {
        Self {
            segment: None,
            destination: Some(destination),
            source: Some(source),
            ether_type: Some(ether_type),
            payload: None,
        }
    }
}

impl<Bytes: AsRef<[u8]>> EthernetFrame<Bytes> {
    pub fn destination(&self) -> MacAddress {
        self.destination
            .unwrap_or_else(|| self.read_address(fields::DESTINATION_MAC))
    }

    pub fn set_destination(&mut self, destination: MacAddress) {
        self.destination = Some(destination);
    }

    pub fn source(&self) -> MacAddress {
        self.source
            .unwrap_or_else(|| self.read_address(fields::SOURCE_MAC))
    }

    pub fn set_source(&mut self, source: MacAddress) {
        self.source = Some(source);
    }

    pub fn ether_type(&self) -> EtherType {
        self.ether_type.unwrap_or_else(|| {
            let value = self
                .segment
                .as_ref()
                .and_then(|segment| segment.read_u16::<NetworkEndian>(fields::TYPE.offset).ok())
                .unwrap_or_else(|| {
                    trace!("truncated ethernet type");
                    0
                });
            EtherType::from(value)
        })
    }

    pub fn set_ether_type(&mut self, ether_type: EtherType) {
        self.ether_type = Some(ether_type);
    }

    /// The payload, empty if the frame is truncated.
    pub fn payload(&self) -> ByteSegment<&[u8]> {
        if let Some(payload) = &self.payload {
            return ByteSegment::new(&payload[..]);
        }

        self.segment
            .as_ref()
            .and_then(|segment| {
                let length = segment.len().checked_sub(fields::HEADER_LENGTH)?;
                segment.sub_segment(fields::HEADER_LENGTH, length).ok()
            })
            .unwrap_or_else(|| ByteSegment::new(&[][..]))
    }

    /// Replaces the payload. Changes the frame size.
    pub fn set_payload(&mut self, payload: &[u8]) {
        self.payload = Some(Vec::from(payload));
    }

    fn payload_length(&self) -> usize {
        match &self.payload {
            Some(payload) => payload.len(),
            None => self
                .segment
                .as_ref()
                .map_or(0, |segment| segment.len().saturating_sub(fields::HEADER_LENGTH)),
        }
    }

    fn read_address(&self, field: Field) -> MacAddress {
        self.segment
            .as_ref()
            .and_then(|segment| segment.slice(field.offset, field.length).ok())
            .and_then(MacAddress::from_bytes)
            .unwrap_or_else(|| {
                trace!("truncated ethernet address at {}", field.offset);
                MacAddress::ZERO
            })
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> EthernetFrame<Bytes> {
    /// Mutable access to the payload. Writes go straight to the frame's
    /// segment, or to the pending payload if one was set.
    ///
    /// Returns [`None`] if the frame holds no payload bytes to write to.
    pub fn payload_mut(&mut self) -> Option<ByteSegment<&mut [u8]>> {
        if let Some(payload) = &mut self.payload {
            return Some(ByteSegment::new(&mut payload[..]));
        }

        let segment = self.segment.as_mut()?;
        let length = segment.len().checked_sub(fields::HEADER_LENGTH)?;
        segment.sub_segment_mut(fields::HEADER_LENGTH, length).ok()
    }
}

impl<Bytes: AsRef<[u8]>> Frame for EthernetFrame<Bytes> {
    type Bytes = Bytes;

    fn parse(segment: ByteSegment<Bytes>) -> Self {
        Self {
            segment: Some(segment),
            destination: None,
            source: None,
            ether_type: None,
            payload: None,
        }
    }

    fn segment(&self) -> Option<&ByteSegment<Bytes>> {
        self.segment.as_ref()
    }

    fn into_segment(self) -> Option<ByteSegment<Bytes>> {
        self.segment
    }

    fn frame_size(&self) -> usize {
        fields::HEADER_LENGTH + self.payload_length()
    }

    fn recompute(&mut self) -> Result<()>
    where
        Self::Bytes: SegmentBuffer,
    {
        let destination = self.destination();
        let source = self.source();
        let ether_type = self.ether_type();
        let frame_size = self.frame_size();
        let payload = self.payload.as_deref();
        let payload_length = self.payload_length();

        frame::encode_sized(&mut self.segment, frame_size, |segment| {
            segment.write_slice(fields::DESTINATION_MAC.offset, destination.as_ref())?;
            segment.write_slice(fields::SOURCE_MAC.offset, source.as_ref())?;
            segment.write_u16::<NetworkEndian>(fields::TYPE.offset, ether_type.into())?;

            // A payload parsed from the wire is already in place.
            if let Some(payload) = payload {
                segment.write_slice(fields::HEADER_LENGTH, payload)?;
            }
            Ok(fields::HEADER_LENGTH + payload_length)
        })?;

        self.destination = None;
        self.source = None;
        self.ether_type = None;
        self.payload = None;
        Ok(())
    }
}

impl<Bytes: AsRef<[u8]>> fmt::Display for EthernetFrame<Bytes> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ethernet {} -> {} {:?}",
            self.source(),
            self.destination(),
            self.ether_type()
        )
    }
}

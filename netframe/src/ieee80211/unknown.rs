use alloc::vec::Vec;
use core::fmt;

use netframe_util::{endian::LE, ByteSegment, Frame, Result, SegmentBuffer};

use crate::fields::{mac, Field};

use super::{
    fmt_addresses, mac_header_length, FrameControl, FrameType, Ieee80211Frame, MacHeader,
    SequenceControl,
};

/// Generic frame for every `(type, subtype)` pair without a dedicated
/// variant.
///
/// Only the MAC header fields known for the frame's type are decoded. The
/// bytes following the header form the body, which is preserved verbatim on
/// recompute and moved along if the header changes its length.
///
/// If a frame check sequence is appended, the last four bytes of the segment
/// are taken as the FCS and are not part of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFrame<Bytes> {
    header: MacHeader<Bytes>,
    sequence_control: Option<SequenceControl>,
    qos_control: Option<u16>,
    body: Option<Vec<u8>>,
}

impl<Bytes> UnknownFrame<Bytes> {
    /// A header-only frame of the given frame control.
    pub fn new(frame_control: FrameControl) -> Self {
        Self {
            header: MacHeader::from_frame_control(frame_control),
            sequence_control: None,
            qos_control: None,
            body: None,
        }
    }
}

const fn has_sequence_control(frame_type: FrameType) -> bool {
    matches!(frame_type, FrameType::Management | FrameType::Data)
}

/// Position of the QoS control field, which ends the header of QoS data
/// frames.
const fn qos_control_field(frame_control: FrameControl) -> Field {
    let end = mac_header_length(frame_control);
    Field::new(end - mac::QOS_CONTROL_LENGTH, mac::QOS_CONTROL_LENGTH)
}

impl<Bytes: AsRef<[u8]>> UnknownFrame<Bytes> {
    /// Sequence control of management and data frames.
    ///
    /// Zero if the frame's bytes carry no sequence control, e.g. because the
    /// frame control was changed from a control frame.
    pub fn sequence_control(&self) -> Option<SequenceControl> {
        if !has_sequence_control(self.header.frame_control().frame_type()) {
            return None;
        }

        Some(self.sequence_control.unwrap_or_else(|| {
            if has_sequence_control(self.header.encoded_frame_control().frame_type()) {
                SequenceControl::from_bits(self.header.read_u16_or_default(mac::SEQUENCE_CONTROL))
            } else {
                SequenceControl::new()
            }
        }))
    }

    pub fn set_sequence_control(&mut self, sequence_control: SequenceControl) {
        self.sequence_control = Some(sequence_control);
    }

    /// QoS control of QoS data frames, zero if the frame's bytes carry none.
    pub fn qos_control(&self) -> Option<u16> {
        if !self.header.frame_control().is_qos_data() {
            return None;
        }

        Some(self.qos_control.unwrap_or_else(|| {
            let encoded = self.header.encoded_frame_control();
            if encoded.is_qos_data() {
                self.header.read_u16_or_default(qos_control_field(encoded))
            } else {
                0
            }
        }))
    }

    pub fn set_qos_control(&mut self, qos_control: u16) {
        self.qos_control = Some(qos_control);
    }

    /// The bytes following the MAC header, empty if there are none.
    ///
    /// A pending body is returned as is. Otherwise the body starts after the
    /// header as encoded in the segment, whatever frame control is pending.
    pub fn body(&self) -> &[u8] {
        if let Some(body) = &self.body {
            return body;
        }

        let start = mac_header_length(self.header.encoded_frame_control());
        self.header
            .segment()
            .and_then(|segment| {
                let end = segment.len().checked_sub(self.header.fcs_length())?;
                segment.as_bytes().get(start..end)
            })
            .unwrap_or_default()
    }

    /// Replaces the body. Changes the frame size.
    pub fn set_body(&mut self, body: &[u8]) {
        self.body = Some(Vec::from(body));
    }
}

impl<Bytes: AsRef<[u8]>> Frame for UnknownFrame<Bytes> {
    type Bytes = Bytes;

    fn parse(segment: ByteSegment<Bytes>) -> Self {
        Self {
            header: MacHeader::from_segment(segment),
            sequence_control: None,
            qos_control: None,
            body: None,
        }
    }

    fn segment(&self) -> Option<&ByteSegment<Bytes>> {
        self.header.segment()
    }

    fn into_segment(self) -> Option<ByteSegment<Bytes>> {
        self.header.into_segment()
    }

    fn frame_size(&self) -> usize {
        mac_header_length(self.header.frame_control()) + self.body().len() + self.header.fcs_length()
    }

    fn recompute(&mut self) -> Result<()>
    where
        Self::Bytes: SegmentBuffer,
    {
        let frame_control = self.header.frame_control();
        let header_length = mac_header_length(frame_control);
        let sequence_control = self.sequence_control();
        let qos_control = self.qos_control();
        let body = Vec::from(self.body());

        self.header.recompute(self.frame_size(), |segment, _| {
            if let Some(sequence_control) = sequence_control {
                segment.write_u16::<LE>(mac::SEQUENCE_CONTROL.offset, sequence_control.into_bits())?;
            }
            if let Some(qos_control) = qos_control {
                segment.write_u16::<LE>(qos_control_field(frame_control).offset, qos_control)?;
            }
            segment.write_slice(header_length, &body)?;
            Ok(header_length + body.len())
        })?;

        self.sequence_control = None;
        self.qos_control = None;
        self.body = None;
        Ok(())
    }
}

impl<Bytes: AsRef<[u8]>> Ieee80211Frame for UnknownFrame<Bytes> {
    fn header(&self) -> &MacHeader<Bytes> {
        &self.header
    }

    fn header_mut(&mut self) -> &mut MacHeader<Bytes> {
        &mut self.header
    }
}

impl<Bytes: AsRef<[u8]>> fmt::Display for UnknownFrame<Bytes> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_addresses(f, &self.header)
    }
}

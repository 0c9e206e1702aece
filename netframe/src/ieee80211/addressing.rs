//! Address slot resolution for IEEE 802.11 MAC headers.
//!
//! An 802.11 MAC header carries up to four addresses. How many of them are
//! present, and what they mean, depends on the frame type and subtype and, for
//! data frames, on the To DS and From DS flags:
//!
//! | To DS | From DS | Address 1 | Address 2 | Address 3 | Address 4 |
//! |-------|---------|-----------|-----------|-----------|-----------|
//! | 0     | 0       | DA        | SA        | BSSID     | -         |
//! | 0     | 1       | DA        | BSSID     | SA        | -         |
//! | 1     | 0       | BSSID     | SA        | DA        | -         |
//! | 1     | 1       | RA        | TA        | DA        | SA        |
//!
//! Management frames always use the first row. Control frames carry a
//! receiver address and, depending on the subtype, a transmitter address.

use core::fmt;

use crate::fields::{mac, Field};

use super::{FrameControl, FrameSubtype, FrameType};

/// The meaning of an address slot.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum AddressRole {
    Receiver,
    Transmitter,
    Destination,
    Source,
    Bssid,
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbreviation = match self {
            Self::Receiver => "RA",
            Self::Transmitter => "TA",
            Self::Destination => "DA",
            Self::Source => "SA",
            Self::Bssid => "BSSID",
        };
        f.write_str(abbreviation)
    }
}

/// Number of address fields present in a frame.
pub const fn address_count(
    frame_type: FrameType,
    subtype: u8,
    to_ds: bool,
    from_ds: bool,
) -> usize {
    use FrameSubtype::*;

    match frame_type {
        FrameType::Management => 3,
        FrameType::Data if to_ds && from_ds => 4,
        FrameType::Data => 3,
        FrameType::Control => match FrameSubtype::from_parts(frame_type, subtype) {
            Ack | Cts | ControlWrapper => 1,
            Rts | PsPoll | CfEnd | CfEndCfAck | BlockAckRequest | BlockAck
            | BeamformingReportPoll | VhtNdpAnnouncement | Trigger => 2,
            _ => 0,
        },
        FrameType::Extension => 0,
    }
}

/// Resolves a logical address slot (0..=3) to its position in the MAC header.
///
/// Returns [`None`] if the slot is absent for the given frame.
pub const fn resolve_address_field(
    slot: usize,
    frame_type: FrameType,
    subtype: u8,
    to_ds: bool,
    from_ds: bool,
) -> Option<Field> {
    if slot < address_count(frame_type, subtype, to_ds, from_ds) {
        Some(mac::ADDRESSES[slot])
    } else {
        None
    }
}

/// Returns the meaning of an address slot, [`None`] if the slot is absent.
pub const fn address_role(
    slot: usize,
    frame_type: FrameType,
    subtype: u8,
    to_ds: bool,
    from_ds: bool,
) -> Option<AddressRole> {
    use AddressRole::*;

    if slot >= address_count(frame_type, subtype, to_ds, from_ds) {
        return None;
    }

    let roles = match (frame_type, to_ds, from_ds) {
        (FrameType::Control, _, _) => [Receiver, Transmitter, Receiver, Receiver],
        (FrameType::Management, _, _) | (FrameType::Data, false, false) => {
            [Destination, Source, Bssid, Bssid]
        }
        (FrameType::Data, false, true) => [Destination, Bssid, Source, Source],
        (FrameType::Data, true, false) => [Bssid, Source, Destination, Destination],
        (FrameType::Data, true, true) => [Receiver, Transmitter, Destination, Source],
        (FrameType::Extension, _, _) => return None,
    };
    Some(roles[slot])
}

/// Length of the MAC header implied by the frame control field.
///
/// Control frames end after their last address, management frames after the
/// sequence control field. Data frames additionally carry address 4 when both
/// DS flags are set and a QoS control field for QoS subtypes.
pub const fn mac_header_length(fc: FrameControl) -> usize {
    let count = address_count(fc.frame_type(), fc.subtype(), fc.to_ds(), fc.from_ds());

    match fc.frame_type() {
        FrameType::Management => mac::THREE_ADDRESS_HEADER_LENGTH,
        FrameType::Data => {
            let length = if count == 4 {
                mac::FOUR_ADDRESS_HEADER_LENGTH
            } else {
                mac::THREE_ADDRESS_HEADER_LENGTH
            };
            if fc.is_qos_data() {
                length + mac::QOS_CONTROL_LENGTH
            } else {
                length
            }
        }
        FrameType::Control => mac::MIN_HEADER_LENGTH + count * mac::ADDRESS_LENGTH,
        FrameType::Extension => mac::MIN_HEADER_LENGTH,
    }
}

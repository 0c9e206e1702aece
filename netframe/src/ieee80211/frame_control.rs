//! IEEE 802.11 Frame Control field.
//!
//! ```notrust
//! +---------+------+---------+-------+---------+------+-------+----+------+-----------+-------+
//! | Version | Type | Subtype | To DS | From DS | More | Retry | PM | More | Protected | Order |
//! |         |      |         |       |         | Frag |       |    | Data |           |       |
//! +---------+------+---------+-------+---------+------+-------+----+------+-----------+-------+
//!  b0    b1  b2  b3 b4     b7    b8       b9      b10    b11    b12  b13      b14        b15
//! ```
//!
//! The field is transmitted as a little-endian 16-bit word.

use bitfield_struct::bitfield;
use bitflags::bitflags;
use netframe_util::endian::{self, LE};

/// IEEE 802.11 frame type.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum FrameType {
    Management = 0b00,
    Control = 0b01,
    Data = 0b10,
    Extension = 0b11,
}

impl FrameType {
    // This has to be a const fn
    pub const fn into_bits(self) -> u8 {
        self as _
    }

    pub const fn from_bits(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Management,
            0b01 => Self::Control,
            0b10 => Self::Data,
            _ => Self::Extension,
        }
    }
}

#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct FrameControl {
    #[bits(2)]
    pub protocol_version: u8,
    #[bits(2)]
    pub frame_type: FrameType,
    #[bits(4)]
    pub subtype: u8,
    pub to_ds: bool,
    pub from_ds: bool,
    pub more_fragments: bool,
    pub retry: bool,
    pub power_management: bool,
    pub more_data: bool,
    pub protected: bool,
    pub order: bool,
}

impl FrameControl {
    /// Frame control of a frame of the given subtype, all flags cleared.
    pub const fn for_subtype(subtype: FrameSubtype) -> Self {
        Self::new().with_frame_subtype(subtype)
    }

    pub fn decode(bytes: [u8; 2]) -> Self {
        Self::from_bits(endian::read_u16::<LE>(&bytes, 0))
    }

    pub fn encode(&self) -> [u8; 2] {
        let mut bytes = [0; 2];
        endian::write_u16::<LE>(&mut bytes, 0, self.into_bits());
        bytes
    }

    /// The `(type, subtype)` pair selecting the frame's wire format.
    pub const fn frame_subtype(&self) -> FrameSubtype {
        FrameSubtype::from_parts(self.frame_type(), self.subtype())
    }

    pub const fn with_frame_subtype(self, subtype: FrameSubtype) -> Self {
        let (frame_type, subtype) = subtype.into_parts();
        self.with_frame_type(frame_type)
            .with_subtype(subtype & 0x0f)
    }

    pub fn set_frame_subtype(&mut self, subtype: FrameSubtype) {
        *self = self.with_frame_subtype(subtype);
    }

    /// Data subtypes with bit 3 set carry a QoS control field.
    pub const fn is_qos_data(&self) -> bool {
        matches!(self.frame_type(), FrameType::Data) && self.subtype() & 0b1000 != 0
    }

    pub const fn flags(&self) -> FrameControlFlags {
        FrameControlFlags::from_bits_retain((self.into_bits() >> 8) as u8)
    }

    pub const fn with_flags(self, flags: FrameControlFlags) -> Self {
        Self::from_bits((self.into_bits() & 0x00ff) | ((flags.bits() as u16) << 8))
    }
}

bitflags! {
    /// The flag bits of the frame control field, relative to its high byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameControlFlags: u8 {
        const TO_DS = 0b0000_0001;
        const FROM_DS = 0b0000_0010;
        const MORE_FRAGMENTS = 0b0000_0100;
        const RETRY = 0b0000_1000;
        const POWER_MANAGEMENT = 0b0001_0000;
        const MORE_DATA = 0b0010_0000;
        const PROTECTED = 0b0100_0000;
        const ORDER = 0b1000_0000;
    }
}

macro_rules! frame_subtypes {
    ($($(#[$doc:meta])* $name:ident = ($frame_type:ident, $subtype:literal),)*) => {
        /// IEEE 802.11 frame subtype, qualified by its frame type.
        #[derive(Debug, Eq, PartialEq, Clone, Copy)]
        #[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
        pub enum FrameSubtype {
            $($(#[$doc])* $name,)*
            /// Reserved or unsupported `(type, subtype)` pair.
            Unknown { frame_type: FrameType, subtype: u8 },
        }

        impl FrameSubtype {
            pub const fn from_parts(frame_type: FrameType, subtype: u8) -> Self {
                match (frame_type, subtype) {
                    $((FrameType::$frame_type, $subtype) => Self::$name,)*
                    _ => Self::Unknown { frame_type, subtype },
                }
            }

            pub const fn into_parts(self) -> (FrameType, u8) {
                match self {
                    $(Self::$name => (FrameType::$frame_type, $subtype),)*
                    Self::Unknown { frame_type, subtype } => (frame_type, subtype),
                }
            }
        }
    };
}

frame_subtypes! {
    AssociationRequest = (Management, 0),
    AssociationResponse = (Management, 1),
    ReassociationRequest = (Management, 2),
    ReassociationResponse = (Management, 3),
    ProbeRequest = (Management, 4),
    ProbeResponse = (Management, 5),
    TimingAdvertisement = (Management, 6),
    Beacon = (Management, 8),
    /// Announcement traffic indication message.
    Atim = (Management, 9),
    Disassociation = (Management, 10),
    Authentication = (Management, 11),
    Deauthentication = (Management, 12),
    Action = (Management, 13),
    ActionNoAck = (Management, 14),

    Trigger = (Control, 2),
    BeamformingReportPoll = (Control, 4),
    VhtNdpAnnouncement = (Control, 5),
    ControlFrameExtension = (Control, 6),
    ControlWrapper = (Control, 7),
    BlockAckRequest = (Control, 8),
    BlockAck = (Control, 9),
    PsPoll = (Control, 10),
    Rts = (Control, 11),
    Cts = (Control, 12),
    Ack = (Control, 13),
    CfEnd = (Control, 14),
    CfEndCfAck = (Control, 15),

    Data = (Data, 0),
    DataCfAck = (Data, 1),
    DataCfPoll = (Data, 2),
    DataCfAckCfPoll = (Data, 3),
    Null = (Data, 4),
    CfAck = (Data, 5),
    CfPoll = (Data, 6),
    CfAckCfPoll = (Data, 7),
    QosData = (Data, 8),
    QosDataCfAck = (Data, 9),
    QosDataCfPoll = (Data, 10),
    QosDataCfAckCfPoll = (Data, 11),
    QosNull = (Data, 12),
    QosCfPoll = (Data, 14),
    QosCfAckCfPoll = (Data, 15),

    /// Directional multi-gigabit beacon.
    DmgBeacon = (Extension, 0),
}

impl FrameSubtype {
    pub const fn frame_type(&self) -> FrameType {
        self.into_parts().0
    }
}

impl core::fmt::Display for FrameSubtype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unknown {
                frame_type,
                subtype,
            } => write!(f, "{:?}({})", frame_type, subtype),
            subtype => write!(f, "{:?}", subtype),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode() {
        // Block ack request with the retry and order flags set.
        let fc = FrameControl::decode([0x84, 0x88]);

        assert_eq!(fc.protocol_version(), 0);
        assert_eq!(fc.frame_type(), FrameType::Control);
        assert_eq!(fc.subtype(), 8);
        assert_eq!(fc.frame_subtype(), FrameSubtype::BlockAckRequest);
        assert!(!fc.to_ds());
        assert!(!fc.from_ds());
        assert!(!fc.more_fragments());
        assert!(fc.retry());
        assert!(!fc.power_management());
        assert!(!fc.more_data());
        assert!(!fc.protected());
        assert!(fc.order());
        assert_eq!(fc.flags(), FrameControlFlags::RETRY | FrameControlFlags::ORDER);
    }

    #[test]
    fn encode() {
        let fc = FrameControl::for_subtype(FrameSubtype::QosData)
            .with_to_ds(true)
            .with_protected(true);

        assert_eq!(fc.encode(), [0x88, 0x41]);
        assert!(fc.is_qos_data());
        assert!(!FrameControl::for_subtype(FrameSubtype::Data).is_qos_data());
    }

    #[test]
    fn round_trip_all_inputs() {
        for bits in 0..=u16::MAX {
            let fc = FrameControl::from_bits(bits);
            assert_eq!(fc.into_bits(), bits);

            let bytes = bits.to_le_bytes();
            assert_eq!(FrameControl::decode(bytes).encode(), bytes);

            assert_eq!(fc.protocol_version(), (bits & 0b11) as u8);
            assert_eq!(fc.frame_type().into_bits(), ((bits >> 2) & 0b11) as u8);
            assert_eq!(fc.subtype(), ((bits >> 4) & 0x0f) as u8);
            assert_eq!(fc.flags().bits(), (bits >> 8) as u8);
            assert_eq!(fc.to_ds(), bits & (1 << 8) != 0);
            assert_eq!(fc.order(), bits & (1 << 15) != 0);

            assert_eq!(
                FrameControl::new()
                    .with_protocol_version(fc.protocol_version())
                    .with_frame_subtype(fc.frame_subtype())
                    .with_flags(fc.flags()),
                fc
            );
        }
    }

    #[test]
    fn subtype_parts() {
        use FrameType::*;

        macro_rules! check {
            (($frame_type:ident, $subtype:literal) -> $expected:expr) => {
                assert_eq!(FrameSubtype::from_parts($frame_type, $subtype), $expected);
                assert_eq!($expected.into_parts(), ($frame_type, $subtype));
            };
        }

        check!((Management, 0) -> FrameSubtype::AssociationRequest);
        check!((Management, 8) -> FrameSubtype::Beacon);
        check!((Management, 7) -> FrameSubtype::Unknown { frame_type: Management, subtype: 7 });
        check!((Management, 15) -> FrameSubtype::Unknown { frame_type: Management, subtype: 15 });
        check!((Control, 0) -> FrameSubtype::Unknown { frame_type: Control, subtype: 0 });
        check!((Control, 8) -> FrameSubtype::BlockAckRequest);
        check!((Control, 11) -> FrameSubtype::Rts);
        check!((Control, 12) -> FrameSubtype::Cts);
        check!((Control, 13) -> FrameSubtype::Ack);
        check!((Data, 0) -> FrameSubtype::Data);
        check!((Data, 8) -> FrameSubtype::QosData);
        check!((Data, 13) -> FrameSubtype::Unknown { frame_type: Data, subtype: 13 });
        check!((Extension, 0) -> FrameSubtype::DmgBeacon);
        check!((Extension, 1) -> FrameSubtype::Unknown { frame_type: Extension, subtype: 1 });
    }

    #[test]
    fn display() {
        assert_eq!(alloc::format!("{}", FrameSubtype::Rts), "Rts");
        assert_eq!(
            alloc::format!(
                "{}",
                FrameSubtype::Unknown {
                    frame_type: FrameType::Control,
                    subtype: 3
                }
            ),
            "Control(3)"
        );
    }
}

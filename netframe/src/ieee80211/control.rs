//! IEEE 802.11 control frames consisting of a MAC header only.

use core::fmt;

use netframe_util::{ByteSegment, Frame, Result, SegmentBuffer};

use crate::{fields::mac, MacAddress};

use super::{fmt_addresses, FrameControl, FrameSubtype, Ieee80211Frame, MacHeader};

macro_rules! header_only_frame {
    ($(#[$doc:meta])* $name:ident, $subtype:ident, $addresses:literal, $length:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name<Bytes> {
            header: MacHeader<Bytes>,
        }

        impl<Bytes: AsRef<[u8]>> $name<Bytes> {
            pub fn receiver_address(&self) -> MacAddress {
                self.header.address_in(0, mac::ADDRESS_1)
            }

            pub fn set_receiver_address(&mut self, address: MacAddress) {
                self.header.set_address_in(0, address);
            }
        }

        impl<Bytes: AsRef<[u8]>> Frame for $name<Bytes> {
            type Bytes = Bytes;

            fn parse(segment: ByteSegment<Bytes>) -> Self {
                Self {
                    header: MacHeader::from_segment(segment).with_fixed_addresses($addresses),
                }
            }

            fn segment(&self) -> Option<&ByteSegment<Bytes>> {
                self.header.segment()
            }

            fn into_segment(self) -> Option<ByteSegment<Bytes>> {
                self.header.into_segment()
            }

            fn frame_size(&self) -> usize {
                $length + self.header.fcs_length()
            }

            fn recompute(&mut self) -> Result<()>
            where
                Self::Bytes: SegmentBuffer,
            {
                self.header.recompute(self.frame_size(), |_, end| Ok(end))
            }
        }

        impl<Bytes: AsRef<[u8]>> Ieee80211Frame for $name<Bytes> {
            fn header(&self) -> &MacHeader<Bytes> {
                &self.header
            }

            fn header_mut(&mut self) -> &mut MacHeader<Bytes> {
                &mut self.header
            }
        }

        impl<Bytes: AsRef<[u8]>> fmt::Display for $name<Bytes> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_addresses(f, &self.header)
            }
        }

        impl<Bytes> $name<Bytes> {
            fn from_header(header: MacHeader<Bytes>) -> Self {
                Self { header }
            }

            fn default_header() -> MacHeader<Bytes> {
                MacHeader::from_frame_control(FrameControl::for_subtype(FrameSubtype::$subtype))
                    .with_fixed_addresses($addresses)
            }
        }
    };
}

header_only_frame!(
    /// Acknowledgment.
    AckFrame,
    Ack,
    1,
    mac::ONE_ADDRESS_HEADER_LENGTH
);

header_only_frame!(
    /// Clear to send.
    CtsFrame,
    Cts,
    1,
    mac::ONE_ADDRESS_HEADER_LENGTH
);

header_only_frame!(
    /// Request to send.
    RtsFrame,
    Rts,
    2,
    mac::TWO_ADDRESS_HEADER_LENGTH
);

impl<Bytes> AckFrame<Bytes> {
    pub fn new(receiver: MacAddress) -> Self {
        Self::from_header(Self::default_header().with_address(0, receiver))
    }
}

impl<Bytes> CtsFrame<Bytes> {
    pub fn new(receiver: MacAddress) -> Self {
        Self::from_header(Self::default_header().with_address(0, receiver))
    }
}

impl<Bytes> RtsFrame<Bytes> {
    pub fn new(transmitter: MacAddress, receiver: MacAddress) -> Self {
        Self::from_header(
            Self::default_header()
                .with_address(0, receiver)
                .with_address(1, transmitter),
        )
    }
}

impl<Bytes: AsRef<[u8]>> RtsFrame<Bytes> {
    pub fn transmitter_address(&self) -> MacAddress {
        self.header.address_in(1, mac::ADDRESS_2)
    }

    pub fn set_transmitter_address(&mut self, address: MacAddress) {
        self.header.set_address_in(1, address);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;

    const TA: MacAddress = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    const RA: MacAddress = MacAddress([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);

    #[test]
    fn ack() {
        let mut frame = AckFrame::<Vec<u8>>::new(RA);
        assert_eq!(frame.frame_size(), 10);
        assert_eq!(frame.encode().unwrap(), hex::decode("d400000066778899aabb").unwrap());
        assert_eq!(frame.to_string(), "Ack RA 66:77:88:99:aa:bb");
    }

    #[test]
    fn cts() {
        let mut frame = CtsFrame::<Vec<u8>>::new(RA);
        frame.set_duration(1000);
        assert_eq!(frame.encode().unwrap(), hex::decode("c400e80366778899aabb").unwrap());
        assert_eq!(frame.address(1), Err(netframe_util::Error::AddressAbsent { slot: 1 }));
    }

    #[test]
    fn rts() {
        let bytes = hex::decode("b400e80366778899aabb001122334455").unwrap();
        let mut frame = RtsFrame::parse(ByteSegment::new(bytes.clone()));

        assert_eq!(frame.duration(), 1000);
        assert_eq!(frame.receiver_address(), RA);
        assert_eq!(frame.transmitter_address(), TA);

        frame.recompute().unwrap();
        assert_eq!(frame.segment().unwrap().as_bytes(), bytes);

        let mut built = RtsFrame::<Vec<u8>>::new(TA, RA);
        built.set_duration(1000);
        assert_eq!(built.encode().unwrap(), bytes);
    }

    #[test]
    fn shrinks_to_frame_size() {
        // Trailing bytes beyond the frame are not part of the encoding.
        let bytes = hex::decode("d400000066778899aabbdeadbeef").unwrap();
        let mut frame = AckFrame::parse(ByteSegment::new(bytes));

        frame.recompute().unwrap();
        assert_eq!(frame.segment().unwrap().len(), 10);
        assert_eq!(frame.segment().unwrap().capacity(), 14);
    }

    #[test]
    fn sizes_ignore_frame_control() {
        let mut frame = RtsFrame::parse(ByteSegment::new(Vec::<u8>::new()));
        frame.set_transmitter_address(TA);
        frame.recompute().unwrap();
        assert_eq!(frame.segment().unwrap().len(), 16);
        assert_eq!(frame.transmitter_address(), TA);

        let mut frame = CtsFrame::<Vec<u8>>::new(RA);
        frame.set_frame_control(FrameControl::for_subtype(FrameSubtype::Beacon));
        assert_eq!(frame.frame_size(), 10);
        frame.recompute().unwrap();
        assert_eq!(
            frame.segment().unwrap().as_bytes(),
            hex::decode("8000000066778899aabb").unwrap()
        );
    }
}

//! IEEE 802 MAC addresses shared by Ethernet and IEEE 802.11.

use core::{fmt, str::FromStr};

use netframe_util::{Error, Result};

use crate::fields::ethernet::MAC_ADDRESS_LENGTH;

/// A 48-bit MAC address in transmission order.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct MacAddress(pub [u8; MAC_ADDRESS_LENGTH]);

impl MacAddress {
    /// The all-zero address, also reported for truncated address fields.
    pub const ZERO: Self = Self([0x00; MAC_ADDRESS_LENGTH]);
    pub const BROADCAST: Self = Self([0xff; MAC_ADDRESS_LENGTH]);

    /// Creates an address from a slice of exactly six bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        <[u8; MAC_ADDRESS_LENGTH]>::try_from(bytes).ok().map(Self)
    }

    pub const fn as_bytes(&self) -> &[u8; MAC_ADDRESS_LENGTH] {
        &self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Group addresses have the I/G bit of the first octet set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    pub const fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// Locally administered addresses have the U/L bit of the first octet
    /// set.
    pub const fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl From<[u8; MAC_ADDRESS_LENGTH]> for MacAddress {
    fn from(bytes: [u8; MAC_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for MacAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    /// Parses `aa:bb:cc:dd:ee:ff`. Dashes are accepted as separators, too.
    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; MAC_ADDRESS_LENGTH];
        let mut parts = s.split([':', '-']);

        for byte in bytes.iter_mut() {
            let part = parts.next().ok_or(Error::InvalidAddress)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(Error::InvalidAddress);
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| Error::InvalidAddress)?;
        }

        if parts.next().is_some() {
            return Err(Error::InvalidAddress);
        }

        Ok(Self(bytes))
    }
}

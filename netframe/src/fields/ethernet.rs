//! Ethernet II header layout.
//!
//! ```notrust
//! +-----------------+------------+------+
//! | Destination MAC | Source MAC | Type |
//! +-----------------+------------+------+
//!         6               6         2
//! ```

use super::Field;

/// Size of an Ethernet MAC address in bytes.
pub const MAC_ADDRESS_LENGTH: usize = 6;

/// Width of the Ethernet type code in bytes.
pub const TYPE_LENGTH: usize = 2;

pub const DESTINATION_MAC: Field = Field::new(0, MAC_ADDRESS_LENGTH);
pub const SOURCE_MAC: Field = DESTINATION_MAC.followed_by(MAC_ADDRESS_LENGTH);
pub const TYPE: Field = SOURCE_MAC.followed_by(TYPE_LENGTH);

/// Total length of an Ethernet header in bytes.
pub const HEADER_LENGTH: usize = TYPE.end();

const _: () = assert!(DESTINATION_MAC.precedes(&SOURCE_MAC) && SOURCE_MAC.precedes(&TYPE));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(DESTINATION_MAC, Field::new(0, 6));
        assert_eq!(SOURCE_MAC, Field::new(6, 6));
        assert_eq!(TYPE, Field::new(12, 2));
        assert_eq!(HEADER_LENGTH, 14);
    }
}

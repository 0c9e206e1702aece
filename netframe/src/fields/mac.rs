//! IEEE 802.11 MAC header layout.
//!
//! The header has up to four address fields. Which of them are present
//! depends on the frame type, subtype and the DS bits of the frame control
//! field, see [`crate::ieee80211::resolve_address_field()`]. This table only
//! describes where each field sits when it is present.
//!
//! ```notrust
//! +----+----------+-----------+-----------+-----------+-----------+-----------+-----+
//! | FC | Duration | Address 1 | Address 2 | Address 3 | Seq. Ctrl | Address 4 | QoS |
//! +----+----------+-----------+-----------+-----------+-----------+-----------+-----+
//!   2       2           6           6           6           2           6        2
//! ```

use super::Field;

pub const ADDRESS_LENGTH: usize = 6;
pub const QOS_CONTROL_LENGTH: usize = 2;
pub const FCS_LENGTH: usize = 4;

pub const FRAME_CONTROL: Field = Field::new(0, 2);
pub const DURATION_ID: Field = FRAME_CONTROL.followed_by(2);
pub const ADDRESS_1: Field = DURATION_ID.followed_by(ADDRESS_LENGTH);
pub const ADDRESS_2: Field = ADDRESS_1.followed_by(ADDRESS_LENGTH);
pub const ADDRESS_3: Field = ADDRESS_2.followed_by(ADDRESS_LENGTH);
pub const SEQUENCE_CONTROL: Field = ADDRESS_3.followed_by(2);
pub const ADDRESS_4: Field = SEQUENCE_CONTROL.followed_by(ADDRESS_LENGTH);

/// Address fields indexed by address slot.
pub const ADDRESSES: [Field; 4] = [ADDRESS_1, ADDRESS_2, ADDRESS_3, ADDRESS_4];

/// Frame control and duration only.
pub const MIN_HEADER_LENGTH: usize = DURATION_ID.end();
pub const ONE_ADDRESS_HEADER_LENGTH: usize = ADDRESS_1.end();
pub const TWO_ADDRESS_HEADER_LENGTH: usize = ADDRESS_2.end();
/// Management and data frames without address 4.
pub const THREE_ADDRESS_HEADER_LENGTH: usize = SEQUENCE_CONTROL.end();
pub const FOUR_ADDRESS_HEADER_LENGTH: usize = ADDRESS_4.end();

const _: () = assert!(
    FRAME_CONTROL.precedes(&DURATION_ID)
        && DURATION_ID.precedes(&ADDRESS_1)
        && ADDRESS_1.precedes(&ADDRESS_2)
        && ADDRESS_2.precedes(&ADDRESS_3)
        && ADDRESS_3.precedes(&SEQUENCE_CONTROL)
        && SEQUENCE_CONTROL.precedes(&ADDRESS_4)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(FRAME_CONTROL, Field::new(0, 2));
        assert_eq!(DURATION_ID, Field::new(2, 2));
        assert_eq!(ADDRESS_1, Field::new(4, 6));
        assert_eq!(ADDRESS_2, Field::new(10, 6));
        assert_eq!(ADDRESS_3, Field::new(16, 6));
        assert_eq!(SEQUENCE_CONTROL, Field::new(22, 2));
        assert_eq!(ADDRESS_4, Field::new(24, 6));

        assert_eq!(MIN_HEADER_LENGTH, 4);
        assert_eq!(ONE_ADDRESS_HEADER_LENGTH, 10);
        assert_eq!(TWO_ADDRESS_HEADER_LENGTH, 16);
        assert_eq!(THREE_ADDRESS_HEADER_LENGTH, 24);
        assert_eq!(FOUR_ADDRESS_HEADER_LENGTH, 30);
    }
}

//! IEEE 802.11 block acknowledgment request frame layout.
//!
//! ```notrust
//! +----+----------+----+----+-------------+---------------------------+
//! | FC | Duration | RA | TA | BAR Control | Starting Sequence Control |
//! +----+----------+----+----+-------------+---------------------------+
//!   2       2        6    6        2                    2
//! ```

use super::{mac, Field};

pub const BAR_CONTROL: Field = mac::ADDRESS_2.followed_by(2);
pub const STARTING_SEQUENCE_CONTROL: Field = BAR_CONTROL.followed_by(2);

/// Frame length without FCS.
pub const FRAME_LENGTH: usize = STARTING_SEQUENCE_CONTROL.end();

const _: () = assert!(
    mac::ADDRESS_2.precedes(&BAR_CONTROL) && BAR_CONTROL.precedes(&STARTING_SEQUENCE_CONTROL)
);

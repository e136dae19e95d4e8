//! CAN wiring of the drivetrain.
//!
//! Device ids group by corner in tens: drive controller on the ten, steer
//! controller one above, angle encoder two above. All three chassis are
//! wired identically.

use azimuth_types::{BusId, ModuleSlot};
use serde::{Deserialize, Serialize};

/// Bus ids of one corner's three devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleAddresses {
    pub drive: BusId,
    pub steer: BusId,
    pub encoder: BusId,
}

/// Wiring of one corner.
pub fn module_addresses(slot: ModuleSlot) -> ModuleAddresses {
    match slot {
        ModuleSlot::FrontRight => ModuleAddresses {
            drive: BusId(10),
            steer: BusId(11),
            encoder: BusId(12),
        },
        ModuleSlot::BackRight => ModuleAddresses {
            drive: BusId(20),
            steer: BusId(21),
            encoder: BusId(22),
        },
        ModuleSlot::BackLeft => ModuleAddresses {
            drive: BusId(30),
            steer: BusId(31),
            encoder: BusId(32),
        },
        ModuleSlot::FrontLeft => ModuleAddresses {
            drive: BusId(40),
            steer: BusId(41),
            encoder: BusId(42),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn front_left_corner_is_wired_in_the_forties() {
        let addresses = module_addresses(ModuleSlot::FrontLeft);
        assert_eq!(addresses.drive, BusId(40));
        assert_eq!(addresses.steer, BusId(41));
        assert_eq!(addresses.encoder, BusId(42));
    }

    #[test]
    fn no_two_devices_share_an_id() {
        let mut seen = HashSet::new();
        for slot in ModuleSlot::ALL {
            let addresses = module_addresses(slot);
            for id in [addresses.drive, addresses.steer, addresses.encoder] {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 12);
    }
}

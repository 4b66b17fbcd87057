//! Opaque ID newtypes for netlist entities.
//!
//! [`GateId`], [`PinId`], and [`NetId`] are thin `u32` wrappers. Gates and
//! pins live in separate numbering spaces, so a gate and a pin may share the
//! same raw value without ambiguity.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` value.
            pub fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw `u32` value.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a movable gate.
    GateId
);

define_id!(
    /// Identity of a fixed pin.
    PinId
);

define_id!(
    /// Identity of a net; dense in `[0, N)`.
    NetId
);

impl NetId {
    /// Position of this net in per-net tables such as weights.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

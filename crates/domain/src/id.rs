//! Typed identifier newtypes backed by small integers.
//!
//! Ids are assigned at composition time and stay stable for the life of the
//! process, so they are plain numbers rather than generated values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident($inner:ty)) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(raw: $inner) -> Self {
                Self(raw)
            }

            /// Access the raw identifier.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Switch`](crate::switch) component; doubles as its slot number.
    SwitchId(u32)
);

define_id!(
    /// Identifier of a digital input pin.
    InputId(u32)
);

define_id!(
    /// Identifier of a digital output pin.
    OutputId(u32)
);

define_id!(
    /// Accessory identifier exposed to the protocol layer.
    AccessoryId(u64)
);

define_id!(
    /// Handle returned when registering an input handler.
    HandlerId(u64)
);

define_id!(
    /// Handle of an armed one-shot timer.
    TimerId(u64)
);

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Composite (run, event) keys.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifies one collision across independently produced record streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EventKey {
    pub run: u32,
    pub event: u64,
}

/// Lossless single-word form of an [`EventKey`].
///
/// Layout: bits 64..96 hold the run number, bits 0..64 the event number,
/// bits 96..128 are zero. Distinct keys never share a packed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct PackedKey(pub u128);

impl EventKey {
    pub const fn new(run: u32, event: u64) -> Self {
        Self { run, event }
    }

    pub const fn packed(&self) -> PackedKey {
        PackedKey(((self.run as u128) << 64) | self.event as u128)
    }
}

impl PackedKey {
    pub const fn unpack(self) -> EventKey {
        EventKey {
            run: (self.0 >> 64) as u32,
            event: self.0 as u64,
        }
    }
}

impl From<EventKey> for PackedKey {
    fn from(key: EventKey) -> Self {
        key.packed()
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN {} EVENT {}", self.run, self.event)
    }
}

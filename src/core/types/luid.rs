//! Locally unique identifier wrapper

use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit locally unique identifier, as stored in token privilege records
///
/// Only meaningful on the machine and boot session that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Luid(u64);

impl Luid {
    /// Create a LUID from its 64-bit value
    pub const fn new(value: u64) -> Self {
        Luid(value)
    }

    /// Build from the `LowPart`/`HighPart` pair used by the native struct
    pub const fn from_parts(low: u32, high: i32) -> Self {
        Luid(((high as u32 as u64) << 32) | low as u64)
    }

    /// Decode the 8-byte little-endian on-wire form
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Luid(u64::from_le_bytes(bytes))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub const fn low_part(&self) -> u32 {
        self.0 as u32
    }

    pub const fn high_part(&self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }
}

impl From<u64> for Luid {
    fn from(value: u64) -> Self {
        Luid(value)
    }
}

impl fmt::Display for Luid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

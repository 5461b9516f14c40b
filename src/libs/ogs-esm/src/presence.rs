//! Presence mask of optional IEs
//!
//! One bit per optional IE kind of a message type. A bit is only ever set by
//! the decoder (IE parsed) or by the application (IE to be encoded).

use std::fmt;

/// Presence bitmask of a message instance
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PresenceMask(u64);

impl PresenceMask {
    /// Highest usable bit index plus one
    pub const CAPACITY: u8 = 64;

    /// Empty mask
    pub const fn new() -> Self {
        Self(0)
    }

    /// Build a mask from raw bits
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Flag value of a bit index, zero from `CAPACITY` upwards
    pub const fn flag(bit: u8) -> u64 {
        match 1u64.checked_shl(bit as u32) {
            Some(flag) => flag,
            None => 0,
        }
    }

    /// Check if the IE at `bit` is present
    pub const fn contains(&self, bit: u8) -> bool {
        self.0 & Self::flag(bit) != 0
    }

    /// Mark the IE at `bit` as present. Out of range bits are ignored.
    pub fn set(&mut self, bit: u8) {
        self.0 |= Self::flag(bit);
    }

    /// Mark the IE at `bit` as absent. Out of range bits are ignored.
    ///
    /// Never called by the codec itself.
    pub fn clear(&mut self, bit: u8) {
        self.0 &= !Self::flag(bit);
    }

    /// True if no optional IE is present
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of optional IEs present
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Debug for PresenceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PresenceMask({:#x})", self.0)
    }
}

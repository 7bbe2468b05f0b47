//! # Slot Handles
//!
//! Handles are lightweight identifiers consisting of:
//! - An index into slot storage
//! - A generation counter for detecting stale references

/// Generational handle into a [`SlotPool`](super::SlotPool).
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into slot storage
/// - Upper 32 bits: Generation counter for detecting stale references
///
/// A handle outlives the value it names; once the slot is freed and reused,
/// the generation differs and lookups through the old handle fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SlotId(u64);

impl SlotId {
    /// Null/invalid handle.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this handle is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index(), self.generation())
    }
}

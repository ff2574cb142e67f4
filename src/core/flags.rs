//! Construction flags

use std::ops::{BitOr, BitOrAssign};

/// Bitmask selecting optional record rendering behaviour
///
/// ```
/// use rust_remote_logger::LogFlags;
///
/// let flags = LogFlags::TIMESTAMP | LogFlags::JSON;
/// assert!(flags.contains(LogFlags::JSON));
/// assert!(!LogFlags::empty().contains(LogFlags::TIMESTAMP));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogFlags(u32);

impl LogFlags {
    /// Include the `xtime` field
    pub const TIMESTAMP: LogFlags = LogFlags(1);
    /// Render records as JSON instead of key=value text
    pub const JSON: LogFlags = LogFlags(1 << 1);

    pub const fn empty() -> Self {
        LogFlags(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones
    pub const fn from_bits_truncate(bits: u32) -> Self {
        LogFlags(bits & (Self::TIMESTAMP.0 | Self::JSON.0))
    }

    pub const fn contains(&self, other: LogFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for LogFlags {
    type Output = LogFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        LogFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LogFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

//! Size classification used to tint report lines.

use colored::Color;
use serde::Serialize;

/// Bytes in one mebibyte.
const MIB: u64 = 1024 * 1024;

/// Display-only bucket a package size falls into.
///
/// Classification ([`SeverityTier::from_size`]) and presentation
/// ([`SeverityTier::color`]) are kept apart so a renderer can ignore colors
/// entirely without touching the thresholds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    /// Below 1 MiB.
    Small,

    /// From 1 MiB up to (not including) 10 MiB.
    Medium,

    /// 10 MiB and above.
    Large,
}

impl SeverityTier {
    /// Sizes from this value on are at least [`SeverityTier::Medium`].
    pub const MEDIUM_THRESHOLD: u64 = MIB;

    /// Sizes from this value on are [`SeverityTier::Large`].
    pub const LARGE_THRESHOLD: u64 = 10 * MIB;

    /// Classify a size in bytes.
    #[must_use]
    pub const fn from_size(size: u64) -> Self {
        if size < Self::MEDIUM_THRESHOLD {
            Self::Small
        } else if size < Self::LARGE_THRESHOLD {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Terminal color for this tier.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Small => Color::Green,
            Self::Medium => Color::Yellow,
            Self::Large => Color::Red,
        }
    }
}

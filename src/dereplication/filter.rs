use serde::Serialize;

use crate::core::cluster::Cluster;

/// Inclusive abundance bounds. A bound of zero is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeFilter {
    pub min: u64,
    pub max: u64,
}

impl SizeFilter {
    /// Bound value that turns that side of the filter off
    pub const DISABLED: u64 = 0;

    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// True when neither bound is active
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.min == Self::DISABLED && self.max == Self::DISABLED
    }

    /// Check an abundance against both bounds.
    ///
    /// `min <= size <= max`, with each side skipped when its bound is zero.
    #[must_use]
    pub fn admits(&self, size: u64) -> bool {
        let pass_low = self.min == Self::DISABLED || size >= self.min;
        let pass_high = self.max == Self::DISABLED || size <= self.max;

        pass_low && pass_high
    }

    #[must_use]
    pub fn passes(&self, cluster: &Cluster) -> bool {
        self.admits(cluster.size)
    }
}

//! Cooldown store
//!
//! Seconds remaining per cooldown category. Snapshots overwrite, the
//! one-second ticker decrements.

use std::collections::BTreeMap;

/// Cooldown categories reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CooldownCategory {
    Drug,
    Medical,
    Booster,
}

impl CooldownCategory {
    /// All categories in display order
    pub const ALL: [CooldownCategory; 3] = [
        CooldownCategory::Drug,
        CooldownCategory::Medical,
        CooldownCategory::Booster,
    ];

    /// Key used by the API payload and the renderer
    pub fn key(&self) -> &'static str {
        match self {
            CooldownCategory::Drug => "drug",
            CooldownCategory::Medical => "medical",
            CooldownCategory::Booster => "booster",
        }
    }

    /// Get display name for this category
    pub fn name(&self) -> &'static str {
        match self {
            CooldownCategory::Drug => "Drug",
            CooldownCategory::Medical => "Medical",
            CooldownCategory::Booster => "Booster",
        }
    }
}

/// Latest known countdowns, in seconds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownStore {
    remaining: BTreeMap<CooldownCategory, u64>,
}

impl CooldownStore {
    /// Create an empty store (every category ready)
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite with server values.
    ///
    /// Categories missing from `values` keep whatever they had. Negative
    /// values from a malformed payload count as ready.
    pub fn apply_snapshot<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (CooldownCategory, i64)>,
    {
        for (category, seconds) in values {
            self.remaining.insert(category, seconds.max(0) as u64);
        }
    }

    /// Advance every running countdown by one second
    pub fn tick(&mut self) {
        for seconds in self.remaining.values_mut() {
            *seconds = seconds.saturating_sub(1);
        }
    }

    /// Seconds remaining for a category (0 if never seen)
    pub fn get(&self, category: CooldownCategory) -> u64 {
        self.remaining.get(&category).copied().unwrap_or(0)
    }

    /// Whether the action is available now
    pub fn is_ready(&self, category: CooldownCategory) -> bool {
        self.get(category) == 0
    }
}

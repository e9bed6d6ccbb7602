//! Feature flags
//!
//! Flags only change what clients are shown; the converters always support
//! every unit in their tables.

mod featurehub;

use std::collections::HashSet;

use async_trait::async_trait;

pub use featurehub::{FeatureError, FeatureHubToggles, DEFAULT_CACHE_TTL};

/// Shows `Microgram` in the weight unit list
pub const WEIGHT_MICROGRAM_FLAG: &str = "weight-microgram";
/// Shows `Milligram` in the weight unit list
pub const WEIGHT_MILLIGRAM_FLAG: &str = "weight-milligram";

/// Source of feature flag state
#[async_trait]
pub trait FeatureToggle: Send + Sync {
    /// Whether `flag` is on. Lookup failures read as off.
    async fn is_enabled(&self, flag: &str) -> bool;

    /// The subset of `flags` that are on
    async fn enabled_among(&self, flags: &[&str]) -> HashSet<String> {
        let mut enabled = HashSet::new();
        for flag in flags {
            if self.is_enabled(flag).await {
                enabled.insert(flag.to_string());
            }
        }
        enabled
    }
}

/// A fixed set of enabled flags
#[derive(Debug, Clone, Default)]
pub struct StaticToggles {
    enabled: HashSet<String>,
}

impl StaticToggles {
    /// Every flag off
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_enabled<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: flags.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl FeatureToggle for StaticToggles {
    async fn is_enabled(&self, flag: &str) -> bool {
        self.enabled.contains(flag)
    }
}

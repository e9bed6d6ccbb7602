//! Enum catalog tool

use tracing::{debug, info};

use crate::conversion::WeightUnit;
use crate::features::{FeatureToggle, WEIGHT_MICROGRAM_FLAG, WEIGHT_MILLIGRAM_FLAG};
use crate::models::EnumCatalog;

/// Build the catalog, hiding weight units whose flags are off
pub async fn list_enums(toggles: &dyn FeatureToggle) -> EnumCatalog {
    debug!("Starting - [method:list_enums]");

    let enabled = toggles
        .enabled_among(&[WEIGHT_MICROGRAM_FLAG, WEIGHT_MILLIGRAM_FLAG])
        .await;

    let catalog = EnumCatalog::build(|unit| match unit {
        WeightUnit::Microgram => enabled.contains(WEIGHT_MICROGRAM_FLAG),
        WeightUnit::Milligram => enabled.contains(WEIGHT_MILLIGRAM_FLAG),
        _ => true,
    });

    info!("Success - [method:list_enums] with action: fetching enums.");
    catalog
}

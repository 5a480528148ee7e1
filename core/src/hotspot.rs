//! Hotspot intensity mapper: spreads the final year's growth over the
//! region's existing assets.
//!
//! RULE: Output order matches `existing_assets` order, one hotspot per asset.
//! A region without assets yields no hotspots.

use crate::{
    allocation::Allocation,
    config::HotspotParams,
    projection::YearGrowth,
    region::{Asset, AssetType, GeoPoint},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub asset_name: String,
    pub location:   GeoPoint,
    /// Relative pull of this asset. Unbounded above.
    pub intensity:  f64,
    /// Projected new jobs around the asset in the final year.
    pub jobs:       f64,
    /// Projected new companies, capped at a share of the final total.
    pub companies:  f64,
}

/// Intensity of a single asset before growth is attached to it.
pub fn asset_intensity(
    asset: &Asset,
    alloc: &Allocation,
    policy_multiplier: f64,
    params: &HotspotParams,
) -> f64 {
    let base = f64::from(asset.strength) / params.strength_scale;

    let boost = match asset.kind {
        AssetType::University if alloc.research > params.focus_threshold => {
            params.university_research_boost
        }
        AssetType::Company if alloc.incentives > params.focus_threshold => {
            params.company_incentives_boost
        }
        AssetType::ResearchCenter | AssetType::BioPark
            if alloc.infrastructure > params.focus_threshold =>
        {
            params.facility_infrastructure_boost
        }
        _ => 1.0,
    };

    base * boost * policy_multiplier
}

/// Map the final-year deltas onto `assets`.
pub fn map_hotspots(
    assets: &[Asset],
    alloc: &Allocation,
    policy_multiplier: f64,
    final_growth: &YearGrowth,
    final_companies: f64,
    params: &HotspotParams,
) -> Vec<Hotspot> {
    if assets.is_empty() {
        log::debug!("No existing assets: hotspot map is empty");
        return Vec::new();
    }

    let asset_count = assets.len() as f64;
    let company_cap = (final_companies * params.company_share_cap).round();

    let hotspots: Vec<Hotspot> = assets
        .iter()
        .map(|asset| {
            let intensity = asset_intensity(asset, alloc, policy_multiplier, params);
            let jobs = (intensity * final_growth.jobs / asset_count).round();
            let companies = (intensity * final_growth.companies / asset_count)
                .round()
                .min(company_cap);
            Hotspot {
                asset_name: asset.name.clone(),
                location: asset.location,
                intensity,
                jobs,
                companies,
            }
        })
        .collect();

    log::debug!(
        "Mapped {} hotspot(s): company cap per hotspot={company_cap}",
        hotspots.len()
    );
    hotspots
}

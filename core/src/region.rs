//! Region catalog records.
//!
//! RULE: The engine only reads these. Regions are supplied by the catalog
//! file (or `SimConfig::default_test()`) and are never edited in place.

use crate::{
    error::{SimError, SimResult},
    types::{Crores, RegionId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
    University,
    Company,
    ResearchCenter,
    BioPark,
}

impl AssetType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::University     => "university",
            Self::Company        => "company",
            Self::ResearchCenter => "researchCenter",
            Self::BioPark        => "bioPark",
        }
    }
}

/// An existing anchor of the regional ecosystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub location: GeoPoint,
    /// Maturity/influence weight, 0..=10.
    pub strength: u8,
}

/// Current regional indicators. `companies` may be absent in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub companies: Option<f64>,
    pub jobs:      f64,
    /// Cumulative funding in crores.
    pub funding:   Crores,
    pub patents:   f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id:   RegionId,
    pub name: String,
    /// Map framing. Carried for the presentation layer; unused by the engine.
    pub center: GeoPoint,
    pub zoom:   u8,
    pub current_metrics: Metrics,
    #[serde(default)]
    pub existing_assets: Vec<Asset>,
}

/// Ordered list of regions. The first entry is the default selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionCatalog {
    pub regions: Vec<Region>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn get(&self, id: &str) -> SimResult<&Region> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| SimError::RegionNotFound { id: id.to_string() })
    }

    pub fn first(&self) -> Option<&Region> {
        self.regions.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

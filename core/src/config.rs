use crate::{
    error::{SimError, SimResult},
    policy::Policy,
    region::{Asset, AssetType, GeoPoint, Metrics, Region, RegionCatalog},
};
use serde::{Deserialize, Serialize};

// ── Model coefficients ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureParams {
    /// Jobs created per crore.
    pub job_multiplier: f64,
    pub company_formation_rate: f64,
    pub patent_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceParams {
    pub job_multiplier: f64,
    // Not read by the projection; kept so catalog files round-trip.
    pub retention_rate: f64,
    pub productivity_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentivesParams {
    /// Growth in external investment per crore.
    pub attraction_multiplier: f64,
    pub job_multiplier: f64,
    pub company_formation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchParams {
    pub patent_multiplier: f64,
    pub spinoff_rate: f64,
    pub funding_multiplier: f64,
}

/// Per-category coefficients read by the growth simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub infrastructure: InfrastructureParams,
    pub workforce:      WorkforceParams,
    pub incentives:     IncentivesParams,
    pub research:       ResearchParams,
}

impl ModelParameters {
    /// Reference coefficients of the regional biotech model.
    pub fn reference() -> Self {
        Self {
            infrastructure: InfrastructureParams {
                job_multiplier: 10.0,
                company_formation_rate: 0.05,
                patent_multiplier: 0.02,
            },
            workforce: WorkforceParams {
                job_multiplier: 15.0,
                retention_rate: 0.02,
                productivity_gain: 0.03,
            },
            incentives: IncentivesParams {
                attraction_multiplier: 0.08,
                job_multiplier: 5.0,
                company_formation_rate: 0.1,
            },
            research: ResearchParams {
                patent_multiplier: 0.1,
                spinoff_rate: 0.02,
                funding_multiplier: 0.2,
            },
        }
    }

    fn coefficients(&self) -> [(&'static str, f64); 12] {
        [
            ("infrastructure.job_multiplier", self.infrastructure.job_multiplier),
            ("infrastructure.company_formation_rate", self.infrastructure.company_formation_rate),
            ("infrastructure.patent_multiplier", self.infrastructure.patent_multiplier),
            ("workforce.job_multiplier", self.workforce.job_multiplier),
            ("workforce.retention_rate", self.workforce.retention_rate),
            ("workforce.productivity_gain", self.workforce.productivity_gain),
            ("incentives.attraction_multiplier", self.incentives.attraction_multiplier),
            ("incentives.job_multiplier", self.incentives.job_multiplier),
            ("incentives.company_formation_rate", self.incentives.company_formation_rate),
            ("research.patent_multiplier", self.research.patent_multiplier),
            ("research.spinoff_rate", self.research.spinoff_rate),
            ("research.funding_multiplier", self.research.funding_multiplier),
        ]
    }
}

// ── Engine constants ──────────────────────────────────────────────

/// Multiplier applied while a policy is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyMultipliers {
    pub expedited_permits:          f64,
    pub international_partnerships: f64,
    pub public_private_hubs:        f64,
    pub incubator_network:          f64,
}

impl Default for PolicyMultipliers {
    fn default() -> Self {
        Self {
            expedited_permits:          1.10,
            international_partnerships: 1.15,
            public_private_hubs:        1.20,
            incubator_network:          1.25,
        }
    }
}

impl PolicyMultipliers {
    pub fn get(&self, policy: Policy) -> f64 {
        match policy {
            Policy::ExpeditedPermits          => self.expedited_permits,
            Policy::InternationalPartnerships => self.international_partnerships,
            Policy::PublicPrivateHubs         => self.public_private_hubs,
            Policy::IncubatorNetwork          => self.incubator_network,
        }
    }
}

/// Stabilizers of the yearly compounding. Without them growth on large
/// bases is unbounded; they are part of the model, not tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthLimits {
    /// Converts per-crore formation rates into a yearly company growth rate.
    pub company_rate_scale: f64,
    /// Damps funding and patent compounding.
    pub compounding_scale: f64,
    /// Yearly company growth rate ceiling.
    pub max_company_growth_rate: f64,
    /// Company count assumed when the catalog omits it.
    pub default_companies: f64,
}

impl Default for GrowthLimits {
    fn default() -> Self {
        Self {
            company_rate_scale: 0.01,
            compounding_scale: 0.1,
            max_company_growth_rate: 0.30,
            default_companies: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotspotParams {
    /// Asset strength is divided by this to get the base intensity.
    pub strength_scale: f64,
    /// A category must receive strictly more than this to boost its assets.
    pub focus_threshold: f64,
    pub university_research_boost: f64,
    pub company_incentives_boost: f64,
    /// Research centers and bio parks, boosted by infrastructure.
    pub facility_infrastructure_boost: f64,
    /// Ceiling on a hotspot's companies, as a share of the final total.
    pub company_share_cap: f64,
}

impl Default for HotspotParams {
    fn default() -> Self {
        Self {
            strength_scale: 10.0,
            focus_threshold: 20.0,
            university_research_boost: 1.5,
            company_incentives_boost: 1.3,
            facility_infrastructure_boost: 1.4,
            company_share_cap: 0.20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConstants {
    pub policy_multipliers: PolicyMultipliers,
    pub growth_limits:      GrowthLimits,
    pub hotspot:            HotspotParams,
}

// ── Files ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct GrowthModelFile {
    coefficients: ModelParameters,
    #[serde(default)]
    constants: EngineConstants,
}

#[derive(Debug, Clone, Deserialize)]
struct RegionsFile {
    regions: Vec<Region>,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub parameters: ModelParameters,
    pub constants:  EngineConstants,
    pub catalog:    RegionCatalog,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let model_path = format!("{data_dir}/model/growth_model.json");
        let model_content = std::fs::read_to_string(&model_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {model_path}: {e}"))?;
        let model_file: GrowthModelFile = serde_json::from_str(&model_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {model_path}: {e}"))?;

        let regions_path = format!("{data_dir}/regions/regions.json");
        let regions_content = std::fs::read_to_string(&regions_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {regions_path}: {e}"))?;
        let regions_file: RegionsFile = serde_json::from_str(&regions_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {regions_path}: {e}"))?;

        let config = Self {
            parameters: model_file.coefficients,
            constants:  model_file.constants,
            catalog:    RegionCatalog::new(regions_file.regions),
        };
        config.validate()?;

        log::debug!(
            "Loaded growth model and {} region(s) from {data_dir}",
            config.catalog.len()
        );
        Ok(config)
    }

    /// Reject coefficients and constants the simulation cannot use.
    pub fn validate(&self) -> SimResult<()> {
        for (name, value) in self.parameters.coefficients() {
            ensure(value.is_finite() && value >= 0.0, || {
                format!("coefficient {name} must be a non-negative number, got {value}")
            })?;
        }

        for policy in Policy::ALL {
            let value = self.constants.policy_multipliers.get(policy);
            ensure(value.is_finite() && value > 1.0, || {
                format!("policy multiplier {} must be greater than 1, got {value}", policy.name())
            })?;
        }

        let limits = &self.constants.growth_limits;
        for (name, value) in [
            ("company_rate_scale", limits.company_rate_scale),
            ("compounding_scale", limits.compounding_scale),
            ("max_company_growth_rate", limits.max_company_growth_rate),
            ("default_companies", limits.default_companies),
        ] {
            ensure(value.is_finite() && value > 0.0, || {
                format!("growth limit {name} must be positive, got {value}")
            })?;
        }

        let hotspot = &self.constants.hotspot;
        for (name, value) in [
            ("strength_scale", hotspot.strength_scale),
            ("university_research_boost", hotspot.university_research_boost),
            ("company_incentives_boost", hotspot.company_incentives_boost),
            ("facility_infrastructure_boost", hotspot.facility_infrastructure_boost),
            ("company_share_cap", hotspot.company_share_cap),
        ] {
            ensure(value.is_finite() && value > 0.0, || {
                format!("hotspot parameter {name} must be positive, got {value}")
            })?;
        }
        ensure(
            hotspot.focus_threshold.is_finite() && hotspot.focus_threshold >= 0.0,
            || format!("hotspot focus_threshold must be non-negative, got {}", hotspot.focus_threshold),
        )?;

        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let bangalore = Region {
            id: "bangalore".into(),
            name: "Bangalore".into(),
            center: GeoPoint::new(12.9716, 77.5946),
            zoom: 11,
            current_metrics: Metrics {
                companies: Some(85.0),
                jobs: 25_000.0,
                funding: 450.0,
                patents: 120.0,
            },
            existing_assets: vec![
                asset("Indian Institute of Science", AssetType::University, 13.0219, 77.5671, 9),
                asset("Centre for Cellular & Molecular Platforms", AssetType::ResearchCenter, 13.0692, 77.5776, 8),
                asset("Bangalore Helix Biotech Park", AssetType::BioPark, 13.0637, 77.5855, 7),
                asset("Biocon", AssetType::Company, 12.9782, 77.6409, 9),
                asset("Strides Pharma", AssetType::Company, 12.9141, 77.6501, 7),
            ],
        };

        let hyderabad = Region {
            id: "hyderabad".into(),
            name: "Hyderabad".into(),
            center: GeoPoint::new(17.3850, 78.4867),
            zoom: 11,
            current_metrics: Metrics {
                companies: Some(100.0),
                jobs: 30_000.0,
                funding: 500.0,
                patents: 150.0,
            },
            existing_assets: vec![
                asset("University of Hyderabad", AssetType::University, 17.4606, 78.3492, 8),
                asset("CSIR-CCMB", AssetType::ResearchCenter, 17.4239, 78.5540, 9),
                asset("Genome Valley", AssetType::BioPark, 17.5845, 78.4501, 9),
                asset("Dr. Reddy's Laboratories", AssetType::Company, 17.4932, 78.3913, 8),
                asset("Bharat Biotech", AssetType::Company, 17.4472, 78.4376, 7),
            ],
        };

        Self {
            parameters: ModelParameters::reference(),
            constants:  EngineConstants::default(),
            catalog:    RegionCatalog::new(vec![bangalore, hyderabad]),
        }
    }
}

fn asset(name: &str, kind: AssetType, lat: f64, lon: f64, strength: u8) -> Asset {
    Asset {
        name: name.into(),
        kind,
        location: GeoPoint::new(lat, lon),
        strength,
    }
}

fn ensure(condition: bool, reason: impl FnOnce() -> String) -> SimResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SimError::InvalidConfig { reason: reason() })
    }
}

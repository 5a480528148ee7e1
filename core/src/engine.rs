//! The projection engine: one pure call from inputs to outputs.
//!
//! EXECUTION ORDER (fixed):
//!   1. Allocation balancer
//!   2. Policy multiplier aggregator
//!   3. Growth simulation loop
//!   4. Hotspot intensity mapper (reads the final year of step 3)
//!
//! RULES:
//!   - No state survives between calls. Identical inputs give identical outputs.
//!   - Callers re-invoke `project` whenever any input changes and replace the
//!     previous output wholesale.

use crate::{
    allocation::{balance, Allocation, Budget, Category},
    config::SimConfig,
    error::SimResult,
    hotspot::{map_hotspots, Hotspot},
    policy::{combined_multiplier, PolicyToggles},
    projection::{
        simulate, GrowthState, IndicatorValues, ProjectionSeries, Timeframe, TimelineRow,
        YearGrowth,
    },
    region::Region,
    types::{Crores, RegionId},
};
use serde::{Deserialize, Serialize};

/// Everything the user controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    pub allocation: Allocation,
    /// The category the user changed last, protected during balancing.
    #[serde(default)]
    pub edited:     Option<Category>,
    #[serde(default)]
    pub policies:   PolicyToggles,
    pub timeframe:  Timeframe,
    pub budget:     Budget,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            allocation: Allocation::new(30.0, 25.0, 25.0, 20.0),
            edited:     None,
            policies:   PolicyToggles::none(),
            timeframe:  Timeframe::DEFAULT,
            budget:     Budget::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub region_id:         RegionId,
    /// The allocation actually simulated, after balancing.
    pub allocation:        Allocation,
    pub unabsorbed_excess: Crores,
    pub policy_multiplier: f64,
    pub baseline:          GrowthState,
    pub series:            ProjectionSeries,
    pub final_growth:      YearGrowth,
    pub hotspots:          Vec<Hotspot>,
}

impl Projection {
    /// Balancing left the total above budget.
    pub fn allocation_underflow(&self) -> bool {
        self.unabsorbed_excess > 0.0
    }

    pub fn final_values(&self) -> Option<IndicatorValues> {
        self.series.last()
    }

    /// Baseline as year 0 followed by every simulated year.
    pub fn timeline(&self) -> Vec<TimelineRow> {
        let mut rows = Vec::with_capacity(self.series.len() + 1);
        rows.push(TimelineRow { year: 0, values: self.baseline.rounded() });
        rows.extend((1..=self.series.len() as u32).filter_map(|year| {
            self.series.year(year).map(|values| TimelineRow { year, values })
        }));
        rows
    }
}

pub struct ProjectionEngine {
    config: SimConfig,
}

impl ProjectionEngine {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Look the region up in the catalog, then project it.
    pub fn project_region(&self, region_id: &str, inputs: &ScenarioInputs) -> SimResult<Projection> {
        let region = self.config.catalog.get(region_id)?;
        self.project(region, inputs)
    }

    pub fn project(&self, region: &Region, inputs: &ScenarioInputs) -> SimResult<Projection> {
        inputs.allocation.validate()?;
        let constants = &self.config.constants;

        let balanced = balance(&inputs.allocation, inputs.edited, inputs.budget);
        let policy_multiplier = combined_multiplier(&inputs.policies, &constants.policy_multipliers);

        let baseline = GrowthState::from_metrics(&region.current_metrics, &constants.growth_limits);
        let run = simulate(
            baseline,
            &balanced.allocation,
            policy_multiplier,
            &self.config.parameters,
            &constants.growth_limits,
            inputs.timeframe,
        );

        let hotspots = map_hotspots(
            &region.existing_assets,
            &balanced.allocation,
            policy_multiplier,
            &run.final_growth,
            run.final_state.companies,
            &constants.hotspot,
        );

        log::info!(
            "Projected {} over {}: multiplier={policy_multiplier:.4} jobs={:.0} companies={:.0} hotspots={}",
            region.id,
            inputs.timeframe,
            run.final_state.jobs,
            run.final_state.companies,
            hotspots.len()
        );

        Ok(Projection {
            region_id: region.id.clone(),
            allocation: balanced.allocation,
            unabsorbed_excess: balanced.unabsorbed_excess,
            policy_multiplier,
            baseline,
            series: run.series,
            final_growth: run.final_growth,
            hotspots,
        })
    }
}

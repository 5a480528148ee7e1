//! Scenario session: the single-writer owner of the current input snapshot.
//!
//! RULE: Inputs change only through `apply()`, which needs `&mut self`.
//! A command is applied to a copy of the snapshot; the copy replaces the
//! snapshot only if the projection succeeds.

use crate::{
    allocation::{balance, Budget},
    command::ScenarioCommand,
    engine::{Projection, ProjectionEngine, ScenarioInputs},
    error::{SimError, SimResult},
    projection::Timeframe,
    types::RegionId,
};
use serde::Serialize;

/// What a presentation layer needs to redraw: inputs plus outputs.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState<'a> {
    pub region_id:  &'a str,
    pub inputs:     &'a ScenarioInputs,
    pub projection: &'a Projection,
}

pub struct ScenarioSession {
    engine:     ProjectionEngine,
    region_id:  RegionId,
    inputs:     ScenarioInputs,
    projection: Projection,
}

impl ScenarioSession {
    /// Start on the first catalog region with the default inputs.
    pub fn new(engine: ProjectionEngine) -> SimResult<Self> {
        let region_id = engine
            .config()
            .catalog
            .first()
            .map(|r| r.id.clone())
            .ok_or_else(|| SimError::InvalidConfig {
                reason: "region catalog is empty".into(),
            })?;
        Self::with_inputs(engine, region_id, ScenarioInputs::default())
    }

    pub fn with_inputs(
        engine: ProjectionEngine,
        region_id: RegionId,
        inputs: ScenarioInputs,
    ) -> SimResult<Self> {
        let projection = engine.project_region(&region_id, &inputs)?;
        Ok(Self { engine, region_id, inputs, projection })
    }

    /// Apply one input change and recompute.
    pub fn apply(&mut self, command: ScenarioCommand) -> SimResult<&Projection> {
        log::debug!("Applying {command:?} to session on {}", self.region_id);

        let mut region_id = self.region_id.clone();
        let mut inputs = self.inputs.clone();

        match command {
            ScenarioCommand::SelectRegion { region_id: id } => {
                region_id = id;
            }
            ScenarioCommand::SetAllocation { category, amount } => {
                let outcome = inputs.allocation.with_edit(category, amount, inputs.budget)?;
                inputs.allocation = outcome.allocation;
                inputs.edited = Some(category);
            }
            ScenarioCommand::SetBudget { amount } => {
                let budget = Budget::new(amount)?;
                inputs.allocation = balance(&inputs.allocation, None, budget).allocation;
                inputs.budget = budget;
                inputs.edited = None;
            }
            ScenarioCommand::TogglePolicy { policy } => {
                inputs.policies.toggle(policy);
            }
            ScenarioCommand::SetPolicy { policy, enabled } => {
                inputs.policies.set(policy, enabled);
            }
            ScenarioCommand::SetTimeframe { years } => {
                inputs.timeframe = Timeframe::from_years(years)?;
            }
        }

        let projection = self.engine.project_region(&region_id, &inputs)?;
        self.region_id = region_id;
        self.inputs = inputs;
        self.projection = projection;
        Ok(&self.projection)
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn state(&self) -> SessionState<'_> {
        SessionState {
            region_id:  &self.region_id,
            inputs:     &self.inputs,
            projection: &self.projection,
        }
    }
}

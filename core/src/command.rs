use crate::{
    allocation::Category,
    policy::Policy,
    types::{Crores, RegionId},
};
use serde::{Deserialize, Serialize};

/// All user-issued input changes.
/// Each one triggers a full recomputation of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ScenarioCommand {
    // ── Region ────────────────────────────────────
    SelectRegion { region_id: RegionId },

    // ── Budget allocation ─────────────────────────
    SetAllocation {
        category: Category,
        amount:   Crores,
    },
    SetBudget { amount: Crores },

    // ── Policies ──────────────────────────────────
    TogglePolicy { policy: Policy },
    SetPolicy {
        policy:  Policy,
        enabled: bool,
    },

    // ── Horizon ───────────────────────────────────
    /// Numeric so that fractional input can be rejected explicitly.
    SetTimeframe { years: f64 },
}

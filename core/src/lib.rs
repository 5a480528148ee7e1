//! Regional growth projection engine.
//!
//! Turns an annual budget split across four investment categories and a set
//! of policy toggles into multi-year trajectories of jobs, companies,
//! cumulative funding and patents, plus per-asset growth hotspots.

pub mod allocation;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod hotspot;
pub mod policy;
pub mod projection;
pub mod region;
pub mod session;
pub mod types;

pub use engine::{Projection, ProjectionEngine, ScenarioInputs};
pub use error::{SimError, SimResult};

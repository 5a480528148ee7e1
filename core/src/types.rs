//! Shared primitive types used across the growth engine.

/// An amount of money in crores (INR). Allocations, budgets and funding
/// are all expressed in this unit.
pub type Crores = f64;

/// A stable identifier for a region in the catalog (e.g. "bangalore").
pub type RegionId = String;

/// A simulated year. Year 0 is the baseline, year 1 the first projected year.
pub type Year = u32;

/// Tolerance used when comparing floating-point totals against the budget.
pub const EPS: f64 = 1e-9;

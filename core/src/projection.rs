//! Growth simulation loop: year-by-year compounding of the four indicators.
//!
//! EXECUTION ORDER (per simulated year):
//!   1. Compute all four deltas from the state at the start of the year.
//!   2. Apply the deltas.
//!   3. Append the rounded state to the output series.
//!
//! The last year's deltas are kept for the hotspot mapper.

use crate::{
    allocation::Allocation,
    config::{GrowthLimits, ModelParameters},
    error::{SimError, SimResult},
    region::Metrics,
    types::Year,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of simulated years. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct Timeframe(u32);

impl Timeframe {
    pub const DEFAULT: Timeframe = Timeframe(10);
    pub const PRESETS: [u32; 3] = [5, 10, 20];
    /// Longest accepted horizon.
    pub const MAX_YEARS: u32 = 1_000;

    pub fn new(years: u32) -> SimResult<Self> {
        if years == 0 || years > Self::MAX_YEARS {
            return Err(SimError::InvalidTimeframe { value: years.to_string() });
        }
        Ok(Self(years))
    }

    /// Accept a numeric input only if it is a positive whole number.
    pub fn from_years(years: f64) -> SimResult<Self> {
        if !years.is_finite() || years.fract() != 0.0 || years < 1.0 || years > f64::from(Self::MAX_YEARS) {
            return Err(SimError::InvalidTimeframe { value: years.to_string() });
        }
        Self::new(years as u32)
    }

    pub fn years(&self) -> u32 {
        self.0
    }
}

impl TryFrom<f64> for Timeframe {
    type Error = SimError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Timeframe::from_years(value)
    }
}

impl From<Timeframe> for u32 {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.0
    }
}

impl FromStr for Timeframe {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let years: u32 = s
            .trim()
            .parse()
            .map_err(|_| SimError::InvalidTimeframe { value: s.trim().to_string() })?;
        Timeframe::new(years)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years", self.0)
    }
}

/// Unrounded running values of the four indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthState {
    pub jobs:      f64,
    pub companies: f64,
    pub funding:   f64,
    pub patents:   f64,
}

impl GrowthState {
    /// Starting point of a projection. A missing company count falls back
    /// to `limits.default_companies`; an explicit zero stays zero.
    pub fn from_metrics(metrics: &Metrics, limits: &GrowthLimits) -> Self {
        Self {
            jobs:      metrics.jobs,
            companies: metrics.companies.unwrap_or(limits.default_companies),
            funding:   metrics.funding,
            patents:   metrics.patents,
        }
    }

    pub fn apply(&mut self, growth: &YearGrowth) {
        self.jobs += growth.jobs;
        self.companies += growth.companies;
        self.funding += growth.funding;
        self.patents += growth.patents;
    }

    pub fn rounded(&self) -> IndicatorValues {
        IndicatorValues {
            jobs:      round(self.jobs),
            companies: round(self.companies),
            funding:   round(self.funding),
            patents:   round(self.patents),
        }
    }
}

/// One year's increments.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YearGrowth {
    pub jobs:      f64,
    pub companies: f64,
    pub funding:   f64,
    pub patents:   f64,
}

/// Indicator values for one year, rounded to whole numbers.
/// Held as `f64` so compounding past the `i64` range keeps growing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    pub jobs:      f64,
    pub companies: f64,
    pub funding:   f64,
    pub patents:   f64,
}

/// Cumulative yearly values, one entry per simulated year.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub jobs:      Vec<f64>,
    pub companies: Vec<f64>,
    pub funding:   Vec<f64>,
    pub patents:   Vec<f64>,
}

impl ProjectionSeries {
    pub fn with_capacity(years: usize) -> Self {
        Self {
            jobs:      Vec::with_capacity(years),
            companies: Vec::with_capacity(years),
            funding:   Vec::with_capacity(years),
            patents:   Vec::with_capacity(years),
        }
    }

    pub fn push(&mut self, values: IndicatorValues) {
        self.jobs.push(values.jobs);
        self.companies.push(values.companies);
        self.funding.push(values.funding);
        self.patents.push(values.patents);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Values for simulated year `year` (1-based).
    pub fn year(&self, year: Year) -> Option<IndicatorValues> {
        let index = (year as usize).checked_sub(1)?;
        Some(IndicatorValues {
            jobs:      *self.jobs.get(index)?,
            companies: *self.companies.get(index)?,
            funding:   *self.funding.get(index)?,
            patents:   *self.patents.get(index)?,
        })
    }

    pub fn last(&self) -> Option<IndicatorValues> {
        self.year(self.len() as Year)
    }
}

/// A row of the baseline-prefixed timeline. Year 0 is the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub year: Year,
    #[serde(flatten)]
    pub values: IndicatorValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub series: ProjectionSeries,
    pub final_state: GrowthState,
    /// Deltas of the final simulated year (not cumulative totals).
    pub final_growth: YearGrowth,
}

/// Deltas for one year, given the state at its start.
pub fn year_growth(
    state: &GrowthState,
    alloc: &Allocation,
    policy_multiplier: f64,
    params: &ModelParameters,
    limits: &GrowthLimits,
) -> YearGrowth {
    let jobs = (alloc.infrastructure * params.infrastructure.job_multiplier
        + alloc.workforce * params.workforce.job_multiplier
        + alloc.incentives * params.incentives.job_multiplier)
        * policy_multiplier;

    // Company growth is a rate on the current count, capped per year.
    let company_growth_rate = (alloc.infrastructure
        * params.infrastructure.company_formation_rate
        * limits.company_rate_scale
        + alloc.incentives * params.incentives.company_formation_rate * limits.company_rate_scale
        + alloc.research * params.research.spinoff_rate * limits.company_rate_scale)
        * policy_multiplier;
    let companies = state.companies * company_growth_rate.min(limits.max_company_growth_rate);

    let funding = (alloc.incentives * params.incentives.attraction_multiplier
        + alloc.research * params.research.funding_multiplier)
        * state.funding
        * policy_multiplier
        * limits.compounding_scale;

    let patents = (alloc.infrastructure * params.infrastructure.patent_multiplier
        + alloc.research * params.research.patent_multiplier)
        * state.patents
        * policy_multiplier
        * limits.compounding_scale;

    YearGrowth { jobs, companies, funding, patents }
}

/// Run the compounding loop for `timeframe` years from `baseline`.
pub fn simulate(
    baseline: GrowthState,
    alloc: &Allocation,
    policy_multiplier: f64,
    params: &ModelParameters,
    limits: &GrowthLimits,
    timeframe: Timeframe,
) -> SimulationRun {
    let years = timeframe.years();
    let mut state = baseline;
    let mut series = ProjectionSeries::with_capacity(years as usize);
    let mut final_growth = YearGrowth::default();

    for year in 1..=years {
        let growth = year_growth(&state, alloc, policy_multiplier, params, limits);
        state.apply(&growth);
        series.push(state.rounded());

        log::debug!(
            "year={year} jobs={:.1} (+{:.1}) companies={:.2} (+{:.2}) funding={:.2} patents={:.2}",
            state.jobs,
            growth.jobs,
            state.companies,
            growth.companies,
            state.funding,
            state.patents
        );
        final_growth = growth;
    }

    if ![state.jobs, state.companies, state.funding, state.patents].iter().all(|v| v.is_finite()) {
        log::warn!("Indicators overflowed to infinity within {timeframe}");
    }

    SimulationRun { series, final_state: state, final_growth }
}

/// Round half away from zero. Indicators are non-negative, so this is
/// the usual round-half-up.
fn round(value: f64) -> f64 {
    value.round()
}

//! Allocation balancer: keeps category spending inside the annual budget.
//!
//! RULE: The category the user just edited is never reduced.
//! Every other category gives up its proportional share of the excess,
//! floored at zero. When the floors are hit some excess may remain; that
//! leftover is reported on the outcome, never raised as an error.

use crate::{
    error::{SimError, SimResult},
    types::{Crores, EPS},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four budget buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Infrastructure,
    Workforce,
    Incentives,
    Research,
}

impl Category {
    /// Fixed iteration order. Matches the order the sliders are shown in.
    pub const ALL: [Category; 4] = [
        Category::Infrastructure,
        Category::Workforce,
        Category::Incentives,
        Category::Research,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Workforce      => "workforce",
            Self::Incentives     => "incentives",
            Self::Research       => "research",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Infrastructure => "Infrastructure",
            Self::Workforce      => "Workforce",
            Self::Incentives     => "Incentives",
            Self::Research       => "Research",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| SimError::UnknownCategory { name: s.trim().to_string() })
    }
}

/// Spending per category, in crores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Allocation {
    pub infrastructure: Crores,
    pub workforce:      Crores,
    pub incentives:     Crores,
    pub research:       Crores,
}

impl Allocation {
    pub fn new(infrastructure: Crores, workforce: Crores, incentives: Crores, research: Crores) -> Self {
        Self { infrastructure, workforce, incentives, research }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Build an allocation from named entries, e.g. parsed CLI pairs or a
    /// JSON object. All four categories must be present exactly by name.
    pub fn from_entries<I, K>(entries: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = (K, Crores)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<Crores>; 4] = [None; 4];
        for (name, amount) in entries {
            let category: Category = name.as_ref().parse()?;
            check_amount(category, amount)?;
            slots[category.index()] = Some(amount);
        }

        let mut allocation = Allocation::zero();
        for category in Category::ALL {
            let amount = slots[category.index()].ok_or_else(|| SimError::MissingCategory {
                name: category.name().to_string(),
            })?;
            allocation.set(category, amount);
        }
        Ok(allocation)
    }

    pub fn get(&self, category: Category) -> Crores {
        match category {
            Category::Infrastructure => self.infrastructure,
            Category::Workforce      => self.workforce,
            Category::Incentives     => self.incentives,
            Category::Research       => self.research,
        }
    }

    pub fn set(&mut self, category: Category, amount: Crores) {
        match category {
            Category::Infrastructure => self.infrastructure = amount,
            Category::Workforce      => self.workforce = amount,
            Category::Incentives     => self.incentives = amount,
            Category::Research       => self.research = amount,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Crores)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> Crores {
        self.iter().map(|(_, amount)| amount).sum()
    }

    /// Reject negative or non-finite amounts.
    pub fn validate(&self) -> SimResult<()> {
        for (category, amount) in self.iter() {
            check_amount(category, amount)?;
        }
        Ok(())
    }

    /// Set one category and rebalance the others so the total fits the budget.
    /// This is the slider operation: `category` is the protected one.
    pub fn with_edit(&self, category: Category, amount: Crores, budget: Budget) -> SimResult<BalanceOutcome> {
        check_amount(category, amount)?;
        let mut candidate = *self;
        candidate.set(category, amount);
        Ok(balance(&candidate, Some(category), budget))
    }
}

fn check_amount(category: Category, amount: Crores) -> SimResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SimError::InvalidAllocation {
            category: category.name().to_string(),
            value: amount,
        });
    }
    Ok(())
}

/// The annual budget. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Budget(Crores);

impl Budget {
    pub const DEFAULT: Budget = Budget(100.0);

    pub fn new(amount: Crores) -> SimResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SimError::InvalidBudget { value: amount.to_string() });
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Crores {
        self.0
    }
}

impl TryFrom<f64> for Budget {
    type Error = SimError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Budget::new(value)
    }
}

impl From<Budget> for f64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl FromStr for Budget {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: f64 = s
            .trim()
            .parse()
            .map_err(|_| SimError::InvalidBudget { value: s.trim().to_string() })?;
        Budget::new(amount)
    }
}

/// Result of a balancing pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceOutcome {
    pub allocation: Allocation,
    /// Excess the pass could not recover because other categories hit zero.
    pub unabsorbed_excess: Crores,
}

impl BalanceOutcome {
    pub fn is_underflow(&self) -> bool {
        self.unabsorbed_excess > 0.0
    }
}

/// Bring `allocation` within `budget`.
///
/// With `edited = Some(c)`, `c` keeps its value and every other category is
/// reduced by `excess * value / (total - edited_value)`. With `edited = None`
/// no category is protected and the divisor is the full total.
pub fn balance(allocation: &Allocation, edited: Option<Category>, budget: Budget) -> BalanceOutcome {
    let total = allocation.total();
    if total <= budget.amount() {
        return BalanceOutcome { allocation: *allocation, unabsorbed_excess: 0.0 };
    }

    let excess = total - budget.amount();
    let edited_value = edited.map_or(0.0, |c| allocation.get(c));
    let remaining = total - edited_value;

    let mut balanced = *allocation;
    for category in Category::ALL {
        if Some(category) == edited {
            continue;
        }
        let value = allocation.get(category);
        // Other categories are all empty: nothing to take from.
        let reduction = if remaining > 0.0 {
            (value / remaining) * excess
        } else {
            0.0
        };
        balanced.set(category, (value - reduction).max(0.0));
    }

    let leftover = balanced.total() - budget.amount();
    let unabsorbed_excess = if leftover > EPS { leftover } else { 0.0 };
    if unabsorbed_excess > 0.0 {
        log::warn!(
            "allocation exceeds budget by {unabsorbed_excess:.2} Cr after balancing (edited={:?}, budget={:.2})",
            edited.map(|c| c.name()),
            budget.amount()
        );
    }

    BalanceOutcome { allocation: balanced, unabsorbed_excess }
}

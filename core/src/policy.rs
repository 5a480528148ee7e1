//! Policy toggles and the combined policy multiplier.
//!
//! Each enabled toggle contributes its configured multiplier; a disabled
//! toggle contributes 1.0. Effects are independent and multiply together.

use crate::{
    config::PolicyMultipliers,
    error::{SimError, SimResult},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    ExpeditedPermits,
    InternationalPartnerships,
    PublicPrivateHubs,
    IncubatorNetwork,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::ExpeditedPermits,
        Policy::InternationalPartnerships,
        Policy::PublicPrivateHubs,
        Policy::IncubatorNetwork,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpeditedPermits          => "expedited_permits",
            Self::InternationalPartnerships => "international_partnerships",
            Self::PublicPrivateHubs         => "public_private_hubs",
            Self::IncubatorNetwork          => "incubator_network",
        }
    }

    /// Human-readable label: snake_case words, each capitalised.
    pub fn label(&self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| SimError::UnknownPolicy { name: s.trim().to_string() })
    }
}

/// The four policy switches. All off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyToggles {
    pub expedited_permits:          bool,
    pub international_partnerships: bool,
    pub public_private_hubs:        bool,
    pub incubator_network:          bool,
}

impl PolicyToggles {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            expedited_permits:          true,
            international_partnerships: true,
            public_private_hubs:        true,
            incubator_network:          true,
        }
    }

    /// Enable exactly the named policies.
    pub fn from_names<I, S>(names: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut toggles = Self::none();
        for name in names {
            let policy: Policy = name.as_ref().parse()?;
            toggles.set(policy, true);
        }
        Ok(toggles)
    }

    pub fn is_enabled(&self, policy: Policy) -> bool {
        match policy {
            Policy::ExpeditedPermits          => self.expedited_permits,
            Policy::InternationalPartnerships => self.international_partnerships,
            Policy::PublicPrivateHubs         => self.public_private_hubs,
            Policy::IncubatorNetwork          => self.incubator_network,
        }
    }

    pub fn set(&mut self, policy: Policy, enabled: bool) {
        match policy {
            Policy::ExpeditedPermits          => self.expedited_permits = enabled,
            Policy::InternationalPartnerships => self.international_partnerships = enabled,
            Policy::PublicPrivateHubs         => self.public_private_hubs = enabled,
            Policy::IncubatorNetwork          => self.incubator_network = enabled,
        }
    }

    pub fn toggle(&mut self, policy: Policy) {
        self.set(policy, !self.is_enabled(policy));
    }

    pub fn enabled(&self) -> Vec<Policy> {
        Policy::ALL.into_iter().filter(|p| self.is_enabled(*p)).collect()
    }
}

/// Product of the per-toggle factors. Exactly 1.0 with every toggle off.
pub fn combined_multiplier(toggles: &PolicyToggles, multipliers: &PolicyMultipliers) -> f64 {
    Policy::ALL
        .into_iter()
        .map(|policy| {
            if toggles.is_enabled(policy) {
                multipliers.get(policy)
            } else {
                1.0
            }
        })
        .product()
}

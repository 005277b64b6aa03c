//! Central bank policy controller.
//!
//! Each strategy compares the money supply against the inflation target and
//! moves the tax rate by a fixed step in the corrective direction, clamped to
//! the strategy's own range.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BALANCED_CEILING, BALANCED_LOWER_RATIO, BALANCED_LOWER_STEP, BALANCED_RAISE_RATIO,
    BALANCED_RAISE_STEP, DOVE_CEILING, DOVE_LOWER_RATIO, DOVE_LOWER_STEP, DOVE_RAISE_RATIO,
    DOVE_RAISE_STEP, HAWK_CEILING, HAWK_LOWER_RATIO, HAWK_RAISE_RATIO, HAWK_RAISE_STEP,
    LOG_POLICY_MOVE, POLICY_RATE_FLOOR,
};
use crate::economy::EconomyState;
use crate::error::ConfigError;

/// Built-in central bank strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Control group: the tax rate is never touched.
    #[serde(alias = "laissez_faire")]
    LaissezFaire,
    /// Reacts at the slightest deviation and hits hard.
    Hawk,
    /// Lets inflation run hot before making gentle moves.
    Dove,
    /// Middle ground between reaction speed and stability.
    #[default]
    Balanced,
}

/// Inclusive clamp range for a strategy's tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    pub floor: f64,
    pub ceiling: f64,
}

impl RateBounds {
    #[must_use]
    pub fn clamp(self, rate: f64) -> f64 {
        rate.clamp(self.floor, self.ceiling)
    }

    #[must_use]
    pub fn contains(self, rate: f64) -> bool {
        (self.floor..=self.ceiling).contains(&rate)
    }
}

impl Strategy {
    pub const ALL: [Self; 4] = [Self::LaissezFaire, Self::Hawk, Self::Dove, Self::Balanced];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LaissezFaire => "laissez-faire",
            Self::Hawk => "hawk",
            Self::Dove => "dove",
            Self::Balanced => "balanced",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LaissezFaire => "Laissez-Faire",
            Self::Hawk => "The Hawk",
            Self::Dove => "The Dove",
            Self::Balanced => "Balanced",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LaissezFaire => "No regulation. Inflation will likely spiral.",
            Self::Hawk => "Aggressive. Will tax heavily at the slightest sign of trouble.",
            Self::Dove => "Passive. Will let inflation run hot before acting.",
            Self::Balanced => "A mix of reaction speed and stability.",
        }
    }

    /// Clamp range enforced after every decision; `None` for strategies that
    /// never adjust the rate.
    #[must_use]
    pub const fn bounds(self) -> Option<RateBounds> {
        let ceiling = match self {
            Self::LaissezFaire => return None,
            Self::Hawk => HAWK_CEILING,
            Self::Dove => DOVE_CEILING,
            Self::Balanced => BALANCED_CEILING,
        };
        Some(RateBounds {
            floor: POLICY_RATE_FLOOR,
            ceiling,
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "laissezfaire" | "laissez" => Ok(Self::LaissezFaire),
            "hawk" | "thehawk" => Ok(Self::Hawk),
            "dove" | "thedove" => Ok(Self::Dove),
            "balanced" => Ok(Self::Balanced),
            _ => Err(ConfigError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Pure decision function: the rate a strategy picks for a supply `ratio`
/// (current / target) given the current `rate`.
#[must_use]
pub fn next_rate(strategy: Strategy, ratio: f64, rate: f64) -> f64 {
    let Some(bounds) = strategy.bounds() else {
        return rate;
    };
    let moved = match strategy {
        Strategy::LaissezFaire => rate,
        Strategy::Hawk => {
            if ratio > HAWK_RAISE_RATIO {
                rate + HAWK_RAISE_STEP
            } else if ratio < HAWK_LOWER_RATIO {
                POLICY_RATE_FLOOR
            } else {
                rate
            }
        }
        Strategy::Dove => step_rate(
            ratio,
            rate,
            (DOVE_RAISE_RATIO, DOVE_RAISE_STEP),
            (DOVE_LOWER_RATIO, DOVE_LOWER_STEP),
        ),
        Strategy::Balanced => step_rate(
            ratio,
            rate,
            (BALANCED_RAISE_RATIO, BALANCED_RAISE_STEP),
            (BALANCED_LOWER_RATIO, BALANCED_LOWER_STEP),
        ),
    };
    bounds.clamp(moved)
}

fn step_rate(ratio: f64, rate: f64, raise: (f64, f64), lower: (f64, f64)) -> f64 {
    let (raise_ratio, raise_step) = raise;
    let (lower_ratio, lower_step) = lower;
    if ratio > raise_ratio {
        rate + raise_step
    } else if ratio < lower_ratio {
        rate - lower_step
    } else {
        rate
    }
}

/// Stateless regulator bound to one strategy for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyController {
    strategy: Strategy,
}

impl PolicyController {
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Resolve a strategy by name once, at construction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownStrategy`] when the name matches no
    /// built-in strategy.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        name.parse().map(Self::new)
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Analyze the ledger and store the new tax rate, which is also returned.
    pub fn decide(&self, state: &mut EconomyState) -> f64 {
        let previous = state.tax_rate();
        let rate = next_rate(self.strategy, state.supply_ratio(), previous);
        if (rate - previous).abs() > f64::EPSILON {
            log::debug!(
                target: LOG_POLICY_MOVE,
                "{} moved tax rate {previous:.4} -> {rate:.4}",
                self.strategy
            );
        }
        state.set_tax_rate(rate);
        rate
    }
}

//! Scripted stress events: sustained trend multipliers and one-day impulses.
use serde::{Deserialize, Serialize};

use crate::constants::GOLD_RUSH_DURATION_DAYS;
use crate::error::ConfigError;

/// Read-only perturbation descriptor evaluated against the day counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shock {
    /// Multiplies the daily baseline income for
    /// `start_day ..= start_day + duration`.
    Trend {
        start_day: u32,
        duration: u32,
        intensity: f64,
    },
    /// Injects `amount` exactly once, on `day`.
    Impulse { day: u32, amount: f64 },
}

impl Shock {
    /// Gold rush: a trend of the canonical sixty-day length.
    #[must_use]
    pub const fn gold_rush(start_day: u32, intensity: f64) -> Self {
        Self::Trend {
            start_day,
            duration: GOLD_RUSH_DURATION_DAYS,
            intensity,
        }
    }

    /// Whale deposit: a single lump-sum injection.
    #[must_use]
    pub const fn whale_deposit(day: u32, amount: f64) -> Self {
        Self::Impulse { day, amount }
    }

    /// Whether a trend window covers `day`. Impulses are never "active".
    #[must_use]
    pub const fn is_active_trend(&self, day: u32) -> bool {
        match *self {
            Self::Trend {
                start_day,
                duration,
                ..
            } => day >= start_day && day <= start_day.saturating_add(duration),
            Self::Impulse { .. } => false,
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let (field, value) = match *self {
            Self::Trend { intensity, .. } => ("intensity", intensity),
            Self::Impulse { amount, .. } => ("amount", amount),
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidShock {
                index,
                field,
                value,
            })
        }
    }
}

/// Validated, immutable list of shocks shared by every run that uses it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Shock>", try_from = "Vec<Shock>")]
pub struct ShockSchedule {
    shocks: Vec<Shock>,
}

impl TryFrom<Vec<Shock>> for ShockSchedule {
    type Error = ConfigError;

    fn try_from(shocks: Vec<Shock>) -> Result<Self, Self::Error> {
        Self::new(shocks)
    }
}

impl From<ShockSchedule> for Vec<Shock> {
    fn from(schedule: ShockSchedule) -> Self {
        schedule.shocks
    }
}

impl ShockSchedule {
    /// Validate every descriptor once, before any run starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShock`] for the first descriptor with a
    /// negative or non-finite intensity or amount.
    pub fn new(shocks: Vec<Shock>) -> Result<Self, ConfigError> {
        for (index, shock) in shocks.iter().enumerate() {
            shock.validate(index)?;
        }
        Ok(Self { shocks })
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { shocks: Vec::new() }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Shock] {
        &self.shocks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shocks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shocks.len()
    }

    /// Days on which a trend window opens, used for event notifications.
    pub(crate) fn trend_starts(&self, day: u32) -> impl Iterator<Item = f64> + '_ {
        self.shocks.iter().filter_map(move |shock| match *shock {
            Shock::Trend {
                start_day,
                intensity,
                ..
            } if start_day == day => Some(intensity),
            _ => None,
        })
    }
}

/// Baseline income for `day` after every active trend multiplier.
///
/// Overlapping trend windows compose multiplicatively.
#[must_use]
pub fn daily_baseline(day: u32, shocks: &[Shock], base_income: f64) -> f64 {
    shocks
        .iter()
        .filter(|shock| shock.is_active_trend(day))
        .fold(base_income, |income, shock| match *shock {
            Shock::Trend { intensity, .. } => income * intensity,
            Shock::Impulse { .. } => income,
        })
}

/// Total of every impulse scheduled exactly on `day`.
#[must_use]
pub fn impulse_for_day(day: u32, shocks: &[Shock]) -> f64 {
    shocks
        .iter()
        .map(|shock| match *shock {
            Shock::Impulse { day: at, amount } if at == day => amount,
            _ => 0.0,
        })
        .sum()
}

//! Global economic ledger: money supply, tax rate, and inflation tracking.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{GROWTH_FACTOR_MAX, GROWTH_FACTOR_MIN};
use crate::error::ConfigError;

/// Point-in-time view of the economy handed to the crisis evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub money_supply: f64,
    /// Percentage deviation of the supply from the inflation target.
    pub inflation_rate: f64,
    pub tax_rate: f64,
}

/// Mutable ledger owned by exactly one simulation driver.
///
/// `inflation_target` is fixed at construction; `tax_rate` is only moved by
/// the policy controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomyState {
    money_supply: f64,
    tax_rate: f64,
    inflation_target: f64,
    inflation_rate: f64,
}

impl EconomyState {
    /// Create a ledger whose healthy baseline equals the starting supply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StartMoney`] when `start_money` is not a positive
    /// finite amount and [`ConfigError::TaxRateRange`] when `start_tax` lies
    /// outside `[0, 1]`.
    pub fn new(start_money: f64, start_tax: f64) -> Result<Self, ConfigError> {
        if !start_money.is_finite() || start_money <= 0.0 {
            return Err(ConfigError::StartMoney { value: start_money });
        }
        if !start_tax.is_finite() || !(0.0..=1.0).contains(&start_tax) {
            return Err(ConfigError::TaxRateRange { value: start_tax });
        }
        Ok(Self {
            money_supply: start_money,
            tax_rate: start_tax,
            inflation_target: start_money,
            inflation_rate: 0.0,
        })
    }

    #[must_use]
    pub const fn money_supply(&self) -> f64 {
        self.money_supply
    }

    #[must_use]
    pub const fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    #[must_use]
    pub const fn inflation_target(&self) -> f64 {
        self.inflation_target
    }

    /// Inflation cached by the last [`EconomyState::advance_one_period`] call.
    #[must_use]
    pub const fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    /// Current supply relative to the healthy baseline.
    #[must_use]
    pub fn supply_ratio(&self) -> f64 {
        self.money_supply / self.inflation_target
    }

    /// Simulates faucets such as monster kills or admin events.
    ///
    /// Negative or non-finite amounts are ignored so the supply can never be
    /// driven below zero by an injection.
    pub fn inject(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.money_supply += amount;
        }
    }

    /// Burns the taxed share of `volume`, never more than the supply holds.
    ///
    /// Returns the amount actually removed from circulation.
    pub fn burn(&mut self, volume: f64) -> f64 {
        let requested = volume * self.tax_rate;
        if !requested.is_finite() || requested <= 0.0 {
            return 0.0;
        }
        let burned = requested.min(self.money_supply);
        self.money_supply -= burned;
        burned
    }

    /// Applies one coarse macro update drawn from `rng` and refreshes the
    /// cached inflation rate.
    pub fn advance_one_period<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EconomySnapshot {
        let growth = rng.gen_range(GROWTH_FACTOR_MIN..=GROWTH_FACTOR_MAX);
        self.money_supply = (self.money_supply * growth).max(0.0);
        self.inflation_rate = compute_inflation_rate(self.money_supply, self.inflation_target);
        self.snapshot()
    }

    /// Snapshot of the ledger without mutating it.
    #[must_use]
    pub const fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            money_supply: self.money_supply,
            inflation_rate: self.inflation_rate,
            tax_rate: self.tax_rate,
        }
    }

    pub(crate) const fn set_tax_rate(&mut self, rate: f64) {
        self.tax_rate = rate;
    }
}

/// Percentage deviation of `money_supply` from `target`.
#[must_use]
pub fn compute_inflation_rate(money_supply: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (money_supply / target - 1.0) * 100.0
}

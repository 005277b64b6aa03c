//! Day-by-day simulation loop driving the economy under one policy strategy.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DAILY_TRADE_SHARE, DEFAULT_BASE_INCOME, DEFAULT_SIMULATION_DAYS, DEFAULT_START_MONEY,
    DEFAULT_START_TAX, LOG_IMPULSE, LOG_TREND_START, SUCCESS_SUPPLY_MULTIPLIER,
};
use crate::economy::{EconomySnapshot, EconomyState, compute_inflation_rate};
use crate::error::ConfigError;
use crate::events::{EventListener, NotableEvent};
use crate::policy::{PolicyController, Strategy};
use crate::shocks::{ShockSchedule, daily_baseline, impulse_for_day};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_days")]
    pub days: u32,
    #[serde(default = "SimulationConfig::default_base_income")]
    pub base_income: f64,
    #[serde(default = "SimulationConfig::default_start_money")]
    pub start_money: f64,
    #[serde(default = "SimulationConfig::default_start_tax")]
    pub start_tax: f64,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub shocks: ShockSchedule,
}

impl SimulationConfig {
    const fn default_days() -> u32 {
        DEFAULT_SIMULATION_DAYS
    }

    const fn default_base_income() -> f64 {
        DEFAULT_BASE_INCOME
    }

    const fn default_start_money() -> f64 {
        DEFAULT_START_MONEY
    }

    const fn default_start_tax() -> f64 {
        DEFAULT_START_TAX
    }

    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub const fn with_base_income(mut self, base_income: f64) -> Self {
        self.base_income = base_income;
        self
    }

    #[must_use]
    pub const fn with_start(mut self, start_money: f64, start_tax: f64) -> Self {
        self.start_money = start_money;
        self.start_tax = start_tax;
        self
    }

    #[must_use]
    pub fn with_shocks(mut self, shocks: ShockSchedule) -> Self {
        self.shocks = shocks;
        self
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the configuration without starting a run.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the starting money, tax rate, or base
    /// income is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.initial_state().map(|_| ())
    }

    fn initial_state(&self) -> Result<EconomyState, ConfigError> {
        if !self.base_income.is_finite() || self.base_income < 0.0 {
            return Err(ConfigError::BaseIncome {
                value: self.base_income,
            });
        }
        EconomyState::new(self.start_money, self.start_tax)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: Self::default_days(),
            base_income: Self::default_base_income(),
            start_money: Self::default_start_money(),
            start_tax: Self::default_start_tax(),
            strategy: Strategy::default(),
            shocks: ShockSchedule::empty(),
        }
    }
}

/// Post-tick ledger snapshot; one per simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub day: u32,
    pub money_supply: f64,
    pub inflation_target: f64,
    pub tax_rate: f64,
}

impl SimulationRecord {
    fn capture(day: u32, state: &EconomyState) -> Self {
        Self {
            day,
            money_supply: state.money_supply(),
            inflation_target: state.inflation_target(),
            tax_rate: state.tax_rate(),
        }
    }

    /// Inflation derived from the record; the loop itself never caches it.
    #[must_use]
    pub fn inflation_rate(&self) -> f64 {
        compute_inflation_rate(self.money_supply, self.inflation_target)
    }

    /// Snapshot suitable for the crisis evaluator.
    #[must_use]
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            money_supply: self.money_supply,
            inflation_rate: self.inflation_rate(),
            tax_rate: self.tax_rate,
        }
    }
}

/// Final judgement of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Final supply stayed within the success band.
    Success,
    /// Inflation escaped containment.
    Failure,
}

impl Verdict {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Success when `money_supply` is at or below 1.5x the target.
#[must_use]
pub fn evaluate_verdict(money_supply: f64, inflation_target: f64) -> Verdict {
    if money_supply <= inflation_target * SUCCESS_SUPPLY_MULTIPLIER {
        Verdict::Success
    } else {
        Verdict::Failure
    }
}

/// Everything a caller needs to chart or export a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub strategy: Strategy,
    pub records: Vec<SimulationRecord>,
    pub final_state: EconomyState,
    pub verdict: Verdict,
    pub impulse_total: f64,
}

impl SimulationOutcome {
    #[must_use]
    pub fn last_record(&self) -> Option<&SimulationRecord> {
        self.records.last()
    }

    /// Highest tax rate the controller reached during the run.
    #[must_use]
    pub fn peak_tax_rate(&self) -> f64 {
        self.records
            .iter()
            .map(|record| record.tax_rate)
            .fold(self.final_state.tax_rate(), f64::max)
    }

    /// Highest supply observed during the run.
    #[must_use]
    pub fn peak_money_supply(&self) -> f64 {
        self.records
            .iter()
            .map(|record| record.money_supply)
            .fold(self.final_state.money_supply(), f64::max)
    }
}

/// Deterministic simulation harness owning one ledger for its lifetime.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    config: SimulationConfig,
    state: EconomyState,
    controller: PolicyController,
    day: u32,
    records: Vec<SimulationRecord>,
    impulse_total: f64,
}

impl SimulationRun {
    /// Validate the configuration and prepare a fresh ledger.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the starting money, tax rate, or base
    /// income is invalid. Shocks are validated when their schedule is built.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let state = config.initial_state()?;
        let controller = PolicyController::new(config.strategy);
        let capacity = usize::try_from(config.days.min(DEFAULT_SIMULATION_DAYS)).unwrap_or(0);
        Ok(Self {
            config,
            state,
            controller,
            day: 0,
            records: Vec::with_capacity(capacity),
            impulse_total: 0.0,
        })
    }

    #[must_use]
    pub const fn state(&self) -> &EconomyState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    /// Next day to be simulated.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.day >= self.config.days
    }

    /// Advance the economy by one day.
    ///
    /// Returns `None` once every configured day has been simulated. A driver
    /// may stop calling this at any point; the records stay consistent.
    pub fn tick<L: EventListener + ?Sized>(
        &mut self,
        listener: &mut L,
    ) -> Option<&SimulationRecord> {
        if self.is_finished() {
            return None;
        }
        let day = self.day;
        let shocks = self.config.shocks.as_slice();

        for intensity in self.config.shocks.trend_starts(day) {
            log::info!(target: LOG_TREND_START, "day {day}: trend x{intensity:.2} begins");
            listener.on_event(&NotableEvent::TrendStarted { day, intensity });
        }

        let daily_print = daily_baseline(day, shocks, self.config.base_income);
        self.state.inject(daily_print);

        let impulse = impulse_for_day(day, shocks);
        if impulse > 0.0 {
            self.state.inject(impulse);
            self.impulse_total += impulse;
            log::info!(target: LOG_IMPULSE, "day {day}: impulse deposit of {impulse:.0}");
            listener.on_event(&NotableEvent::Impulse {
                day,
                amount: impulse,
            });
        }

        let trade_volume = self.state.money_supply() * DAILY_TRADE_SHARE;
        self.state.burn(trade_volume);

        self.controller.decide(&mut self.state);

        self.records.push(SimulationRecord::capture(day, &self.state));
        self.day = self.day.saturating_add(1);
        self.records.last()
    }

    /// Verdict for the run so far; uses the live ledger before the first tick.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        let money_supply = self
            .records
            .last()
            .map_or(self.state.money_supply(), |record| record.money_supply);
        evaluate_verdict(money_supply, self.state.inflation_target())
    }

    /// Simulate every remaining day and return the outcome.
    #[must_use]
    pub fn run_to_end<L: EventListener + ?Sized>(mut self, listener: &mut L) -> SimulationOutcome {
        while self.tick(listener).is_some() {}
        self.into_outcome()
    }

    /// Finish the run as-is, including partially simulated runs.
    #[must_use]
    pub fn into_outcome(self) -> SimulationOutcome {
        let verdict = self.verdict();
        log::info!(
            "{} finished after {} days: {verdict}",
            self.config.strategy,
            self.records.len()
        );
        SimulationOutcome {
            strategy: self.config.strategy,
            records: self.records,
            final_state: self.state,
            verdict,
            impulse_total: self.impulse_total,
        }
    }
}

/// Run a full simulation for `config`.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the configuration is invalid.
pub fn simulate<L: EventListener + ?Sized>(
    config: SimulationConfig,
    listener: &mut L,
) -> Result<SimulationOutcome, ConfigError> {
    Ok(SimulationRun::new(config)?.run_to_end(listener))
}

/// Run the same scenario once per strategy, each with its own ledger.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the shared configuration is invalid.
pub fn compare_strategies<L: EventListener + ?Sized>(
    config: &SimulationConfig,
    strategies: &[Strategy],
    listener: &mut L,
) -> Result<Vec<SimulationOutcome>, ConfigError> {
    strategies
        .iter()
        .map(|&strategy| simulate(config.clone().with_strategy(strategy), &mut *listener))
        .collect()
}

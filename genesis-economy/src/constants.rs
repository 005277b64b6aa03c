//! Centralized balance and tuning constants for the Genesis economy.
//!
//! These values define the deterministic math of the simulation. Keeping
//! them together means the economy can only be retuned via reviewed code
//! changes.

// Economy defaults ---------------------------------------------------------
pub const DEFAULT_START_MONEY: f64 = 1_000_000.0;
pub const DEFAULT_START_TAX: f64 = 0.05;
pub const DEFAULT_BASE_INCOME: f64 = 10_000.0;
pub const DEFAULT_SIMULATION_DAYS: u32 = 365;

// Macro update -------------------------------------------------------------
pub const GROWTH_FACTOR_MIN: f64 = 0.98;
pub const GROWTH_FACTOR_MAX: f64 = 1.15;

// Daily tick ---------------------------------------------------------------
/// Share of the money supply that changes hands every day.
pub const DAILY_TRADE_SHARE: f64 = 0.20;
/// Final supply may not exceed this multiple of the target for a run to pass.
pub const SUCCESS_SUPPLY_MULTIPLIER: f64 = 1.5;

// Shocks -------------------------------------------------------------------
pub const GOLD_RUSH_DURATION_DAYS: u32 = 60;

// Policy table -------------------------------------------------------------
pub const POLICY_RATE_FLOOR: f64 = 0.01;

pub(crate) const HAWK_RAISE_RATIO: f64 = 1.01;
pub(crate) const HAWK_LOWER_RATIO: f64 = 0.99;
pub(crate) const HAWK_RAISE_STEP: f64 = 0.15;
pub(crate) const HAWK_CEILING: f64 = 0.90;

pub(crate) const DOVE_RAISE_RATIO: f64 = 1.50;
pub(crate) const DOVE_LOWER_RATIO: f64 = 0.90;
pub(crate) const DOVE_RAISE_STEP: f64 = 0.001;
pub(crate) const DOVE_LOWER_STEP: f64 = 0.01;
pub(crate) const DOVE_CEILING: f64 = 0.20;

pub(crate) const BALANCED_RAISE_RATIO: f64 = 1.10;
pub(crate) const BALANCED_LOWER_RATIO: f64 = 0.90;
pub(crate) const BALANCED_RAISE_STEP: f64 = 0.02;
pub(crate) const BALANCED_LOWER_STEP: f64 = 0.01;
pub(crate) const BALANCED_CEILING: f64 = 0.50;

// Crisis thresholds --------------------------------------------------------
pub const HYPER_INFLATION_THRESHOLD: f64 = 5.0;
pub const DEFLATION_THRESHOLD: f64 = -2.0;
pub(crate) const HYPER_INFLATION_SEVERITY: u8 = 8;
pub(crate) const DEFLATION_SEVERITY: u8 = 7;
/// Assessments above this severity wake the narrative generator.
pub const QUEST_SEVERITY_THRESHOLD: u8 = 3;
/// Forced crises above this severity read as panic rather than concern.
pub(crate) const FORCED_PANIC_SEVERITY: u8 = 7;
pub const MAX_SEVERITY: u8 = 10;

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_IMPULSE: &str = "economy.impulse";
pub(crate) const LOG_TREND_START: &str = "economy.trend.start";
pub(crate) const LOG_POLICY_MOVE: &str = "policy.move";
pub(crate) const LOG_QUEST_FAILURE: &str = "quest.failure";

// Quest library ------------------------------------------------------------
pub const QUEST_LIBRARY_CATALOG: &str = "_quest_library.json";

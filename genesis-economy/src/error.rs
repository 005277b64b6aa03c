//! Error taxonomy shared by the economy core.
use serde::Serialize;
use thiserror::Error;

/// Errors raised when construction parameters violate economy invariants.
///
/// These are fatal: a run configured with any of them never starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("starting money must be a positive finite amount (got {value})")]
    StartMoney { value: f64 },
    #[error("starting tax rate must be between 0 and 1 (got {value})")]
    TaxRateRange { value: f64 },
    #[error("base income must be a non-negative finite amount (got {value})")]
    BaseIncome { value: f64 },
    #[error("unknown policy strategy: {name}")]
    UnknownStrategy { name: String },
    #[error("unknown crisis condition: {name}")]
    UnknownCondition { name: String },
    #[error("shock #{index} is invalid: {field} must be non-negative and finite (got {value})")]
    InvalidShock {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("severity must be at most {max} (got {value})")]
    SeverityRange { value: u8, max: u8 },
}

/// Failures reported by the narrative generator or the persistence sink.
///
/// Always recovered at the boundary where the core invokes the collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CollaboratorError {
    #[error("quest generation failed: {0}")]
    Generation(String),
    #[error("quest response was malformed: {0}")]
    MalformedResponse(String),
    #[error("quest persistence failed: {0}")]
    Persistence(String),
}

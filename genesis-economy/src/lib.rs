//! Genesis Economy
//!
//! Platform-agnostic core for the Genesis economy regulator: a closed game
//! economy, a strategy-driven central bank, scripted stress events, a crisis
//! evaluator, and the boundary through which crises turn into quests.
//! This crate has no UI, network, or model-specific dependencies.

pub mod constants;
pub mod crisis;
pub mod economy;
pub mod error;
pub mod events;
pub mod library;
pub mod policy;
pub mod quest;
pub mod seed;
pub mod shocks;
pub mod simulation;

// Re-export commonly used types
pub use crisis::{CrisisAssessment, CrisisCondition, Sentiment, classify};
pub use economy::{EconomySnapshot, EconomyState, compute_inflation_rate};
pub use error::{CollaboratorError, ConfigError};
pub use events::{EventListener, NotableEvent};
pub use library::{CatalogEntry, LibraryError, QuestLibrary, sanitize_title};
pub use policy::{PolicyController, RateBounds, Strategy, next_rate};
pub use quest::{Quest, QuestKind, QuestRecord, QuestRequest, parse_quest_response};
pub use seed::{CountingRng, derive_stream_seed};
pub use shocks::{Shock, ShockSchedule, daily_baseline, impulse_for_day};
pub use simulation::{
    SimulationConfig, SimulationOutcome, SimulationRecord, SimulationRun, Verdict,
    compare_strategies, evaluate_verdict, simulate,
};

use rand::Rng;
use serde::Serialize;

use crate::constants::LOG_QUEST_FAILURE;

/// Trait for abstracting the text model that writes quests.
/// Implementations own their client; the core never reaches for a global one.
pub trait NarrativeGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write a quest that answers `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unreachable or its reply is unusable.
    fn generate(&self, request: &QuestRequest) -> Result<Quest, Self::Error>;
}

/// Trait for abstracting where generated quests are stored.
pub trait QuestSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a stamped quest.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    fn persist(&self, record: &QuestRecord) -> Result<(), Self::Error>;
}

/// What happened at the quest boundary for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestOutcome {
    /// Severity below the intervention threshold; no collaborator was called.
    Dormant,
    /// Quest generated and stored.
    Published { record: QuestRecord },
    /// Quest generated but the sink rejected it.
    Unsaved {
        record: QuestRecord,
        error: CollaboratorError,
    },
    /// Generation failed; nothing to store.
    Failed { error: CollaboratorError },
}

impl QuestOutcome {
    /// The generated quest, saved or not.
    #[must_use]
    pub const fn record(&self) -> Option<&QuestRecord> {
        match self {
            Self::Published { record } | Self::Unsaved { record, .. } => Some(record),
            Self::Dormant | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&CollaboratorError> {
        match self {
            Self::Unsaved { error, .. } | Self::Failed { error } => Some(error),
            Self::Dormant | Self::Published { .. } => None,
        }
    }
}

/// Result of one macro crisis cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub snapshot: EconomySnapshot,
    pub assessment: CrisisAssessment,
    pub outcome: QuestOutcome,
}

/// Orchestrates crisis detection and the quest boundary.
pub struct Regulator<G, S>
where
    G: NarrativeGenerator,
    S: QuestSink,
{
    generator: G,
    sink: S,
}

impl<G, S> Regulator<G, S>
where
    G: NarrativeGenerator,
    S: QuestSink,
{
    /// Create a regulator with explicitly owned collaborators
    pub const fn new(generator: G, sink: S) -> Self {
        Self { generator, sink }
    }

    pub const fn generator(&self) -> &G {
        &self.generator
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Advance the economy by one macro period, classify the result, and
    /// publish a quest when the crisis is severe enough.
    ///
    /// Collaborator failures are captured in the returned outcome.
    pub fn run_cycle<R: Rng + ?Sized>(&self, economy: &mut EconomyState, rng: &mut R) -> CycleReport {
        let snapshot = economy.advance_one_period(rng);
        let assessment = classify(&snapshot);
        log::info!(
            "macro cycle: supply {:.0}, inflation {:.2}%, condition {}",
            snapshot.money_supply,
            snapshot.inflation_rate,
            assessment.condition
        );
        let outcome = self.intervene(&snapshot, &assessment);
        CycleReport {
            snapshot,
            assessment,
            outcome,
        }
    }

    /// Run the quest boundary for an arbitrary assessment, such as a crisis
    /// forced by a game master.
    pub fn intervene(
        &self,
        snapshot: &EconomySnapshot,
        assessment: &CrisisAssessment,
    ) -> QuestOutcome {
        if !assessment.requires_intervention() {
            return QuestOutcome::Dormant;
        }
        let request = QuestRequest::from_assessment(snapshot, assessment);
        let quest = match self.generator.generate(&request) {
            Ok(quest) => quest,
            Err(err) => {
                let error = generation_error(&err);
                log::warn!(target: LOG_QUEST_FAILURE, "{error}");
                return QuestOutcome::Failed { error };
            }
        };
        let record = QuestRecord::stamp_now(quest);
        match self.sink.persist(&record) {
            Ok(()) => {
                log::info!("published quest '{}'", record.quest.title);
                QuestOutcome::Published { record }
            }
            Err(err) => {
                let error = CollaboratorError::Persistence(err.to_string());
                log::warn!(target: LOG_QUEST_FAILURE, "{error}");
                QuestOutcome::Unsaved { record, error }
            }
        }
    }
}

fn generation_error(err: &(dyn std::error::Error + 'static)) -> CollaboratorError {
    err.downcast_ref::<CollaboratorError>()
        .cloned()
        .unwrap_or_else(|| CollaboratorError::Generation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::cell::RefCell;

    struct ScriptedGenerator {
        reply: Result<Quest, CollaboratorError>,
        requests: RefCell<Vec<QuestRequest>>,
    }

    impl ScriptedGenerator {
        fn answering(reply: Result<Quest, CollaboratorError>) -> Self {
            Self {
                reply,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl NarrativeGenerator for ScriptedGenerator {
        type Error = CollaboratorError;

        fn generate(&self, request: &QuestRequest) -> Result<Quest, Self::Error> {
            self.requests.borrow_mut().push(*request);
            self.reply.clone()
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[derive(Default)]
    struct MemorySink {
        saved: RefCell<Vec<QuestRecord>>,
        fail: bool,
    }

    impl QuestSink for MemorySink {
        type Error = DiskFull;

        fn persist(&self, record: &QuestRecord) -> Result<(), Self::Error> {
            if self.fail {
                return Err(DiskFull);
            }
            self.saved.borrow_mut().push(record.clone());
            Ok(())
        }
    }

    fn quest() -> Quest {
        Quest {
            title: "The Great Coin Melt".to_string(),
            flavor_text: "The forge hungers.".to_string(),
            objective: "Donate 500g".to_string(),
            reward: "Title: The Philanthropist".to_string(),
            kind: QuestKind::GoldSink,
        }
    }

    fn hot_snapshot() -> EconomySnapshot {
        EconomySnapshot {
            money_supply: 1_200_000.0,
            inflation_rate: 20.0,
            tax_rate: 0.05,
        }
    }

    #[test]
    fn stable_assessment_stays_dormant() {
        let regulator = Regulator::new(
            ScriptedGenerator::answering(Ok(quest())),
            MemorySink::default(),
        );
        let outcome = regulator.intervene(&hot_snapshot(), &CrisisAssessment::STABLE);
        assert_eq!(outcome, QuestOutcome::Dormant);
        assert!(regulator.generator().requests.borrow().is_empty());
        assert!(regulator.sink().saved.borrow().is_empty());
    }

    #[test]
    fn severe_crisis_publishes_quest() {
        let regulator = Regulator::new(
            ScriptedGenerator::answering(Ok(quest())),
            MemorySink::default(),
        );
        let assessment = classify(&hot_snapshot());
        let outcome = regulator.intervene(&hot_snapshot(), &assessment);
        let record = outcome.record().unwrap();
        assert_eq!(record.quest, quest());
        assert!(matches!(outcome, QuestOutcome::Published { .. }));
        assert_eq!(regulator.sink().saved.borrow().len(), 1);

        let requests = regulator.generator().requests.borrow();
        assert_eq!(requests[0].condition, CrisisCondition::HyperInflation);
        assert!((requests[0].inflation_rate - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn generation_failure_is_captured() {
        let regulator = Regulator::new(
            ScriptedGenerator::answering(Err(CollaboratorError::MalformedResponse(
                "not json".to_string(),
            ))),
            MemorySink::default(),
        );
        let assessment = CrisisAssessment::forced(CrisisCondition::TradeWar, 9).unwrap();
        let outcome = regulator.intervene(&hot_snapshot(), &assessment);
        assert_eq!(
            outcome,
            QuestOutcome::Failed {
                error: CollaboratorError::MalformedResponse("not json".to_string())
            }
        );
        assert!(regulator.sink().saved.borrow().is_empty());
    }

    #[test]
    fn persistence_failure_keeps_the_quest() {
        let sink = MemorySink {
            fail: true,
            ..MemorySink::default()
        };
        let regulator = Regulator::new(ScriptedGenerator::answering(Ok(quest())), sink);
        let assessment = classify(&hot_snapshot());
        let outcome = regulator.intervene(&hot_snapshot(), &assessment);
        assert_eq!(outcome.record().map(|r| &r.quest), Some(&quest()));
        assert_eq!(
            outcome.error(),
            Some(&CollaboratorError::Persistence("disk full".to_string()))
        );
    }

    #[test]
    fn failed_outcome_serializes_with_status_and_error() {
        let outcome = QuestOutcome::Failed {
            error: CollaboratorError::Generation("model offline".to_string()),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "failed",
                "error": {"kind": "generation", "message": "model offline"}
            })
        );
        let dormant = serde_json::to_value(&QuestOutcome::Dormant).unwrap();
        assert_eq!(dormant, serde_json::json!({"status": "dormant"}));
    }

    #[test]
    fn cycle_is_seed_deterministic() {
        let regulator = Regulator::new(
            ScriptedGenerator::answering(Ok(quest())),
            MemorySink::default(),
        );
        let mut first = EconomyState::new(150_000_000.0, 0.05).unwrap();
        let mut second = first.clone();
        let a = regulator.run_cycle(&mut first, &mut ChaCha20Rng::seed_from_u64(11));
        let b = regulator.run_cycle(&mut second, &mut ChaCha20Rng::seed_from_u64(11));
        assert_eq!(a.snapshot, b.snapshot);
        assert_eq!(a.assessment, b.assessment);
        assert_eq!(a.assessment, classify(&a.snapshot));
        assert_eq!(
            a.outcome == QuestOutcome::Dormant,
            !a.assessment.requires_intervention()
        );
    }
}

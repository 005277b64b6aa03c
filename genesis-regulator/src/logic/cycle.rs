use anyhow::{Context, Result};
use colored::Colorize;
use genesis_economy::{
    CountingRng, CrisisAssessment, CycleReport, EconomyState, NarrativeGenerator, QuestOutcome,
    QuestSink, Regulator, SimulationConfig,
};
use serde::Serialize;

/// One macro crisis cycle, either seeded or forced by the game master.
#[derive(Debug, Clone, Serialize)]
pub struct CycleRun {
    /// `None` for a forced crisis, which draws no randomness.
    pub seed: Option<u64>,
    pub draws: u64,
    #[serde(flatten)]
    pub report: CycleReport,
}

impl CycleRun {
    #[must_use]
    pub fn label(&self) -> String {
        self.seed
            .map_or_else(|| "forced".to_string(), |seed| format!("seed {seed}"))
    }
}

/// Run one macro cycle per seed on a fresh ledger, then the forced crisis if
/// one was requested.
pub fn run_cycles<G, S>(
    regulator: &Regulator<G, S>,
    config: &SimulationConfig,
    seeds: &[u64],
    forced: Option<CrisisAssessment>,
) -> Result<Vec<CycleRun>>
where
    G: NarrativeGenerator,
    S: QuestSink,
{
    let mut runs = Vec::with_capacity(seeds.len() + usize::from(forced.is_some()));

    for &seed in seeds {
        let mut economy = fresh_economy(config)?;
        let mut rng = CountingRng::growth(seed);
        let report = regulator.run_cycle(&mut economy, &mut rng);
        runs.push(CycleRun {
            seed: Some(seed),
            draws: rng.draws(),
            report,
        });
    }

    if let Some(assessment) = forced {
        let snapshot = fresh_economy(config)?.snapshot();
        let outcome = regulator.intervene(&snapshot, &assessment);
        runs.push(CycleRun {
            seed: None,
            draws: 0,
            report: CycleReport {
                snapshot,
                assessment,
                outcome,
            },
        });
    }

    for run in &runs {
        announce(run);
    }
    Ok(runs)
}

fn fresh_economy(config: &SimulationConfig) -> Result<EconomyState> {
    EconomyState::new(config.start_money, config.start_tax)
        .context("invalid starting economy for macro cycle")
}

fn announce(run: &CycleRun) {
    let assessment = &run.report.assessment;
    let line = format!(
        "🔍 [{}] {} (severity {}/10, {})",
        run.label(),
        assessment.condition,
        assessment.severity,
        assessment.sentiment
    );
    match &run.report.outcome {
        QuestOutcome::Dormant => println!("{line} - {}", "archivist dormant".green()),
        QuestOutcome::Published { record } => {
            println!("{line} - {} '{}'", "quest published".cyan(), record.quest.title);
        }
        QuestOutcome::Unsaved { record, error } => eprintln!(
            "{line} - {} '{}': {error}",
            "quest not saved".yellow(),
            record.quest.title
        ),
        QuestOutcome::Failed { error } => eprintln!("{line} - {}: {error}", "no quest".red()),
    }
}

use anyhow::{Context, Result};
use colored::Colorize;
use genesis_economy::{
    ConfigError, EventListener, NotableEvent, Shock, ShockSchedule, SimulationConfig,
    SimulationOutcome, SimulationRun, Strategy,
};
use serde::Serialize;

use super::split_csv;

/// Gold rush window requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldRush {
    pub start_day: u32,
    pub duration: u32,
    pub intensity: f64,
}

/// Whale deposit requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhaleDeposit {
    pub day: u32,
    pub amount: f64,
}

/// Build the shared shock schedule for every strategy in a comparison.
pub fn build_schedule(
    gold_rush: Option<GoldRush>,
    whale: Option<WhaleDeposit>,
) -> Result<ShockSchedule, ConfigError> {
    let mut shocks = Vec::new();
    if let Some(rush) = gold_rush {
        shocks.push(Shock::Trend {
            start_day: rush.start_day,
            duration: rush.duration,
            intensity: rush.intensity,
        });
    }
    if let Some(whale) = whale {
        shocks.push(Shock::whale_deposit(whale.day, whale.amount));
    }
    ShockSchedule::new(shocks)
}

/// Resolve the `--strategy` value; `all` expands to every built-in strategy.
pub fn resolve_strategies(arg: &str) -> Result<Vec<Strategy>> {
    let mut strategies: Vec<Strategy> = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            for strategy in Strategy::ALL {
                if !strategies.contains(&strategy) {
                    strategies.push(strategy);
                }
            }
            continue;
        }
        let strategy = token
            .parse::<Strategy>()
            .with_context(|| format!("invalid --strategy value '{token}'"))?;
        if !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    }
    if strategies.is_empty() {
        strategies.push(Strategy::default());
    }
    Ok(strategies)
}

/// Surfaces notable events as toasts and keeps them for the report.
#[derive(Debug, Default)]
pub struct ConsoleAnnouncer {
    verbose: bool,
    events: Vec<NotableEvent>,
}

impl ConsoleAnnouncer {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_events(self) -> Vec<NotableEvent> {
        self.events
    }
}

impl EventListener for ConsoleAnnouncer {
    fn on_event(&mut self, event: &NotableEvent) {
        if self.verbose {
            eprintln!("{}", toast(event));
        }
        self.events.push(*event);
    }
}

/// One-line toast text for a notable event.
pub fn toast(event: &NotableEvent) -> String {
    match *event {
        NotableEvent::Impulse { day, amount } => format!(
            "💸 DAY {day}: WHALE DEPOSIT DETECTED! +{amount:.0} Gold"
        )
        .bright_magenta()
        .to_string(),
        NotableEvent::TrendStarted { day, intensity } => {
            format!("⛏️  DAY {day}: GOLD RUSH BEGINS! Income x{intensity:.1}")
                .bright_yellow()
                .to_string()
        }
    }
}

/// A finished run plus the events it raised.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyRun {
    #[serde(flatten)]
    pub outcome: SimulationOutcome,
    pub events: Vec<NotableEvent>,
}

/// Run `config` once per strategy, each on its own ledger.
pub fn run_strategies(
    config: &SimulationConfig,
    strategies: &[Strategy],
    verbose: bool,
) -> Result<Vec<StrategyRun>> {
    strategies
        .iter()
        .map(|&strategy| {
            let run = SimulationRun::new(config.clone().with_strategy(strategy))
                .with_context(|| format!("invalid configuration for {strategy}"))?;
            if verbose {
                println!("🏦 {} - {}", strategy.label().bold(), strategy.description());
            }
            let mut announcer = ConsoleAnnouncer::new(verbose);
            let outcome = run.run_to_end(&mut announcer);
            Ok(StrategyRun {
                outcome,
                events: announcer.into_events(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_economy::Verdict;

    #[test]
    fn resolve_strategies_expands_all_and_dedupes() {
        assert_eq!(resolve_strategies("all").unwrap(), Strategy::ALL.to_vec());
        assert_eq!(
            resolve_strategies("hawk, Hawk,the dove").unwrap(),
            vec![Strategy::Hawk, Strategy::Dove]
        );
        assert_eq!(resolve_strategies("").unwrap(), vec![Strategy::Balanced]);
    }

    #[test]
    fn resolve_strategies_rejects_unknown_names() {
        let err = resolve_strategies("hawk,owl").unwrap_err();
        assert!(format!("{err:#}").contains("unknown policy strategy: owl"));
    }

    #[test]
    fn build_schedule_honours_custom_rush_length() {
        let schedule = build_schedule(
            Some(GoldRush {
                start_day: 10,
                duration: 5,
                intensity: 2.0,
            }),
            Some(WhaleDeposit {
                day: 12,
                amount: 100.0,
            }),
        )
        .unwrap();
        assert_eq!(schedule.len(), 2);
        assert!(schedule.as_slice()[0].is_active_trend(15));
        assert!(!schedule.as_slice()[0].is_active_trend(16));
        assert!(build_schedule(None, Some(WhaleDeposit { day: 1, amount: -1.0 })).is_err());
    }

    #[test]
    fn run_strategies_collects_events_per_run() {
        let schedule = build_schedule(
            None,
            Some(WhaleDeposit {
                day: 2,
                amount: 5_000.0,
            }),
        )
        .unwrap();
        let config = SimulationConfig::default().with_days(5).with_shocks(schedule);
        let runs = run_strategies(&config, &[Strategy::Hawk, Strategy::Dove], false).unwrap();
        assert_eq!(runs.len(), 2);
        for run in &runs {
            assert_eq!(run.events.len(), 1);
            assert_eq!(run.outcome.records.len(), 5);
            assert_eq!(run.outcome.verdict, Verdict::Success);
        }
        assert_eq!(runs[0].outcome.strategy, Strategy::Hawk);
    }

    #[test]
    fn toast_mentions_whale_amount() {
        colored::control::set_override(false);
        let text = toast(&NotableEvent::Impulse {
            day: 150,
            amount: 2_000_000.0,
        });
        assert_eq!(text, "💸 DAY 150: WHALE DEPOSIT DETECTED! +2000000 Gold");
    }
}

pub mod archivist;
pub mod cycle;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use archivist::{ResponseFileArchivist, TemplateArchivist};
pub use cycle::{CycleRun, run_cycles};
pub use seeds::resolve_seed_inputs;
pub use simulation::{StrategyRun, build_schedule, resolve_strategies, run_strategies};

/// Split a comma separated CLI value, dropping blanks.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use genesis_economy::constants::{
    DEFAULT_BASE_INCOME, DEFAULT_SIMULATION_DAYS, DEFAULT_START_MONEY, DEFAULT_START_TAX,
    GOLD_RUSH_DURATION_DAYS,
};
use genesis_economy::{
    CrisisAssessment, CrisisCondition, QuestLibrary, Regulator, SimulationConfig, Strategy,
};
use logic::simulation::{GoldRush, WhaleDeposit};
use logic::{
    CycleRun, ResponseFileArchivist, StrategyRun, TemplateArchivist, build_schedule,
    resolve_seed_inputs, resolve_strategies, run_cycles, run_strategies, split_csv,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Daily stress test of one or more central bank strategies
    Simulate,
    /// Macro crisis cycles that may wake the quest archivist
    Cycle,
    /// Run both the stress test and the crisis cycles
    Both,
}

#[derive(Debug, Parser)]
#[command(name = "genesis-regulator", version = "0.1.0")]
#[command(about = "Game-master console for the Genesis economy - stress tests, crises, and quests")]
struct Args {
    /// What to run: strategy stress test, crisis cycles, or both
    #[arg(long, value_enum, default_value_t = RunMode::Simulate)]
    mode: RunMode,

    /// Strategies to compare (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    strategy: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Days to simulate per strategy
    #[arg(long, default_value_t = DEFAULT_SIMULATION_DAYS)]
    days: u32,

    /// Gold printed by the world every day before shocks
    #[arg(long, default_value_t = DEFAULT_BASE_INCOME)]
    base_income: f64,

    /// Starting money supply; also the healthy baseline
    #[arg(long, default_value_t = DEFAULT_START_MONEY)]
    start_money: f64,

    /// Starting tax rate in [0, 1]
    #[arg(long, default_value_t = DEFAULT_START_TAX)]
    start_tax: f64,

    /// Day a gold rush begins (no gold rush when omitted)
    #[arg(long)]
    gold_rush_start: Option<u32>,

    /// Length of the gold rush window in days
    #[arg(long, default_value_t = GOLD_RUSH_DURATION_DAYS)]
    gold_rush_days: u32,

    /// Income multiplier while the gold rush lasts
    #[arg(long, default_value_t = 5.0)]
    gold_rush_intensity: f64,

    /// Day a whale deposit lands (no whale when omitted)
    #[arg(long)]
    whale_day: Option<u32>,

    /// Gold injected by the whale deposit
    #[arg(long, default_value_t = 2_000_000.0)]
    whale_amount: f64,

    /// Seeds for crisis cycles (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Force a crisis condition (hyper-inflation, deflationary-spiral, resource-famine, trade-war)
    #[arg(long)]
    force_crisis: Option<String>,

    /// Severity of the forced crisis, 0 to 10
    #[arg(long, default_value_t = 8)]
    severity: u8,

    /// Directory the quest library is written to
    #[arg(long, default_value = "quests")]
    quest_dir: PathBuf,

    /// Replay a saved model reply instead of the built-in quest templates
    #[arg(long)]
    quest_response: Option<PathBuf>,

    /// Exit with status 1 when any strategy fails to contain inflation
    #[arg(long)]
    strict: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let config = build_config(&args)?;
    let runs = run_simulations(&args, &config)?;
    let cycles = run_crisis_cycles(&args, &config)?;

    write_reports(&args, &runs, &cycles, start_time)?;

    if args.strict && runs.iter().any(|run| !run.outcome.verdict.is_success()) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in Strategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:15} - {}: {}",
            strategy.key(),
            strategy.label(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏛️  Genesis Economy Regulator".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn build_config(args: &Args) -> Result<SimulationConfig> {
    let gold_rush = args.gold_rush_start.map(|start_day| GoldRush {
        start_day,
        duration: args.gold_rush_days,
        intensity: args.gold_rush_intensity,
    });
    let whale = args.whale_day.map(|day| WhaleDeposit {
        day,
        amount: args.whale_amount,
    });
    let shocks = build_schedule(gold_rush, whale).context("invalid stress events")?;
    let config = SimulationConfig::default()
        .with_days(args.days)
        .with_base_income(args.base_income)
        .with_start(args.start_money, args.start_tax)
        .with_shocks(shocks);
    config.validate().context("invalid economy settings")?;
    Ok(config)
}

fn forced_assessment(args: &Args) -> Result<Option<CrisisAssessment>> {
    let Some(name) = args.force_crisis.as_deref() else {
        return Ok(None);
    };
    let condition = name
        .parse::<CrisisCondition>()
        .with_context(|| format!("invalid --force-crisis value '{name}'"))?;
    let assessment =
        CrisisAssessment::forced(condition, args.severity).context("invalid --severity")?;
    Ok(Some(assessment))
}

fn run_simulations(args: &Args, config: &SimulationConfig) -> Result<Vec<StrategyRun>> {
    if !matches!(args.mode, RunMode::Simulate | RunMode::Both) {
        return Ok(Vec::new());
    }

    let strategies = resolve_strategies(&args.strategy)?;

    println!("{}", "🏦 Running Strategy Stress Tests".bright_yellow().bold());
    println!("{}", "-".repeat(32).yellow());

    run_strategies(config, &strategies, args.verbose)
}

fn run_crisis_cycles(args: &Args, config: &SimulationConfig) -> Result<Vec<CycleRun>> {
    if !matches!(args.mode, RunMode::Cycle | RunMode::Both) {
        if args.force_crisis.is_some() {
            eprintln!(
                "⚠️  {} only applies to cycle runs; ignoring it",
                "--force-crisis".yellow()
            );
        }
        return Ok(Vec::new());
    }

    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let forced = forced_assessment(args)?;

    println!("{}", "🌍 Running Crisis Cycles".bright_blue().bold());
    println!("{}", "-".repeat(32).blue());

    let library = QuestLibrary::new(&args.quest_dir);
    match &args.quest_response {
        Some(path) => run_cycles(
            &Regulator::new(ResponseFileArchivist::new(path), library),
            config,
            &seeds,
            forced,
        ),
        None => run_cycles(
            &Regulator::new(TemplateArchivist, library),
            config,
            &seeds,
            forced,
        ),
    }
}

fn write_reports(
    args: &Args,
    runs: &[StrategyRun],
    cycles: &[CycleRun],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, runs, cycles)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, runs, cycles)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, runs)?,
        _ => {
            let duration = start_time.elapsed();
            if runs.is_empty() && cycles.is_empty() {
                writeln!(&mut output_target, "Nothing was run.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    runs,
                    cycles,
                    duration,
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

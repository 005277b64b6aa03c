use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use genesis_economy::{QuestOutcome, SimulationOutcome};

use super::{CycleRun, StrategyRun};

pub const CSV_HEADER: &str = "Strategy,Day,Total Money Supply,Target Baseline,Tax Rate";

#[must_use]
pub fn verdict_line(outcome: &SimulationOutcome) -> String {
    if outcome.verdict.is_success() {
        format!("✅ SUCCESS: {} stabilized the economy.", outcome.strategy)
    } else {
        format!(
            "⚠️ FAILURE: {} failed to contain inflation.",
            outcome.strategy
        )
    }
}

fn quest_summary(outcome: &QuestOutcome) -> String {
    match outcome {
        QuestOutcome::Dormant => "dormant".to_string(),
        QuestOutcome::Published { record } => format!("published '{}'", record.quest.title),
        QuestOutcome::Unsaved { record, error } => {
            format!("unsaved '{}' ({error})", record.quest.title)
        }
        QuestOutcome::Failed { error } => format!("failed ({error})"),
    }
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    runs: &[StrategyRun],
    cycles: &[CycleRun],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Economy Stress Test Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    if !runs.is_empty() {
        let total = runs.len();
        let stabilized = runs
            .iter()
            .filter(|run| run.outcome.verdict.is_success())
            .count();
        writeln!(out, "Strategies run: {total}")?;
        writeln!(out, "Stabilized: {}", stabilized.to_string().green())?;
        writeln!(out, "Failed: {}", (total - stabilized).to_string().red())?;
        writeln!(out, "Total time: {total_duration:?}")?;
        writeln!(out)?;
    }

    for run in runs {
        let outcome = &run.outcome;
        let verdict = if outcome.verdict.is_success() {
            verdict_line(outcome).green()
        } else {
            verdict_line(outcome).red()
        };
        writeln!(out, "{verdict}")?;
        writeln!(
            out,
            "   Days simulated: {} | Target baseline: {:.0}",
            outcome.records.len(),
            outcome.final_state.inflation_target()
        )?;
        writeln!(
            out,
            "   Final supply: {:.0} | Peak supply: {:.0}",
            outcome.final_state.money_supply(),
            outcome.peak_money_supply()
        )?;
        writeln!(
            out,
            "   Final tax: {:.1}% | Peak tax: {:.1}%",
            outcome.final_state.tax_rate() * 100.0,
            outcome.peak_tax_rate() * 100.0
        )?;
        if !run.events.is_empty() {
            writeln!(
                out,
                "   Notable events: {} (impulses injected: {:.0} Gold)",
                run.events.len(),
                outcome.impulse_total
            )?;
        }
        writeln!(out)?;
    }

    if !cycles.is_empty() {
        writeln!(out, "{}", "🌍 Crisis Cycles".bright_yellow().bold())?;
        writeln!(out, "{}", "===============".yellow())?;
        for cycle in cycles {
            let report = &cycle.report;
            writeln!(
                out,
                "[{}] inflation {:.2}% -> {} (severity {}/10, {}) - quest {}",
                cycle.label(),
                report.snapshot.inflation_rate,
                report.assessment.condition,
                report.assessment.severity,
                report.assessment.sentiment,
                quest_summary(&report.outcome)
            )?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    simulations: &'a [StrategyRun],
    cycles: &'a [CycleRun],
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    runs: &[StrategyRun],
    cycles: &[CycleRun],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(&JsonReport {
        simulations: runs,
        cycles,
    })?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    runs: &[StrategyRun],
    cycles: &[CycleRun],
) -> Result<()> {
    writeln!(out, "# Genesis Economy Report\n")?;

    if !runs.is_empty() {
        let total = runs.len();
        let stabilized = runs
            .iter()
            .filter(|run| run.outcome.verdict.is_success())
            .count();
        writeln!(out, "## Summary\n")?;
        writeln!(out, "- **Strategies run**: {total}")?;
        writeln!(out, "- **Stabilized**: {stabilized}")?;
        writeln!(out, "- **Failed**: {}\n", total - stabilized)?;

        writeln!(out, "## Strategies\n")?;
        writeln!(
            out,
            "| Strategy | Verdict | Final supply | Peak supply | Final tax | Peak tax |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|")?;
        for run in runs {
            let outcome = &run.outcome;
            let status = if outcome.verdict.is_success() { "✅" } else { "❌" };
            writeln!(
                out,
                "| {} | {status} {} | {:.0} | {:.0} | {:.1}% | {:.1}% |",
                outcome.strategy,
                outcome.verdict,
                outcome.final_state.money_supply(),
                outcome.peak_money_supply(),
                outcome.final_state.tax_rate() * 100.0,
                outcome.peak_tax_rate() * 100.0
            )?;
        }
        writeln!(out)?;
    }

    if !cycles.is_empty() {
        writeln!(out, "## Crisis Cycles\n")?;
        for cycle in cycles {
            let report = &cycle.report;
            writeln!(out, "### {} - {}\n", cycle.label(), report.assessment.condition)?;
            writeln!(
                out,
                "- **Inflation**: {:.2}%",
                report.snapshot.inflation_rate
            )?;
            writeln!(
                out,
                "- **Severity**: {}/10 ({})",
                report.assessment.severity, report.assessment.sentiment
            )?;
            writeln!(out, "- **Quest**: {}", quest_summary(&report.outcome))?;
            if let Some(record) = report.outcome.record() {
                writeln!(out, "- **Objective**: {}", record.quest.objective)?;
                writeln!(out, "- **Reward**: {}", record.quest.reward)?;
                writeln!(out, "\n> {}", record.quest.flavor_text)?;
            }
            writeln!(out)?;
        }
    }

    if runs.is_empty() && cycles.is_empty() {
        writeln!(out, "_Nothing was run._")?;
    }
    Ok(())
}

/// Daily time series, one row per strategy and day.
pub fn generate_csv_report<W: Write + ?Sized>(out: &mut W, runs: &[StrategyRun]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for run in runs {
        for record in &run.outcome.records {
            writeln!(
                out,
                "{},{},{:.2},{:.2},{:.4}",
                run.outcome.strategy.key(),
                record.day,
                record.money_supply,
                record.inflation_target,
                record.tax_rate
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::run_strategies;
    use genesis_economy::{SimulationConfig, Strategy};

    fn sample_runs() -> Vec<StrategyRun> {
        let config = SimulationConfig::default().with_days(3);
        run_strategies(&config, &[Strategy::Hawk, Strategy::LaissezFaire], false).unwrap()
    }

    #[test]
    fn csv_has_one_row_per_strategy_day() {
        let mut buf: Vec<u8> = Vec::new();
        generate_csv_report(&mut buf, &sample_runs()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + 6);
        assert!(lines[1].starts_with("hawk,0,"));
        assert!(lines[4].starts_with("laissez-faire,0,"));
        assert!(lines[4].ends_with(",0.0500"));
    }

    #[test]
    fn json_report_nests_sections() {
        let mut buf: Vec<u8> = Vec::new();
        generate_json_report(&mut buf, &sample_runs(), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["simulations"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["simulations"][0]["strategy"], "hawk");
        assert_eq!(value["simulations"][0]["verdict"], "success");
        assert!(value["cycles"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn markdown_lists_every_strategy() {
        let mut buf: Vec<u8> = Vec::new();
        generate_markdown_report(&mut buf, &sample_runs(), &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Genesis Economy Report"));
        assert!(text.contains("| The Hawk | ✅ success |"));
        assert!(text.contains("| Laissez-Faire |"));
    }

    #[test]
    fn markdown_reports_empty_runs() {
        let mut buf: Vec<u8> = Vec::new();
        generate_markdown_report(&mut buf, &[], &[]).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("_Nothing was run._"));
    }

    #[test]
    fn console_report_prints_verdicts() {
        colored::control::set_override(false);
        let mut buf: Vec<u8> = Vec::new();
        generate_console_report(&mut buf, &sample_runs(), &[], Duration::ZERO).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("✅ SUCCESS: The Hawk stabilized the economy."));
        assert!(text.contains("Strategies run: 2"));
    }
}

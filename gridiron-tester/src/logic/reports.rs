use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;
use super::playability::{PlayabilityAggregate, PlayabilityRecord, target_bands};

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    results: &[ScenarioResult],
    aggregates: &[PlayabilityAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(writer, "Total scenarios: {total_tests}")?;
    writeln!(writer, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(writer, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(writer, "Success rate: {:.1}%", success_rate(passed_tests, total_tests))?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for result in results {
        let status = if result.passed { "✅ PASS".green() } else { "❌ FAIL".red() };
        writeln!(writer, "{} {} (seed {})", status, result.scenario_name.bold(), result.seed)?;
        writeln!(
            writer,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(writer, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(writer, "   Failures:")?;
            for failure in &result.failures {
                writeln!(writer, "     • {}", failure.red())?;
            }
        }
        writeln!(writer)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(writer, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(writer, "{}", "=====================".yellow())?;
        writeln!(writer, "Fastest: {} ({:?})", fastest.scenario_name.green(), fastest.average_duration)?;
        writeln!(writer, "Slowest: {} ({:?})", slowest.scenario_name.yellow(), slowest.average_duration)?;
        writeln!(writer)?;
    }

    write_playability_summary(writer, aggregates)
}

fn write_playability_summary<W: Write + ?Sized>(writer: &mut W, aggregates: &[PlayabilityAggregate]) -> Result<()> {
    writeln!(writer, "{}", "🏈 Playability Summary".bright_magenta().bold())?;
    writeln!(writer, "{}", "======================".magenta())?;
    let bands = target_bands();
    for aggregate in aggregates {
        writeln!(writer, "{} ({} games)", aggregate.scenario_name.bold(), aggregate.iterations)?;
        for band in &bands {
            let value = (band.value)(aggregate);
            let marker = if band.range.contains(&value) { "✓".green() } else { "✗".red() };
            writeln!(
                writer,
                "   {marker} {:<20} {value:>8.3}  [{:.2}..={:.2}]",
                band.metric,
                band.range.start(),
                band.range.end()
            )?;
        }
        writeln!(
            writer,
            "     snaps {:.1}, field goals {:.0}%, shutouts {:.0}%",
            aggregate.mean_snaps,
            aggregate.field_goal_pct * 100.0,
            aggregate.shutout_pct * 100.0
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, results)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(writer: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(writer, "# Gridiron Logic Test Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Total scenarios**: {total_tests}")?;
    writeln!(writer, "- **Passed**: {passed_tests}")?;
    writeln!(writer, "- **Failed**: {}", total_tests - passed_tests)?;
    writeln!(writer, "- **Success rate**: {:.1}%\n", success_rate(passed_tests, total_tests))?;

    writeln!(writer, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(writer, "### {status} {} (seed {})\n", result.scenario_name, result.seed)?;
        writeln!(
            writer,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(writer, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(writer, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(writer, "  - {failure}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub const CSV_HEADER: &str = "scenario,seed,snaps,plays,yards,yards_per_play,dropbacks,attempts,completions,\
completion_pct,sacks,sack_rate,turnovers,turnover_rate,injuries,penalties,touchdowns,punts,fg_att,fg_made,\
home_points,away_points";

pub fn generate_csv_report<W: Write + ?Sized>(writer: &mut W, records: &[PlayabilityRecord]) -> Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for record in records {
        let m = &record.metrics;
        writeln!(
            writer,
            "{},{},{},{},{},{:.4},{},{},{},{:.4},{},{:.4},{},{:.4},{},{},{},{},{},{},{},{}",
            csv_field(&record.scenario_name),
            record.seed_value,
            m.snaps,
            m.scrimmage_plays,
            m.total_yards,
            m.yards_per_play(),
            m.dropbacks,
            m.pass_attempts,
            m.completions,
            m.completion_rate(),
            m.sacks,
            m.sack_rate(),
            m.turnovers,
            m.turnover_rate(),
            m.injuries,
            m.penalties,
            m.touchdowns,
            m.punts,
            m.field_goals_attempted,
            m.field_goals_made,
            m.home_points,
            m.away_points,
        )?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { passed as f64 / total as f64 * 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::game_tester::PlayabilityMetrics;
    use crate::logic::playability::aggregate_playability;

    fn result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Smoke Test".to_string(),
            seed: 1337,
            passed,
            iterations_run: 2,
            successful_iterations: if passed { 2 } else { 1 },
            failures: if passed { Vec::new() } else { vec!["score drifted".to_string()] },
            average_duration: Duration::from_millis(4),
            performance_data: vec![Duration::from_millis(4)],
        }
    }

    fn record() -> PlayabilityRecord {
        PlayabilityRecord {
            scenario_name: "Even Matchup".to_string(),
            seed_label: "1337".to_string(),
            seed_value: 1337,
            metrics: PlayabilityMetrics {
                snaps: 140,
                scrimmage_plays: 120,
                total_yards: 620,
                dropbacks: 70,
                pass_attempts: 64,
                completions: 40,
                home_points: 24,
                away_points: 17,
                ..PlayabilityMetrics::default()
            },
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).expect("report renders");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn console_report_lists_failures_and_playability() {
        let aggregates = aggregate_playability(&[record()]);
        let text = render(|w| generate_console_report(w, &[result(true), result(false)], &aggregates, Duration::ZERO));
        assert!(text.contains("Total scenarios: 2"));
        assert!(text.contains("score drifted"));
        assert!(text.contains("Playability Summary"));
        assert!(text.contains("yards per play"));
    }

    #[test]
    fn markdown_report_has_summary_and_details() {
        let text = render(|w| generate_markdown_report(w, &[result(true)]));
        assert!(text.starts_with("# Gridiron Logic Test Results"));
        assert!(text.contains("- **Success rate**: 100.0%"));
        assert!(text.contains("### ✅ Smoke Test (seed 1337)"));
    }

    #[test]
    fn json_report_round_trips() {
        let text = render(|w| generate_json_report(w, &[result(false)]));
        let parsed: Vec<ScenarioResult> = serde_json::from_str(&text).expect("valid json");
        assert_eq!(parsed[0].failures, vec!["score drifted".to_string()]);
    }

    #[test]
    fn csv_report_has_one_row_per_record() {
        let text = render(|w| generate_csv_report(w, &[record(), record()]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("Even Matchup,1337,140,120,620,5.1667,"));
        assert_eq!(lines[1].split(',').count(), CSV_HEADER.split(',').count());
    }

    #[test]
    fn csv_fields_with_commas_are_quoted() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("plain"), "plain");
    }
}

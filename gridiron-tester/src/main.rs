mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{SCENARIO_KEYS, get_scenario, list_scenarios};
use common::split_csv;
use gridiron_game::EngineConfig;
use logic::{
    GameTester, LogicTester, PlayabilityAggregate, PlayabilityRecord, ScenarioResult, SeedInfo, aggregate_playability,
    reports, resolve_seed_inputs, run_playability_analysis, validate_playability_targets,
};

/// Acceptance sweeps never run fewer games per seed than this.
const ACCEPTANCE_GAMES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

impl ReportFormat {
    const fn shows_playability(self) -> bool {
        matches!(self, Self::Console | Self::Csv)
    }

    const fn shows_total_time(self) -> bool {
        matches!(self, Self::Console | Self::Markdown)
    }
}

#[derive(Debug, Parser)]
#[command(name = "gridiron-tester", version)]
#[command(about = "Seeded QA runner for the Gridiron play-resolution engine")]
struct Args {
    /// Scenario keys, comma-separated; `all` adds every scenario
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// Print the scenario catalog and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds, comma-separated: decimal, 0x-hex, or `default`
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Games per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Always collect playability and check it against the target bands
    #[arg(long)]
    acceptance: bool,

    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    #[arg(short, long)]
    verbose: bool,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Engine configuration JSON; defaults apply to any field it omits
    #[arg(long)]
    config: Option<PathBuf>,
}

/// What one invocation will run, resolved from the command line.
#[derive(Debug)]
struct RunPlan {
    scenarios: Vec<String>,
    seeds: Vec<SeedInfo>,
    playability_games: usize,
}

impl RunPlan {
    fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            scenarios: expand_scenarios(&args.scenarios),
            seeds: resolve_seed_inputs(&split_csv(&args.seeds))?,
            playability_games: playability_games(args),
        })
    }

    fn seed_values(&self) -> Vec<u64> {
        self.seeds.iter().map(|info| info.seed).collect()
    }
}

struct Playability {
    records: Vec<PlayabilityRecord>,
    aggregates: Vec<PlayabilityAggregate>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        return print_catalog(&args);
    }

    println!("{}", "🏈 Gridiron Automated Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());

    let started = Instant::now();
    let plan = RunPlan::from_args(&args)?;
    let tester = build_game_tester(&args)?;

    let results = run_scenarios(&tester, &plan, args.iterations, args.verbose);
    let playability = if args.acceptance || args.report.shows_playability() {
        Some(collect_playability(&tester, &plan)?)
    } else {
        None
    };

    let mut target = OutputTarget::new(args.output.clone())?;
    render_report(&mut target, args.report, &results, playability.as_ref(), started)?;
    target.flush()?;

    if let Some(playability) = &playability {
        validate_playability_targets(&playability.aggregates)?;
    }
    if results.iter().any(|result| !result.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn print_catalog(args: &Args) -> Result<()> {
    let mut target = OutputTarget::new(args.output.clone())?;
    writeln!(target, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(target, "  {key:22} {description}")?;
    }
    target.flush()?;
    Ok(())
}

fn playability_games(args: &Args) -> usize {
    if !args.acceptance {
        return args.iterations;
    }
    let games = args.iterations.max(ACCEPTANCE_GAMES);
    if games > args.iterations {
        println!("🔁 Acceptance sweep: raising games per seed from {} to {games}", args.iterations);
    }
    games
}

fn expand_scenarios(raw: &str) -> Vec<String> {
    let (everything, mut keys): (Vec<String>, Vec<String>) =
        split_csv(raw).into_iter().partition(|key| key.eq_ignore_ascii_case("all"));
    if !everything.is_empty() {
        for key in SCENARIO_KEYS {
            if !keys.iter().any(|existing| existing == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

fn build_game_tester(args: &Args) -> Result<GameTester> {
    let Some(path) = args.config.as_ref() else {
        return Ok(GameTester::new(args.verbose));
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = EngineConfig::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))?;
    log::info!("engine configuration loaded from {}", path.display());
    GameTester::with_config(config, args.verbose)
}

fn run_scenarios(tester: &GameTester, plan: &RunPlan, iterations: usize, verbose: bool) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Scenario checks".bright_yellow().bold());
    println!("{}", "------------------".yellow());

    let runner = LogicTester::new(tester.clone(), verbose);
    let seeds = plan.seed_values();
    plan.scenarios
        .iter()
        .filter_map(|key| {
            let scenario = get_scenario(key);
            if scenario.is_none() {
                eprintln!("⚠️  Unknown scenario: {}", key.yellow());
            }
            scenario
        })
        .flat_map(|scenario| runner.run_scenario(&scenario, &seeds, iterations))
        .collect()
}

fn collect_playability(tester: &GameTester, plan: &RunPlan) -> Result<Playability> {
    let records = run_playability_analysis(tester, &plan.seeds, plan.playability_games)?;
    let aggregates = aggregate_playability(&records);
    Ok(Playability { records, aggregates })
}

fn render_report<W: Write + ?Sized>(
    writer: &mut W,
    format: ReportFormat,
    results: &[ScenarioResult],
    playability: Option<&Playability>,
    started: Instant,
) -> Result<()> {
    match format {
        ReportFormat::Json if results.is_empty() => writeln!(writer, "[]")?,
        ReportFormat::Json => reports::generate_json_report(writer, results)?,
        ReportFormat::Markdown if results.is_empty() => {
            writeln!(writer, "# Gridiron Logic Test Results\n\n_No scenarios executed._")?;
        }
        ReportFormat::Markdown => reports::generate_markdown_report(writer, results)?,
        ReportFormat::Csv => match playability {
            Some(playability) => reports::generate_csv_report(writer, &playability.records)?,
            None => writeln!(writer, "{}", reports::CSV_HEADER)?,
        },
        ReportFormat::Console => match playability {
            _ if results.is_empty() => writeln!(writer, "No scenarios executed.")?,
            Some(playability) => {
                reports::generate_console_report(writer, results, &playability.aggregates, started.elapsed())?;
            }
            None => writeln!(writer, "Playability data unavailable.")?,
        },
    }

    if format.shows_total_time() {
        writeln!(writer)?;
        writeln!(writer, "🏁 Total time: {:?}", started.elapsed())?;
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
                Ok(Self::File(BufWriter::new(file)))
            }
            None => Ok(Self::Stdout(BufWriter::new(stdout()))),
        }
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner().flush()
    }
}

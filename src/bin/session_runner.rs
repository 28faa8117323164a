//! Headless Session Runner
//!
//! Runs complete training sessions without an operator and prints the
//! session report, or aggregate statistics over seeded replicates.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use operant_lab::core::config::EngineConfig;
use operant_lab::core::error::Result;
use operant_lab::intervention::Intervention;
use operant_lab::scenario::{load_scenario_dir, Catalog};
use operant_lab::schedule::ScheduleConfig;
use operant_lab::session::delivery::ReinforcerConfig;
use operant_lab::session::{run_to_completion, Pacer, SessionState};
use operant_lab::summary::{run_replicates, BatchStats, SessionReport};
use operant_lab::BehaviorClass;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

/// Headless Session Runner - full training sessions without an operator
#[derive(Parser, Debug)]
#[command(name = "session_runner")]
#[command(about = "Run a training session to completion and print its report")]
struct Args {
    /// Scenario id (built-in, or loaded from --scenario-dir)
    #[arg(long, default_value = "jumping")]
    scenario: String,

    /// Session number recorded in the report
    #[arg(long, default_value_t = 1)]
    session: u32,

    /// Override the scenario's intervention (DRA, DRI, DRO, NCR, Extinction, Punishment)
    #[arg(long)]
    intervention: Option<Intervention>,

    /// Override the alternative schedule, e.g. "VI 8" or "FR 3"
    #[arg(long)]
    alt_schedule: Option<ScheduleConfig>,

    /// Override the target schedule
    #[arg(long)]
    target_schedule: Option<ScheduleConfig>,

    /// Override the reinforcer, e.g. "treat 2"
    #[arg(long)]
    reinforcer: Option<ReinforcerConfig>,

    /// Override the session length in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Engine constants (TOML); missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of extra scenario TOML files
    #[arg(long)]
    scenario_dir: Option<PathBuf>,

    /// Run this many seeded replicates in parallel and print aggregate stats
    #[arg(long)]
    replicates: Option<usize>,

    /// Pace the session against the wall clock at this speed (0.25-3.0)
    #[arg(long)]
    realtime: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("operant_lab=info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut catalog = Catalog::builtin();
    if let Some(dir) = &args.scenario_dir {
        for scenario in load_scenario_dir(dir)? {
            catalog.insert(scenario);
        }
    }

    let mut scenario = catalog.find(&args.scenario)?.clone();
    if let Some(intervention) = args.intervention {
        scenario = scenario.with_intervention(intervention);
    }
    if let Some(duration) = args.duration {
        scenario = scenario.with_duration(duration);
    }
    if let Some(schedule) = args.alt_schedule {
        scenario.defaults.alt_schedule = schedule;
    }
    if let Some(schedule) = args.target_schedule {
        scenario.defaults.target_schedule = schedule;
    }
    if let Some(reinforcer) = args.reinforcer {
        scenario.defaults.reinforcer = reinforcer;
    }

    let seed = args.seed.unwrap_or_else(|| rand::random());

    if let Some(replicates) = args.replicates {
        let start = Instant::now();
        let summaries = run_replicates(&scenario, args.session, &config, seed, replicates);
        let stats = BatchStats::from_summaries(&summaries);
        tracing::info!(replicates, elapsed_ms = start.elapsed().as_millis() as u64, "batch complete");
        match output_format(&args.format) {
            OutputFormat::Text => println!("{}", stats.summary()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        }
        return Ok(());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = SessionState::with_config(&scenario, args.session, config);

    match args.realtime {
        Some(speed) => run_paced(&mut state, speed, &mut rng),
        None => {
            run_to_completion(&mut state, &mut rng);
        }
    }

    let report = SessionReport::from_session(&state, &scenario);
    match output_format(&args.format) {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            println!("{}", report.summary());
            println!("Seed: {}", seed);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

/// Unknown names fall back to JSON with a warning
fn output_format(name: &str) -> OutputFormat {
    match name {
        "json" => OutputFormat::Json,
        "text" => OutputFormat::Text,
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            OutputFormat::Json
        }
    }
}

/// Drive the session from wall-clock frames, printing rate samples as they land
fn run_paced(state: &mut SessionState, speed: f64, rng: &mut ChaCha8Rng) {
    let frame = Duration::from_millis(16);
    let mut pacer = Pacer::new(speed);
    let mut last = Instant::now();
    let mut printed = 0;

    while state.is_active() {
        std::thread::sleep(frame);
        let now = Instant::now();
        pacer.advance(state, (now - last).as_secs_f64(), rng);
        last = now;

        let series = &state.rates.series;
        for i in printed..series.len() {
            eprintln!(
                "[{:>6.1}s] target {:>5.1}/min  alt {:>5.1}/min  MO {:.2} SAT {:.2} | {}",
                series.times[i],
                series.target[i],
                series.alt[i],
                state.internal.motivation,
                state.internal.satiation,
                state.schedule(BehaviorClass::Alternative).config
            );
        }
        printed = series.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_names() {
        assert_eq!(output_format("json"), OutputFormat::Json);
        assert_eq!(output_format("text"), OutputFormat::Text);
        assert_eq!(output_format("yaml"), OutputFormat::Json);
    }
}

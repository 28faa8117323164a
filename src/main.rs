//! Operant Lab - Interactive Trainer Console
//!
//! Runs one training session at a time from the terminal. The operator
//! advances the simulation, switches strategies and schedules between
//! ticks, and reads the summary once the session completes.

use operant_lab::core::error::Result;
use operant_lab::intervention::Intervention;
use operant_lab::scenario::{Catalog, Scenario};
use operant_lab::schedule::ScheduleConfig;
use operant_lab::session::delivery::ReinforcerConfig;
use operant_lab::session::{deliver_manual, tick, SessionState};
use operant_lab::summary::SessionReport;
use operant_lab::BehaviorClass;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("operant_lab=warn")),
        )
        .init();

    let catalog = Catalog::builtin();
    let mut rng = StdRng::from_entropy();

    println!("\n=== OPERANT LAB ===");
    println!("Train a simulated cat with reinforcement schedules");
    println!();
    for scenario in catalog.iter() {
        println!(
            "  {:<11} {} [{}] - {}",
            scenario.id, scenario.title, scenario.difficulty, scenario.description
        );
    }
    println!();

    let mut scenario = choose_scenario(&catalog)?;
    let mut state = SessionState::initialize(&scenario, 1);
    print_help();

    loop {
        display_status(&state, &scenario);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, arg) = match input.split_once(' ') {
            Some((c, rest)) => (c, rest.trim()),
            None => (input, ""),
        };

        let was_complete = state.is_complete();
        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "tick" | "t" => {
                let before = state.events.len();
                tick(&mut state, &mut rng);
                print_new_events(&state, state.events.len() - before);
            }
            "run" => match arg.parse::<f64>() {
                Ok(seconds) if seconds > 0.0 => {
                    let before = state.events.len();
                    let ticks = (seconds / state.clock.timestep).round() as u64;
                    for _ in 0..ticks {
                        tick(&mut state, &mut rng);
                    }
                    let shown = state.events.len() - before;
                    print_new_events(&state, shown.min(10));
                }
                _ => println!("Usage: run <seconds>"),
            },
            "finish" => {
                while state.is_active() {
                    tick(&mut state, &mut rng);
                }
            }
            "status" | "s" => display_detailed_status(&state),
            "events" | "e" => print_new_events(&state, arg.parse().unwrap_or(10)),
            "intervention" | "i" => report(arg.parse::<Intervention>().and_then(|i| state.set_intervention(i))),
            "target" => report(
                arg.parse::<ScheduleConfig>()
                    .and_then(|c| state.set_schedule(BehaviorClass::Target, c)),
            ),
            "alt" => report(
                arg.parse::<ScheduleConfig>()
                    .and_then(|c| state.set_schedule(BehaviorClass::Alternative, c)),
            ),
            "reinforcer" | "r" => report(arg.parse::<ReinforcerConfig>().and_then(|r| state.set_reinforcer(r))),
            "reinforce" => {
                let class = if arg.is_empty() { Ok(BehaviorClass::Alternative) } else { arg.parse() };
                report(class.and_then(|c| deliver_manual(&mut state, c)));
            }
            "mo" => match arg.parse::<f64>() {
                Ok(mo) if state.clock.paused => report(state.set_motivation(mo)),
                Ok(_) => println!("Pause the session before overriding motivation"),
                Err(_) => println!("Usage: mo <0.0-1.0>"),
            },
            "pause" | "p" => match state.toggle_pause() {
                Ok(true) => println!("Paused."),
                Ok(false) => println!("Resumed."),
                Err(e) => println!("{}", e),
            },
            "summary" => {
                if !state.is_complete() {
                    println!("(session still running; figures are provisional)");
                }
                println!("{}", SessionReport::from_session(&state, &scenario).summary());
            }
            "restart" => state = state.restart(&scenario),
            "next" => {
                if state.is_complete() {
                    state = state.next_session(&scenario);
                } else {
                    println!("Finish the current session first");
                }
            }
            "scenario" => match catalog.find(arg) {
                Ok(found) => {
                    scenario = found.clone();
                    state = SessionState::initialize(&scenario, 1);
                }
                Err(e) => println!("{}", e),
            },
            _ => println!("Unknown command. Type 'help' for the list."),
        }

        if !was_complete && state.is_complete() {
            println!();
            println!("{}", SessionReport::from_session(&state, &scenario).summary());
            println!("Type 'next' for the next session or 'restart' to retry.");
        }
    }

    println!(
        "\nGoodbye! Session {} ended at {:.1}s with {} reinforcers delivered.",
        state.session_number, state.clock.time, state.counters.reinforcers_delivered
    );
    Ok(())
}

fn choose_scenario(catalog: &Catalog) -> Result<Scenario> {
    loop {
        print!("Scenario [jumping]: ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(catalog.find("jumping")?.clone());
        }
        let id = match input.trim() {
            "" => "jumping",
            other => other,
        };
        match catalog.find(id) {
            Ok(scenario) => return Ok(scenario.clone()),
            Err(e) => println!("{}", e),
        }
    }
}

fn report(result: Result<()>) {
    match result {
        Ok(()) => println!("OK."),
        Err(e) => println!("{}", e),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  tick / t               - Advance one timestep (0.1s)");
    println!("  run <seconds>          - Advance several seconds");
    println!("  finish                 - Run to the end of the session");
    println!("  status / s             - Show detailed state");
    println!("  events [n]             - Show the last n events");
    println!("  intervention <name>    - DRA, DRI, DRO, NCR, Extinction, Punishment");
    println!("  target|alt <schedule>  - e.g. 'alt VI 8', 'target EXT', 'alt FR 3'");
    println!("  reinforcer <kind> <n>  - e.g. 'reinforcer treat 2'");
    println!("  reinforce [target|alt] - Deliver a reinforcer right now");
    println!("  mo <value>             - Override motivation (while paused)");
    println!("  pause / p              - Toggle pause");
    println!("  summary                - Show the session report");
    println!("  restart / next         - Retry or start the next session");
    println!("  scenario <id>          - Switch scenario");
    println!("  quit / q               - Exit");
    println!();
}

fn display_status(state: &SessionState, scenario: &Scenario) {
    println!();
    println!(
        "--- {} | session {} | {:.1}/{:.0}s{} ---",
        scenario.title,
        state.session_number,
        state.clock.time,
        state.clock.duration,
        if state.clock.paused { " | PAUSED" } else { "" }
    );
    println!(
        "  {} ({}) | target {} | alt {} | {}",
        state.intervention, scenario.target_behavior, state.target.config, state.alt.config, state.reinforcer
    );
    println!(
        "  MO {:.0}%  SAT {:.0}%  BURST {:.0}%  | cue: {:?}",
        state.internal.motivation * 100.0,
        state.internal.satiation * 100.0,
        state.internal.burst * 100.0,
        state.cue.kind
    );
}

fn display_detailed_status(state: &SessionState) {
    println!();
    println!("=== Detailed Status (t = {:.1}s) ===", state.clock.time);
    println!(
        "  Occurrences: target {}, alt {} | reinforcers {}",
        state.counters.target_occurrences, state.counters.alt_occurrences, state.counters.reinforcers_delivered
    );
    println!(
        "  Recent reinforcement: target {:.3}, alt {:.3}",
        state.internal.recent_target, state.internal.recent_alt
    );
    println!(
        "  Schedules: target {} responses, alt {} responses (requirement {:?})",
        state.target.runtime.responses, state.alt.runtime.responses, state.alt.runtime.requirement
    );
    println!(
        "  Timers: DRO {:.1}/{:.1}s, NCR {:.1}/{:.1}s",
        state.timers.dro, state.timers.dro_interval, state.timers.ncr, state.timers.ncr_interval
    );
    let series = &state.rates.series;
    if let (Some(t), Some(a)) = (series.target.last(), series.alt.last()) {
        println!("  Rates: target {:.1}/min, alt {:.1}/min", t, a);
    }
}

fn print_new_events(state: &SessionState, n: usize) {
    for event in state.events.recent(n) {
        println!("  [{:>6.1}s] {:?}: {}", event.time, event.kind, event.details);
    }
}

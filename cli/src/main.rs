//! Batch runner for the intersection simulator.
//!
//! Thin presentation layer over `intersection-core`: runs a configured
//! number of ticks, logs progress, prints the per-approach statistics
//! table, and optionally exports the event log to CSV. All simulation
//! truth lives in the core; this binary only reads snapshots.
//!
//! ```text
//! intersection-sim [--ticks N] [--policy NAME] [--seed N] [--export FILE]
//!
//! NAME: round-robin | static | dynamic | hybrid
//! ```

use intersection_core::{
    Direction, Event, IntersectionController, PolicyConfig, SimulationConfig, Snapshot,
};
use serde::Serialize;
use std::error::Error;
use std::fs::File;

/// Hybrid policy defaults matching the dynamic-aging setup.
const HYBRID_STARVATION_THRESHOLD: u64 = 50;
const HYBRID_STARVATION_BONUS: f64 = 2.0;

const PROGRESS_INTERVAL: u64 = 30;

#[derive(Debug)]
struct CliArgs {
    ticks: u64,
    policy: PolicyConfig,
    seed: u64,
    export: Option<String>,
}

impl CliArgs {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = CliArgs {
            ticks: 300,
            policy: PolicyConfig::RoundRobin,
            seed: 12345,
            export: None,
        };

        let mut args = args.peekable();
        while let Some(flag) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| format!("{} requires a value", flag))
            };
            match flag.as_str() {
                "--ticks" => {
                    parsed.ticks = value("--ticks")?
                        .parse()
                        .map_err(|e| format!("--ticks: {}", e))?;
                }
                "--seed" => {
                    parsed.seed = value("--seed")?
                        .parse()
                        .map_err(|e| format!("--seed: {}", e))?;
                }
                "--policy" => {
                    parsed.policy = match value("--policy")?.as_str() {
                        "round-robin" => PolicyConfig::RoundRobin,
                        "static" => PolicyConfig::StaticPriority,
                        "dynamic" => PolicyConfig::DynamicPriority,
                        "hybrid" => PolicyConfig::Hybrid {
                            starvation_threshold: HYBRID_STARVATION_THRESHOLD,
                            starvation_bonus: HYBRID_STARVATION_BONUS,
                        },
                        other => return Err(format!("unknown policy: {}", other)),
                    };
                }
                "--export" => parsed.export = Some(value("--export")?),
                other => return Err(format!("unknown flag: {}", other)),
            }
        }
        Ok(parsed)
    }
}

/// Flat event-log row for CSV export.
#[derive(Debug, Serialize)]
struct EventRow<'a> {
    tick: u64,
    event: &'a str,
    direction: &'a str,
    detail: String,
}

impl<'a> EventRow<'a> {
    fn from_event(event: &'a Event) -> Self {
        match event {
            Event::Arrival {
                tick,
                direction,
                vehicle_id,
            } => EventRow {
                tick: *tick,
                event: "arrival",
                direction: direction.name(),
                detail: vehicle_id.clone(),
            },
            Event::ArrivalDropped {
                tick,
                direction,
                vehicle_id,
            } => EventRow {
                tick: *tick,
                event: "arrival_dropped",
                direction: direction.name(),
                detail: vehicle_id.clone(),
            },
            Event::PhaseChange {
                tick,
                from,
                to,
                approach,
            } => EventRow {
                tick: *tick,
                event: "phase_change",
                direction: approach.map(|d| d.name()).unwrap_or(""),
                detail: format!("{} -> {}", from, to),
            },
            Event::GreenGranted {
                tick,
                direction,
                policy,
                quantum,
            } => EventRow {
                tick: *tick,
                event: "green_granted",
                direction: direction.name(),
                detail: format!("{} quantum={}", policy, quantum),
            },
            Event::VehicleServed {
                tick,
                direction,
                vehicle_id,
                waited,
            } => EventRow {
                tick: *tick,
                event: "vehicle_served",
                direction: direction.name(),
                detail: format!("{} waited={}", vehicle_id, waited),
            },
            Event::AllQueuesEmpty { tick } => EventRow {
                tick: *tick,
                event: "all_queues_empty",
                direction: "",
                detail: String::new(),
            },
            Event::Reconfigured {
                tick,
                parameter,
                value,
            } => EventRow {
                tick: *tick,
                event: "reconfigured",
                direction: "",
                detail: format!("{}={}", parameter, value),
            },
        }
    }
}

fn export_event_log(path: &str, events: &[Event]) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    for event in events {
        wtr.serialize(EventRow::from_event(event))?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_statistics(snapshot: &Snapshot) {
    println!();
    println!(
        "=== Simulation statistics (tick {}, policy {}) ===",
        snapshot.tick, snapshot.scheduler_name
    );
    println!(
        "{:<8} {:>6} {:>7} {:>8} {:>6} {:>9} {:>9} {:>9}",
        "Approach", "Queue", "Served", "Dropped", "Age", "AvgWait", "AvgTAT", "AvgResp"
    );
    for approach in &snapshot.approaches {
        println!(
            "{:<8} {:>6} {:>7} {:>8} {:>6} {:>9.2} {:>9.2} {:>9.2}",
            approach.direction.name(),
            approach.queue_length,
            approach.served_count,
            approach.dropped_count,
            approach.age_ticks,
            approach.average_waiting,
            approach.average_turnaround,
            approach.average_response,
        );
    }
    println!(
        "Total served: {}   overall avg wait: {:.2} ticks",
        snapshot.total_served, snapshot.average_waiting
    );
}

fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let config = SimulationConfig {
        seed: args.seed,
        policy: args.policy.clone(),
        ..SimulationConfig::default()
    };

    log::info!(
        "starting simulation: {} ticks, seed {}, policy {:?}",
        args.ticks,
        args.seed,
        args.policy
    );

    let mut controller = IntersectionController::new(config)?;
    for _ in 0..args.ticks {
        let result = controller.tick();
        if result.tick % PROGRESS_INTERVAL == 0 {
            let queued: usize = Direction::ALL
                .iter()
                .map(|&d| controller.state().approach(d).queue_len())
                .sum();
            log::info!(
                "tick {}: phase {} ({}), {} queued, {} served",
                result.tick,
                result.phase,
                controller
                    .current_approach()
                    .map(|d| d.name())
                    .unwrap_or("NONE"),
                queued,
                controller.state().total_served()
            );
        }
    }

    print_statistics(&controller.snapshot());

    if let Some(path) = &args.export {
        export_event_log(path, controller.event_log().events())?;
        log::info!(
            "exported {} events to {}",
            controller.event_log().len(),
            path
        );
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!(
                "usage: intersection-sim [--ticks N] [--policy round-robin|static|dynamic|hybrid] [--seed N] [--export FILE]"
            );
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("simulation failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        CliArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.ticks, 300);
        assert_eq!(args.seed, 12345);
        assert_eq!(args.policy, PolicyConfig::RoundRobin);
        assert!(args.export.is_none());
    }

    #[test]
    fn test_parse_full_invocation() {
        let args = parse(&[
            "--ticks", "500", "--policy", "hybrid", "--seed", "7", "--export", "events.csv",
        ])
        .unwrap();

        assert_eq!(args.ticks, 500);
        assert_eq!(args.seed, 7);
        assert!(matches!(args.policy, PolicyConfig::Hybrid { .. }));
        assert_eq!(args.export.as_deref(), Some("events.csv"));
    }

    #[test]
    fn test_rejects_unknown_policy_and_flag() {
        assert!(parse(&["--policy", "fifo"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--ticks"]).is_err());
    }
}

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use fleet_sim::simulation::{CounterStrategy, Fleet, FleetConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CounterArg {
    /// Atomic fetch-add
    Atomic,
    /// Mutex around read-modify-write
    Locked,
    /// No synchronization; loses updates under contention
    Unsynchronized,
}

impl From<CounterArg> for CounterStrategy {
    fn from(value: CounterArg) -> Self {
        match value {
            CounterArg::Atomic => CounterStrategy::Atomic,
            CounterArg::Locked => CounterStrategy::Locked,
            CounterArg::Unsynchronized => CounterStrategy::Unsynchronized,
        }
    }
}

#[derive(Parser)]
#[command(name = "fleet_sim")]
#[command(about = "Concurrent fleet simulation with a shared highway counter")]
struct Cli {
    /// Wall-clock seconds to run before stopping every vehicle
    #[arg(long, default_value = "5")]
    seconds: u64,

    /// Milliseconds between two travel steps of a vehicle
    #[arg(long, default_value = "100")]
    cadence_ms: u64,

    /// Random extra milliseconds of cadence per vehicle
    #[arg(long, default_value = "0")]
    jitter_ms: u64,

    /// Seed for the cadence jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Shared counter synchronization
    #[arg(long, value_enum, default_value = "atomic")]
    counter: CounterArg,

    /// Milliseconds slept inside the counter's read-modify-write
    #[arg(long, default_value = "0")]
    race_window_ms: u64,

    /// Stop each vehicle after this many successful steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Refuel vehicles that run dry with this many litres
    #[arg(long, value_parser = parse_litres)]
    auto_refuel: Option<f64>,

    /// Keep refuelled vehicles suspended until resumed explicitly
    #[arg(long)]
    manual_resume: bool,

    /// Add a sail-powered cargo ship to the fleet
    #[arg(long)]
    ship: bool,

    /// Milliseconds between two printed summaries
    #[arg(long, default_value = "1000")]
    report_interval_ms: u64,
}

fn parse_litres(value: &str) -> Result<f64, String> {
    let litres: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if litres.is_finite() && litres > 0.0 {
        Ok(litres)
    } else {
        Err(format!("{value} is not a positive amount of fuel"))
    }
}

impl Cli {
    fn fleet_config(&self) -> FleetConfig {
        FleetConfig {
            cadence: Duration::from_millis(self.cadence_ms),
            cadence_jitter: Duration::from_millis(self.jitter_ms),
            seed: self.seed,
            max_steps: self.max_steps,
            counter_strategy: self.counter.into(),
            race_window: Duration::from_millis(self.race_window_ms),
            resume_on_refuel: !self.manual_resume,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the fleet without any presentation layer
fn run_headless(cli: &Cli) -> Result<()> {
    let config = cli.fleet_config();
    println!("Running fleet simulation in headless mode...");
    println!(
        "Duration: {}s, Cadence: {}ms, Counter: {:?}",
        cli.seconds, cli.cadence_ms, config.counter_strategy
    );
    println!();

    let mut fleet =
        Fleet::create_demo_fleet(config, cli.ship).context("Failed to build demo fleet")?;

    println!("Initial state:");
    fleet.print_summary();
    println!();

    fleet.start_all().context("Failed to start fleet")?;

    let started = Instant::now();
    let run_for = Duration::from_secs(cli.seconds);
    let report_interval = Duration::from_millis(cli.report_interval_ms.max(1));
    while started.elapsed() < run_for {
        thread::sleep(report_interval.min(run_for.saturating_sub(started.elapsed())));

        if let Some(amount) = cli.auto_refuel {
            let refuelled = fleet
                .refuel_dry(amount)
                .context("Failed to refuel dry vehicles")?;
            if cli.manual_resume {
                for id in &refuelled {
                    fleet.resume(id)?;
                }
            }
        }

        println!("--- After {:.1}s ---", started.elapsed().as_secs_f32());
        fleet.print_summary();
        println!();
    }

    fleet.stop_all();

    println!("=== Final State ===");
    fleet.print_summary();

    let lost = fleet.lost_updates();
    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", started.elapsed().as_secs_f32());
    info!("Vehicles: {}", fleet.len());
    info!("Successful steps: {}", fleet.total_steps());
    info!("Shared distance: {}", fleet.shared_distance());
    info!("Total mileage: {:.0}", fleet.total_mileage());
    info!("Lost updates: {lost}");
    if lost > 0 {
        warn!("Shared counter lost {lost} updates to unsynchronized access");
    }
    Ok(())
}

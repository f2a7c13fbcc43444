//! Fleet controller
//!
//! Owns the shared counter and one worker per vehicle, and broadcasts
//! control requests to them. Workers only receive the counter's reporting
//! capability.

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::counter::{CounterStrategy, DistanceReporter, SharedCounter};
use super::error::{FleetError, Result};
use super::types::{VehicleId, WorkerStatus, DEFAULT_CADENCE};
use super::vehicle::Vehicle;
use super::worker::{VehicleSnapshot, VehicleWorker, WorkerSettings};

/// Fleet-wide simulation settings
#[derive(Debug, Clone, PartialEq)]
pub struct FleetConfig {
    /// Base wait between two travel attempts of every worker
    pub cadence: Duration,
    /// Upper bound of the random extra cadence given to each vehicle,
    /// drawn with microsecond granularity
    pub cadence_jitter: Duration,
    /// Seed for the cadence jitter; `None` draws from the thread RNG
    pub seed: Option<u64>,
    /// Successful steps after which each worker stops on its own
    pub max_steps: Option<u64>,
    pub counter_strategy: CounterStrategy,
    /// Delay inside the counter's read-modify-write
    pub race_window: Duration,
    /// Resume a dry worker as soon as it is refuelled
    pub resume_on_refuel: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            cadence: DEFAULT_CADENCE,
            cadence_jitter: Duration::ZERO,
            seed: None,
            max_steps: None,
            counter_strategy: CounterStrategy::default(),
            race_window: Duration::ZERO,
            resume_on_refuel: true,
        }
    }
}

/// A group of vehicles simulated together
pub struct Fleet {
    workers: Vec<VehicleWorker>,
    counter: Arc<SharedCounter>,
    config: FleetConfig,
    /// Optional seeded RNG for reproducible cadences
    rng: Option<StdRng>,
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new(FleetConfig::default())
    }
}

impl Fleet {
    pub fn new(config: FleetConfig) -> Self {
        let counter = Arc::new(SharedCounter::with_race_window(
            config.counter_strategy,
            config.race_window,
        ));
        Self {
            workers: Vec::new(),
            counter,
            rng: config.seed.map(StdRng::seed_from_u64),
            config,
        }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn vehicle_ids(&self) -> Vec<VehicleId> {
        self.workers.iter().map(|w| w.id().clone()).collect()
    }

    fn worker_cadence(&mut self) -> Duration {
        let jitter_us = u64::try_from(self.config.cadence_jitter.as_micros()).unwrap_or(u64::MAX);
        if jitter_us == 0 {
            return self.config.cadence;
        }
        let extra = match &mut self.rng {
            Some(rng) => rng.random_range(0..=jitter_us),
            None => rand::rng().random_range(0..=jitter_us),
        };
        self.config.cadence.saturating_add(Duration::from_micros(extra))
    }

    fn worker(&self, id: &VehicleId) -> Result<&VehicleWorker> {
        self.workers
            .iter()
            .find(|w| w.id() == id)
            .ok_or_else(|| FleetError::UnknownVehicle(id.clone()))
    }

    fn worker_mut(&mut self, id: &VehicleId) -> Result<&mut VehicleWorker> {
        self.workers
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| FleetError::UnknownVehicle(id.clone()))
    }

    /// Put a vehicle under fleet control; its worker starts `Idle`
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<VehicleId> {
        let id = vehicle.id().clone();
        if self.workers.iter().any(|w| *w.id() == id) {
            return Err(FleetError::DuplicateVehicle(id));
        }
        let settings = WorkerSettings {
            cadence: self.worker_cadence(),
            max_steps: self.config.max_steps,
        };
        let reporter: Arc<dyn DistanceReporter> = self.counter.clone();
        self.workers.push(VehicleWorker::new(vehicle, settings, reporter));
        Ok(id)
    }

    pub fn start(&mut self, id: &VehicleId) -> Result<()> {
        self.worker_mut(id)?.start()
    }

    /// Start every worker that has not been stopped
    pub fn start_all(&mut self) -> Result<()> {
        for worker in &mut self.workers {
            if worker.status().is_terminal() {
                warn!("Skipping stopped vehicle {}", worker.id());
                continue;
            }
            worker.start()?;
        }
        info!("Started {} vehicles", self.workers.len());
        Ok(())
    }

    pub fn pause(&self, id: &VehicleId) -> Result<()> {
        self.worker(id)?.pause();
        Ok(())
    }

    pub fn pause_all(&self) {
        for worker in &self.workers {
            worker.pause();
        }
    }

    /// Resume a paused worker, or a dry one that can afford a step again.
    ///
    /// Returns whether the worker was woken.
    pub fn resume(&self, id: &VehicleId) -> Result<bool> {
        Ok(self.worker(id)?.resume_if_fueled())
    }

    pub fn resume_all(&self) {
        for worker in &self.workers {
            worker.resume_if_fueled();
        }
    }

    /// Stop one worker and wait for its loop to exit
    pub fn stop(&mut self, id: &VehicleId) -> Result<()> {
        let worker = self.worker_mut(id)?;
        worker.stop();
        worker.join();
        Ok(())
    }

    /// Signal every worker first, then wait for all of them
    pub fn stop_all(&mut self) {
        for worker in &self.workers {
            worker.stop();
        }
        for worker in &mut self.workers {
            worker.join();
        }
        info!("All vehicles stopped");
    }

    /// Wait for workers that stop on their own (see [`FleetConfig::max_steps`]).
    ///
    /// Blocks forever on a worker without a step limit that is never stopped.
    pub fn join_all(&mut self) {
        for worker in &mut self.workers {
            worker.join();
        }
    }

    /// Add fuel to a vehicle, resuming it if it ran dry and the fleet is
    /// configured to. Returns whether the worker was resumed.
    pub fn refuel(&self, id: &VehicleId, amount: f64) -> Result<bool> {
        let worker = self.worker(id)?;
        let resumed = if self.config.resume_on_refuel {
            worker.refuel_and_resume(amount)?
        } else {
            worker.refuel(amount)?;
            false
        };
        info!("Refuelled {id} with {amount:.1} L");
        Ok(resumed)
    }

    /// Refuel every fuel-burning vehicle that is out of fuel
    pub fn refuel_dry(&self, amount: f64) -> Result<Vec<VehicleId>> {
        let mut refuelled = Vec::new();
        for snapshot in self.snapshot() {
            if snapshot.status == WorkerStatus::OutOfFuel && snapshot.consumes_fuel {
                self.refuel(&snapshot.id, amount)?;
                refuelled.push(snapshot.id);
            }
        }
        Ok(refuelled)
    }

    pub fn status(&self, id: &VehicleId) -> Result<WorkerStatus> {
        Ok(self.worker(id)?.status())
    }

    pub fn mileage(&self, id: &VehicleId) -> Result<f64> {
        Ok(self.worker(id)?.mileage())
    }

    pub fn fuel_level(&self, id: &VehicleId) -> Result<f64> {
        Ok(self.worker(id)?.fuel_level())
    }

    /// Run `f` against a managed vehicle under its worker's lock
    pub fn with_vehicle<R>(&self, id: &VehicleId, f: impl FnOnce(&mut Vehicle) -> R) -> Result<R> {
        Ok(self.worker(id)?.with_vehicle(f))
    }

    /// Current value of the shared counter
    pub fn shared_distance(&self) -> u64 {
        self.counter.value()
    }

    pub fn counter_strategy(&self) -> CounterStrategy {
        self.counter.strategy()
    }

    pub fn snapshot(&self) -> Vec<VehicleSnapshot> {
        self.workers.iter().map(VehicleWorker::snapshot).collect()
    }

    pub fn total_mileage(&self) -> f64 {
        self.workers.iter().map(VehicleWorker::mileage).sum()
    }

    /// Successful travel steps across all workers
    pub fn total_steps(&self) -> u64 {
        self.workers.iter().map(VehicleWorker::steps).sum()
    }

    /// Steps the shared counter failed to record. Exact once all workers
    /// have stopped; always 0 with a synchronized counter.
    pub fn lost_updates(&self) -> u64 {
        self.total_steps().saturating_sub(self.shared_distance())
    }

    /// Vehicles ordered by fuel efficiency, best first
    pub fn ranked_by_efficiency(&self) -> Vec<(VehicleId, f64)> {
        let mut ranked: Vec<(VehicleId, f64)> = self
            .workers
            .iter()
            .map(|w| (w.id().clone(), w.with_vehicle(|v| v.efficiency_rating())))
            .collect();
        ranked.sort_by_key(|(_, efficiency)| Reverse(OrderedFloat(*efficiency)));
        ranked
    }

    /// Car, truck and airplane with part-filled tanks, plus an optional
    /// sail-powered cargo ship
    pub fn create_demo_fleet(config: FleetConfig, with_ship: bool) -> Result<Self> {
        let mut fleet = Self::new(config);
        fleet.add_vehicle(Vehicle::car("C001", "Toyota Camry", 180.0, 4)?.with_fuel(5.0)?)?;
        fleet.add_vehicle(Vehicle::truck("T001", "Ford F-150", 120.0, 6)?.with_fuel(10.0)?)?;
        fleet.add_vehicle(
            Vehicle::airplane("A001", "Boeing 737", 850.0, 35_000.0)?.with_fuel(20.0)?,
        )?;
        if with_ship {
            fleet.add_vehicle(Vehicle::cargo_ship("S001", "Sea Breeze", 40.0, true)?)?;
        }
        Ok(fleet)
    }

    /// Print a summary of the fleet state
    pub fn print_summary(&self) {
        println!("=== Fleet Simulation Summary ===");
        println!(
            "Vehicles: {}, Counter: {:?}",
            self.workers.len(),
            self.counter_strategy()
        );
        println!("--- Vehicles ---");
        for snapshot in self.snapshot() {
            println!("  {snapshot}");
        }
        println!(
            "Shared Highway Distance: {}  |  Real Total: {:.0}",
            self.shared_distance(),
            self.total_mileage()
        );
    }
}

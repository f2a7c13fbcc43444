//! Vehicle worker
//!
//! One OS thread per vehicle drives repeated unit travel steps. The vehicle
//! and its control flags live behind a single mutex; the paired condvar
//! wakes the thread on resume and stop, so neither the pause wait nor the
//! cadence sleep polls.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};

use super::counter::DistanceReporter;
use super::error::{FleetError, Result};
use super::types::{VehicleId, WorkerStatus, DEFAULT_CADENCE, UNIT_DISTANCE};
use super::vehicle::Vehicle;

/// Per-worker loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Wait between two travel attempts
    pub cadence: Duration,
    /// Stop on its own after this many successful steps
    pub max_steps: Option<u64>,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            cadence: DEFAULT_CADENCE,
            max_steps: None,
        }
    }
}

/// Point-in-time view of one worker, for presentation
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub model: String,
    pub kind: &'static str,
    pub status: WorkerStatus,
    pub mileage: f64,
    pub fuel_level: f64,
    pub consumes_fuel: bool,
    /// Successful travel steps since start
    pub steps: u64,
}

impl fmt::Display for VehicleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {:.0} km travelled | ",
            self.kind, self.id, self.mileage
        )?;
        if self.consumes_fuel {
            write!(f, "Fuel: {:.1} L", self.fuel_level)?;
        } else {
            write!(f, "Fuel: n/a")?;
        }
        write!(f, " | Status: {}", self.status)
    }
}

struct WorkerState {
    vehicle: Vehicle,
    status: WorkerStatus,
    paused: bool,
    stop_requested: bool,
    steps: u64,
}

impl WorkerState {
    /// Clear the pause and fuel-exhaustion condition together
    fn resume(&mut self) -> bool {
        match self.status {
            WorkerStatus::Paused | WorkerStatus::OutOfFuel => {
                self.paused = false;
                self.status = WorkerStatus::Running;
                true
            }
            _ => false,
        }
    }
}

struct WorkerShared {
    state: Mutex<WorkerState>,
    signal: Condvar,
}

impl WorkerShared {
    fn lock(&self) -> MutexGuard<'_, WorkerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drives one vehicle through its simulation loop
pub struct VehicleWorker {
    id: VehicleId,
    shared: Arc<WorkerShared>,
    reporter: Arc<dyn DistanceReporter>,
    settings: WorkerSettings,
    handle: Option<JoinHandle<()>>,
}

impl VehicleWorker {
    pub fn new(
        vehicle: Vehicle,
        settings: WorkerSettings,
        reporter: Arc<dyn DistanceReporter>,
    ) -> Self {
        let id = vehicle.id().clone();
        Self {
            id,
            shared: Arc::new(WorkerShared {
                state: Mutex::new(WorkerState {
                    vehicle,
                    status: WorkerStatus::Idle,
                    paused: false,
                    stop_requested: false,
                    steps: 0,
                }),
                signal: Condvar::new(),
            }),
            reporter,
            settings,
            handle: None,
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn settings(&self) -> WorkerSettings {
        self.settings
    }

    /// Launch the worker thread.
    ///
    /// Starting a running worker is a no-op; starting a stopped one fails.
    pub fn start(&mut self) -> Result<()> {
        {
            let mut state = self.shared.lock();
            if state.stop_requested || state.status.is_terminal() {
                warn!("Refusing to start stopped vehicle {}", self.id);
                return Err(FleetError::WorkerStopped(self.id.clone()));
            }
            if self.handle.is_some() {
                debug!("Vehicle {} already started", self.id);
                return Ok(());
            }
            state.status = WorkerStatus::Running;
        }

        let id = self.id.clone();
        let shared = Arc::clone(&self.shared);
        let reporter = Arc::clone(&self.reporter);
        let settings = self.settings;
        let spawned = thread::Builder::new()
            .name(format!("vehicle-{}", self.id))
            .spawn(move || run_worker(id, shared, reporter, settings));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.lock().status = WorkerStatus::Idle;
                Err(FleetError::Spawn(e))
            }
        }
    }

    /// Suspend the loop before its next travel attempt.
    ///
    /// A worker that ran dry keeps reporting `OutOfFuel`.
    pub fn pause(&self) {
        let mut state = self.shared.lock();
        if state.status == WorkerStatus::Running {
            state.paused = true;
            state.status = WorkerStatus::Paused;
            debug!("Vehicle {} paused", self.id);
        }
    }

    /// Wake a paused or out-of-fuel worker without checking its fuel.
    ///
    /// An empty tank sends the worker straight back to `OutOfFuel` on its
    /// next attempt.
    pub fn resume(&self) -> bool {
        let mut state = self.shared.lock();
        let resumed = state.resume();
        if resumed {
            debug!("Vehicle {} resumed", self.id);
            self.shared.signal.notify_all();
        }
        resumed
    }

    /// Resume unless the worker is out of fuel and still cannot afford a step
    pub fn resume_if_fueled(&self) -> bool {
        let mut state = self.shared.lock();
        if state.status == WorkerStatus::OutOfFuel && !state.vehicle.can_travel(UNIT_DISTANCE) {
            debug!("Vehicle {} still has no fuel, staying suspended", self.id);
            return false;
        }
        let resumed = state.resume();
        if resumed {
            debug!("Vehicle {} resumed", self.id);
            self.shared.signal.notify_all();
        }
        resumed
    }

    /// Request the loop to exit. Does not wait for it; see [`join`](Self::join).
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        if state.status.is_terminal() {
            return;
        }
        state.stop_requested = true;
        if self.handle.is_none() {
            state.status = WorkerStatus::Stopped;
        }
        debug!("Vehicle {} stop requested", self.id);
        self.shared.signal.notify_all();
    }

    /// Wait for the worker thread to exit
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Worker thread for vehicle {} panicked", self.id);
                self.shared.lock().status = WorkerStatus::Stopped;
            }
        }
    }

    pub fn status(&self) -> WorkerStatus {
        self.shared.lock().status
    }

    pub fn mileage(&self) -> f64 {
        self.shared.lock().vehicle.mileage()
    }

    pub fn fuel_level(&self) -> f64 {
        self.shared.lock().vehicle.fuel_level()
    }

    pub fn steps(&self) -> u64 {
        self.shared.lock().steps
    }

    /// Add fuel; seen by the very next travel attempt. Never resumes.
    pub fn refuel(&self, amount: f64) -> Result<()> {
        self.shared.lock().vehicle.refuel(amount)
    }

    /// Add fuel and, if the worker ran dry, resume it in the same critical
    /// section. Returns whether the worker was resumed.
    pub fn refuel_and_resume(&self, amount: f64) -> Result<bool> {
        let mut state = self.shared.lock();
        state.vehicle.refuel(amount)?;
        if state.status != WorkerStatus::OutOfFuel {
            return Ok(false);
        }
        let resumed = state.resume();
        if resumed {
            debug!("Vehicle {} refuelled and resumed", self.id);
            self.shared.signal.notify_all();
        }
        Ok(resumed)
    }

    /// Run `f` against the vehicle under the worker's lock
    pub fn with_vehicle<R>(&self, f: impl FnOnce(&mut Vehicle) -> R) -> R {
        let mut state = self.shared.lock();
        f(&mut state.vehicle)
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        let state = self.shared.lock();
        VehicleSnapshot {
            id: self.id.clone(),
            model: state.vehicle.model().to_string(),
            kind: state.vehicle.kind().name(),
            status: state.status,
            mileage: state.vehicle.mileage(),
            fuel_level: state.vehicle.fuel_level(),
            consumes_fuel: state.vehicle.consumes_fuel(),
            steps: state.steps,
        }
    }
}

impl Drop for VehicleWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
            self.join();
        }
    }
}

fn run_worker(
    id: VehicleId,
    shared: Arc<WorkerShared>,
    reporter: Arc<dyn DistanceReporter>,
    settings: WorkerSettings,
) {
    info!("Vehicle {id} started");
    let mut state = shared.lock();
    loop {
        while state.paused && !state.stop_requested {
            if state.status != WorkerStatus::OutOfFuel {
                state.status = WorkerStatus::Paused;
            }
            state = shared
                .signal
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.stop_requested {
            break;
        }
        state.status = WorkerStatus::Running;

        match state.vehicle.travel(UNIT_DISTANCE) {
            Ok(true) => state.steps += 1,
            Ok(false) => {
                info!(
                    "Vehicle {id} ran out of fuel after {:.1} km",
                    state.vehicle.mileage()
                );
                state.status = WorkerStatus::OutOfFuel;
                state.paused = true;
                continue;
            }
            Err(e) => {
                error!("Vehicle {id} travel step rejected: {e}");
                break;
            }
        }
        let limit_reached = settings.max_steps.is_some_and(|max| state.steps >= max);

        // Report outside the worker lock so status reads never wait on the counter.
        drop(state);
        reporter.report();
        state = shared.lock();

        if limit_reached {
            debug!("Vehicle {id} reached its step limit");
            break;
        }
        state = shared
            .signal
            .wait_timeout_while(state, settings.cadence, |s| !s.stop_requested)
            .unwrap_or_else(PoisonError::into_inner)
            .0;
    }
    state.status = WorkerStatus::Stopped;
    state.stop_requested = true;
    info!(
        "Vehicle {id} stopped after {} steps ({:.1} km)",
        state.steps,
        state.vehicle.mileage()
    );
}

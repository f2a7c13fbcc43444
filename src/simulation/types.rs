//! Core types for the fleet simulation
//!
//! Identifiers, worker status and the constants shared by the engine.

use std::fmt;
use std::time::Duration;

/// Distance covered by one travel step of a worker loop
pub const UNIT_DISTANCE: f64 = 1.0;

/// Default wait between two travel attempts of a worker
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(1000);

/// Fuel slack tolerated when comparing fuel needed against fuel available
pub const FUEL_EPSILON: f64 = 1e-9;

/// Mileage above which a vehicle asks for maintenance
pub const MAINTENANCE_MILEAGE: f64 = 10_000.0;

/// Identifier of a vehicle, unique within a fleet
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lifecycle state of a vehicle worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerStatus {
    /// Created but never started
    Idle,
    Running,
    /// Suspended by a pause request
    Paused,
    /// Suspended because the last travel step had no fuel for the distance
    OutOfFuel,
    /// Loop has exited; terminal
    Stopped,
}

impl WorkerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerStatus::Idle => "Idle",
            WorkerStatus::Running => "Running",
            WorkerStatus::Paused => "Paused",
            WorkerStatus::OutOfFuel => "Out of Fuel",
            WorkerStatus::Stopped => "Stopped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerStatus::Stopped)
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

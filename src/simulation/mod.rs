//! Concurrent fleet simulation engine
//!
//! Vehicles travel on their own worker threads, burning fuel and reporting
//! every successful step into one shared counter. Nothing here depends on a
//! presentation layer; status and counters are meant to be polled.

mod counter;
mod error;
mod fleet;
mod types;
mod vehicle;
mod worker;

pub use counter::{CounterStrategy, DistanceReporter, SharedCounter};
pub use error::{FleetError, Result};
pub use fleet::{Fleet, FleetConfig};
pub use types::{
    VehicleId, WorkerStatus, DEFAULT_CADENCE, FUEL_EPSILON, MAINTENANCE_MILEAGE, UNIT_DISTANCE,
};
pub use vehicle::{HeavyLoadPenalty, Vehicle, VehicleKind, VehicleProfile};
pub use worker::{VehicleSnapshot, VehicleWorker, WorkerSettings};

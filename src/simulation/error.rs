//! Error taxonomy of the fleet engine

use thiserror::Error;

use super::types::VehicleId;

#[derive(Error, Debug)]
pub enum FleetError {
    /// Caller misuse: negative distance, non-positive amount, empty id...
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A capacity limit would be exceeded
    #[error("Overload: {0}")]
    Overload(String),

    #[error("Insufficient fuel: need {needed:.2} L but only have {available:.2} L")]
    InsufficientFuel { needed: f64, available: f64 },

    #[error("Vehicle not found: {0}")]
    UnknownVehicle(VehicleId),

    #[error("Vehicle already managed by this fleet: {0}")]
    DuplicateVehicle(VehicleId),

    #[error("Worker for vehicle {0} has been stopped")]
    WorkerStopped(VehicleId),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;

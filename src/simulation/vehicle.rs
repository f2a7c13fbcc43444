//! Vehicle data model and the fuel-consuming travel step
//!
//! Every variant shares one struct; what differs between a car and a cargo
//! ship is the [`VehicleProfile`] its [`VehicleKind`] maps to.

use std::fmt;

use log::debug;

use super::error::{FleetError, Result};
use super::types::{VehicleId, FUEL_EPSILON, MAINTENANCE_MILEAGE};

/// Efficiency reduction applied while a vehicle carries a heavy load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeavyLoadPenalty {
    /// Fraction of cargo capacity above which the penalty applies
    pub threshold: f64,
    /// Multiplier applied to the base efficiency
    pub factor: f64,
}

/// Per-variant constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Distance per unit of fuel; `None` when the vehicle burns no fuel
    pub base_efficiency: Option<f64>,
    pub passenger_capacity: u32,
    pub cargo_capacity: f64,
    /// Multiplier on the ideal `distance / max_speed` journey time
    pub journey_time_factor: f64,
    pub heavy_load: Option<HeavyLoadPenalty>,
}

const LAND_JOURNEY_FACTOR: f64 = 1.1;
const AIR_JOURNEY_FACTOR: f64 = 0.95;
const WATER_JOURNEY_FACTOR: f64 = 1.15;

/// The concrete variants of a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleKind {
    Car { wheels: u32 },
    Truck { wheels: u32 },
    Bus { wheels: u32 },
    Airplane { max_altitude: f64 },
    /// A sail-powered ship never consumes fuel
    CargoShip { has_sail: bool },
}

impl VehicleKind {
    pub fn name(&self) -> &'static str {
        match self {
            VehicleKind::Car { .. } => "Car",
            VehicleKind::Truck { .. } => "Truck",
            VehicleKind::Bus { .. } => "Bus",
            VehicleKind::Airplane { .. } => "Airplane",
            VehicleKind::CargoShip { .. } => "CargoShip",
        }
    }

    pub fn profile(&self) -> VehicleProfile {
        match *self {
            VehicleKind::Car { .. } => VehicleProfile {
                base_efficiency: Some(15.0),
                passenger_capacity: 5,
                cargo_capacity: 0.0,
                journey_time_factor: LAND_JOURNEY_FACTOR,
                heavy_load: None,
            },
            VehicleKind::Truck { .. } => VehicleProfile {
                base_efficiency: Some(8.0),
                passenger_capacity: 0,
                cargo_capacity: 5000.0,
                journey_time_factor: LAND_JOURNEY_FACTOR,
                heavy_load: Some(HeavyLoadPenalty {
                    threshold: 0.5,
                    factor: 0.9,
                }),
            },
            VehicleKind::Bus { .. } => VehicleProfile {
                base_efficiency: Some(10.0),
                passenger_capacity: 50,
                cargo_capacity: 500.0,
                journey_time_factor: LAND_JOURNEY_FACTOR,
                heavy_load: None,
            },
            VehicleKind::Airplane { .. } => VehicleProfile {
                base_efficiency: Some(5.0),
                passenger_capacity: 200,
                cargo_capacity: 10_000.0,
                journey_time_factor: AIR_JOURNEY_FACTOR,
                heavy_load: None,
            },
            VehicleKind::CargoShip { has_sail } => VehicleProfile {
                base_efficiency: if has_sail { None } else { Some(4.0) },
                passenger_capacity: 0,
                cargo_capacity: 50_000.0,
                journey_time_factor: WATER_JOURNEY_FACTOR,
                heavy_load: None,
            },
        }
    }
}

/// A simulated vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    model: String,
    max_speed: f64,
    mileage: f64,
    kind: VehicleKind,
    fuel_level: f64,
    passengers: u32,
    cargo: f64,
    maintenance_scheduled: bool,
}

impl Vehicle {
    pub fn new(
        id: impl Into<VehicleId>,
        model: impl Into<String>,
        max_speed: f64,
        kind: VehicleKind,
    ) -> Result<Self> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(FleetError::InvalidOperation(
                "Vehicle ID cannot be empty".to_string(),
            ));
        }
        if !max_speed.is_finite() || max_speed <= 0.0 {
            return Err(FleetError::InvalidOperation(format!(
                "Max speed must be positive, got {max_speed}"
            )));
        }

        Ok(Self {
            id,
            model: model.into(),
            max_speed,
            mileage: 0.0,
            kind,
            fuel_level: 0.0,
            passengers: 0,
            cargo: 0.0,
            maintenance_scheduled: false,
        })
    }

    pub fn car(
        id: impl Into<VehicleId>,
        model: impl Into<String>,
        max_speed: f64,
        wheels: u32,
    ) -> Result<Self> {
        Self::new(id, model, max_speed, VehicleKind::Car { wheels })
    }

    pub fn truck(
        id: impl Into<VehicleId>,
        model: impl Into<String>,
        max_speed: f64,
        wheels: u32,
    ) -> Result<Self> {
        Self::new(id, model, max_speed, VehicleKind::Truck { wheels })
    }

    pub fn bus(
        id: impl Into<VehicleId>,
        model: impl Into<String>,
        max_speed: f64,
        wheels: u32,
    ) -> Result<Self> {
        Self::new(id, model, max_speed, VehicleKind::Bus { wheels })
    }

    pub fn airplane(
        id: impl Into<VehicleId>,
        model: impl Into<String>,
        max_speed: f64,
        max_altitude: f64,
    ) -> Result<Self> {
        Self::new(id, model, max_speed, VehicleKind::Airplane { max_altitude })
    }

    pub fn cargo_ship(
        id: impl Into<VehicleId>,
        model: impl Into<String>,
        max_speed: f64,
        has_sail: bool,
    ) -> Result<Self> {
        Self::new(id, model, max_speed, VehicleKind::CargoShip { has_sail })
    }

    /// Refuel a freshly built vehicle, builder style
    pub fn with_fuel(mut self, amount: f64) -> Result<Self> {
        self.refuel(amount)?;
        Ok(self)
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn profile(&self) -> VehicleProfile {
        self.kind.profile()
    }

    pub fn mileage(&self) -> f64 {
        self.mileage
    }

    /// Whether travel burns fuel at all
    pub fn consumes_fuel(&self) -> bool {
        self.profile().base_efficiency.is_some()
    }

    /// Current fuel; always 0 for vehicles that burn none
    pub fn fuel_level(&self) -> f64 {
        if self.consumes_fuel() {
            self.fuel_level
        } else {
            0.0
        }
    }

    /// Distance per unit of fuel at the current load
    pub fn fuel_efficiency(&self) -> Option<f64> {
        let profile = self.profile();
        let base = profile.base_efficiency?;
        match profile.heavy_load {
            Some(penalty) if self.cargo > profile.cargo_capacity * penalty.threshold => {
                Some(base * penalty.factor)
            }
            _ => Some(base),
        }
    }

    /// Efficiency used for display and ranking; 0 for fuel-free vehicles
    pub fn efficiency_rating(&self) -> f64 {
        self.fuel_efficiency().unwrap_or(0.0)
    }

    /// Fuel a trip of `distance` would burn at the current load
    pub fn fuel_needed(&self, distance: f64) -> f64 {
        match self.fuel_efficiency() {
            Some(efficiency) => distance / efficiency,
            None => 0.0,
        }
    }

    /// Whether there is enough fuel for `distance` right now
    pub fn can_travel(&self, distance: f64) -> bool {
        !self.consumes_fuel() || self.fuel_needed(distance) <= self.fuel_level + FUEL_EPSILON
    }

    fn validate_distance(distance: f64) -> Result<()> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(FleetError::InvalidOperation(format!(
                "Distance cannot be negative, got {distance}"
            )));
        }
        Ok(())
    }

    /// Burn the fuel for `distance`, returning the amount burnt.
    ///
    /// Fuel is left untouched when there is not enough of it.
    pub fn consume_fuel(&mut self, distance: f64) -> Result<f64> {
        Self::validate_distance(distance)?;
        if !self.consumes_fuel() {
            return Ok(0.0);
        }

        let needed = self.fuel_needed(distance);
        if needed > self.fuel_level + FUEL_EPSILON {
            return Err(FleetError::InsufficientFuel {
                needed,
                available: self.fuel_level,
            });
        }
        self.fuel_level = (self.fuel_level - needed).max(0.0);
        Ok(needed)
    }

    /// One travel step: burn fuel and advance mileage.
    ///
    /// Returns `Ok(false)` without touching any state when fuel is short.
    pub fn travel(&mut self, distance: f64) -> Result<bool> {
        match self.consume_fuel(distance) {
            Ok(_) => {
                self.mileage += distance;
                Ok(true)
            }
            Err(FleetError::InsufficientFuel { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn refuel(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FleetError::InvalidOperation(format!(
                "Refuel amount must be positive, got {amount}"
            )));
        }
        if !self.consumes_fuel() {
            debug!("{} is sail-powered, ignoring refuel of {amount:.1} L", self.id);
            return Ok(());
        }
        self.fuel_level += amount;
        Ok(())
    }

    pub fn reset_mileage(&mut self) {
        self.mileage = 0.0;
    }

    pub fn passengers(&self) -> u32 {
        self.passengers
    }

    pub fn passenger_capacity(&self) -> u32 {
        self.profile().passenger_capacity
    }

    pub fn cargo(&self) -> f64 {
        self.cargo
    }

    pub fn cargo_capacity(&self) -> f64 {
        self.profile().cargo_capacity
    }

    pub fn board_passengers(&mut self, count: u32) -> Result<()> {
        if count == 0 {
            return Err(FleetError::InvalidOperation(
                "Passenger count must be positive".to_string(),
            ));
        }
        let capacity = self.passenger_capacity();
        if self.passengers.saturating_add(count) > capacity {
            return Err(FleetError::Overload(format!(
                "Cannot board {count} passengers. Capacity: {capacity}, Current: {}",
                self.passengers
            )));
        }
        self.passengers += count;
        Ok(())
    }

    pub fn disembark_passengers(&mut self, count: u32) -> Result<()> {
        if count == 0 {
            return Err(FleetError::InvalidOperation(
                "Passenger count must be positive".to_string(),
            ));
        }
        if count > self.passengers {
            return Err(FleetError::InvalidOperation(format!(
                "Cannot disembark {count} passengers. Only {} onboard",
                self.passengers
            )));
        }
        self.passengers -= count;
        Ok(())
    }

    pub fn load_cargo(&mut self, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(FleetError::InvalidOperation(
                "Cargo weight must be positive".to_string(),
            ));
        }
        let capacity = self.cargo_capacity();
        if self.cargo + weight > capacity {
            return Err(FleetError::Overload(format!(
                "Cannot load {weight:.1} kg. Capacity: {capacity:.1} kg, Current: {:.1} kg",
                self.cargo
            )));
        }
        self.cargo += weight;
        Ok(())
    }

    pub fn unload_cargo(&mut self, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(FleetError::InvalidOperation(
                "Cargo weight must be positive".to_string(),
            ));
        }
        if weight > self.cargo {
            return Err(FleetError::InvalidOperation(format!(
                "Cannot unload {weight:.1} kg. Only {:.1} kg loaded",
                self.cargo
            )));
        }
        self.cargo -= weight;
        Ok(())
    }

    pub fn schedule_maintenance(&mut self) {
        self.maintenance_scheduled = true;
    }

    pub fn needs_maintenance(&self) -> bool {
        self.maintenance_scheduled || self.mileage > MAINTENANCE_MILEAGE
    }

    /// Service the vehicle: clears the schedule and resets mileage
    pub fn perform_maintenance(&mut self) {
        self.maintenance_scheduled = false;
        self.reset_mileage();
    }

    /// Estimated hours to cover `distance` at max speed
    pub fn estimate_journey_time(&self, distance: f64) -> Result<f64> {
        Self::validate_distance(distance)?;
        Ok(distance / self.max_speed * self.profile().journey_time_factor)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (ID: {}) - {:.1} km/h",
            self.kind.name(),
            self.model,
            self.id,
            self.max_speed
        )?;
        match self.kind {
            VehicleKind::Car { wheels }
            | VehicleKind::Truck { wheels }
            | VehicleKind::Bus { wheels } => write!(f, ", {wheels} wheels")?,
            VehicleKind::Airplane { max_altitude } => write!(f, ", {max_altitude:.1} m altitude")?,
            VehicleKind::CargoShip { has_sail } => {
                write!(f, ", Sail: {}", if has_sail { "Yes" } else { "No" })?
            }
        }
        write!(f, ", {:.1} km mileage", self.mileage)
    }
}

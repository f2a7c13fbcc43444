//! Fuel model and vehicle data model tests

use fleet_sim::simulation::{FleetError, Vehicle, VehicleKind};

fn bus_with_fuel(fuel: f64) -> Vehicle {
    Vehicle::bus("B001", "Volvo 9700", 100.0, 6)
        .and_then(|bus| bus.with_fuel(fuel))
        .expect("valid bus")
}

#[test]
fn test_travel_fails_without_partial_consumption() {
    // Efficiency 10 with 5 L aboard
    let mut bus = bus_with_fuel(5.0);

    assert!(!bus.travel(60.0).expect("valid distance"));
    assert_eq!(bus.fuel_level(), 5.0);
    assert_eq!(bus.mileage(), 0.0);

    assert!(bus.travel(40.0).expect("valid distance"));
    assert!((bus.fuel_level() - 1.0).abs() < 1e-12);
    assert_eq!(bus.mileage(), 40.0);
}

#[test]
fn test_consume_fuel_reports_shortfall() {
    let mut bus = bus_with_fuel(5.0);
    match bus.consume_fuel(60.0) {
        Err(FleetError::InsufficientFuel { needed, available }) => {
            assert!((needed - 6.0).abs() < 1e-12);
            assert_eq!(available, 5.0);
        }
        other => panic!("expected insufficient fuel, got {other:?}"),
    }
    assert_eq!(bus.fuel_level(), 5.0);
}

#[test]
fn test_negative_distance_is_rejected() {
    let mut bus = bus_with_fuel(5.0);
    assert!(matches!(bus.travel(-1.0), Err(FleetError::InvalidOperation(_))));
    assert!(matches!(bus.travel(f64::NAN), Err(FleetError::InvalidOperation(_))));
    assert!(matches!(
        bus.estimate_journey_time(-5.0),
        Err(FleetError::InvalidOperation(_))
    ));
    assert_eq!(bus.fuel_level(), 5.0);
    assert_eq!(bus.mileage(), 0.0);
}

#[test]
fn test_fuel_never_goes_negative() {
    // 15 km/L and 5 L: 75 unit steps, then nothing
    let mut car = Vehicle::car("C001", "Toyota Camry", 180.0, 4)
        .and_then(|car| car.with_fuel(5.0))
        .expect("valid car");

    let mut steps = 0;
    while car.travel(1.0).expect("valid distance") {
        steps += 1;
        assert!(car.fuel_level() >= 0.0);
        assert!(steps <= 75, "travelled further than the tank allows");
    }
    assert_eq!(steps, 75);
    assert!(car.fuel_level() >= 0.0);
    assert_eq!(car.mileage(), 75.0);
    assert!(!car.can_travel(1.0));
}

#[test]
fn test_sail_ship_never_needs_fuel() {
    let mut ship = Vehicle::cargo_ship("S001", "Sea Breeze", 40.0, true).expect("valid ship");
    assert!(!ship.consumes_fuel());
    assert_eq!(ship.fuel_efficiency(), None);

    for _ in 0..10 {
        assert!(ship.travel(1.0).expect("valid distance"));
    }
    assert_eq!(ship.mileage(), 10.0);
    assert_eq!(ship.fuel_level(), 0.0);

    // Positive refuels are accepted and ignored; non-positive ones are still misuse.
    ship.refuel(50.0).expect("sail refuel is a no-op");
    assert_eq!(ship.fuel_level(), 0.0);
    assert!(matches!(ship.refuel(0.0), Err(FleetError::InvalidOperation(_))));
}

#[test]
fn test_motor_ship_burns_fuel() {
    let mut ship = Vehicle::cargo_ship("S002", "Maersk Line", 45.0, false)
        .and_then(|ship| ship.with_fuel(1.0))
        .expect("valid ship");
    assert_eq!(ship.fuel_efficiency(), Some(4.0));
    assert!(ship.travel(4.0).expect("valid distance"));
    assert!(!ship.travel(1.0).expect("valid distance"));
}

#[test]
fn test_refuel_rejects_non_positive_amounts() {
    let mut bus = bus_with_fuel(2.0);
    assert!(matches!(bus.refuel(0.0), Err(FleetError::InvalidOperation(_))));
    assert!(matches!(bus.refuel(-1.0), Err(FleetError::InvalidOperation(_))));
    assert!(matches!(bus.refuel(f64::INFINITY), Err(FleetError::InvalidOperation(_))));
    assert_eq!(bus.fuel_level(), 2.0);

    bus.refuel(3.0).expect("positive refuel");
    assert_eq!(bus.fuel_level(), 5.0);
}

#[test]
fn test_loaded_truck_is_less_efficient() {
    let mut truck = Vehicle::truck("T001", "Ford F-150", 120.0, 6).expect("valid truck");
    assert_eq!(truck.fuel_efficiency(), Some(8.0));

    // Exactly half the capacity is not yet a heavy load.
    truck.load_cargo(2500.0).expect("within capacity");
    assert_eq!(truck.fuel_efficiency(), Some(8.0));

    truck.load_cargo(500.0).expect("within capacity");
    let efficiency = truck.fuel_efficiency().expect("truck burns fuel");
    assert!((efficiency - 7.2).abs() < 1e-12);
    assert!((truck.fuel_needed(72.0) - 10.0).abs() < 1e-9);
}

#[test]
fn test_capacity_overload_leaves_state_unchanged() {
    let mut car = Vehicle::car("C001", "Toyota Camry", 180.0, 4).expect("valid car");
    car.board_passengers(3).expect("within capacity");
    assert!(matches!(car.board_passengers(3), Err(FleetError::Overload(_))));
    assert_eq!(car.passengers(), 3);
    assert!(matches!(car.load_cargo(1.0), Err(FleetError::Overload(_))));
    assert_eq!(car.cargo(), 0.0);

    let mut truck = Vehicle::truck("T001", "Ford F-150", 120.0, 6).expect("valid truck");
    assert!(matches!(truck.board_passengers(1), Err(FleetError::Overload(_))));
    truck.load_cargo(4000.0).expect("within capacity");
    assert!(matches!(truck.load_cargo(1500.0), Err(FleetError::Overload(_))));
    assert_eq!(truck.cargo(), 4000.0);
}

#[test]
fn test_unloading_more_than_aboard_is_invalid() {
    let mut plane = Vehicle::airplane("A001", "Boeing 737", 850.0, 35_000.0).expect("valid plane");
    plane.board_passengers(120).expect("within capacity");
    assert!(matches!(
        plane.disembark_passengers(121),
        Err(FleetError::InvalidOperation(_))
    ));
    assert!(matches!(plane.disembark_passengers(0), Err(FleetError::InvalidOperation(_))));
    plane.disembark_passengers(20).expect("enough aboard");
    assert_eq!(plane.passengers(), 100);

    plane.load_cargo(500.0).expect("within capacity");
    assert!(matches!(plane.unload_cargo(600.0), Err(FleetError::InvalidOperation(_))));
    assert_eq!(plane.cargo(), 500.0);
}

#[test]
fn test_empty_id_is_rejected() {
    assert!(matches!(
        Vehicle::car("", "Toyota Camry", 180.0, 4),
        Err(FleetError::InvalidOperation(_))
    ));
    assert!(matches!(
        Vehicle::car("   ", "Toyota Camry", 180.0, 4),
        Err(FleetError::InvalidOperation(_))
    ));
    assert!(matches!(
        Vehicle::car("C001", "Toyota Camry", 0.0, 4),
        Err(FleetError::InvalidOperation(_))
    ));
}

#[test]
fn test_maintenance_resets_mileage() {
    let mut ship = Vehicle::cargo_ship("S001", "Sea Breeze", 40.0, true).expect("valid ship");
    assert!(!ship.needs_maintenance());
    assert!(ship.travel(10_001.0).expect("valid distance"));
    assert!(ship.needs_maintenance());

    ship.perform_maintenance();
    assert!(!ship.needs_maintenance());
    assert_eq!(ship.mileage(), 0.0);

    ship.schedule_maintenance();
    assert!(ship.needs_maintenance());
}

#[test]
fn test_journey_time_depends_on_medium() {
    let car = Vehicle::car("C001", "Toyota Camry", 100.0, 4).expect("valid car");
    let plane = Vehicle::airplane("A001", "Boeing 737", 100.0, 35_000.0).expect("valid plane");
    let ship = Vehicle::cargo_ship("S001", "Sea Breeze", 100.0, true).expect("valid ship");

    let hours = |v: &Vehicle| v.estimate_journey_time(200.0).expect("valid distance");
    assert!((hours(&car) - 2.2).abs() < 1e-9);
    assert!((hours(&plane) - 1.9).abs() < 1e-9);
    assert!((hours(&ship) - 2.3).abs() < 1e-9);
}

#[test]
fn test_vehicle_description() {
    let car = Vehicle::car("C001", "Toyota Camry", 180.0, 4).expect("valid car");
    assert_eq!(
        car.to_string(),
        "Car: Toyota Camry (ID: C001) - 180.0 km/h, 4 wheels, 0.0 km mileage"
    );
    assert_eq!(car.kind(), VehicleKind::Car { wheels: 4 });
    assert_eq!(car.profile().passenger_capacity, 5);
}

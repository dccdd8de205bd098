// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Aircraft, AircraftStatus, DomainError, MaintenanceConfig, Registration, StationCode,
};

fn test_aircraft(condition: f64, status: AircraftStatus) -> Aircraft {
    let mut aircraft = Aircraft::new(
        Registration::new("OD-LVA").unwrap(),
        String::from("B738"),
        StationCode::new("OLBA").unwrap(),
    );
    aircraft.aircraft_id = Some(3);
    aircraft.condition = condition;
    aircraft.status = status;
    aircraft
}

#[test]
fn test_station_code_normalizes_to_uppercase() {
    let code = StationCode::new("olba").unwrap();
    assert_eq!(code.value(), "OLBA");
}

#[test]
fn test_station_code_rejects_wrong_length() {
    assert!(matches!(
        StationCode::new("OLB"),
        Err(DomainError::InvalidStationCode(_))
    ));
    assert!(matches!(
        StationCode::new("OLBAA"),
        Err(DomainError::InvalidStationCode(_))
    ));
    assert!(matches!(
        StationCode::new(""),
        Err(DomainError::InvalidStationCode(_))
    ));
}

#[test]
fn test_station_code_rejects_non_alphanumeric() {
    assert!(StationCode::new("OL-A").is_err());
    assert!(StationCode::new("OL A").is_err());
}

#[test]
fn test_registration_normalizes_and_bounds_length() {
    let reg = Registration::new(" od-lva ").unwrap();
    assert_eq!(reg.value(), "OD-LVA");

    assert!(Registration::new("").is_err());
    assert!(Registration::new("ABCDEFGHIJK").is_err());
}

#[test]
fn test_aircraft_status_string_round_trip() {
    for status in [
        AircraftStatus::Available,
        AircraftStatus::Booked,
        AircraftStatus::InFlight,
        AircraftStatus::Maintenance,
        AircraftStatus::Grounded,
    ] {
        let parsed: AircraftStatus = status.as_str().parse().unwrap();
        assert_eq!(status, parsed);
    }
}

#[test]
fn test_booking_lifecycle_transitions() {
    assert!(
        AircraftStatus::Available
            .validate_transition(AircraftStatus::Booked)
            .is_ok()
    );
    assert!(
        AircraftStatus::Booked
            .validate_transition(AircraftStatus::InFlight)
            .is_ok()
    );
    assert!(
        AircraftStatus::InFlight
            .validate_transition(AircraftStatus::Available)
            .is_ok()
    );
    // An abandoned booking releases the aircraft directly.
    assert!(
        AircraftStatus::Booked
            .validate_transition(AircraftStatus::Available)
            .is_ok()
    );
}

#[test]
fn test_grounded_aircraft_cannot_be_booked() {
    assert!(
        AircraftStatus::Grounded
            .validate_transition(AircraftStatus::Booked)
            .is_err()
    );
    assert!(
        AircraftStatus::Maintenance
            .validate_transition(AircraftStatus::Booked)
            .is_err()
    );
}

#[test]
fn test_new_aircraft_enters_fleet_available_at_full_condition() {
    let aircraft = test_aircraft(100.0, AircraftStatus::Available);
    assert_eq!(aircraft.condition, 100.0);
    assert_eq!(aircraft.status, AircraftStatus::Available);
    assert_eq!(aircraft.current_location, aircraft.home_location);
    assert_eq!(aircraft.flight_count, 0);
}

#[test]
fn test_condition_below_threshold_forces_grounded() {
    let config = MaintenanceConfig::default();
    let aircraft = test_aircraft(40.0, AircraftStatus::InFlight);

    let status = aircraft.status_after_condition_change(19.9, &config);
    assert_eq!(status, AircraftStatus::Grounded);
}

#[test]
fn test_condition_at_threshold_is_not_grounded() {
    let config = MaintenanceConfig::default();
    let aircraft = test_aircraft(40.0, AircraftStatus::InFlight);

    let status = aircraft.status_after_condition_change(20.0, &config);
    assert_eq!(status, AircraftStatus::InFlight);
}

#[test]
fn test_grounding_clears_only_past_hysteresis_margin() {
    let config = MaintenanceConfig::default();
    let grounded = test_aircraft(12.0, AircraftStatus::Grounded);

    // Inside the hysteresis band the aircraft stays grounded.
    assert_eq!(
        grounded.status_after_condition_change(22.0, &config),
        AircraftStatus::Grounded
    );
    // At threshold + margin grounding clears.
    assert_eq!(
        grounded.status_after_condition_change(25.0, &config),
        AircraftStatus::Available
    );
    assert_eq!(
        grounded.status_after_condition_change(100.0, &config),
        AircraftStatus::Available
    );
}

#[test]
fn test_condition_change_leaves_other_statuses_alone() {
    let config = MaintenanceConfig::default();
    let available = test_aircraft(80.0, AircraftStatus::Available);

    assert_eq!(
        available.status_after_condition_change(60.0, &config),
        AircraftStatus::Available
    );
}

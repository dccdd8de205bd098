// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.

use crate::auth::PilotSession;
use crate::request_response::{
    AcarsReportRequest, CreateBidRequest, ManualPirepRequest, StartSessionRequest,
    TelemetryRequest,
};
use skyops_audit::Cause;
use skyops_domain::{Aircraft, MaintenanceConfig, Pilot, Registration, StationCode};
use skyops_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

pub fn cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("test request"))
}

pub fn setup() -> (Persistence, MaintenanceConfig) {
    (Persistence::new_in_memory().unwrap(), MaintenanceConfig::default())
}

/// Seeds a pilot at OLBA; returns their session.
pub fn seed_pilot(persistence: &mut Persistence, code: &str, is_admin: bool) -> PilotSession {
    let pilot = Pilot {
        pilot_id: None,
        pilot_code: code.to_owned(),
        name: format!("Pilot {code}"),
        credit_balance: 0,
        total_hours: 0.0,
        current_location: StationCode::new("OLBA").unwrap(),
        is_admin,
    };
    let pilot_id = persistence.insert_pilot(&pilot).unwrap();
    PilotSession::new(pilot_id, is_admin)
}

/// Seeds an Available B738 at OLBA.
pub fn seed_aircraft(persistence: &mut Persistence, registration: &str) -> i64 {
    let aircraft = Aircraft::new(
        Registration::new(registration).unwrap(),
        String::from("B738"),
        StationCode::new("OLBA").unwrap(),
    );
    persistence.insert_aircraft(&aircraft).unwrap()
}

pub fn bid_request() -> CreateBidRequest {
    CreateBidRequest {
        flight_number: String::from("LVT204"),
        callsign: String::from("LVT204"),
        departure: String::from("OLBA"),
        arrival: String::from("OJAI"),
        aircraft_type: String::from("B738"),
        route: String::from("KUKLA UL620 TANSA"),
        pax: 148,
        cargo: 3200,
        planned_fuel: 8400,
        distance_nm: 214,
    }
}

pub fn start_request(bid_id: i64) -> StartSessionRequest {
    StartSessionRequest { bid_id }
}

pub fn telemetry_request(session_id: i64) -> TelemetryRequest {
    TelemetryRequest {
        session_id,
        latitude: 33.82,
        longitude: 35.49,
        phase: String::from("CLIMB"),
        landing_rate: None,
    }
}

pub fn acars_report_request(session_id: i64, landing_rate: Option<i32>) -> AcarsReportRequest {
    AcarsReportRequest {
        session_id,
        flight_time_minutes: 95,
        landing_rate,
        revenue_passenger: 14800,
        revenue_cargo: 1600,
        expense_fuel: 5200,
        expense_airport: 1800,
        expense_pilot: 2400,
        expense_maintenance: 900,
        comments: None,
    }
}

pub fn manual_request() -> ManualPirepRequest {
    ManualPirepRequest {
        flight_number: None,
        callsign: None,
        departure: String::from("OLBA"),
        arrival: String::from("OJAI"),
        aircraft_type: String::from("B738"),
        flight_time_minutes: 95,
        landing_rate: Some(-100),
        tracker_link: Some(String::from("https://tracker.ivao.aero/flight/991")),
        proof_image: None,
        comments: None,
    }
}

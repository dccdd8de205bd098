// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared builders for core tests.

use skyops_audit::{Actor, ActorKind, Cause};
use skyops_domain::{
    ApprovalStatus, Bid, FlightReport, FlightSpec, MaintenanceConfig, StationCode,
    SubmissionChannel,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("pilot-7"), ActorKind::Pilot)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("test request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

pub fn station(code: &str) -> StationCode {
    StationCode::new(code).unwrap()
}

pub fn test_spec() -> FlightSpec {
    FlightSpec {
        flight_number: String::from("LVT204"),
        callsign: String::from("LVT204"),
        departure: station("OLBA"),
        arrival: station("OJAI"),
        aircraft_type: String::from("B738"),
        route: String::from("KUKLA UL620 TANSA"),
        pax: 148,
        cargo: 3200,
        planned_fuel: 8400,
        distance_nm: 214,
    }
}

pub fn test_bid(pilot_id: i64) -> Bid {
    let mut bid = Bid::new(
        pilot_id,
        test_spec(),
        test_now(),
        MaintenanceConfig::default().bid_ttl,
    );
    bid.bid_id = Some(11);
    bid
}

pub fn test_report(channel: SubmissionChannel, landing_rate: Option<i32>) -> FlightReport {
    FlightReport {
        report_id: Some(42),
        session_id: None,
        bid_id: None,
        pilot_id: 7,
        flight_number: String::from("LVT204"),
        callsign: String::from("LVT204"),
        departure: station("OLBA"),
        arrival: station("OJAI"),
        aircraft_type: String::from("B738"),
        aircraft_id: Some(3),
        flight_time_minutes: 95,
        landing_rate,
        channel,
        proof: None,
        comments: None,
        is_duplicate: false,
        status: ApprovalStatus::Pending,
        status_reason: None,
        revenue_passenger: 14800,
        revenue_cargo: 1600,
        expense_fuel: 5200,
        expense_airport: 1800,
        expense_pilot: 2400,
        expense_maintenance: 900,
        submitted_at: test_now(),
        resolved_at: None,
        reviewed_by: None,
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.

use crate::Persistence;
use skyops_audit::{Action, Actor, ActorKind, AuditEvent, Cause, StateSnapshot};
use skyops_domain::{
    Aircraft, ApprovalStatus, Bid, FlightReport, FlightSpec, MaintenanceConfig, Pilot, Proof,
    Registration, StationCode, SubmissionChannel,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

pub fn actor() -> Actor {
    Actor::new(String::from("pilot-1"), ActorKind::Pilot)
}

pub fn cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("test request"))
}

pub fn audit_event(subject: &str) -> AuditEvent {
    AuditEvent::new(
        actor(),
        cause(),
        Action::new(String::from("TestAction"), None),
        subject.to_owned(),
        StateSnapshot::new(String::from("before")),
        StateSnapshot::new(String::from("after")),
    )
}

pub fn station(code: &str) -> StationCode {
    StationCode::new(code).unwrap()
}

/// Seeds a pilot at OLBA and returns their id.
pub fn seed_pilot(persistence: &mut Persistence, code: &str) -> i64 {
    let pilot = Pilot {
        pilot_id: None,
        pilot_code: code.to_owned(),
        name: format!("Pilot {code}"),
        credit_balance: 0,
        total_hours: 0.0,
        current_location: station("OLBA"),
        is_admin: false,
    };
    persistence.insert_pilot(&pilot).unwrap()
}

/// Seeds an Available B738 at OLBA and returns its id.
pub fn seed_aircraft(persistence: &mut Persistence, registration: &str) -> i64 {
    let aircraft = Aircraft::new(
        Registration::new(registration).unwrap(),
        String::from("B738"),
        station("OLBA"),
    );
    persistence.insert_aircraft(&aircraft).unwrap()
}

pub fn spec() -> FlightSpec {
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

/// Creates and persists an Active bid for the pilot; returns the bid.
pub fn seed_bid(persistence: &mut Persistence, pilot_id: i64) -> Bid {
    let config = MaintenanceConfig::default();
    let transition =
        skyops::create_bid(pilot_id, spec(), None, test_now(), &config, actor(), cause()).unwrap();
    let bid_id = persistence.persist_new_bid(&transition, test_now()).unwrap();
    let mut bid = transition.bid;
    bid.bid_id = Some(bid_id);
    bid
}

/// Builds a Pending report ready for persistence.
pub fn pending_report(
    pilot_id: i64,
    aircraft_id: Option<i64>,
    channel: SubmissionChannel,
    landing_rate: Option<i32>,
) -> FlightReport {
    FlightReport {
        report_id: None,
        session_id: None,
        bid_id: None,
        pilot_id,
        flight_number: String::from("LVT204"),
        callsign: String::from("LVT204"),
        departure: station("OLBA"),
        arrival: station("OJAI"),
        aircraft_type: String::from("B738"),
        aircraft_id,
        flight_time_minutes: 95,
        landing_rate,
        channel,
        proof: match channel {
            SubmissionChannel::Manual => {
                Some(Proof::Screenshot(String::from("uploads/pirep.png")))
            }
            SubmissionChannel::Automatic => None,
        },
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

/// Persists a Pending report and returns its id.
pub fn seed_report(persistence: &mut Persistence, report: &FlightReport) -> i64 {
    persistence
        .persist_report(report, &audit_event("report:new"), test_now())
        .unwrap()
}

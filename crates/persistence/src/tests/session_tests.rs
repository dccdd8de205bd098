// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session persistence tests: the start transaction, telemetry advance,
//! and abandonment release.

use super::helpers::{actor, cause, persistence, seed_aircraft, seed_bid, seed_pilot, test_now};
use crate::{Persistence, PersistenceError};
use skyops::SessionTransition;
use skyops_domain::{
    AircraftStatus, BidStatus, SessionPhase, TelemetrySample,
};

fn sample() -> TelemetrySample {
    TelemetrySample {
        latitude: 33.82,
        longitude: 35.49,
        phase: String::from("CLIMB"),
        landing_rate: None,
        recorded_at: test_now(),
    }
}

/// Seeds pilot + aircraft + bid and opens a session; returns
/// `(session_id, aircraft_id, bid_id)`.
fn open_session(persistence: &mut Persistence) -> (i64, i64, i64) {
    let pilot_id = seed_pilot(persistence, "LVT001");
    let aircraft_id = seed_aircraft(persistence, "OD-LVA");
    let bid = seed_bid(persistence, pilot_id);

    let consume = skyops::consume_bid(&bid, test_now(), actor(), cause()).unwrap();
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    let start = skyops::start_session(&consume.bid, &aircraft, test_now(), actor(), cause())
        .unwrap();
    let session_id = persistence
        .persist_session_start(&consume, &start, test_now())
        .unwrap();
    (session_id, aircraft_id, bid.bid_id.unwrap())
}

/// Loads the session and re-runs the core telemetry transition against it.
fn telemetry_transition(persistence: &mut Persistence, session_id: i64) -> SessionTransition {
    let session = persistence.get_session(session_id).unwrap();
    skyops::record_telemetry(
        &session,
        &sample(),
        test_now() + time::Duration::minutes(5),
        actor(),
        cause(),
    )
    .unwrap()
}

#[test]
fn test_session_start_consumes_bid_and_books_aircraft() {
    let mut persistence = persistence();
    let (session_id, aircraft_id, bid_id) = open_session(&mut persistence);

    let session = persistence.get_session(session_id).unwrap();
    assert_eq!(session.phase, SessionPhase::Booked);

    let bid = persistence.get_bid(bid_id).unwrap();
    assert_eq!(bid.status, BidStatus::Consumed);

    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.status, AircraftStatus::Booked);
}

#[test]
fn test_session_start_fails_when_bid_already_consumed() {
    let mut persistence = persistence();
    let pilot_id = seed_pilot(&mut persistence, "LVT001");
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");
    seed_aircraft(&mut persistence, "OD-LVB");
    let bid = seed_bid(&mut persistence, pilot_id);

    let consume = skyops::consume_bid(&bid, test_now(), actor(), cause()).unwrap();
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    let start =
        skyops::start_session(&consume.bid, &aircraft, test_now(), actor(), cause()).unwrap();
    persistence
        .persist_session_start(&consume, &start, test_now())
        .unwrap();

    // A second client racing on the same bid loses the consume CAS, and
    // the transaction leaves the second aircraft untouched.
    let second_aircraft = persistence.get_aircraft_by_registration("OD-LVB").unwrap();
    let second_start = skyops::start_session(
        &consume.bid,
        &second_aircraft,
        test_now(),
        actor(),
        cause(),
    )
    .unwrap();
    let result = persistence.persist_session_start(&consume, &second_start, test_now());

    assert!(matches!(result, Err(PersistenceError::InvalidState(_))));
    let untouched = persistence.get_aircraft_by_registration("OD-LVB").unwrap();
    assert_eq!(untouched.status, AircraftStatus::Available);
}

#[test]
fn test_first_telemetry_moves_session_and_aircraft_in_flight() {
    let mut persistence = persistence();
    let (session_id, aircraft_id, _) = open_session(&mut persistence);

    let transition = telemetry_transition(&mut persistence, session_id);
    persistence
        .persist_telemetry(&transition, true, test_now())
        .unwrap();

    let session = persistence.get_session(session_id).unwrap();
    assert_eq!(session.phase, SessionPhase::InFlight);

    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.status, AircraftStatus::InFlight);
}

#[test]
fn test_landing_completes_the_session() {
    let mut persistence = persistence();
    let (session_id, _, _) = open_session(&mut persistence);

    let first = telemetry_transition(&mut persistence, session_id);
    persistence.persist_telemetry(&first, true, test_now()).unwrap();

    let session = persistence.get_session(session_id).unwrap();
    let landing = skyops::complete_on_landing(
        &session,
        Some(-180),
        test_now() + time::Duration::minutes(95),
        actor(),
        cause(),
    )
    .unwrap();
    persistence.persist_landing(&landing, test_now()).unwrap();

    let completed = persistence.get_session(session_id).unwrap();
    assert_eq!(completed.phase, SessionPhase::Completed);
    assert_eq!(completed.landing_rate, Some(-180));
}

#[test]
fn test_abandonment_releases_the_aircraft_without_penalty() {
    let mut persistence = persistence();
    let (session_id, aircraft_id, _) = open_session(&mut persistence);

    let session = persistence.get_session(session_id).unwrap();
    let config = skyops_domain::MaintenanceConfig::default();
    let idle_at = test_now() + time::Duration::hours(2);
    let abandon =
        skyops::abandon_if_idle(&session, idle_at, &config, cause()).unwrap();
    persistence
        .persist_abandonment(&abandon, SessionPhase::Booked, idle_at)
        .unwrap();

    let stored = persistence.get_session(session_id).unwrap();
    assert_eq!(stored.phase, SessionPhase::Abandoned);

    // No penalty: full condition, zero hours, back in the pool.
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.status, AircraftStatus::Available);
    assert_eq!(aircraft.condition, 100.0);
    assert_eq!(aircraft.total_hours, 0.0);
}

#[test]
fn test_idle_listing_finds_silent_sessions() {
    let mut persistence = persistence();
    let (session_id, _, _) = open_session(&mut persistence);

    // Before the window elapses the session is not a candidate.
    let early = persistence
        .list_idle_sessions(test_now() - time::Duration::minutes(1))
        .unwrap();
    assert!(early.is_empty());

    let due = persistence.list_idle_sessions(test_now()).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].session_id, Some(session_id));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end lifecycle tests through the API boundary.

use super::helpers::{
    acars_report_request, bid_request, cause, manual_request, seed_aircraft, seed_pilot, setup,
    start_request, telemetry_request, test_now,
};
use crate::error::ApiError;
use crate::handlers::{
    cancel_bid, create_bid, get_current_bid, post_telemetry, reap_lifecycle, start_acars_session,
    submit_acars_report, submit_manual_pirep,
};

#[test]
fn test_full_automatic_pipeline_settles_a_soft_landing() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");

    // Bid OLBA -> OJAI in a B738.
    let created = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    assert_eq!(created.bid.status, "active");

    // The ACARS client opens the session and streams telemetry.
    let started = start_acars_session(
        &mut persistence,
        &config,
        &session,
        start_request(created.bid.bid_id),
        test_now(),
        cause(),
    )
    .unwrap();
    assert_eq!(started.registration, "OD-LVA");

    let telemetry = post_telemetry(
        &mut persistence,
        &session,
        telemetry_request(started.session_id),
        test_now() + time::Duration::minutes(5),
        cause(),
    )
    .unwrap();
    assert!(telemetry.accepted);

    // Landing at -180 fpm auto-approves and settles.
    let outcome = submit_acars_report(
        &mut persistence,
        &config,
        &session,
        acars_report_request(started.session_id, Some(-180)),
        test_now() + time::Duration::minutes(95),
        cause(),
    )
    .unwrap();

    assert_eq!(outcome.status, "approved");
    assert!(!outcome.is_duplicate);

    // Pilot balance moved by revenue - expense.
    let pilot = persistence.get_pilot(session.pilot_id).unwrap();
    assert_eq!(pilot.credit_balance, 16400 - 10300);
    assert_eq!(pilot.current_location.value(), "OJAI");

    // Aircraft wore by the standard per-flight decay and was released.
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.condition, 98.5);
    assert_eq!(aircraft.status.as_str(), "available");
    assert_eq!(aircraft.current_location.value(), "OJAI");
}

#[test]
fn test_hard_landing_is_rejected_without_ledger_effect() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");

    let created = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    let started = start_acars_session(
        &mut persistence,
        &config,
        &session,
        start_request(created.bid.bid_id),
        test_now(),
        cause(),
    )
    .unwrap();
    post_telemetry(
        &mut persistence,
        &session,
        telemetry_request(started.session_id),
        test_now() + time::Duration::minutes(5),
        cause(),
    )
    .unwrap();

    let outcome = submit_acars_report(
        &mut persistence,
        &config,
        &session,
        acars_report_request(started.session_id, Some(-900)),
        test_now() + time::Duration::minutes(95),
        cause(),
    )
    .unwrap();

    assert_eq!(outcome.status, "rejected");
    assert!(outcome.message.contains("-900"));

    // No ledger movement, but the aircraft comes back to the pool at the
    // arrival station.
    let pilot = persistence.get_pilot(session.pilot_id).unwrap();
    assert_eq!(pilot.credit_balance, 0);
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.condition, 100.0);
    assert_eq!(aircraft.status.as_str(), "available");
    assert_eq!(aircraft.current_location.value(), "OJAI");
}

#[test]
fn test_missing_landing_rate_holds_the_report() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);
    seed_aircraft(&mut persistence, "OD-LVA");

    let created = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    let started = start_acars_session(
        &mut persistence,
        &config,
        &session,
        start_request(created.bid.bid_id),
        test_now(),
        cause(),
    )
    .unwrap();
    post_telemetry(
        &mut persistence,
        &session,
        telemetry_request(started.session_id),
        test_now() + time::Duration::minutes(5),
        cause(),
    )
    .unwrap();

    let outcome = submit_acars_report(
        &mut persistence,
        &config,
        &session,
        acars_report_request(started.session_id, None),
        test_now() + time::Duration::minutes(95),
        cause(),
    )
    .unwrap();

    assert_eq!(outcome.status, "pending");
    assert!(outcome.message.contains("no usable landing rate"));
}

#[test]
fn test_second_bid_is_rejected_while_the_first_is_active() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();

    let err = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now() + time::Duration::hours(1),
        cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "single_active_bid"
    ));
}

#[test]
fn test_cancelled_bid_makes_room_for_a_new_one() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    let created = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    cancel_bid(
        &mut persistence,
        &session,
        created.bid.bid_id,
        test_now(),
        cause(),
    )
    .unwrap();

    let replacement = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    assert_ne!(replacement.bid.bid_id, created.bid.bid_id);
}

#[test]
fn test_expired_bid_cannot_start_a_session() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);
    seed_aircraft(&mut persistence, "OD-LVA");

    let created = create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();

    // At TTL + 1s the consume fails and surfaces the expiry.
    let late = test_now() + config.bid_ttl + time::Duration::seconds(1);
    let err = start_acars_session(
        &mut persistence,
        &config,
        &session,
        start_request(created.bid.bid_id),
        late,
        cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "bid_ttl"
    ));
}

#[test]
fn test_current_bid_reads_expired_after_ttl() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    create_bid(
        &mut persistence,
        &config,
        &session,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();

    let before = get_current_bid(&mut persistence, &session, test_now() + config.bid_ttl - time::Duration::seconds(1))
        .unwrap()
        .unwrap();
    assert_eq!(before.status, "active");

    let after = get_current_bid(&mut persistence, &session, test_now() + config.bid_ttl)
        .unwrap()
        .unwrap();
    assert_eq!(after.status, "expired");
}

#[test]
fn test_a388_manual_submission_is_a_fleet_violation() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    let mut request = manual_request();
    request.aircraft_type = String::from("A388");

    let err = submit_manual_pirep(
        &mut persistence,
        &config,
        &session,
        request,
        test_now(),
        cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "fleet_restriction"
    ));
}

#[test]
fn test_a388_bid_is_a_fleet_violation() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    let mut request = bid_request();
    request.aircraft_type = String::from("A388");

    let err = create_bid(
        &mut persistence,
        &config,
        &session,
        request,
        test_now(),
        cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "fleet_restriction"
    ));
}

#[test]
fn test_manual_submission_is_held_even_with_an_approvable_landing() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    // -100 fpm would auto-approve on the automatic channel.
    let outcome = submit_manual_pirep(
        &mut persistence,
        &config,
        &session,
        manual_request(),
        test_now(),
        cause(),
    )
    .unwrap();

    assert_eq!(outcome.status, "pending");
    assert!(!outcome.is_duplicate);
    assert!(outcome.message.contains("staff will review"));

    // The generated flight number carries the manual prefix.
    let report = persistence.get_report(outcome.report_id).unwrap();
    assert!(report.flight_number.starts_with("MAN-"));
    assert_eq!(report.callsign, "LVT001");
}

#[test]
fn test_same_day_manual_resubmission_is_flagged_duplicate() {
    let (mut persistence, config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    let first = submit_manual_pirep(
        &mut persistence,
        &config,
        &session,
        manual_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    assert!(!first.is_duplicate);

    let second = submit_manual_pirep(
        &mut persistence,
        &config,
        &session,
        manual_request(),
        test_now() + time::Duration::hours(2),
        cause(),
    )
    .unwrap();

    // Accepted, flagged, and still Pending: duplicates never block.
    assert!(second.is_duplicate);
    assert_eq!(second.status, "pending");
    assert!(second.message.contains("already logged today"));
}

#[test]
fn test_telemetry_for_unknown_session_is_dropped() {
    let (mut persistence, _config) = setup();
    let session = seed_pilot(&mut persistence, "LVT001", false);

    let response = post_telemetry(
        &mut persistence,
        &session,
        telemetry_request(999),
        test_now(),
        cause(),
    )
    .unwrap();

    assert!(!response.accepted);
    assert!(response.reason.unwrap().contains("unknown"));
}

#[test]
fn test_sweep_expires_bids_and_abandons_idle_sessions() {
    let (mut persistence, config) = setup();
    let pilot_a = seed_pilot(&mut persistence, "LVT001", false);
    let pilot_b = seed_pilot(&mut persistence, "LVT002", false);
    seed_aircraft(&mut persistence, "OD-LVA");

    // Pilot A books and starts flying, then goes silent.
    let bid_a = create_bid(
        &mut persistence,
        &config,
        &pilot_a,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();
    start_acars_session(
        &mut persistence,
        &config,
        &pilot_a,
        start_request(bid_a.bid.bid_id),
        test_now(),
        cause(),
    )
    .unwrap();

    // Pilot B only bids.
    create_bid(
        &mut persistence,
        &config,
        &pilot_b,
        bid_request(),
        test_now(),
        cause(),
    )
    .unwrap();

    let sweep_at = test_now() + config.bid_ttl + time::Duration::seconds(1);
    let response = reap_lifecycle(&mut persistence, &config, sweep_at).unwrap();

    // Pilot B's untouched bid expires; pilot A's consumed bid does not.
    assert_eq!(response.bids_expired, 1);
    assert_eq!(response.sessions_abandoned, 1);

    // The abandoned session released its aircraft without penalty.
    let aircraft = persistence.get_aircraft_by_registration("OD-LVA").unwrap();
    assert_eq!(aircraft.status.as_str(), "available");
    assert_eq!(aircraft.condition, 100.0);
}

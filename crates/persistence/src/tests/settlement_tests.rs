// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Settlement tests: the single-transaction guarantee, the grounding
//! invariant, and the ledger arithmetic.

use super::helpers::{
    actor, cause, pending_report, persistence, seed_aircraft, seed_pilot, seed_report, test_now,
};
use crate::PersistenceError;
use skyops_domain::{AircraftStatus, ApprovalStatus, MaintenanceConfig, SubmissionChannel};

const INITIAL_VAULT: i64 = 250_000;

#[test]
fn test_settlement_applies_every_ledger_effect() {
    let mut persistence = persistence();
    let config = MaintenanceConfig::default();
    let pilot_id = seed_pilot(&mut persistence, "LVT001");
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");
    let report = pending_report(
        pilot_id,
        Some(aircraft_id),
        SubmissionChannel::Automatic,
        Some(-180),
    );
    let report_id = seed_report(&mut persistence, &report);

    let outcome = persistence
        .settle_report(
            report_id,
            "Auto-approved: landing rate -180 fpm within limits",
            None,
            &config,
            &actor(),
            &cause(),
            test_now(),
        )
        .unwrap();

    // Report is terminal.
    assert_eq!(outcome.report.status, ApprovalStatus::Approved);
    assert!(outcome.report.resolved_at.is_some());

    // Net profit = (14800 + 1600) - (5200 + 1800 + 2400 + 900).
    assert_eq!(outcome.settlement.net_profit, 6100);

    // Pilot credited with balance and hours, moved to the arrival.
    let pilot = persistence.get_pilot(pilot_id).unwrap();
    assert_eq!(pilot.credit_balance, 6100);
    assert_eq!(pilot.total_hours, 95.0 / 60.0);
    assert_eq!(pilot.current_location.value(), "OJAI");

    // Aircraft wears by the baseline decay, flies to the arrival, and is
    // released back to the bookable pool.
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.condition, 98.5);
    assert_eq!(aircraft.status, AircraftStatus::Available);
    assert_eq!(aircraft.current_location.value(), "OJAI");
    assert_eq!(aircraft.flight_count, 1);
    assert_eq!(aircraft.condition_version, 1);

    // Vault credited by the same net profit.
    assert_eq!(outcome.vault_balance, INITIAL_VAULT + 6100);
}

#[test]
fn test_settlement_is_atomic_when_the_pilot_side_fails() {
    let mut persistence = persistence();
    let config = MaintenanceConfig::default();
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");

    // No pilot row exists for this id: the balance update inside the
    // transaction must fail and roll everything back.
    let report = pending_report(
        999,
        Some(aircraft_id),
        SubmissionChannel::Automatic,
        Some(-180),
    );
    let report_id = seed_report(&mut persistence, &report);

    let result = persistence.settle_report(
        report_id,
        "approved",
        None,
        &config,
        &actor(),
        &cause(),
        test_now(),
    );
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));

    // Neither side effect applied: the report is still Pending and the
    // aircraft condition and vault are untouched.
    let stored = persistence.get_report(report_id).unwrap();
    assert_eq!(stored.status, ApprovalStatus::Pending);

    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.condition, 100.0);
    assert_eq!(aircraft.condition_version, 0);
    assert_eq!(aircraft.flight_count, 0);

    assert_eq!(persistence.vault_balance().unwrap(), INITIAL_VAULT);
}

#[test]
fn test_settlement_grounds_an_aircraft_below_threshold() {
    let mut persistence = persistence();
    let config = MaintenanceConfig::default();
    let pilot_id = seed_pilot(&mut persistence, "LVT001");
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");

    // Wear the airframe down to just above the threshold, then settle a
    // hard landing that pushes it under.
    let worn = persistence
        .apply_condition_delta(
            "OD-LVA",
            -79.0,
            &config,
            &super::helpers::audit_event("aircraft:OD-LVA"),
            test_now(),
        )
        .unwrap();
    assert_eq!(worn.condition, 21.0);
    assert_eq!(worn.status, AircraftStatus::Available);

    let report = pending_report(
        pilot_id,
        Some(aircraft_id),
        SubmissionChannel::Automatic,
        Some(-600),
    );
    let report_id = seed_report(&mut persistence, &report);

    let outcome = persistence
        .settle_report(
            report_id,
            "approved",
            None,
            &config,
            &actor(),
            &cause(),
            test_now(),
        )
        .unwrap();

    assert!(outcome.aircraft_grounded);

    // Grounding invariant: status is Grounded exactly because condition
    // fell below the threshold.
    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert!(aircraft.condition < config.grounded_threshold);
    assert_eq!(aircraft.status, AircraftStatus::Grounded);
    assert!(aircraft.grounded_reason.is_some());
}

#[test]
fn test_settling_twice_fails_the_second_time() {
    let mut persistence = persistence();
    let config = MaintenanceConfig::default();
    let pilot_id = seed_pilot(&mut persistence, "LVT001");
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");
    let report = pending_report(
        pilot_id,
        Some(aircraft_id),
        SubmissionChannel::Automatic,
        Some(-180),
    );
    let report_id = seed_report(&mut persistence, &report);

    persistence
        .settle_report(
            report_id,
            "approved",
            None,
            &config,
            &actor(),
            &cause(),
            test_now(),
        )
        .unwrap();

    let second = persistence.settle_report(
        report_id,
        "approved",
        None,
        &config,
        &actor(),
        &cause(),
        test_now(),
    );
    assert!(matches!(second, Err(PersistenceError::InvalidState(_))));

    // The ledger moved exactly once.
    let pilot = persistence.get_pilot(pilot_id).unwrap();
    assert_eq!(pilot.credit_balance, 6100);
    assert_eq!(persistence.vault_balance().unwrap(), INITIAL_VAULT + 6100);
}

#[test]
fn test_rejection_has_no_ledger_effect() {
    let mut persistence = persistence();
    let pilot_id = seed_pilot(&mut persistence, "LVT001");
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");
    let report = pending_report(
        pilot_id,
        Some(aircraft_id),
        SubmissionChannel::Automatic,
        Some(-900),
    );
    let report_id = seed_report(&mut persistence, &report);

    let rejected = persistence
        .reject_report(
            report_id,
            "Auto-rejected: landing rate -900 fpm at or below the -700 fpm threshold",
            None,
            &super::helpers::audit_event("report:rejected"),
            test_now(),
        )
        .unwrap();

    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    assert!(rejected.status_reason.unwrap().contains("-900"));

    let pilot = persistence.get_pilot(pilot_id).unwrap();
    assert_eq!(pilot.credit_balance, 0);
    assert_eq!(pilot.total_hours, 0.0);

    let aircraft = persistence.get_aircraft(aircraft_id).unwrap();
    assert_eq!(aircraft.condition, 100.0);
    assert_eq!(aircraft.flight_count, 0);

    assert_eq!(persistence.vault_balance().unwrap(), INITIAL_VAULT);
}

#[test]
fn test_settlement_audit_event_is_written() {
    let mut persistence = persistence();
    let config = MaintenanceConfig::default();
    let pilot_id = seed_pilot(&mut persistence, "LVT001");
    let aircraft_id = seed_aircraft(&mut persistence, "OD-LVA");
    let report = pending_report(
        pilot_id,
        Some(aircraft_id),
        SubmissionChannel::Automatic,
        Some(-180),
    );
    let report_id = seed_report(&mut persistence, &report);

    persistence
        .settle_report(
            report_id,
            "approved",
            None,
            &config,
            &actor(),
            &cause(),
            test_now(),
        )
        .unwrap();

    let timeline = persistence
        .get_audit_timeline(&format!("report:{report_id}"))
        .unwrap();
    assert!(
        timeline
            .iter()
            .any(|event| event.action.name == "SettleReport")
    );
}

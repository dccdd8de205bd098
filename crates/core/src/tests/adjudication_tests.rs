// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Adjudication engine tests: grading boundary, channel override,
//! structural validation.

use super::helpers::test_report;
use crate::{AdjudicationOutcome, CoreError, adjudicate, grade_landing};
use skyops_domain::{DomainError, MaintenanceConfig, Proof, SubmissionChannel};

#[test]
fn test_grading_boundary_is_inclusive() {
    let config = MaintenanceConfig::default();

    assert_eq!(
        grade_landing(Some(-699), &config),
        AdjudicationOutcome::Approved
    );
    assert_eq!(
        grade_landing(Some(-700), &config),
        AdjudicationOutcome::Rejected
    );
    assert_eq!(
        grade_landing(Some(-701), &config),
        AdjudicationOutcome::Rejected
    );
}

#[test]
fn test_missing_landing_rate_is_held() {
    let config = MaintenanceConfig::default();
    assert_eq!(grade_landing(None, &config), AdjudicationOutcome::Held);
}

#[test]
fn test_zero_landing_rate_is_ambiguous_and_held() {
    let config = MaintenanceConfig::default();
    assert_eq!(grade_landing(Some(0), &config), AdjudicationOutcome::Held);
}

#[test]
fn test_soft_landing_auto_approves_on_automatic_channel() {
    let config = MaintenanceConfig::default();
    let report = test_report(SubmissionChannel::Automatic, Some(-180));

    let result = adjudicate(&report, false, &config).unwrap();

    assert_eq!(result.outcome, AdjudicationOutcome::Approved);
    assert!(!result.is_duplicate);
    assert!(result.reason.contains("-180"));
}

#[test]
fn test_hard_landing_auto_rejects_with_reason() {
    let config = MaintenanceConfig::default();
    let report = test_report(SubmissionChannel::Automatic, Some(-900));

    let result = adjudicate(&report, false, &config).unwrap();

    assert_eq!(result.outcome, AdjudicationOutcome::Rejected);
    assert!(result.reason.contains("-900"));
    assert!(result.reason.contains("-700"));
}

#[test]
fn test_manual_channel_overrides_an_approvable_grade() {
    let config = MaintenanceConfig::default();
    let mut report = test_report(SubmissionChannel::Manual, Some(-100));
    report.proof = Some(Proof::Screenshot(String::from("uploads/pirep-42.png")));

    let result = adjudicate(&report, false, &config).unwrap();

    // -100 fpm would auto-approve, but manual submissions always wait
    // for a human decision.
    assert_eq!(result.outcome, AdjudicationOutcome::Held);
}

#[test]
fn test_manual_duplicate_is_flagged_not_blocked() {
    let config = MaintenanceConfig::default();
    let mut report = test_report(SubmissionChannel::Manual, Some(-250));
    report.proof = Some(Proof::TrackerLink(String::from(
        "https://tracker.ivao.aero/flight/991",
    )));

    let result = adjudicate(&report, true, &config).unwrap();

    assert_eq!(result.outcome, AdjudicationOutcome::Held);
    assert!(result.is_duplicate);
    assert!(result.reason.contains("already logged today"));
}

#[test]
fn test_duplicate_flag_does_not_affect_automatic_grading() {
    let config = MaintenanceConfig::default();
    let report = test_report(SubmissionChannel::Automatic, Some(-180));

    let result = adjudicate(&report, true, &config).unwrap();

    assert_eq!(result.outcome, AdjudicationOutcome::Approved);
    assert!(result.is_duplicate);
}

#[test]
fn test_manual_submission_without_proof_is_rejected() {
    let config = MaintenanceConfig::default();
    let report = test_report(SubmissionChannel::Manual, Some(-200));

    let err = adjudicate(&report, false, &config).unwrap_err();

    assert_eq!(err, CoreError::DomainViolation(DomainError::MissingProof));
}

#[test]
fn test_manual_tracker_link_must_match_allow_list() {
    let config = MaintenanceConfig::default();
    let mut report = test_report(SubmissionChannel::Manual, Some(-200));
    report.proof = Some(Proof::TrackerLink(String::from(
        "https://example.com/flight/1",
    )));

    let err = adjudicate(&report, false, &config).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidTrackerLink { .. })
    ));
}

#[test]
fn test_restricted_type_rejected_on_every_channel() {
    let config = MaintenanceConfig::default();

    for channel in [SubmissionChannel::Automatic, SubmissionChannel::Manual] {
        let mut report = test_report(channel, Some(-150));
        report.aircraft_type = String::from("A388");
        report.proof = Some(Proof::Screenshot(String::from("uploads/a388.png")));

        let err = adjudicate(&report, false, &config).unwrap_err();
        assert!(
            matches!(
                err,
                CoreError::DomainViolation(DomainError::FleetViolation { .. })
            ),
            "expected FleetViolation on {channel:?}"
        );
    }
}

#[test]
fn test_invalid_flight_time_fails_structural_validation() {
    let config = MaintenanceConfig::default();
    let mut report = test_report(SubmissionChannel::Automatic, Some(-150));
    report.flight_time_minutes = 0;

    let err = adjudicate(&report, false, &config).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidFlightTime { minutes: 0 })
    ));
}

#[test]
fn test_custom_threshold_moves_the_boundary() {
    let config = MaintenanceConfig {
        auto_reject_landing_rate: -500,
        ..MaintenanceConfig::default()
    };

    assert_eq!(
        grade_landing(Some(-499), &config),
        AdjudicationOutcome::Approved
    );
    assert_eq!(
        grade_landing(Some(-500), &config),
        AdjudicationOutcome::Rejected
    );
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Proof-policy tests for manual submissions.

use super::helpers::{cause, manual_request, seed_pilot, setup, test_now};
use crate::error::ApiError;
use crate::handlers::submit_manual_pirep;
use crate::proof_policy::{ProofPolicyError, resolve_proof};
use skyops_domain::Proof;

#[test]
fn test_tracker_link_alone_is_accepted() {
    let proof = resolve_proof(Some("https://tracker.ivao.aero/flight/991"), None).unwrap();
    assert_eq!(
        proof,
        Proof::TrackerLink(String::from("https://tracker.ivao.aero/flight/991"))
    );
}

#[test]
fn test_screenshot_alone_is_accepted() {
    let proof = resolve_proof(None, Some("uploads/pirep-42.png")).unwrap();
    assert_eq!(proof, Proof::Screenshot(String::from("uploads/pirep-42.png")));
}

#[test]
fn test_no_artifact_is_missing() {
    assert_eq!(resolve_proof(None, None), Err(ProofPolicyError::Missing));
    // Whitespace-only fields count as absent.
    assert_eq!(resolve_proof(Some("  "), Some("")), Err(ProofPolicyError::Missing));
}

#[test]
fn test_both_artifacts_are_ambiguous() {
    assert_eq!(
        resolve_proof(
            Some("https://tracker.ivao.aero/flight/991"),
            Some("uploads/pirep-42.png"),
        ),
        Err(ProofPolicyError::Ambiguous)
    );
}

#[test]
fn test_foreign_tracker_domain_is_rejected() {
    assert_eq!(
        resolve_proof(Some("https://example.com/flight/991"), None),
        Err(ProofPolicyError::BadTrackerLink)
    );
}

#[test]
fn test_manual_submission_without_proof_is_rejected_with_a_reason() {
    let (mut persistence, config) = setup();
    let pilot = seed_pilot(&mut persistence, "LVT001", false);

    let mut request = manual_request();
    request.tracker_link = None;
    request.proof_image = None;

    let err = submit_manual_pirep(
        &mut persistence,
        &config,
        &pilot,
        request,
        test_now(),
        cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, ref message }
            if field == "proof" && message.contains("tracker link or a screenshot")
    ));
}

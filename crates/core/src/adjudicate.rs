// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The adjudication engine.
//!
//! Classifies a submitted report: structural validation, duplicate
//! surfacing, landing-rate grading, and the manual-channel override.
//! Adjudication never touches the ledger; an Approved outcome is the
//! signal for the caller to run settlement.

use crate::error::CoreError;
use skyops_domain::{
    ApprovalStatus, DomainError, FlightReport, MaintenanceConfig, Proof, SubmissionChannel,
    is_restricted_aircraft_type, validate_aircraft_type, validate_flight_time,
    validate_tracker_link,
};

/// The decision produced for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjudicationOutcome {
    /// Auto-approved; settlement must follow.
    Approved,
    /// Auto-rejected; terminal status only, no ledger effect.
    Rejected,
    /// Held Pending for human review.
    Held,
}

impl AdjudicationOutcome {
    /// The approval status this outcome resolves to.
    #[must_use]
    pub const fn status(&self) -> ApprovalStatus {
        match self {
            Self::Approved => ApprovalStatus::Approved,
            Self::Rejected => ApprovalStatus::Rejected,
            Self::Held => ApprovalStatus::Pending,
        }
    }
}

/// The full adjudication verdict for a report.
///
/// Every verdict carries a human-readable reason; silent decisions are
/// disallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjudicationResult {
    /// The decision.
    pub outcome: AdjudicationOutcome,
    /// Human-readable cause for the decision.
    pub reason: String,
    /// Whether another Approved/Pending report exists for the same pilot
    /// and route on the same airline-local calendar day. Informational for
    /// reviewers; never affects grading.
    pub is_duplicate: bool,
}

/// Grades a landing rate against the auto-reject threshold.
///
/// The boundary is inclusive: a landing exactly at the threshold rejects.
/// An absent rate, or a literal `0` (indistinguishable from a missing
/// sensor), holds the report for human review instead of auto-deciding.
///
/// # Arguments
///
/// * `landing_rate` - The touchdown rate in fpm, if present
/// * `config` - Supplies the auto-reject threshold
#[must_use]
pub fn grade_landing(landing_rate: Option<i32>, config: &MaintenanceConfig) -> AdjudicationOutcome {
    match landing_rate {
        None | Some(0) => AdjudicationOutcome::Held,
        Some(rate) if rate <= config.auto_reject_landing_rate => AdjudicationOutcome::Rejected,
        Some(_) => AdjudicationOutcome::Approved,
    }
}

/// Validates report structure before grading.
///
/// # Errors
///
/// Returns an error if:
/// - The aircraft type is malformed, or restricted on any channel
///   (`FleetViolation`)
/// - The flight time is out of range
/// - A manual submission carries no proof (`MissingProof`) or a tracker
///   link outside the allow-listed domain
fn validate_structure(report: &FlightReport) -> Result<(), CoreError> {
    validate_aircraft_type(&report.aircraft_type)?;

    if is_restricted_aircraft_type(&report.aircraft_type) {
        return Err(CoreError::DomainViolation(DomainError::FleetViolation {
            aircraft_type: report.aircraft_type.clone(),
        }));
    }

    validate_flight_time(report.flight_time_minutes)?;

    if report.channel == SubmissionChannel::Manual {
        match &report.proof {
            None => {
                return Err(CoreError::DomainViolation(DomainError::MissingProof));
            }
            Some(Proof::TrackerLink(url)) => validate_tracker_link(url)?,
            Some(Proof::Screenshot(_)) => {}
        }
    }

    Ok(())
}

/// Adjudicates a submitted report.
///
/// # Arguments
///
/// * `report` - The submitted report
/// * `is_duplicate` - Whether duplicate detection matched (computed by the
///   caller against stored reports)
/// * `config` - The maintenance configuration
///
/// # Returns
///
/// The verdict: Approved/Rejected for automatic submissions with landing
/// data, Held for missing data and for every manual submission.
///
/// # Errors
///
/// Returns an error when structural validation fails; no verdict is
/// produced and nothing should be stored beyond the rejection reason.
pub fn adjudicate(
    report: &FlightReport,
    is_duplicate: bool,
    config: &MaintenanceConfig,
) -> Result<AdjudicationResult, CoreError> {
    validate_structure(report)?;

    let graded = grade_landing(report.landing_rate, config);

    // Manual submissions always wait for an explicit human decision,
    // whatever the grade says.
    if report.channel == SubmissionChannel::Manual {
        let reason = if is_duplicate {
            String::from(
                "Manual PIREP submitted. WARNING: a flight on this route was already logged today; staff will review for duplicates",
            )
        } else {
            String::from("Manual PIREP submitted; staff will review your submission")
        };
        return Ok(AdjudicationResult {
            outcome: AdjudicationOutcome::Held,
            reason,
            is_duplicate,
        });
    }

    let reason = match graded {
        AdjudicationOutcome::Approved => match report.landing_rate {
            Some(rate) => format!("Auto-approved: landing rate {rate} fpm within limits"),
            None => String::from("Auto-approved"),
        },
        AdjudicationOutcome::Rejected => format!(
            "Auto-rejected: landing rate {} fpm at or below the {} fpm threshold",
            report.landing_rate.unwrap_or_default(),
            config.auto_reject_landing_rate
        ),
        AdjudicationOutcome::Held => {
            String::from("Held for review: no usable landing rate data")
        }
    };

    Ok(AdjudicationResult {
        outcome: graded,
        reason,
        is_duplicate,
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Proof-artifact policy for manual submissions.
//!
//! A manual PIREP must carry exactly one proof artifact: a link into the
//! allow-listed tracker, or the reference returned by the screenshot upload
//! service. The storage mechanism behind the reference is external; only
//! presence and format are checked here.

use skyops_domain::{Proof, validate_tracker_link};
use thiserror::Error;

/// Proof policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofPolicyError {
    /// No artifact was supplied.
    #[error("You must provide either a tracker link or a screenshot for manual submission")]
    Missing,

    /// Both artifacts were supplied.
    #[error("Provide exactly one proof artifact: a tracker link or a screenshot, not both")]
    Ambiguous,

    /// The tracker link does not match the allow-listed domain.
    #[error(
        "Tracker link must be a valid tracker.ivao.aero URL (e.g. https://tracker.ivao.aero/...)"
    )]
    BadTrackerLink,

    /// The screenshot reference is empty.
    #[error("The screenshot reference is empty")]
    EmptyScreenshot,
}

/// Resolves request fields into a single proof artifact.
///
/// # Arguments
///
/// * `tracker_link` - The tracker URL field, if supplied
/// * `proof_image` - The upload reference field, if supplied
///
/// # Errors
///
/// Returns an error if zero or two artifacts are supplied, or if the
/// supplied artifact is malformed.
pub fn resolve_proof(
    tracker_link: Option<&str>,
    proof_image: Option<&str>,
) -> Result<Proof, ProofPolicyError> {
    let tracker_link = tracker_link.map(str::trim).filter(|s| !s.is_empty());
    let proof_image = proof_image.map(str::trim).filter(|s| !s.is_empty());

    match (tracker_link, proof_image) {
        (None, None) => Err(ProofPolicyError::Missing),
        (Some(_), Some(_)) => Err(ProofPolicyError::Ambiguous),
        (Some(url), None) => {
            validate_tracker_link(url).map_err(|_| ProofPolicyError::BadTrackerLink)?;
            Ok(Proof::TrackerLink(url.to_owned()))
        }
        (None, Some(image)) => Ok(Proof::Screenshot(image.to_owned())),
    }
}

impl From<ProofPolicyError> for crate::error::ApiError {
    fn from(err: ProofPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("proof"),
            message: err.to_string(),
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field and fleet-rule validation.

use crate::error::DomainError;
use regex::Regex;
use std::sync::LazyLock;

/// Accepted tracker URLs for manual-submission proof links.
static TRACKER_LINK: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"(?i)^https?://tracker\.ivao\.aero/.+") {
        Ok(pattern) => pattern,
        Err(e) => unreachable!("tracker pattern is a checked literal: {e}"),
    });

/// Aircraft types excluded from airline operations because they are
/// VFR/general-aviation equipment.
const VFR_EXCLUDED_TYPES: &[&str] = &["C150", "C152", "C172", "C182", "P28A", "DA40", "DR40"];

/// Validates an ICAO aircraft type code: 2-4 ASCII alphanumeric characters.
///
/// # Arguments
///
/// * `code` - The type code to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidAircraftType` if the code is malformed.
pub fn validate_aircraft_type(code: &str) -> Result<(), DomainError> {
    let trimmed = code.trim();
    if (2..=4).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(DomainError::InvalidAircraftType(code.to_owned()))
    }
}

/// Validates a block time in minutes.
///
/// Anything non-positive or past 20 hours is rejected; the longest
/// scheduled flights in the world stay under that.
///
/// # Arguments
///
/// * `minutes` - The flight time to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidFlightTime` if the value is out of range.
pub const fn validate_flight_time(minutes: i32) -> Result<(), DomainError> {
    if minutes > 0 && minutes <= 20 * 60 {
        Ok(())
    } else {
        Err(DomainError::InvalidFlightTime { minutes })
    }
}

/// Validates a proof tracker link against the allow-listed tracker domain.
///
/// # Arguments
///
/// * `url` - The URL to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidTrackerLink` if the URL does not match.
pub fn validate_tracker_link(url: &str) -> Result<(), DomainError> {
    if TRACKER_LINK.is_match(url.trim()) {
        Ok(())
    } else {
        Err(DomainError::InvalidTrackerLink {
            url: url.to_owned(),
        })
    }
}

/// Returns true for the restricted wide-body family barred from operations.
///
/// The match is deliberately fuzzy: `A380`, `A388`, `A-380`, `Airbus 380`
/// and similar spellings all count.
///
/// # Arguments
///
/// * `aircraft_type` - The aircraft type string to check
#[must_use]
pub fn is_restricted_aircraft_type(aircraft_type: &str) -> bool {
    let normalized: String = aircraft_type
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_uppercase();
    normalized.contains("A380") || normalized.contains("A388") || normalized.contains("380")
}

/// Returns true for types in the VFR exclusion set.
///
/// # Arguments
///
/// * `aircraft_type` - The aircraft type string to check
#[must_use]
pub fn is_vfr_excluded_type(aircraft_type: &str) -> bool {
    let normalized = aircraft_type.trim().to_uppercase();
    VFR_EXCLUDED_TYPES.contains(&normalized.as_str())
}

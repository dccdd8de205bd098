// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use skyops::CoreError;
use skyops_domain::DomainError;
use skyops_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Every variant carries a human-readable message; rejections are
/// never silent.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The session lacks authority for the attempted action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation lost a concurrency race; the caller may retry once.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The vault cannot cover the requested operation.
    InsufficientFunds {
        /// A human-readable description of the shortfall.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { action } => {
                write!(f, "Unauthorized: '{action}' requires staff authority")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InsufficientFunds { message } => {
                write!(f, "Insufficient funds: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit; domain errors never leak raw.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStationCode(code) => ApiError::InvalidInput {
            field: String::from("station"),
            message: format!("'{code}' is not a 4-character ICAO station code"),
        },
        DomainError::InvalidAircraftType(code) => ApiError::InvalidInput {
            field: String::from("aircraft_type"),
            message: format!("'{code}' is not a 2-4 character ICAO type code"),
        },
        DomainError::InvalidRegistration(reg) => ApiError::InvalidInput {
            field: String::from("registration"),
            message: format!("'{reg}' is not a valid registration"),
        },
        DomainError::InvalidFlightTime { minutes } => ApiError::InvalidInput {
            field: String::from("flight_time"),
            message: format!("{minutes} minutes is not a valid flight time"),
        },
        DomainError::FleetViolation { aircraft_type } => ApiError::DomainRuleViolation {
            rule: String::from("fleet_restriction"),
            message: format!(
                "Fleet Violation: aircraft type '{aircraft_type}' is not permitted for airline operations"
            ),
        },
        DomainError::DuplicateBid { pilot_id } => ApiError::DomainRuleViolation {
            rule: String::from("single_active_bid"),
            message: format!(
                "Pilot {pilot_id} already holds an active bid; cancel it before booking another flight"
            ),
        },
        DomainError::BidNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Bid"),
            message: format!("Bid {id} does not exist"),
        },
        DomainError::BidExpired { bid_id } => ApiError::DomainRuleViolation {
            rule: String::from("bid_ttl"),
            message: format!("Bid {bid_id} has expired; create a new bid to fly this route"),
        },
        DomainError::BidAlreadyConsumed { bid_id } => ApiError::DomainRuleViolation {
            rule: String::from("bid_consumed"),
            message: format!("Bid {bid_id} was already consumed by a flight session"),
        },
        DomainError::InvalidBidTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("bid_lifecycle"),
            message: format!("A bid cannot move from {from} to {to}"),
        },
        DomainError::InvalidSessionTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("session_lifecycle"),
            message: format!("A flight session cannot move from {from} to {to}"),
        },
        DomainError::SessionNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Flight session"),
            message: format!("Session {id} does not exist"),
        },
        DomainError::InvalidReportTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("report_lifecycle"),
            message: format!("A report cannot move from {from} to {to}"),
        },
        DomainError::ReportNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: format!("Report {id} does not exist"),
        },
        DomainError::MissingProof => ApiError::InvalidInput {
            field: String::from("proof"),
            message: String::from(
                "You must provide either a tracker link or a screenshot for manual submission",
            ),
        },
        DomainError::AmbiguousProof => ApiError::InvalidInput {
            field: String::from("proof"),
            message: String::from(
                "Provide exactly one proof artifact: a tracker link or a screenshot, not both",
            ),
        },
        DomainError::InvalidTrackerLink { url } => ApiError::InvalidInput {
            field: String::from("tracker_link"),
            message: format!(
                "'{url}' is not a valid tracker URL; it must point at https://tracker.ivao.aero/..."
            ),
        },
        DomainError::AircraftNotFound { registration } => ApiError::ResourceNotFound {
            resource_type: String::from("Aircraft"),
            message: format!("Aircraft '{registration}' does not exist"),
        },
        DomainError::DuplicateRegistration { registration } => ApiError::DomainRuleViolation {
            rule: String::from("unique_registration"),
            message: format!("Aircraft with registration '{registration}' already exists"),
        },
        DomainError::PilotNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Pilot"),
            message: format!("Pilot {id} does not exist"),
        },
        DomainError::NoAircraftAvailable {
            station,
            aircraft_type,
        } => ApiError::ResourceNotFound {
            resource_type: String::from("Aircraft"),
            message: format!("No {aircraft_type} aircraft is available at {station}"),
        },
        DomainError::InvalidAircraftTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("aircraft_lifecycle"),
            message: format!("An aircraft cannot move from {from} to {to}"),
        },
        DomainError::InvalidCondition { value } => ApiError::InvalidInput {
            field: String::from("condition"),
            message: format!("Condition {value} is outside the valid range 0-100"),
        },
        DomainError::InvalidRepairTier(tier) => ApiError::InvalidInput {
            field: String::from("repair_type"),
            message: format!("'{tier}' is not a repair tier; use MINIMUM or FULL"),
        },
        DomainError::InsufficientFunds {
            required,
            available,
        } => ApiError::InsufficientFunds {
            message: format!(
                "The repair costs {required} credits but the vault holds {available}"
            ),
        },
        DomainError::ConcurrentModification { entity } => ApiError::Conflict {
            message: format!("{entity} was modified concurrently; retry the operation"),
        },
        DomainError::InvalidAircraftStatus(s)
        | DomainError::InvalidBidStatus(s)
        | DomainError::InvalidApprovalStatus(s)
        | DomainError::InvalidSessionPhase(s)
        | DomainError::InvalidChannel(s) => ApiError::Internal {
            message: format!("Stored status '{s}' failed to parse"),
        },
        DomainError::InvalidConfigValue { name, value } => ApiError::InvalidInput {
            field: name,
            message: format!("'{value}' failed to parse"),
        },
        DomainError::InvalidTimezone(tz) => ApiError::InvalidInput {
            field: String::from("airline_timezone"),
            message: format!("'{tz}' is not a known IANA timezone"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::Internal {
            message: format!("Date arithmetic overflow while {operation}"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::ConstraintViolation(message) | PersistenceError::InvalidState(message) => {
            ApiError::Conflict { message }
        }
        PersistenceError::ConcurrentModification { entity } => ApiError::Conflict {
            message: format!("{entity} was modified concurrently; retry the operation"),
        },
        PersistenceError::InsufficientFunds {
            required,
            available,
        } => ApiError::InsufficientFunds {
            message: format!(
                "The repair costs {required} credits but the vault holds {available}"
            ),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

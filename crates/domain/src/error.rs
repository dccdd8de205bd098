// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A station code is not a well-formed ICAO identifier.
    InvalidStationCode(String),
    /// An aircraft type code is malformed.
    InvalidAircraftType(String),
    /// An aircraft registration is malformed.
    InvalidRegistration(String),
    /// Flight time is missing or out of range.
    InvalidFlightTime {
        /// The rejected flight time in minutes.
        minutes: i32,
    },
    /// The aircraft type is not permitted for airline operations.
    FleetViolation {
        /// The offending aircraft type.
        aircraft_type: String,
    },
    /// The pilot already holds a non-terminal bid.
    DuplicateBid {
        /// The pilot holding the existing bid.
        pilot_id: i64,
    },
    /// Bid does not exist.
    BidNotFound(i64),
    /// The bid's TTL has elapsed.
    BidExpired {
        /// The expired bid.
        bid_id: i64,
    },
    /// The bid was already consumed by a flight session.
    BidAlreadyConsumed {
        /// The consumed bid.
        bid_id: i64,
    },
    /// A bid status transition is not permitted.
    InvalidBidTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A flight-session phase transition is not permitted.
    InvalidSessionTransition {
        /// The current phase.
        from: String,
        /// The requested phase.
        to: String,
    },
    /// Flight session does not exist.
    SessionNotFound(i64),
    /// A report approval-status transition is not permitted.
    InvalidReportTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// Report does not exist.
    ReportNotFound(i64),
    /// A manual submission carries no proof artifact.
    MissingProof,
    /// A manual submission carries more than one proof artifact.
    AmbiguousProof,
    /// The tracker link does not match the allow-listed tracker domain.
    InvalidTrackerLink {
        /// The rejected URL.
        url: String,
    },
    /// Aircraft does not exist.
    AircraftNotFound {
        /// The unknown registration.
        registration: String,
    },
    /// An aircraft with this registration already exists.
    DuplicateRegistration {
        /// The duplicate registration.
        registration: String,
    },
    /// Pilot does not exist.
    PilotNotFound(i64),
    /// No bookable aircraft matches the request.
    NoAircraftAvailable {
        /// The departure station.
        station: String,
        /// The requested aircraft type.
        aircraft_type: String,
    },
    /// An aircraft status transition is not permitted.
    InvalidAircraftTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// Condition value is outside `[0, 100]`.
    InvalidCondition {
        /// The rejected condition value.
        value: f64,
    },
    /// Repair tier string is not recognised.
    InvalidRepairTier(String),
    /// The vault cannot cover the requested repair.
    InsufficientFunds {
        /// The repair cost in credits.
        required: i64,
        /// The current vault balance in credits.
        available: i64,
    },
    /// An optimistic-concurrency check detected a stale read.
    ConcurrentModification {
        /// The contended entity (e.g. `"aircraft:OD-LVA"`).
        entity: String,
    },
    /// An aircraft status string failed to parse.
    InvalidAircraftStatus(String),
    /// A bid status string failed to parse.
    InvalidBidStatus(String),
    /// An approval status string failed to parse.
    InvalidApprovalStatus(String),
    /// A session phase string failed to parse.
    InvalidSessionPhase(String),
    /// A submission channel string failed to parse.
    InvalidChannel(String),
    /// A configuration value failed to parse.
    InvalidConfigValue {
        /// The configuration key.
        name: String,
        /// The rejected value.
        value: String,
    },
    /// The airline timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Date arithmetic overflowed or produced an unrepresentable instant.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStationCode(code) => {
                write!(f, "Invalid station code '{code}': expected a 4-character ICAO identifier")
            }
            Self::InvalidAircraftType(code) => {
                write!(f, "Invalid aircraft type '{code}': expected a 2-4 character ICAO type code")
            }
            Self::InvalidRegistration(reg) => write!(f, "Invalid aircraft registration '{reg}'"),
            Self::InvalidFlightTime { minutes } => {
                write!(f, "Invalid flight time: {minutes} minutes")
            }
            Self::FleetViolation { aircraft_type } => {
                write!(
                    f,
                    "Fleet Violation: aircraft type '{aircraft_type}' is not permitted for airline operations"
                )
            }
            Self::DuplicateBid { pilot_id } => {
                write!(f, "Pilot {pilot_id} already holds an active bid")
            }
            Self::BidNotFound(id) => write!(f, "Bid {id} not found"),
            Self::BidExpired { bid_id } => write!(f, "Bid {bid_id} has expired"),
            Self::BidAlreadyConsumed { bid_id } => {
                write!(f, "Bid {bid_id} was already consumed by a flight session")
            }
            Self::InvalidBidTransition { from, to } => {
                write!(f, "Bid cannot transition from {from} to {to}")
            }
            Self::InvalidSessionTransition { from, to } => {
                write!(f, "Flight session cannot transition from {from} to {to}")
            }
            Self::SessionNotFound(id) => write!(f, "Flight session {id} not found"),
            Self::InvalidReportTransition { from, to } => {
                write!(f, "Report cannot transition from {from} to {to}")
            }
            Self::ReportNotFound(id) => write!(f, "Report {id} not found"),
            Self::MissingProof => {
                write!(
                    f,
                    "Manual submissions require a tracker link or a screenshot as proof"
                )
            }
            Self::AmbiguousProof => {
                write!(
                    f,
                    "Manual submissions must carry exactly one proof artifact: provide a tracker link or a screenshot, not both"
                )
            }
            Self::InvalidTrackerLink { url } => {
                write!(
                    f,
                    "Tracker link '{url}' must be a valid tracker.ivao.aero URL (e.g. https://tracker.ivao.aero/...)"
                )
            }
            Self::AircraftNotFound { registration } => {
                write!(f, "Aircraft '{registration}' not found")
            }
            Self::DuplicateRegistration { registration } => {
                write!(f, "Aircraft with registration '{registration}' already exists")
            }
            Self::PilotNotFound(id) => write!(f, "Pilot {id} not found"),
            Self::NoAircraftAvailable {
                station,
                aircraft_type,
            } => {
                write!(
                    f,
                    "No {aircraft_type} aircraft available at {station}"
                )
            }
            Self::InvalidAircraftTransition { from, to } => {
                write!(f, "Aircraft cannot transition from {from} to {to}")
            }
            Self::InvalidCondition { value } => {
                write!(f, "Condition {value} is outside the valid range 0-100")
            }
            Self::InvalidRepairTier(tier) => {
                write!(f, "Invalid repair tier '{tier}': expected MINIMUM or FULL")
            }
            Self::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: repair costs {required} credits but the vault holds {available}"
                )
            }
            Self::ConcurrentModification { entity } => {
                write!(f, "Concurrent modification detected on {entity}; retry the operation")
            }
            Self::InvalidAircraftStatus(s) => write!(f, "Invalid aircraft status: {s}"),
            Self::InvalidBidStatus(s) => write!(f, "Invalid bid status: {s}"),
            Self::InvalidApprovalStatus(s) => write!(f, "Invalid approval status: {s}"),
            Self::InvalidSessionPhase(s) => write!(f, "Invalid session phase: {s}"),
            Self::InvalidChannel(s) => write!(f, "Invalid submission channel: {s}"),
            Self::InvalidConfigValue { name, value } => {
                write!(f, "Invalid value '{value}' for configuration key {name}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Unknown airline timezone '{tz}'"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight report (PIREP) entity and approval lifecycle.
//!
//! A report transitions exactly once from Pending to a terminal state.
//! Once terminal it is immutable except for audit annotations.

use crate::error::DomainError;
use crate::types::StationCode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Report approval states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting an automatic decision or human review.
    Pending,
    /// Accepted; settlement has been applied.
    Approved,
    /// Refused; no ledger effect.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Validates a status transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReportTransition` if the transition is
    /// not permitted.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Pending => matches!(new_status, Self::Approved | Self::Rejected),
            Self::Approved | Self::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidReportTransition {
                from: self.as_str().to_owned(),
                to: new_status.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidApprovalStatus(s.to_owned())),
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a report entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    /// Filed by the tracking client at landing.
    Automatic,
    /// Filed by the pilot with a proof artifact; always reviewed by staff.
    Manual,
}

impl SubmissionChannel {
    /// Returns the string representation of the channel.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for SubmissionChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "automatic" => Ok(Self::Automatic),
            "manual" => Ok(Self::Manual),
            _ => Err(DomainError::InvalidChannel(s.to_owned())),
        }
    }
}

impl std::fmt::Display for SubmissionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The proof artifact attached to a manual submission.
///
/// Manual submissions carry exactly one artifact; automatic submissions
/// carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proof {
    /// A link into the allow-listed external tracker.
    TrackerLink(String),
    /// A stable reference returned by the upload service.
    Screenshot(String),
}

/// A flight report (PIREP).
///
/// The economic component fields arrive with the submission (computed by
/// the tracking client); settlement sums them and never re-derives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightReport {
    /// Canonical identifier assigned by the database.
    pub report_id: Option<i64>,
    /// The originating flight session, if any.
    pub session_id: Option<i64>,
    /// The originating bid; `None` for manual submissions.
    pub bid_id: Option<i64>,
    /// The reporting pilot.
    pub pilot_id: i64,
    /// Airline flight number.
    pub flight_number: String,
    /// ATC callsign.
    pub callsign: String,
    /// Departure station.
    pub departure: StationCode,
    /// Arrival station.
    pub arrival: StationCode,
    /// ICAO aircraft type code.
    pub aircraft_type: String,
    /// The aircraft flown, when a session assigned one.
    pub aircraft_id: Option<i64>,
    /// Block time in minutes.
    pub flight_time_minutes: i32,
    /// Touchdown rate in feet per minute (signed; more negative = harder).
    /// `None` when the tracking client supplied no landing data.
    pub landing_rate: Option<i32>,
    /// How the report entered the system.
    pub channel: SubmissionChannel,
    /// The proof artifact (manual channel only).
    pub proof: Option<Proof>,
    /// Free-form pilot comments.
    pub comments: Option<String>,
    /// Set when another Approved/Pending report exists for the same pilot
    /// and route on the same airline-local calendar day.
    pub is_duplicate: bool,
    /// Approval status.
    pub status: ApprovalStatus,
    /// Human-readable reason for the current status.
    pub status_reason: Option<String>,
    /// Passenger revenue in credits.
    pub revenue_passenger: i64,
    /// Cargo revenue in credits.
    pub revenue_cargo: i64,
    /// Fuel expense in credits.
    pub expense_fuel: i64,
    /// Airport fees in credits.
    pub expense_airport: i64,
    /// Pilot wage in credits.
    pub expense_pilot: i64,
    /// Maintenance accrual in credits.
    pub expense_maintenance: i64,
    /// When the report was submitted.
    pub submitted_at: OffsetDateTime,
    /// When the report reached a terminal status.
    pub resolved_at: Option<OffsetDateTime>,
    /// The reviewer who forced the terminal status, for manual decisions.
    pub reviewed_by: Option<i64>,
}

impl FlightReport {
    /// Total revenue: passenger + cargo components.
    #[must_use]
    pub const fn revenue(&self) -> i64 {
        self.revenue_passenger + self.revenue_cargo
    }

    /// Total expense: fuel + airport + pilot wage + maintenance accrual.
    #[must_use]
    pub const fn expense(&self) -> i64 {
        self.expense_fuel + self.expense_airport + self.expense_pilot + self.expense_maintenance
    }

    /// Net profit settled into the pilot balance and the vault.
    #[must_use]
    pub const fn net_profit(&self) -> i64 {
        self.revenue() - self.expense()
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight session state machine.
//!
//! A session tracks a consumed bid from booking through the in-progress
//! flight to a submitted report. Sessions that go silent past the idle
//! window are abandoned and release their aircraft without penalty.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Flight session phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Bid consumed, aircraft reserved, no telemetry yet.
    Booked,
    /// Telemetry is arriving; the flight is underway.
    InFlight,
    /// Landing detected or manual end; awaiting report creation.
    Completed,
    /// Terminal: telemetry went silent past the idle window; the aircraft
    /// was released without penalty.
    Abandoned,
    /// Terminal: a report was created from this session.
    Reported,
}

impl SessionPhase {
    /// Returns the string representation of the phase.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::InFlight => "in_flight",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
            Self::Reported => "reported",
        }
    }

    /// Returns true if this phase is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Abandoned | Self::Reported)
    }

    /// Checks if a transition from this phase to another is valid.
    ///
    /// Valid transitions are:
    /// - Booked → `InFlight` | Abandoned
    /// - `InFlight` → Completed | Abandoned
    /// - Completed → Reported
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Booked, Self::InFlight | Self::Abandoned)
                | (Self::InFlight, Self::Completed | Self::Abandoned)
                | (Self::Completed, Self::Reported)
        )
    }

    /// Validates a phase transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionTransition` if the transition is
    /// not permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidSessionTransition {
                from: self.as_str().to_owned(),
                to: target.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for SessionPhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(Self::Booked),
            "in_flight" => Ok(Self::InFlight),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            "reported" => Ok(Self::Reported),
            _ => Err(DomainError::InvalidSessionPhase(s.to_owned())),
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A live or historical flight session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSession {
    /// Canonical identifier assigned by the database.
    pub session_id: Option<i64>,
    /// The consumed bid this session started from.
    pub bid_id: i64,
    /// The pilot flying.
    pub pilot_id: i64,
    /// The assigned fleet aircraft.
    pub aircraft_id: i64,
    /// Current phase.
    pub phase: SessionPhase,
    /// When the session started (bid consumption).
    pub started_at: OffsetDateTime,
    /// When the last telemetry sample was accepted.
    pub last_telemetry_at: OffsetDateTime,
    /// The touchdown rate captured at landing, once Completed.
    pub landing_rate: Option<i32>,
}

impl FlightSession {
    /// Creates a new Booked session.
    ///
    /// # Arguments
    ///
    /// * `bid_id` - The consumed bid
    /// * `pilot_id` - The pilot flying
    /// * `aircraft_id` - The reserved aircraft
    /// * `now` - The start instant
    #[must_use]
    pub const fn new(bid_id: i64, pilot_id: i64, aircraft_id: i64, now: OffsetDateTime) -> Self {
        Self {
            session_id: None,
            bid_id,
            pilot_id,
            aircraft_id,
            phase: SessionPhase::Booked,
            started_at: now,
            last_telemetry_at: now,
            landing_rate: None,
        }
    }

    /// Returns true when the session has been silent past the idle window
    /// and should be abandoned.
    ///
    /// # Arguments
    ///
    /// * `now` - The evaluation instant
    /// * `idle_window` - The configured idle window
    #[must_use]
    pub fn is_idle(&self, now: OffsetDateTime, idle_window: time::Duration) -> bool {
        !self.phase.is_terminal()
            && self.phase != SessionPhase::Completed
            && now - self.last_telemetry_at > idle_window
    }
}

/// One telemetry sample from the tracking client.
///
/// Malformed or out-of-order samples are dropped, never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Flight phase as reported by the client (free-form).
    pub phase: String,
    /// Touchdown rate, present only on landing samples.
    pub landing_rate: Option<i32>,
    /// When the client recorded the sample.
    pub recorded_at: OffsetDateTime,
}

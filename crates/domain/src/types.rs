// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::MaintenanceConfig;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An ICAO station (airport) code.
///
/// Station codes are normalized to uppercase and must be exactly four
/// ASCII alphanumeric characters (e.g. `OLBA`, `OJAI`, `LFPG`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationCode {
    value: String,
}

impl StationCode {
    /// Creates a new `StationCode`.
    ///
    /// # Arguments
    ///
    /// * `value` - The station code (normalized to uppercase)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStationCode` if the code is not four
    /// ASCII alphanumeric characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let normalized = value.trim().to_uppercase();
        if normalized.len() == 4 && normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self { value: normalized })
        } else {
            Err(DomainError::InvalidStationCode(value.to_owned()))
        }
    }

    /// Returns the station code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for StationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for StationCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An aircraft registration (tail number).
///
/// Registrations are unique fleet-wide and normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registration {
    value: String,
}

impl Registration {
    /// Creates a new `Registration`.
    ///
    /// # Arguments
    ///
    /// * `value` - The registration (normalized to uppercase)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRegistration` if the registration is
    /// empty or longer than 10 characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let normalized = value.trim().to_uppercase();
        if normalized.is_empty() || normalized.len() > 10 {
            return Err(DomainError::InvalidRegistration(value.to_owned()));
        }
        Ok(Self { value: normalized })
    }

    /// Returns the registration value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Operational status of a fleet aircraft.
///
/// Status is driven by the flight-session lifecycle (Booked/InFlight) and
/// by the condition ledger (Maintenance/Grounded). Grounded aircraft are
/// never offered for booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftStatus {
    /// Parked and bookable.
    Available,
    /// Reserved by a started flight session, no telemetry yet.
    Booked,
    /// A session is actively flying this aircraft.
    InFlight,
    /// Withdrawn for scheduled maintenance.
    Maintenance,
    /// Barred from booking because condition fell below the grounded
    /// threshold.
    Grounded,
}

impl AircraftStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::InFlight => "in_flight",
            Self::Maintenance => "maintenance",
            Self::Grounded => "grounded",
        }
    }

    /// Validates a status transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAircraftTransition` if the transition
    /// is not permitted.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Available => matches!(
                new_status,
                Self::Booked | Self::Maintenance | Self::Grounded
            ),
            Self::Booked => matches!(new_status, Self::InFlight | Self::Available),
            Self::InFlight => matches!(
                new_status,
                Self::Available | Self::Maintenance | Self::Grounded
            ),
            Self::Maintenance => matches!(new_status, Self::Available | Self::Grounded),
            Self::Grounded => matches!(new_status, Self::Available | Self::Maintenance),
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidAircraftTransition {
                from: self.as_str().to_owned(),
                to: new_status.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for AircraftStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "in_flight" => Ok(Self::InFlight),
            "maintenance" => Ok(Self::Maintenance),
            "grounded" => Ok(Self::Grounded),
            _ => Err(DomainError::InvalidAircraftStatus(s.to_owned())),
        }
    }
}

impl std::fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fleet aircraft.
///
/// `condition_version` is the optimistic-concurrency token: every condition
/// write increments it, and writers must present the version they read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the aircraft has not been persisted yet.
    pub aircraft_id: Option<i64>,
    /// The unique registration.
    pub registration: Registration,
    /// The ICAO type code (e.g. `B738`).
    pub aircraft_type: String,
    /// The aircraft's home station.
    pub home_location: StationCode,
    /// The aircraft's current station.
    pub current_location: StationCode,
    /// Condition percentage in `[0, 100]`.
    pub condition: f64,
    /// Optimistic-concurrency token for condition writes.
    pub condition_version: i64,
    /// Operational status.
    pub status: AircraftStatus,
    /// Cumulative flight hours.
    pub total_hours: f64,
    /// Number of settled flights.
    pub flight_count: i64,
    /// Why the aircraft is grounded, if it is.
    pub grounded_reason: Option<String>,
}

impl Aircraft {
    /// Creates a new aircraft entering the fleet: full condition,
    /// Available, parked at its home station.
    ///
    /// # Arguments
    ///
    /// * `registration` - The unique registration
    /// * `aircraft_type` - The ICAO type code
    /// * `home_location` - The home station
    #[must_use]
    pub fn new(
        registration: Registration,
        aircraft_type: String,
        home_location: StationCode,
    ) -> Self {
        Self {
            aircraft_id: None,
            registration,
            aircraft_type,
            current_location: home_location.clone(),
            home_location,
            condition: 100.0,
            condition_version: 0,
            status: AircraftStatus::Available,
            total_hours: 0.0,
            flight_count: 0,
            grounded_reason: None,
        }
    }

    /// Returns true when the aircraft is barred from booking by condition.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.status == AircraftStatus::Grounded
    }

    /// Computes the status after a condition write.
    ///
    /// Condition below the grounded threshold always forces `Grounded`.
    /// A grounded aircraft stays grounded until a repair raises condition
    /// to at least threshold + hysteresis margin; any other status is left
    /// unchanged by a condition write.
    ///
    /// # Arguments
    ///
    /// * `new_condition` - The condition after the write
    /// * `config` - The maintenance configuration
    #[must_use]
    pub fn status_after_condition_change(
        &self,
        new_condition: f64,
        config: &MaintenanceConfig,
    ) -> AircraftStatus {
        if new_condition < config.grounded_threshold {
            AircraftStatus::Grounded
        } else if self.status == AircraftStatus::Grounded {
            if new_condition >= config.grounded_threshold + config.grounding_margin {
                AircraftStatus::Available
            } else {
                AircraftStatus::Grounded
            }
        } else {
            self.status
        }
    }
}

/// A pilot of the virtual airline.
///
/// Balance and hours are mutated only by settlement; profile fields are
/// managed outside the core pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    /// Canonical identifier assigned by the database.
    pub pilot_id: Option<i64>,
    /// The airline pilot code (e.g. `LVT001`).
    pub pilot_code: String,
    /// Display name.
    pub name: String,
    /// Credit balance.
    pub credit_balance: i64,
    /// Accrued flight hours.
    pub total_hours: f64,
    /// Current station.
    pub current_location: StationCode,
    /// Whether the pilot holds staff authority.
    pub is_admin: bool,
}

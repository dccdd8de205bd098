// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid entity and status lifecycle.
//!
//! A bid is a pilot's reservation of a route and aircraft type before
//! flying. At most one non-terminal bid exists per pilot. Expiration is a
//! pure function of `(now, expires_at)` evaluated at every read or consume;
//! the periodic sweep exists only to keep list views fresh and is never a
//! correctness mechanism.

use crate::error::DomainError;
use crate::types::StationCode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Bid lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Reserved and waiting for a flight session, within TTL.
    Active,
    /// A flight session started from this bid.
    Consumed,
    /// The pilot withdrew the reservation.
    Cancelled,
    /// The TTL elapsed before a session started.
    Expired,
}

impl BidStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Consumed => "consumed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Consumed | Self::Cancelled | Self::Expired)
    }

    /// Validates a status transition.
    ///
    /// Only `Active` can transition, and only to a terminal state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBidTransition` if the transition is not
    /// permitted.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Active => matches!(
                new_status,
                Self::Consumed | Self::Cancelled | Self::Expired
            ),
            Self::Consumed | Self::Cancelled | Self::Expired => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidBidTransition {
                from: self.as_str().to_owned(),
                to: new_status.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for BidStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "consumed" => Ok(Self::Consumed),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidBidStatus(s.to_owned())),
        }
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The planned-flight fields supplied by the external dispatch importer.
///
/// Treated as an opaque data source: the core validates station codes and
/// fleet rules but never re-derives routing or fuel figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSpec {
    /// Airline flight number (e.g. `LVT204`).
    pub flight_number: String,
    /// ATC callsign.
    pub callsign: String,
    /// Departure station.
    pub departure: StationCode,
    /// Arrival station.
    pub arrival: StationCode,
    /// ICAO aircraft type code.
    pub aircraft_type: String,
    /// Planned route string.
    pub route: String,
    /// Passenger count.
    pub pax: i32,
    /// Cargo weight in kilograms.
    pub cargo: i32,
    /// Planned ramp fuel in kilograms.
    pub planned_fuel: i32,
    /// Great-circle distance in nautical miles.
    pub distance_nm: i32,
}

/// A pilot's pending flight reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Canonical identifier assigned by the database.
    pub bid_id: Option<i64>,
    /// The pilot holding the reservation.
    pub pilot_id: i64,
    /// The planned flight.
    pub spec: FlightSpec,
    /// When the bid was created.
    pub created_at: OffsetDateTime,
    /// When the bid expires (`created_at` + TTL).
    pub expires_at: OffsetDateTime,
    /// Stored lifecycle status. Use [`Bid::effective_status`] for reads so
    /// that expiry is applied lazily.
    pub status: BidStatus,
}

impl Bid {
    /// Creates a new Active bid with a TTL stamped from `now`.
    ///
    /// # Arguments
    ///
    /// * `pilot_id` - The pilot making the reservation
    /// * `spec` - The planned flight
    /// * `now` - The creation instant
    /// * `ttl` - Time until expiry
    #[must_use]
    pub fn new(pilot_id: i64, spec: FlightSpec, now: OffsetDateTime, ttl: time::Duration) -> Self {
        Self {
            bid_id: None,
            pilot_id,
            spec,
            created_at: now,
            expires_at: now + ttl,
            status: BidStatus::Active,
        }
    }

    /// Returns the status with lazy expiry applied.
    ///
    /// An Active bid whose `expires_at` has passed reads as Expired
    /// regardless of whether the sweep has visited it yet.
    ///
    /// # Arguments
    ///
    /// * `now` - The read instant
    #[must_use]
    pub fn effective_status(&self, now: OffsetDateTime) -> BidStatus {
        if self.status == BidStatus::Active && self.expires_at <= now {
            BidStatus::Expired
        } else {
            self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn spec() -> FlightSpec {
        FlightSpec {
            flight_number: String::from("LVT204"),
            callsign: String::from("LVT204"),
            departure: match StationCode::new("OLBA") {
                Ok(code) => code,
                Err(e) => panic!("station: {e}"),
            },
            arrival: match StationCode::new("OJAI") {
                Ok(code) => code,
                Err(e) => panic!("station: {e}"),
            },
            aircraft_type: String::from("B738"),
            route: String::from("KUKLA UL620 TANSA"),
            pax: 148,
            cargo: 3200,
            planned_fuel: 8400,
            distance_nm: 214,
        }
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            BidStatus::Active,
            BidStatus::Consumed,
            BidStatus::Cancelled,
            BidStatus::Expired,
        ] {
            let s = status.as_str();
            match s.parse::<BidStatus>() {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("failed to parse status string {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_only_active_is_non_terminal() {
        assert!(!BidStatus::Active.is_terminal());
        assert!(BidStatus::Consumed.is_terminal());
        assert!(BidStatus::Cancelled.is_terminal());
        assert!(BidStatus::Expired.is_terminal());
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        for terminal in [BidStatus::Consumed, BidStatus::Cancelled, BidStatus::Expired] {
            assert!(terminal.validate_transition(BidStatus::Active).is_err());
            assert!(terminal.validate_transition(BidStatus::Consumed).is_err());
        }
    }

    #[test]
    fn test_active_transitions_to_all_terminal_states() {
        assert!(
            BidStatus::Active
                .validate_transition(BidStatus::Consumed)
                .is_ok()
        );
        assert!(
            BidStatus::Active
                .validate_transition(BidStatus::Cancelled)
                .is_ok()
        );
        assert!(
            BidStatus::Active
                .validate_transition(BidStatus::Expired)
                .is_ok()
        );
    }

    #[test]
    fn test_effective_status_applies_ttl_lazily() {
        let created = datetime!(2026-03-01 09:00 UTC);
        let bid = Bid::new(7, spec(), created, time::Duration::hours(24));

        // One second before expiry the bid still reads Active.
        assert_eq!(
            bid.effective_status(datetime!(2026-03-02 08:59:59 UTC)),
            BidStatus::Active
        );
        // At and after the boundary it reads Expired.
        assert_eq!(
            bid.effective_status(datetime!(2026-03-02 09:00 UTC)),
            BidStatus::Expired
        );
        assert_eq!(
            bid.effective_status(datetime!(2026-03-02 09:00:01 UTC)),
            BidStatus::Expired
        );
    }

    #[test]
    fn test_effective_status_preserves_terminal_states() {
        let created = datetime!(2026-03-01 09:00 UTC);
        let mut bid = Bid::new(7, spec(), created, time::Duration::hours(24));
        bid.status = BidStatus::Consumed;

        // A consumed bid never reads as Expired, even long past the TTL.
        assert_eq!(
            bid.effective_status(datetime!(2026-03-09 09:00 UTC)),
            BidStatus::Consumed
        );
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bid;
mod config;
mod dup_window;
mod error;
mod report;
mod session;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use bid::{Bid, BidStatus, FlightSpec};
pub use config::{MaintenanceConfig, RepairTier};
pub use dup_window::local_day_bounds;
pub use error::DomainError;
pub use report::{ApprovalStatus, FlightReport, Proof, SubmissionChannel};
pub use session::{FlightSession, SessionPhase, TelemetrySample};
pub use types::{Aircraft, AircraftStatus, Pilot, Registration, StationCode};
pub use validation::{
    is_restricted_aircraft_type, is_vfr_excluded_type, validate_aircraft_type,
    validate_flight_time, validate_tracker_link,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.

use serde::{Deserialize, Serialize};

/// Request to create a bid from an imported flight spec.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBidRequest {
    /// Airline flight number.
    pub flight_number: String,
    /// ATC callsign.
    pub callsign: String,
    /// Departure station (ICAO).
    pub departure: String,
    /// Arrival station (ICAO).
    pub arrival: String,
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

/// Bid state exposed to the dispatch UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BidInfo {
    /// The bid id.
    pub bid_id: i64,
    /// ATC callsign.
    pub callsign: String,
    /// Departure station.
    pub departure: String,
    /// Arrival station.
    pub arrival: String,
    /// ICAO aircraft type code.
    pub aircraft_type: String,
    /// Lifecycle status with lazy expiry applied.
    pub status: String,
    /// Expiry instant (RFC 3339).
    pub expires_at: String,
}

/// Response to bid creation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBidResponse {
    /// The created bid.
    pub bid: BidInfo,
    /// A success message.
    pub message: String,
}

/// Response to bid cancellation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CancelBidResponse {
    /// The cancelled bid id.
    pub bid_id: i64,
    /// The resulting status.
    pub status: String,
    /// A success message.
    pub message: String,
}

/// Request to open a flight session from a bid.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartSessionRequest {
    /// The bid to consume.
    pub bid_id: i64,
}

/// Response to a session start.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartSessionResponse {
    /// The opened session id.
    pub session_id: i64,
    /// The reserved aircraft's registration.
    pub registration: String,
    /// A success message.
    pub message: String,
}

/// One telemetry sample from the tracking client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryRequest {
    /// The session the sample addresses.
    pub session_id: i64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Flight phase as reported by the client.
    pub phase: String,
    /// Touchdown rate, present only on landing samples.
    pub landing_rate: Option<i32>,
}

/// Response to a telemetry sample.
///
/// Samples for unknown or terminal sessions are dropped, not retried:
/// `accepted` is false and `reason` says why.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryResponse {
    /// Whether the sample advanced or refreshed a session.
    pub accepted: bool,
    /// Why a sample was dropped, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Automatic-channel report submission from the tracking client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcarsReportRequest {
    /// The completed session.
    pub session_id: i64,
    /// Block time in minutes.
    pub flight_time_minutes: i32,
    /// Touchdown rate in fpm, if the client captured one.
    pub landing_rate: Option<i32>,
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
    /// Free-form comments.
    pub comments: Option<String>,
}

/// Manual PIREP submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManualPirepRequest {
    /// Airline flight number; generated when absent.
    pub flight_number: Option<String>,
    /// ATC callsign; defaults to the pilot code.
    pub callsign: Option<String>,
    /// Departure station (ICAO).
    pub departure: String,
    /// Arrival station (ICAO).
    pub arrival: String,
    /// ICAO aircraft type code.
    pub aircraft_type: String,
    /// Block time in minutes.
    pub flight_time_minutes: i32,
    /// Touchdown rate in fpm, if known.
    pub landing_rate: Option<i32>,
    /// Tracker URL proof artifact.
    pub tracker_link: Option<String>,
    /// Screenshot upload reference proof artifact.
    pub proof_image: Option<String>,
    /// Free-form comments.
    pub comments: Option<String>,
}

/// Report outcome exposed to the pilot UI and the review queue.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportOutcome {
    /// The report id.
    pub report_id: i64,
    /// The approval status.
    pub status: String,
    /// Whether a same-day report exists for this pilot and route.
    pub is_duplicate: bool,
    /// The human-readable decision or hold reason.
    pub message: String,
}

/// A reviewer's decision on a Pending report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewRequest {
    /// True to approve, false to reject.
    pub approve: bool,
    /// The reviewer's reason; a default is recorded when absent.
    pub reason: Option<String>,
}

/// One aircraft in the maintenance listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetAircraftInfo {
    /// The registration.
    pub registration: String,
    /// The ICAO type code.
    pub aircraft_type: String,
    /// The current station.
    pub current_location: String,
    /// Condition percentage.
    pub condition: f64,
    /// Operational status.
    pub status: String,
    /// What a FULL repair would cost now, in credits.
    pub repair_cost: i64,
    /// Whether the aircraft is barred from booking.
    pub is_grounded: bool,
    /// Cumulative flight hours.
    pub total_hours: f64,
    /// Number of settled flights.
    pub flight_count: i64,
}

/// The maintenance listing with the vault context.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetListResponse {
    /// The fleet ordered by registration.
    pub fleet: Vec<FleetAircraftInfo>,
    /// The airline vault balance in credits.
    pub vault_balance: i64,
    /// The configured repair rate per condition percent.
    pub repair_rate_per_percent: i64,
    /// The configured grounded threshold.
    pub grounded_threshold: f64,
}

/// Request to register a fleet aircraft.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterAircraftRequest {
    /// The unique registration.
    pub registration: String,
    /// The ICAO type code.
    pub aircraft_type: String,
    /// The home station (ICAO).
    pub home_location: String,
}

/// Request to repair an aircraft.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepairRequest {
    /// The repair tier: `MINIMUM` or `FULL`.
    pub repair_type: String,
}

/// Response to a completed repair.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepairResponse {
    /// The repaired aircraft's registration.
    pub registration: String,
    /// Condition after the repair.
    pub condition: f64,
    /// Status after the repair.
    pub status: String,
    /// What the repair cost in credits.
    pub cost: i64,
    /// The vault balance after the debit.
    pub vault_balance: i64,
    /// A success message.
    pub message: String,
}

/// Result of one background sweep tick.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReapResponse {
    /// How many bids the sweep expired.
    pub bids_expired: usize,
    /// How many idle sessions the sweep abandoned.
    pub sessions_abandoned: usize,
}

/// The maintenance configuration exposed to administration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigInfo {
    /// Condition below which an aircraft is grounded.
    pub grounded_threshold: f64,
    /// Hysteresis margin above the threshold for clearing grounding.
    pub grounding_margin: f64,
    /// Repair cost per condition percent, in credits.
    pub repair_rate_per_percent: i64,
    /// Landing rates at or below this value auto-reject.
    pub auto_reject_landing_rate: i32,
    /// Bid TTL in hours.
    pub bid_ttl_hours: i64,
    /// Session idle window in minutes.
    pub session_idle_minutes: i64,
    /// The airline's IANA timezone name.
    pub airline_timezone: String,
}

/// Hot-reload request for the maintenance configuration.
///
/// Absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateConfigRequest {
    /// New grounded threshold.
    pub grounded_threshold: Option<f64>,
    /// New hysteresis margin.
    pub grounding_margin: Option<f64>,
    /// New repair rate per percent.
    pub repair_rate_per_percent: Option<i64>,
    /// New auto-reject landing rate.
    pub auto_reject_landing_rate: Option<i32>,
    /// New bid TTL in hours.
    pub bid_ttl_hours: Option<i64>,
    /// New session idle window in minutes.
    pub session_idle_minutes: Option<i64>,
    /// New airline timezone name.
    pub airline_timezone: Option<String>,
}

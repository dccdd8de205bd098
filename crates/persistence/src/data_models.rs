// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row models and their conversions to domain values.
//!
//! Timestamps are stored as whole-second RFC 3339 UTC text so that SQL
//! string comparison orders them chronologically.

use crate::diesel_schema::{
    aircraft, audit_events, bids, flight_reports, flight_sessions, pilots, report_annotations,
};
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{
    Aircraft, Bid, FlightReport, FlightSession, FlightSpec, Pilot, Proof, Registration,
    StationCode,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Formats a timestamp for storage: UTC, whole seconds, RFC 3339.
///
/// Sub-second precision is dropped deliberately; equal-length strings make
/// lexicographic comparison in SQL match chronological order.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    ts.to_offset(time::UtcOffset::UTC)
        .replace_nanosecond(0)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the text is not valid RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(text, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("bad timestamp '{text}': {e}"))
    })
}

// ============================================================================
// Pilots
// ============================================================================

#[derive(Debug, Clone, Queryable)]
pub struct PilotRow {
    pub pilot_id: i64,
    pub pilot_code: String,
    pub name: String,
    pub credit_balance: i64,
    pub total_hours: f64,
    pub current_location: String,
    pub is_admin: i32,
}

impl PilotRow {
    /// Converts the row into a domain `Pilot`.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value fails domain validation.
    pub fn into_domain(self) -> Result<Pilot, PersistenceError> {
        Ok(Pilot {
            pilot_id: Some(self.pilot_id),
            pilot_code: self.pilot_code,
            name: self.name,
            credit_balance: self.credit_balance,
            total_hours: self.total_hours,
            current_location: StationCode::new(&self.current_location)?,
            is_admin: self.is_admin != 0,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pilots)]
pub struct NewPilot {
    pub pilot_code: String,
    pub name: String,
    pub credit_balance: i64,
    pub total_hours: f64,
    pub current_location: String,
    pub is_admin: i32,
}

// ============================================================================
// Aircraft
// ============================================================================

#[derive(Debug, Clone, Queryable)]
pub struct AircraftRow {
    pub aircraft_id: i64,
    pub registration: String,
    pub aircraft_type: String,
    pub home_location: String,
    pub current_location: String,
    pub condition: f64,
    pub condition_version: i64,
    pub status: String,
    pub total_hours: f64,
    pub flight_count: i64,
    pub grounded_reason: Option<String>,
}

impl AircraftRow {
    /// Converts the row into a domain `Aircraft`.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value fails domain validation.
    pub fn into_domain(self) -> Result<Aircraft, PersistenceError> {
        Ok(Aircraft {
            aircraft_id: Some(self.aircraft_id),
            registration: Registration::new(&self.registration)?,
            aircraft_type: self.aircraft_type,
            home_location: StationCode::new(&self.home_location)?,
            current_location: StationCode::new(&self.current_location)?,
            condition: self.condition,
            condition_version: self.condition_version,
            status: self.status.parse()?,
            total_hours: self.total_hours,
            flight_count: self.flight_count,
            grounded_reason: self.grounded_reason,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = aircraft)]
pub struct NewAircraft {
    pub registration: String,
    pub aircraft_type: String,
    pub home_location: String,
    pub current_location: String,
    pub condition: f64,
    pub condition_version: i64,
    pub status: String,
    pub total_hours: f64,
    pub flight_count: i64,
    pub grounded_reason: Option<String>,
}

// ============================================================================
// Bids
// ============================================================================

#[derive(Debug, Clone, Queryable)]
pub struct BidRow {
    pub bid_id: i64,
    pub pilot_id: i64,
    pub flight_number: String,
    pub callsign: String,
    pub departure_icao: String,
    pub arrival_icao: String,
    pub aircraft_type: String,
    pub route: String,
    pub pax: i32,
    pub cargo: i32,
    pub planned_fuel: i32,
    pub distance_nm: i32,
    pub created_at: String,
    pub expires_at: String,
    pub status: String,
}

impl BidRow {
    /// Converts the row into a domain `Bid`.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value fails domain validation.
    pub fn into_domain(self) -> Result<Bid, PersistenceError> {
        Ok(Bid {
            bid_id: Some(self.bid_id),
            pilot_id: self.pilot_id,
            spec: FlightSpec {
                flight_number: self.flight_number,
                callsign: self.callsign,
                departure: StationCode::new(&self.departure_icao)?,
                arrival: StationCode::new(&self.arrival_icao)?,
                aircraft_type: self.aircraft_type,
                route: self.route,
                pax: self.pax,
                cargo: self.cargo,
                planned_fuel: self.planned_fuel,
                distance_nm: self.distance_nm,
            },
            created_at: parse_timestamp(&self.created_at)?,
            expires_at: parse_timestamp(&self.expires_at)?,
            status: self.status.parse()?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bids)]
pub struct NewBid {
    pub pilot_id: i64,
    pub flight_number: String,
    pub callsign: String,
    pub departure_icao: String,
    pub arrival_icao: String,
    pub aircraft_type: String,
    pub route: String,
    pub pax: i32,
    pub cargo: i32,
    pub planned_fuel: i32,
    pub distance_nm: i32,
    pub created_at: String,
    pub expires_at: String,
    pub status: String,
}

impl NewBid {
    /// Builds an insertable row from a domain `Bid`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_domain(bid: &Bid) -> Result<Self, PersistenceError> {
        Ok(Self {
            pilot_id: bid.pilot_id,
            flight_number: bid.spec.flight_number.clone(),
            callsign: bid.spec.callsign.clone(),
            departure_icao: bid.spec.departure.value().to_owned(),
            arrival_icao: bid.spec.arrival.value().to_owned(),
            aircraft_type: bid.spec.aircraft_type.clone(),
            route: bid.spec.route.clone(),
            pax: bid.spec.pax,
            cargo: bid.spec.cargo,
            planned_fuel: bid.spec.planned_fuel,
            distance_nm: bid.spec.distance_nm,
            created_at: format_timestamp(bid.created_at)?,
            expires_at: format_timestamp(bid.expires_at)?,
            status: bid.status.as_str().to_owned(),
        })
    }
}

// ============================================================================
// Flight sessions
// ============================================================================

#[derive(Debug, Clone, Queryable)]
pub struct SessionRow {
    pub session_id: i64,
    pub bid_id: i64,
    pub pilot_id: i64,
    pub aircraft_id: i64,
    pub phase: String,
    pub started_at: String,
    pub last_telemetry_at: String,
    pub landing_rate: Option<i32>,
}

impl SessionRow {
    /// Converts the row into a domain `FlightSession`.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value fails domain validation.
    pub fn into_domain(self) -> Result<FlightSession, PersistenceError> {
        Ok(FlightSession {
            session_id: Some(self.session_id),
            bid_id: self.bid_id,
            pilot_id: self.pilot_id,
            aircraft_id: self.aircraft_id,
            phase: self.phase.parse()?,
            started_at: parse_timestamp(&self.started_at)?,
            last_telemetry_at: parse_timestamp(&self.last_telemetry_at)?,
            landing_rate: self.landing_rate,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = flight_sessions)]
pub struct NewSession {
    pub bid_id: i64,
    pub pilot_id: i64,
    pub aircraft_id: i64,
    pub phase: String,
    pub started_at: String,
    pub last_telemetry_at: String,
    pub landing_rate: Option<i32>,
}

// ============================================================================
// Flight reports
// ============================================================================

#[derive(Debug, Clone, Queryable)]
pub struct ReportRow {
    pub report_id: i64,
    pub session_id: Option<i64>,
    pub bid_id: Option<i64>,
    pub pilot_id: i64,
    pub flight_number: String,
    pub callsign: String,
    pub departure_icao: String,
    pub arrival_icao: String,
    pub aircraft_type: String,
    pub aircraft_id: Option<i64>,
    pub flight_time_minutes: i32,
    pub landing_rate: Option<i32>,
    pub channel: String,
    pub tracker_link: Option<String>,
    pub proof_image: Option<String>,
    pub comments: Option<String>,
    pub is_duplicate: i32,
    pub status: String,
    pub status_reason: Option<String>,
    pub revenue_passenger: i64,
    pub revenue_cargo: i64,
    pub expense_fuel: i64,
    pub expense_airport: i64,
    pub expense_pilot: i64,
    pub expense_maintenance: i64,
    pub submitted_at: String,
    pub resolved_at: Option<String>,
    pub reviewed_by: Option<i64>,
}

impl ReportRow {
    /// Converts the row into a domain `FlightReport`.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value fails domain validation.
    pub fn into_domain(self) -> Result<FlightReport, PersistenceError> {
        let proof = match (self.tracker_link, self.proof_image) {
            (Some(url), _) => Some(Proof::TrackerLink(url)),
            (None, Some(image)) => Some(Proof::Screenshot(image)),
            (None, None) => None,
        };

        Ok(FlightReport {
            report_id: Some(self.report_id),
            session_id: self.session_id,
            bid_id: self.bid_id,
            pilot_id: self.pilot_id,
            flight_number: self.flight_number,
            callsign: self.callsign,
            departure: StationCode::new(&self.departure_icao)?,
            arrival: StationCode::new(&self.arrival_icao)?,
            aircraft_type: self.aircraft_type,
            aircraft_id: self.aircraft_id,
            flight_time_minutes: self.flight_time_minutes,
            landing_rate: self.landing_rate,
            channel: self.channel.parse()?,
            proof,
            comments: self.comments,
            is_duplicate: self.is_duplicate != 0,
            status: self.status.parse()?,
            status_reason: self.status_reason,
            revenue_passenger: self.revenue_passenger,
            revenue_cargo: self.revenue_cargo,
            expense_fuel: self.expense_fuel,
            expense_airport: self.expense_airport,
            expense_pilot: self.expense_pilot,
            expense_maintenance: self.expense_maintenance,
            submitted_at: parse_timestamp(&self.submitted_at)?,
            resolved_at: self.resolved_at.as_deref().map(parse_timestamp).transpose()?,
            reviewed_by: self.reviewed_by,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = flight_reports)]
pub struct NewReport {
    pub session_id: Option<i64>,
    pub bid_id: Option<i64>,
    pub pilot_id: i64,
    pub flight_number: String,
    pub callsign: String,
    pub departure_icao: String,
    pub arrival_icao: String,
    pub aircraft_type: String,
    pub aircraft_id: Option<i64>,
    pub flight_time_minutes: i32,
    pub landing_rate: Option<i32>,
    pub channel: String,
    pub tracker_link: Option<String>,
    pub proof_image: Option<String>,
    pub comments: Option<String>,
    pub is_duplicate: i32,
    pub status: String,
    pub status_reason: Option<String>,
    pub revenue_passenger: i64,
    pub revenue_cargo: i64,
    pub expense_fuel: i64,
    pub expense_airport: i64,
    pub expense_pilot: i64,
    pub expense_maintenance: i64,
    pub submitted_at: String,
    pub resolved_at: Option<String>,
    pub reviewed_by: Option<i64>,
}

impl NewReport {
    /// Builds an insertable row from a domain `FlightReport`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_domain(report: &FlightReport) -> Result<Self, PersistenceError> {
        let (tracker_link, proof_image) = match &report.proof {
            Some(Proof::TrackerLink(url)) => (Some(url.clone()), None),
            Some(Proof::Screenshot(image)) => (None, Some(image.clone())),
            None => (None, None),
        };

        Ok(Self {
            session_id: report.session_id,
            bid_id: report.bid_id,
            pilot_id: report.pilot_id,
            flight_number: report.flight_number.clone(),
            callsign: report.callsign.clone(),
            departure_icao: report.departure.value().to_owned(),
            arrival_icao: report.arrival.value().to_owned(),
            aircraft_type: report.aircraft_type.clone(),
            aircraft_id: report.aircraft_id,
            flight_time_minutes: report.flight_time_minutes,
            landing_rate: report.landing_rate,
            channel: report.channel.as_str().to_owned(),
            tracker_link,
            proof_image,
            comments: report.comments.clone(),
            is_duplicate: i32::from(report.is_duplicate),
            status: report.status.as_str().to_owned(),
            status_reason: report.status_reason.clone(),
            revenue_passenger: report.revenue_passenger,
            revenue_cargo: report.revenue_cargo,
            expense_fuel: report.expense_fuel,
            expense_airport: report.expense_airport,
            expense_pilot: report.expense_pilot,
            expense_maintenance: report.expense_maintenance,
            submitted_at: format_timestamp(report.submitted_at)?,
            resolved_at: report.resolved_at.map(format_timestamp).transpose()?,
            reviewed_by: report.reviewed_by,
        })
    }
}

// ============================================================================
// Audit
// ============================================================================

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEvent {
    pub subject: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

/// Raw audit event row used when replaying a timeline.
pub type AuditEventRow = (i64, String, String, String, String, String, String);

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = report_annotations)]
pub struct NewAnnotation {
    pub report_id: i64,
    pub actor_json: String,
    pub note: String,
    pub created_at: String,
}

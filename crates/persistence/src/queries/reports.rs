// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight-report queries.

use crate::data_models::ReportRow;
use crate::diesel_schema::flight_reports;
use crate::error::PersistenceError;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use skyops_domain::{ApprovalStatus, FlightReport};

/// Retrieves a report by id.
///
/// # Errors
///
/// Returns `NotFound` if the report does not exist.
pub fn get_report(
    conn: &mut SqliteConnection,
    report_id: i64,
) -> Result<FlightReport, PersistenceError> {
    let row = flight_reports::table
        .filter(flight_reports::report_id.eq(report_id))
        .first::<ReportRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("report {report_id}")))?;
    row.into_domain()
}

/// Counts Approved/Pending reports for the same pilot and route inside the
/// `[window_start, window_end)` submission window.
///
/// Rejected reports do not count: a refused flight is not a flown
/// duplicate.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_duplicates(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    departure: &str,
    arrival: &str,
    window_start: &str,
    window_end: &str,
) -> Result<usize, PersistenceError> {
    let count: i64 = flight_reports::table
        .filter(
            flight_reports::pilot_id
                .eq(pilot_id)
                .and(flight_reports::departure_icao.eq(departure))
                .and(flight_reports::arrival_icao.eq(arrival))
                .and(flight_reports::submitted_at.ge(window_start))
                .and(flight_reports::submitted_at.lt(window_end))
                .and(flight_reports::status.ne(ApprovalStatus::Rejected.as_str())),
        )
        .count()
        .get_result(conn)?;
    count
        .to_usize()
        .ok_or_else(|| PersistenceError::ReconstructionError("negative count".to_string()))
}

/// Lists Pending reports oldest-first for the review queue.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_pending(conn: &mut SqliteConnection) -> Result<Vec<FlightReport>, PersistenceError> {
    let rows = flight_reports::table
        .filter(flight_reports::status.eq(ApprovalStatus::Pending.as_str()))
        .order(flight_reports::submitted_at.asc())
        .load::<ReportRow>(conn)?;
    rows.into_iter().map(ReportRow::into_domain).collect()
}

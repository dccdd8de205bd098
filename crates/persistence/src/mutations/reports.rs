// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight-report mutations.
//!
//! A report reaches a terminal status exactly once; the Pending guard in
//! the `WHERE` clause enforces it against racing reviewers.

use crate::data_models::NewReport;
use crate::diesel_schema::flight_reports;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{ApprovalStatus, FlightReport};

/// Inserts a new report and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_report(
    conn: &mut SqliteConnection,
    report: &FlightReport,
) -> Result<i64, PersistenceError> {
    let row = NewReport::from_domain(report)?;
    let report_id = diesel::insert_into(flight_reports::table)
        .values(&row)
        .returning(flight_reports::report_id)
        .get_result::<i64>(conn)?;
    Ok(report_id)
}

/// Compare-and-swap: Pending → a terminal status.
///
/// Returns `true` if this caller won the transition.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn resolve_report_cas(
    conn: &mut SqliteConnection,
    report_id: i64,
    new_status: ApprovalStatus,
    reason: &str,
    resolved_at: &str,
    reviewed_by: Option<i64>,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        flight_reports::table.filter(
            flight_reports::report_id
                .eq(report_id)
                .and(flight_reports::status.eq(ApprovalStatus::Pending.as_str())),
        ),
    )
    .set((
        flight_reports::status.eq(new_status.as_str()),
        flight_reports::status_reason.eq(reason),
        flight_reports::resolved_at.eq(resolved_at),
        flight_reports::reviewed_by.eq(reviewed_by),
    ))
    .execute(conn)?;
    Ok(affected == 1)
}

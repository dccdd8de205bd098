// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight-session queries.

use crate::data_models::SessionRow;
use crate::diesel_schema::flight_sessions;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{FlightSession, SessionPhase};

/// Retrieves a session by id.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub fn get_session(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<FlightSession, PersistenceError> {
    let row = flight_sessions::table
        .filter(flight_sessions::session_id.eq(session_id))
        .first::<SessionRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("session {session_id}")))?;
    row.into_domain()
}

/// Lists Booked/`InFlight` sessions whose last telemetry is at or before
/// the cutoff. The idle-session sweep abandons them.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_idle_candidates(
    conn: &mut SqliteConnection,
    cutoff: &str,
) -> Result<Vec<FlightSession>, PersistenceError> {
    let rows = flight_sessions::table
        .filter(
            flight_sessions::phase
                .eq_any([
                    SessionPhase::Booked.as_str(),
                    SessionPhase::InFlight.as_str(),
                ])
                .and(flight_sessions::last_telemetry_at.le(cutoff)),
        )
        .load::<SessionRow>(conn)?;
    rows.into_iter().map(SessionRow::into_domain).collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight-session mutations.

use crate::data_models::NewSession;
use crate::diesel_schema::flight_sessions;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{FlightSession, SessionPhase};

/// Inserts a new session and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_session(
    conn: &mut SqliteConnection,
    session: &FlightSession,
) -> Result<i64, PersistenceError> {
    let row = NewSession {
        bid_id: session.bid_id,
        pilot_id: session.pilot_id,
        aircraft_id: session.aircraft_id,
        phase: session.phase.as_str().to_owned(),
        started_at: crate::data_models::format_timestamp(session.started_at)?,
        last_telemetry_at: crate::data_models::format_timestamp(session.last_telemetry_at)?,
        landing_rate: session.landing_rate,
    };
    let session_id = diesel::insert_into(flight_sessions::table)
        .values(&row)
        .returning(flight_sessions::session_id)
        .get_result::<i64>(conn)?;
    Ok(session_id)
}

/// Compare-and-swap on phase: writes the new phase, telemetry stamp, and
/// landing rate iff the stored phase still matches the read.
///
/// Returns `true` if this caller won the transition.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_phase_cas(
    conn: &mut SqliteConnection,
    session_id: i64,
    expected: SessionPhase,
    new_phase: SessionPhase,
    last_telemetry_at: &str,
    landing_rate: Option<i32>,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        flight_sessions::table.filter(
            flight_sessions::session_id
                .eq(session_id)
                .and(flight_sessions::phase.eq(expected.as_str())),
        ),
    )
    .set((
        flight_sessions::phase.eq(new_phase.as_str()),
        flight_sessions::last_telemetry_at.eq(last_telemetry_at),
        flight_sessions::landing_rate.eq(landing_rate),
    ))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Refreshes the telemetry stamp of an `InFlight` session without a phase
/// change.
///
/// Returns `true` if the session was still `InFlight`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn touch_telemetry(
    conn: &mut SqliteConnection,
    session_id: i64,
    last_telemetry_at: &str,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        flight_sessions::table.filter(
            flight_sessions::session_id
                .eq(session_id)
                .and(flight_sessions::phase.eq(SessionPhase::InFlight.as_str())),
        ),
    )
    .set(flight_sessions::last_telemetry_at.eq(last_telemetry_at))
    .execute(conn)?;
    Ok(affected == 1)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet mutations.
//!
//! Condition writes are linearised by `condition_version`: every write
//! increments the version and names the version it read. A lost race
//! returns `false` and the caller re-reads and retries.

use crate::data_models::NewAircraft;
use crate::diesel_schema::aircraft;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{Aircraft, AircraftStatus};

/// Inserts a new fleet aircraft and returns its id.
///
/// # Errors
///
/// Returns `ConstraintViolation` for a duplicate registration.
pub fn insert_aircraft(
    conn: &mut SqliteConnection,
    entry: &Aircraft,
) -> Result<i64, PersistenceError> {
    let row = NewAircraft {
        registration: entry.registration.value().to_owned(),
        aircraft_type: entry.aircraft_type.clone(),
        home_location: entry.home_location.value().to_owned(),
        current_location: entry.current_location.value().to_owned(),
        condition: entry.condition,
        condition_version: entry.condition_version,
        status: entry.status.as_str().to_owned(),
        total_hours: entry.total_hours,
        flight_count: entry.flight_count,
        grounded_reason: entry.grounded_reason.clone(),
    };
    let aircraft_id = diesel::insert_into(aircraft::table)
        .values(&row)
        .returning(aircraft::aircraft_id)
        .get_result::<i64>(conn)?;
    Ok(aircraft_id)
}

/// Compare-and-swap on condition: writes the new condition, status, and
/// grounded reason iff `condition_version` still matches the read.
///
/// Returns `true` if this caller won the write.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_condition_cas(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    expected_version: i64,
    new_condition: f64,
    new_status: AircraftStatus,
    grounded_reason: Option<&str>,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        aircraft::table.filter(
            aircraft::aircraft_id
                .eq(aircraft_id)
                .and(aircraft::condition_version.eq(expected_version)),
        ),
    )
    .set((
        aircraft::condition.eq(new_condition),
        aircraft::condition_version.eq(expected_version + 1),
        aircraft::status.eq(new_status.as_str()),
        aircraft::grounded_reason.eq(grounded_reason),
    ))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Compare-and-swap on status only (booking, release, abandonment).
///
/// Returns `true` if this caller won the transition.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_status_cas(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    expected: AircraftStatus,
    new_status: AircraftStatus,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        aircraft::table.filter(
            aircraft::aircraft_id
                .eq(aircraft_id)
                .and(aircraft::status.eq(expected.as_str())),
        ),
    )
    .set(aircraft::status.eq(new_status.as_str()))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Releases a Booked/`InFlight` aircraft back to Available, optionally
/// moving it to a new station.
///
/// Returns `true` if the aircraft was in a releasable status.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn release_aircraft(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    new_location: Option<&str>,
) -> Result<bool, PersistenceError> {
    let releasable = [
        AircraftStatus::Booked.as_str(),
        AircraftStatus::InFlight.as_str(),
    ];
    let affected = match new_location {
        Some(location) => diesel::update(
            aircraft::table.filter(
                aircraft::aircraft_id
                    .eq(aircraft_id)
                    .and(aircraft::status.eq_any(releasable)),
            ),
        )
        .set((
            aircraft::status.eq(AircraftStatus::Available.as_str()),
            aircraft::current_location.eq(location),
        ))
        .execute(conn)?,
        None => diesel::update(
            aircraft::table.filter(
                aircraft::aircraft_id
                    .eq(aircraft_id)
                    .and(aircraft::status.eq_any(releasable)),
            ),
        )
        .set(aircraft::status.eq(AircraftStatus::Available.as_str()))
        .execute(conn)?,
    };
    Ok(affected == 1)
}

/// Adds flight hours and a flight count tick, and moves the aircraft to
/// its arrival station. Used inside the settlement transaction.
///
/// # Errors
///
/// Returns `NotFound` if the aircraft row is missing.
pub fn apply_flight_totals(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    hours_delta: f64,
    new_location: &str,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(aircraft::table.filter(aircraft::aircraft_id.eq(aircraft_id)))
        .set((
            aircraft::total_hours.eq(aircraft::total_hours + hours_delta),
            aircraft::flight_count.eq(aircraft::flight_count + 1),
            aircraft::current_location.eq(new_location),
        ))
        .execute(conn)?;
    if affected == 1 {
        Ok(())
    } else {
        Err(PersistenceError::NotFound(format!(
            "aircraft {aircraft_id}"
        )))
    }
}

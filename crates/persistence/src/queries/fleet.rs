// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet queries.

use crate::data_models::AircraftRow;
use crate::diesel_schema::aircraft;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{Aircraft, AircraftStatus};

/// Retrieves an aircraft by id.
///
/// # Errors
///
/// Returns `NotFound` if the aircraft does not exist.
pub fn get_aircraft(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
) -> Result<Aircraft, PersistenceError> {
    let row = aircraft::table
        .filter(aircraft::aircraft_id.eq(aircraft_id))
        .first::<AircraftRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("aircraft {aircraft_id}")))?;
    row.into_domain()
}

/// Retrieves an aircraft by registration.
///
/// # Errors
///
/// Returns `NotFound` if the registration is unknown.
pub fn get_aircraft_by_registration(
    conn: &mut SqliteConnection,
    registration: &str,
) -> Result<Aircraft, PersistenceError> {
    let row = aircraft::table
        .filter(aircraft::registration.eq(registration))
        .first::<AircraftRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("aircraft '{registration}'")))?;
    row.into_domain()
}

/// Lists bookable aircraft: at the station, matching type, Available, and
/// at or above the grounded threshold.
///
/// The condition guard also excludes rows whose stored status predates a
/// raised threshold.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_available(
    conn: &mut SqliteConnection,
    location: &str,
    aircraft_type: &str,
    min_condition: f64,
) -> Result<Vec<Aircraft>, PersistenceError> {
    let rows = aircraft::table
        .filter(
            aircraft::current_location
                .eq(location)
                .and(aircraft::aircraft_type.eq(aircraft_type))
                .and(aircraft::status.eq(AircraftStatus::Available.as_str()))
                .and(aircraft::condition.ge(min_condition)),
        )
        .order(aircraft::condition.desc())
        .load::<AircraftRow>(conn)?;
    rows.into_iter().map(AircraftRow::into_domain).collect()
}

/// Lists the whole fleet ordered by registration.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_fleet(conn: &mut SqliteConnection) -> Result<Vec<Aircraft>, PersistenceError> {
    let rows = aircraft::table
        .order(aircraft::registration.asc())
        .load::<AircraftRow>(conn)?;
    rows.into_iter().map(AircraftRow::into_domain).collect()
}

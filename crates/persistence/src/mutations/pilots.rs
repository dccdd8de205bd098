// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pilot mutations.

use crate::data_models::NewPilot;
use crate::diesel_schema::pilots;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::Pilot;

/// Inserts a new pilot and returns their id.
///
/// # Errors
///
/// Returns `ConstraintViolation` for a duplicate pilot code.
pub fn insert_pilot(conn: &mut SqliteConnection, pilot: &Pilot) -> Result<i64, PersistenceError> {
    let row = NewPilot {
        pilot_code: pilot.pilot_code.clone(),
        name: pilot.name.clone(),
        credit_balance: pilot.credit_balance,
        total_hours: pilot.total_hours,
        current_location: pilot.current_location.value().to_owned(),
        is_admin: i32::from(pilot.is_admin),
    };
    let pilot_id = diesel::insert_into(pilots::table)
        .values(&row)
        .returning(pilots::pilot_id)
        .get_result::<i64>(conn)?;
    Ok(pilot_id)
}

/// Credits balance, hours, and the arrival station in one statement.
/// Used inside the settlement transaction; the increments are expressed in
/// SQL so they are never read-modify-write races.
///
/// # Errors
///
/// Returns `NotFound` if the pilot row is missing, which rolls the
/// enclosing settlement back.
pub fn apply_settlement_credit(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    net_profit: i64,
    hours_delta: f64,
    new_location: &str,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(pilots::table.filter(pilots::pilot_id.eq(pilot_id)))
        .set((
            pilots::credit_balance.eq(pilots::credit_balance + net_profit),
            pilots::total_hours.eq(pilots::total_hours + hours_delta),
            pilots::current_location.eq(new_location),
        ))
        .execute(conn)?;
    if affected == 1 {
        Ok(())
    } else {
        Err(PersistenceError::NotFound(format!("pilot {pilot_id}")))
    }
}

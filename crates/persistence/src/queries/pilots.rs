// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pilot queries.

use crate::data_models::PilotRow;
use crate::diesel_schema::pilots;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::Pilot;

/// Retrieves a pilot by id.
///
/// # Errors
///
/// Returns `NotFound` if the pilot does not exist.
pub fn get_pilot(conn: &mut SqliteConnection, pilot_id: i64) -> Result<Pilot, PersistenceError> {
    let row = pilots::table
        .filter(pilots::pilot_id.eq(pilot_id))
        .first::<PilotRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("pilot {pilot_id}")))?;
    row.into_domain()
}

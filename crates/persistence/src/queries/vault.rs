// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vault queries.

use crate::diesel_schema::vault;
use crate::error::PersistenceError;
use diesel::prelude::*;

/// Returns the current vault balance in credits.
///
/// # Errors
///
/// Returns `NotFound` if the vault row is missing.
pub fn balance(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    vault::table
        .filter(vault::vault_id.eq(1))
        .select(vault::balance)
        .first::<i64>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(String::from("vault")))
}

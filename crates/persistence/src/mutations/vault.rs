// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vault mutations.
//!
//! The vault is a single row. Credits and debits are expressed as SQL
//! increments, never read-modify-write; the repair debit is conditional on
//! affordability so concurrent repairs cannot both drain the balance.

use crate::diesel_schema::vault;
use crate::error::PersistenceError;
use diesel::prelude::*;

const VAULT_ROW: i64 = 1;

/// Applies a signed amount to the vault balance.
///
/// Settlement uses this for both profitable and loss-making flights.
///
/// # Errors
///
/// Returns `NotFound` if the vault row is missing.
pub fn apply_amount(conn: &mut SqliteConnection, amount: i64) -> Result<(), PersistenceError> {
    let affected = diesel::update(vault::table.filter(vault::vault_id.eq(VAULT_ROW)))
        .set(vault::balance.eq(vault::balance + amount))
        .execute(conn)?;
    if affected == 1 {
        Ok(())
    } else {
        Err(PersistenceError::NotFound(String::from("vault")))
    }
}

/// Debits a repair cost iff the balance covers it.
///
/// Returns `true` if the debit was applied; `false` leaves the balance
/// untouched.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn debit_if_affordable(
    conn: &mut SqliteConnection,
    cost: i64,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        vault::table.filter(vault::vault_id.eq(VAULT_ROW).and(vault::balance.ge(cost))),
    )
    .set(vault::balance.eq(vault::balance - cost))
    .execute(conn)?;
    Ok(affected == 1)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid queries.

use crate::data_models::BidRow;
use crate::diesel_schema::bids;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{Bid, BidStatus};

/// Retrieves a bid by id.
///
/// # Errors
///
/// Returns `NotFound` if the bid does not exist.
pub fn get_bid(conn: &mut SqliteConnection, bid_id: i64) -> Result<Bid, PersistenceError> {
    let row = bids::table
        .filter(bids::bid_id.eq(bid_id))
        .first::<BidRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("bid {bid_id}")))?;
    row.into_domain()
}

/// Retrieves a pilot's stored-Active bid, if one exists.
///
/// The caller applies lazy expiry via [`Bid::effective_status`]; this
/// query reflects only the stored status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_active_bid_for_pilot(
    conn: &mut SqliteConnection,
    pilot_id: i64,
) -> Result<Option<Bid>, PersistenceError> {
    let row = bids::table
        .filter(
            bids::pilot_id
                .eq(pilot_id)
                .and(bids::status.eq(BidStatus::Active.as_str())),
        )
        .first::<BidRow>(conn)
        .optional()?;
    row.map(BidRow::into_domain).transpose()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid mutations.
//!
//! Status transitions are single-statement compare-and-swap updates: the
//! `WHERE` clause names the expected current status (and, for consume, the
//! unexpired TTL), so racing callers cannot double-transition a bid.

use crate::data_models::NewBid;
use crate::diesel_schema::bids;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_domain::{Bid, BidStatus};

/// Inserts a new bid and returns its id.
///
/// The partial unique index on `(pilot_id) WHERE status = 'active'` is the
/// concurrent backstop for the single-active-bid invariant; a violation
/// surfaces as `ConstraintViolation`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_bid(conn: &mut SqliteConnection, bid: &Bid) -> Result<i64, PersistenceError> {
    let row = NewBid::from_domain(bid)?;
    let bid_id = diesel::insert_into(bids::table)
        .values(&row)
        .returning(bids::bid_id)
        .get_result::<i64>(conn)?;
    Ok(bid_id)
}

/// Compare-and-swap: Active → Consumed, guarded by an unexpired TTL.
///
/// Returns `true` if this caller won the transition.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn consume_bid_cas(
    conn: &mut SqliteConnection,
    bid_id: i64,
    now: &str,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        bids::table.filter(
            bids::bid_id
                .eq(bid_id)
                .and(bids::status.eq(BidStatus::Active.as_str()))
                .and(bids::expires_at.gt(now)),
        ),
    )
    .set(bids::status.eq(BidStatus::Consumed.as_str()))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Compare-and-swap: Active → Cancelled, guarded by an unexpired TTL.
///
/// Returns `true` if this caller won the transition.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn cancel_bid_cas(
    conn: &mut SqliteConnection,
    bid_id: i64,
    now: &str,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        bids::table.filter(
            bids::bid_id
                .eq(bid_id)
                .and(bids::status.eq(BidStatus::Active.as_str()))
                .and(bids::expires_at.gt(now)),
        ),
    )
    .set(bids::status.eq(BidStatus::Cancelled.as_str()))
    .execute(conn)?;
    Ok(affected == 1)
}

/// Lazily expires one bid whose TTL has elapsed.
///
/// Returns `true` if the bid was transitioned by this call.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn expire_bid_if_due(
    conn: &mut SqliteConnection,
    bid_id: i64,
    now: &str,
) -> Result<bool, PersistenceError> {
    let affected = diesel::update(
        bids::table.filter(
            bids::bid_id
                .eq(bid_id)
                .and(bids::status.eq(BidStatus::Active.as_str()))
                .and(bids::expires_at.le(now)),
        ),
    )
    .set(bids::status.eq(BidStatus::Expired.as_str()))
    .execute(conn)?;
    Ok(affected == 1)
}

/// The periodic sweep: expires every over-TTL Active bid in one statement.
///
/// Safe to race with `insert_bid`/`consume_bid_cas`: the status guard means
/// a bid consumed mid-sweep is simply skipped.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn reap_expired(conn: &mut SqliteConnection, now: &str) -> Result<usize, PersistenceError> {
    let affected = diesel::update(
        bids::table.filter(
            bids::status
                .eq(BidStatus::Active.as_str())
                .and(bids::expires_at.le(now)),
        ),
    )
    .set(bids::status.eq(BidStatus::Expired.as_str()))
    .execute(conn)?;
    Ok(affected)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid lifecycle tests: single-active-bid, TTL, consume/cancel semantics.

use super::helpers::{create_test_actor, create_test_cause, test_bid, test_now, test_spec};
use crate::{CoreError, cancel_bid, consume_bid, create_bid, expire_bid, validate_flight_spec};
use skyops_domain::{BidStatus, DomainError, MaintenanceConfig};

#[test]
fn test_create_bid_stamps_ttl_from_now() {
    let config = MaintenanceConfig::default();
    let transition = create_bid(
        7,
        test_spec(),
        None,
        test_now(),
        &config,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(transition.bid.status, BidStatus::Active);
    assert_eq!(transition.bid.expires_at, test_now() + config.bid_ttl);
    assert_eq!(transition.audit_event.action.name, "CreateBid");
}

#[test]
fn test_second_bid_fails_with_duplicate_while_first_is_active() {
    let config = MaintenanceConfig::default();
    let existing = test_bid(7);

    let err = create_bid(
        7,
        test_spec(),
        Some(&existing),
        test_now() + time::Duration::hours(1),
        &config,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::DuplicateBid { pilot_id: 7 })
    );
}

#[test]
fn test_expired_existing_bid_does_not_block_creation() {
    let config = MaintenanceConfig::default();
    let existing = test_bid(7);
    let after_ttl = existing.expires_at + time::Duration::seconds(1);

    let transition = create_bid(
        7,
        test_spec(),
        Some(&existing),
        after_ttl,
        &config,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(transition.bid.status, BidStatus::Active);
}

#[test]
fn test_vfr_type_fails_with_fleet_violation() {
    let mut spec = test_spec();
    spec.aircraft_type = String::from("C172");

    let err = validate_flight_spec(&spec).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::FleetViolation { .. })
    ));
}

#[test]
fn test_restricted_widebody_fails_with_fleet_violation() {
    let mut spec = test_spec();
    spec.aircraft_type = String::from("A388");

    assert!(validate_flight_spec(&spec).is_err());
}

#[test]
fn test_consume_active_bid_succeeds() {
    let bid = test_bid(7);

    let transition = consume_bid(
        &bid,
        test_now() + time::Duration::hours(2),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(transition.bid.status, BidStatus::Consumed);
}

#[test]
fn test_consume_past_ttl_fails_with_expired() {
    let bid = test_bid(7);

    let err = consume_bid(
        &bid,
        bid.expires_at,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::BidExpired { bid_id: 11 })
    );
}

#[test]
fn test_consume_twice_fails_with_already_consumed() {
    let mut bid = test_bid(7);
    bid.status = BidStatus::Consumed;

    let err = consume_bid(
        &bid,
        test_now() + time::Duration::hours(1),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::BidAlreadyConsumed { bid_id: 11 })
    );
}

#[test]
fn test_cancel_active_bid_succeeds() {
    let bid = test_bid(7);

    let transition = cancel_bid(
        &bid,
        test_now() + time::Duration::hours(1),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(transition.map(|t| t.bid.status), Some(BidStatus::Cancelled));
}

#[test]
fn test_cancel_is_idempotent_on_cancelled_bids() {
    let mut bid = test_bid(7);
    bid.status = BidStatus::Cancelled;

    let transition = cancel_bid(
        &bid,
        test_now() + time::Duration::hours(1),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert!(transition.is_none());
}

#[test]
fn test_cancel_consumed_bid_fails() {
    let mut bid = test_bid(7);
    bid.status = BidStatus::Consumed;

    let err = cancel_bid(
        &bid,
        test_now() + time::Duration::hours(1),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::BidAlreadyConsumed { bid_id: 11 })
    );
}

#[test]
fn test_sweep_expires_only_due_bids() {
    let bid = test_bid(7);

    // Within TTL: the sweep skips the bid.
    assert!(expire_bid(&bid, test_now(), create_test_cause()).is_none());

    // Past TTL: the sweep transitions it.
    let expired = expire_bid(
        &bid,
        bid.expires_at + time::Duration::seconds(1),
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(expired.bid.status, BidStatus::Expired);
    assert_eq!(expired.audit_event.actor.id, "bid-reaper");
}

#[test]
fn test_sweep_skips_terminal_bids() {
    let mut bid = test_bid(7);
    bid.status = BidStatus::Consumed;

    let result = expire_bid(
        &bid,
        bid.expires_at + time::Duration::hours(1),
        create_test_cause(),
    );

    // A consumed bid never expires, no matter how stale; the sweep cannot
    // double-transition a bid that raced with consume_bid.
    assert!(result.is_none());
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid lifecycle rules.
//!
//! The TTL is enforced lazily: every function here evaluates
//! [`Bid::effective_status`] against the caller-supplied `now` before
//! deciding anything. The periodic sweep is a list-freshness optimisation;
//! correctness never depends on its cadence.

use crate::error::CoreError;
use skyops_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use skyops_domain::{Bid, BidStatus, DomainError, FlightSpec, MaintenanceConfig};
use skyops_domain::{is_restricted_aircraft_type, is_vfr_excluded_type, validate_aircraft_type};
use time::OffsetDateTime;

/// The result of a successful bid transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidTransition {
    /// The bid after the transition.
    pub bid: Bid,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

fn bid_subject(bid: &Bid) -> String {
    bid.bid_id
        .map_or_else(|| String::from("bid:new"), |id| format!("bid:{id}"))
}

fn bid_snapshot(bid: &Bid) -> StateSnapshot {
    StateSnapshot::new(format!(
        "{} pilot={} {}->{} status={}",
        bid_subject(bid),
        bid.pilot_id,
        bid.spec.departure,
        bid.spec.arrival,
        bid.status
    ))
}

/// Validates an imported flight spec against fleet rules.
///
/// # Arguments
///
/// * `spec` - The flight spec supplied by the dispatch importer
///
/// # Errors
///
/// Returns an error if:
/// - The aircraft type code is malformed
/// - The type is the restricted wide-body family (`FleetViolation`)
/// - The type is in the VFR exclusion set (`FleetViolation`)
pub fn validate_flight_spec(spec: &FlightSpec) -> Result<(), CoreError> {
    validate_aircraft_type(&spec.aircraft_type)?;

    if is_restricted_aircraft_type(&spec.aircraft_type)
        || is_vfr_excluded_type(&spec.aircraft_type)
    {
        return Err(CoreError::DomainViolation(DomainError::FleetViolation {
            aircraft_type: spec.aircraft_type.clone(),
        }));
    }

    Ok(())
}

/// Creates a new Active bid for a pilot.
///
/// The caller supplies the pilot's current non-terminal bid, if any; the
/// persistence layer's partial unique index is the concurrent backstop for
/// the same check.
///
/// # Arguments
///
/// * `pilot_id` - The pilot making the reservation
/// * `spec` - The planned flight
/// * `existing` - The pilot's existing bid, if one is stored
/// * `now` - The creation instant
/// * `config` - Supplies the bid TTL
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The spec violates fleet rules
/// - The pilot already holds a bid that still reads Active (`DuplicateBid`)
pub fn create_bid(
    pilot_id: i64,
    spec: FlightSpec,
    existing: Option<&Bid>,
    now: OffsetDateTime,
    config: &MaintenanceConfig,
    actor: Actor,
    cause: Cause,
) -> Result<BidTransition, CoreError> {
    validate_flight_spec(&spec)?;

    if let Some(previous) = existing
        && previous.effective_status(now) == BidStatus::Active
    {
        return Err(CoreError::DomainViolation(DomainError::DuplicateBid {
            pilot_id,
        }));
    }

    let bid = Bid::new(pilot_id, spec, now, config.bid_ttl);

    let action = Action::new(
        String::from("CreateBid"),
        Some(format!(
            "Reserved {} {}->{} for pilot {pilot_id}",
            bid.spec.aircraft_type, bid.spec.departure, bid.spec.arrival
        )),
    );
    let audit_event = AuditEvent::new(
        actor,
        cause,
        action,
        bid_subject(&bid),
        StateSnapshot::new(String::from("none")),
        bid_snapshot(&bid),
    );

    Ok(BidTransition { bid, audit_event })
}

/// Cancels an Active bid.
///
/// Cancelling an already-Cancelled bid is an idempotent no-op and returns
/// `None`; no audit event is produced because no state changed.
///
/// # Arguments
///
/// * `bid` - The bid to cancel
/// * `now` - The cancellation instant (drives lazy expiry)
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the bid reads Consumed (`BidAlreadyConsumed`) or
/// Expired (`InvalidBidTransition`).
pub fn cancel_bid(
    bid: &Bid,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<Option<BidTransition>, CoreError> {
    match bid.effective_status(now) {
        BidStatus::Cancelled => Ok(None),
        BidStatus::Consumed => Err(CoreError::DomainViolation(
            DomainError::BidAlreadyConsumed {
                bid_id: bid.bid_id.unwrap_or_default(),
            },
        )),
        BidStatus::Expired => Err(CoreError::DomainViolation(
            DomainError::InvalidBidTransition {
                from: BidStatus::Expired.as_str().to_owned(),
                to: BidStatus::Cancelled.as_str().to_owned(),
            },
        )),
        BidStatus::Active => {
            let before = bid_snapshot(bid);
            let mut cancelled = bid.clone();
            cancelled.status = BidStatus::Cancelled;

            let audit_event = AuditEvent::new(
                actor,
                cause,
                Action::new(String::from("CancelBid"), None),
                bid_subject(bid),
                before,
                bid_snapshot(&cancelled),
            );
            Ok(Some(BidTransition {
                bid: cancelled,
                audit_event,
            }))
        }
    }
}

/// Atomically consumes an Active bid when a flight session starts.
///
/// # Arguments
///
/// * `bid` - The bid to consume
/// * `now` - The consumption instant (drives lazy expiry)
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the bid reads Expired (`BidExpired`), Consumed
/// (`BidAlreadyConsumed`), or Cancelled (`InvalidBidTransition`).
pub fn consume_bid(
    bid: &Bid,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<BidTransition, CoreError> {
    match bid.effective_status(now) {
        BidStatus::Expired => Err(CoreError::DomainViolation(DomainError::BidExpired {
            bid_id: bid.bid_id.unwrap_or_default(),
        })),
        BidStatus::Consumed => Err(CoreError::DomainViolation(
            DomainError::BidAlreadyConsumed {
                bid_id: bid.bid_id.unwrap_or_default(),
            },
        )),
        BidStatus::Cancelled => Err(CoreError::DomainViolation(
            DomainError::InvalidBidTransition {
                from: BidStatus::Cancelled.as_str().to_owned(),
                to: BidStatus::Consumed.as_str().to_owned(),
            },
        )),
        BidStatus::Active => {
            let before = bid_snapshot(bid);
            let mut consumed = bid.clone();
            consumed.status = BidStatus::Consumed;

            let audit_event = AuditEvent::new(
                actor,
                cause,
                Action::new(String::from("ConsumeBid"), None),
                bid_subject(bid),
                before,
                bid_snapshot(&consumed),
            );
            Ok(BidTransition {
                bid: consumed,
                audit_event,
            })
        }
    }
}

/// Transitions an over-TTL Active bid to Expired.
///
/// Used by the periodic sweep. Returns `None` when the bid is not due
/// (still within TTL, or already terminal); the sweep skips it without
/// error so it is safe to race with `create_bid`/`consume_bid`.
///
/// # Arguments
///
/// * `bid` - The bid to examine
/// * `now` - The sweep instant
/// * `cause` - The cause or reason for this sweep tick
#[must_use]
pub fn expire_bid(bid: &Bid, now: OffsetDateTime, cause: Cause) -> Option<BidTransition> {
    if bid.status != BidStatus::Active || bid.effective_status(now) != BidStatus::Expired {
        return None;
    }

    let before = bid_snapshot(bid);
    let mut expired = bid.clone();
    expired.status = BidStatus::Expired;

    let audit_event = AuditEvent::new(
        Actor::system("bid-reaper"),
        cause,
        Action::new(String::from("ExpireBid"), None),
        bid_subject(bid),
        before,
        bid_snapshot(&expired),
    );
    Some(BidTransition {
        bid: expired,
        audit_event,
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flight-session transitions.
//!
//! Telemetry for an unknown or terminal session is dropped by the caller
//! (reported, never retried); the functions here reject the transition so
//! the caller can log it.

use crate::error::CoreError;
use skyops_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use skyops_domain::{
    Aircraft, Bid, FlightSession, MaintenanceConfig, SessionPhase, TelemetrySample,
};
use time::OffsetDateTime;

/// The result of a successful session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    /// The session after the transition.
    pub session: FlightSession,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

fn session_subject(session: &FlightSession) -> String {
    session
        .session_id
        .map_or_else(|| String::from("session:new"), |id| format!("session:{id}"))
}

fn session_snapshot(session: &FlightSession) -> StateSnapshot {
    StateSnapshot::new(format!(
        "{} bid={} phase={}",
        session_subject(session),
        session.bid_id,
        session.phase
    ))
}

/// Opens a Booked session from a consumed bid and a reserved aircraft.
///
/// # Arguments
///
/// * `bid` - The consumed bid (ids must be persisted)
/// * `aircraft` - The reserved aircraft
/// * `now` - The start instant
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `CoreError::Internal` if the bid or aircraft has no persisted id;
/// sessions can only be opened from canonical records.
pub fn start_session(
    bid: &Bid,
    aircraft: &Aircraft,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<SessionTransition, CoreError> {
    let bid_id = bid
        .bid_id
        .ok_or_else(|| CoreError::Internal(String::from("bid has no persisted id")))?;
    let aircraft_id = aircraft
        .aircraft_id
        .ok_or_else(|| CoreError::Internal(String::from("aircraft has no persisted id")))?;

    let session = FlightSession::new(bid_id, bid.pilot_id, aircraft_id, now);

    let action = Action::new(
        String::from("StartSession"),
        Some(format!(
            "Booked {} for bid {bid_id}",
            aircraft.registration
        )),
    );
    let audit_event = AuditEvent::new(
        actor,
        cause,
        action,
        session_subject(&session),
        StateSnapshot::new(String::from("none")),
        session_snapshot(&session),
    );

    Ok(SessionTransition {
        session,
        audit_event,
    })
}

/// Advances a session on a telemetry sample.
///
/// Booked sessions move to `InFlight` on the first sample; `InFlight`
/// sessions only refresh `last_telemetry_at` (the phase advance is
/// idempotent).
///
/// # Arguments
///
/// * `session` - The session the sample addresses
/// * `sample` - The telemetry sample
/// * `now` - The receipt instant
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTransition` for Completed or
/// terminal sessions; the caller drops the sample.
pub fn record_telemetry(
    session: &FlightSession,
    sample: &TelemetrySample,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<SessionTransition, CoreError> {
    match session.phase {
        SessionPhase::Booked => {
            session.phase.validate_transition(SessionPhase::InFlight)?;
            let before = session_snapshot(session);
            let mut updated = session.clone();
            updated.phase = SessionPhase::InFlight;
            updated.last_telemetry_at = now;

            let action = Action::new(
                String::from("FirstTelemetry"),
                Some(format!("client phase '{}'", sample.phase)),
            );
            let audit_event = AuditEvent::new(
                actor,
                cause,
                action,
                session_subject(session),
                before,
                session_snapshot(&updated),
            );
            Ok(SessionTransition {
                session: updated,
                audit_event,
            })
        }
        SessionPhase::InFlight => {
            let before = session_snapshot(session);
            let mut updated = session.clone();
            updated.last_telemetry_at = now;

            let audit_event = AuditEvent::new(
                actor,
                cause,
                Action::new(String::from("Telemetry"), None),
                session_subject(session),
                before,
                session_snapshot(&updated),
            );
            Ok(SessionTransition {
                session: updated,
                audit_event,
            })
        }
        SessionPhase::Completed | SessionPhase::Abandoned | SessionPhase::Reported => {
            Err(CoreError::DomainViolation(
                skyops_domain::DomainError::InvalidSessionTransition {
                    from: session.phase.as_str().to_owned(),
                    to: SessionPhase::InFlight.as_str().to_owned(),
                },
            ))
        }
    }
}

/// Completes an `InFlight` session on landing detection.
///
/// # Arguments
///
/// * `session` - The session to complete
/// * `landing_rate` - The detected touchdown rate, if the client supplied one
/// * `now` - The landing instant
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTransition` unless the session is
/// `InFlight`.
pub fn complete_on_landing(
    session: &FlightSession,
    landing_rate: Option<i32>,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<SessionTransition, CoreError> {
    session.phase.validate_transition(SessionPhase::Completed)?;

    let before = session_snapshot(session);
    let mut updated = session.clone();
    updated.phase = SessionPhase::Completed;
    updated.last_telemetry_at = now;
    updated.landing_rate = landing_rate;

    let action = Action::new(
        String::from("LandingDetected"),
        landing_rate.map(|rate| format!("{rate} fpm")),
    );
    let audit_event = AuditEvent::new(
        actor,
        cause,
        action,
        session_subject(session),
        before,
        session_snapshot(&updated),
    );
    Ok(SessionTransition {
        session: updated,
        audit_event,
    })
}

/// Marks a Completed session as Reported once its PIREP exists.
///
/// # Arguments
///
/// * `session` - The session to close
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTransition` unless the session is
/// Completed.
pub fn mark_reported(
    session: &FlightSession,
    actor: Actor,
    cause: Cause,
) -> Result<SessionTransition, CoreError> {
    session.phase.validate_transition(SessionPhase::Reported)?;

    let before = session_snapshot(session);
    let mut updated = session.clone();
    updated.phase = SessionPhase::Reported;

    let audit_event = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from("SessionReported"), None),
        session_subject(session),
        before,
        session_snapshot(&updated),
    );
    Ok(SessionTransition {
        session: updated,
        audit_event,
    })
}

/// Abandons a session that has been silent past the idle window.
///
/// Returns `None` when the session is not idle; the sweep skips it.
/// Abandonment releases the aircraft without penalty, which the caller
/// applies alongside the phase change.
///
/// # Arguments
///
/// * `session` - The session to examine
/// * `now` - The sweep instant
/// * `config` - Supplies the idle window
/// * `cause` - The cause or reason for this sweep tick
#[must_use]
pub fn abandon_if_idle(
    session: &FlightSession,
    now: OffsetDateTime,
    config: &MaintenanceConfig,
    cause: Cause,
) -> Option<SessionTransition> {
    if !session.is_idle(now, config.session_idle_window) {
        return None;
    }

    let before = session_snapshot(session);
    let mut updated = session.clone();
    updated.phase = SessionPhase::Abandoned;

    let action = Action::new(
        String::from("AbandonSession"),
        Some(format!(
            "no telemetry since {}",
            session.last_telemetry_at
        )),
    );
    let audit_event = AuditEvent::new(
        Actor::system("session-reaper"),
        cause,
        action,
        session_subject(session),
        before,
        session_snapshot(&updated),
    );
    Some(SessionTransition {
        session: updated,
        audit_event,
    })
}

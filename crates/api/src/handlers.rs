// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the flight lifecycle pipeline.
//!
//! Handlers orchestrate: read current state, ask the core for the
//! transition, persist it, translate errors. `now` is always an explicit
//! argument so TTL and idle-window behaviour is testable without a clock.

use crate::auth::{PilotSession, require_admin};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::proof_policy::resolve_proof;
use crate::request_response::{
    AcarsReportRequest, BidInfo, CancelBidResponse, ConfigInfo, CreateBidRequest,
    CreateBidResponse, FleetAircraftInfo, FleetListResponse, ManualPirepRequest, ReapResponse,
    RegisterAircraftRequest, RepairRequest, RepairResponse, ReportOutcome, ReviewRequest,
    StartSessionRequest, StartSessionResponse, TelemetryRequest, TelemetryResponse,
    UpdateConfigRequest,
};
use rand::RngExt;
use rand::distr::Alphanumeric;
use skyops_audit::{Action, AuditEvent, Cause, StateSnapshot};
use skyops_domain::{
    Aircraft, ApprovalStatus, Bid, BidStatus, DomainError, FlightReport, FlightSpec,
    MaintenanceConfig, Registration, RepairTier, SessionPhase, StationCode, SubmissionChannel,
    is_restricted_aircraft_type, local_day_bounds, validate_aircraft_type,
};
use skyops_persistence::{Persistence, PersistenceError};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

fn parse_station(field: &str, value: &str) -> Result<StationCode, ApiError> {
    StationCode::new(value).map_err(|_| ApiError::InvalidInput {
        field: field.to_owned(),
        message: format!("'{value}' is not a 4-character ICAO station code"),
    })
}

fn bid_info(bid: &Bid, now: OffsetDateTime) -> Result<BidInfo, ApiError> {
    Ok(BidInfo {
        bid_id: bid.bid_id.unwrap_or_default(),
        callsign: bid.spec.callsign.clone(),
        departure: bid.spec.departure.value().to_owned(),
        arrival: bid.spec.arrival.value().to_owned(),
        aircraft_type: bid.spec.aircraft_type.clone(),
        status: bid.effective_status(now).as_str().to_owned(),
        expires_at: skyops_persistence::format_timestamp(bid.expires_at)
            .map_err(translate_persistence_error)?,
    })
}

fn report_outcome(report: &FlightReport) -> ReportOutcome {
    ReportOutcome {
        report_id: report.report_id.unwrap_or_default(),
        status: report.status.as_str().to_owned(),
        is_duplicate: report.is_duplicate,
        message: report
            .status_reason
            .clone()
            .unwrap_or_else(|| String::from("Awaiting review")),
    }
}

/// Whether an Approved/Pending report already exists for this pilot and
/// route on the airline-local calendar day containing `now`.
fn detect_duplicate(
    persistence: &mut Persistence,
    pilot_id: i64,
    departure: &StationCode,
    arrival: &StationCode,
    config: &MaintenanceConfig,
    now: OffsetDateTime,
) -> Result<bool, ApiError> {
    let window =
        local_day_bounds(now, config.airline_timezone).map_err(translate_domain_error)?;
    let count = persistence
        .count_duplicate_reports(pilot_id, departure.value(), arrival.value(), window)
        .map_err(translate_persistence_error)?;
    Ok(count > 0)
}

// ============================================================================
// Bids
// ============================================================================

/// Creates a bid from an imported flight spec.
///
/// # Errors
///
/// Returns an error if the spec is malformed, violates fleet rules, or the
/// pilot already holds an active bid.
pub fn create_bid(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
    request: CreateBidRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<CreateBidResponse, ApiError> {
    let spec = FlightSpec {
        flight_number: request.flight_number,
        callsign: request.callsign,
        departure: parse_station("departure", &request.departure)?,
        arrival: parse_station("arrival", &request.arrival)?,
        aircraft_type: request.aircraft_type.trim().to_uppercase(),
        route: request.route,
        pax: request.pax,
        cargo: request.cargo,
        planned_fuel: request.planned_fuel,
        distance_nm: request.distance_nm,
    };

    // Lazily expire a stale bid so its slot frees before the check.
    let existing = persistence
        .find_active_bid_for_pilot(session.pilot_id)
        .map_err(translate_persistence_error)?;
    if let Some(stale) = &existing
        && stale.effective_status(now) == BidStatus::Expired
        && let Some(stale_id) = stale.bid_id
    {
        persistence
            .expire_bid_if_due(stale_id, now)
            .map_err(translate_persistence_error)?;
    }

    let transition = skyops::create_bid(
        session.pilot_id,
        spec,
        existing.as_ref(),
        now,
        config,
        session.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let bid_id = persistence
        .persist_new_bid(&transition, now)
        .map_err(|err| match err {
            // The unique index caught a concurrent create for this pilot.
            PersistenceError::ConstraintViolation(_) => {
                translate_domain_error(DomainError::DuplicateBid {
                    pilot_id: session.pilot_id,
                })
            }
            other => translate_persistence_error(other),
        })?;

    let mut bid = transition.bid;
    bid.bid_id = Some(bid_id);
    info!(pilot_id = session.pilot_id, bid_id, "bid created");

    Ok(CreateBidResponse {
        bid: bid_info(&bid, now)?,
        message: format!(
            "Bid created: {} {} to {}",
            bid.spec.aircraft_type, bid.spec.departure, bid.spec.arrival
        ),
    })
}

/// Returns the pilot's current bid with lazy expiry applied, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_current_bid(
    persistence: &mut Persistence,
    session: &PilotSession,
    now: OffsetDateTime,
) -> Result<Option<BidInfo>, ApiError> {
    let bid = persistence
        .find_active_bid_for_pilot(session.pilot_id)
        .map_err(translate_persistence_error)?;
    bid.map(|bid| bid_info(&bid, now)).transpose()
}

/// Cancels the pilot's bid. Idempotent on an already-cancelled bid.
///
/// # Errors
///
/// Returns an error if the bid belongs to another pilot, was consumed, or
/// has expired.
pub fn cancel_bid(
    persistence: &mut Persistence,
    session: &PilotSession,
    bid_id: i64,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<CancelBidResponse, ApiError> {
    let bid = persistence
        .get_bid(bid_id)
        .map_err(translate_persistence_error)?;
    if bid.pilot_id != session.pilot_id && !session.is_admin {
        return Err(ApiError::Unauthorized {
            action: String::from("cancel another pilot's bid"),
        });
    }

    let transition = skyops::cancel_bid(&bid, now, session.to_audit_actor(), cause)
        .map_err(translate_core_error)?;

    if let Some(transition) = transition {
        persistence
            .persist_bid_transition(&transition, now)
            .map_err(translate_persistence_error)?;
    }

    Ok(CancelBidResponse {
        bid_id,
        status: BidStatus::Cancelled.as_str().to_owned(),
        message: String::from("Bid cancelled"),
    })
}

// ============================================================================
// Flight sessions
// ============================================================================

/// Opens a flight session: consumes the bid and books an available
/// aircraft at the departure station.
///
/// # Errors
///
/// Returns an error if the bid is expired/consumed, belongs to another
/// pilot, or no matching aircraft is bookable.
pub fn start_acars_session(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
    request: StartSessionRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<StartSessionResponse, ApiError> {
    persistence
        .expire_bid_if_due(request.bid_id, now)
        .map_err(translate_persistence_error)?;
    let bid = persistence
        .get_bid(request.bid_id)
        .map_err(translate_persistence_error)?;
    if bid.pilot_id != session.pilot_id {
        return Err(ApiError::Unauthorized {
            action: String::from("fly another pilot's bid"),
        });
    }

    let actor = session.to_audit_actor();
    let consume = skyops::consume_bid(&bid, now, actor.clone(), cause.clone())
        .map_err(translate_core_error)?;

    let candidates = persistence
        .find_available_aircraft(bid.spec.departure.value(), &bid.spec.aircraft_type, config)
        .map_err(translate_persistence_error)?;
    let aircraft = candidates.first().ok_or_else(|| {
        translate_domain_error(DomainError::NoAircraftAvailable {
            station: bid.spec.departure.value().to_owned(),
            aircraft_type: bid.spec.aircraft_type.clone(),
        })
    })?;

    let start = skyops::start_session(&consume.bid, aircraft, now, actor, cause)
        .map_err(translate_core_error)?;
    let session_id = persistence
        .persist_session_start(&consume, &start, now)
        .map_err(translate_persistence_error)?;

    info!(
        pilot_id = session.pilot_id,
        session_id,
        registration = %aircraft.registration,
        "flight session opened"
    );

    Ok(StartSessionResponse {
        session_id,
        registration: aircraft.registration.value().to_owned(),
        message: format!(
            "Session opened; {} reserved at {}",
            aircraft.registration, bid.spec.departure
        ),
    })
}

/// Ingests one telemetry sample.
///
/// Samples for unknown or terminal sessions are dropped and reported, not
/// retried: the response carries `accepted = false` and a reason.
///
/// # Errors
///
/// Returns an error only for storage failures; bad samples are drops.
pub fn post_telemetry(
    persistence: &mut Persistence,
    session: &PilotSession,
    request: TelemetryRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<TelemetryResponse, ApiError> {
    let stored = match persistence.get_session(request.session_id) {
        Ok(stored) => stored,
        Err(PersistenceError::NotFound(_)) => {
            warn!(session_id = request.session_id, "telemetry for unknown session dropped");
            return Ok(TelemetryResponse {
                accepted: false,
                reason: Some(format!("Session {} is unknown", request.session_id)),
            });
        }
        Err(other) => return Err(translate_persistence_error(other)),
    };

    let sample = skyops_domain::TelemetrySample {
        latitude: request.latitude,
        longitude: request.longitude,
        phase: request.phase,
        landing_rate: request.landing_rate,
        recorded_at: now,
    };

    let was_booked = stored.phase == SessionPhase::Booked;
    match skyops::record_telemetry(&stored, &sample, now, session.to_audit_actor(), cause) {
        Ok(transition) => {
            persistence
                .persist_telemetry(&transition, was_booked, now)
                .map_err(translate_persistence_error)?;
            Ok(TelemetryResponse {
                accepted: true,
                reason: None,
            })
        }
        Err(err) => {
            debug!(
                session_id = request.session_id,
                error = %err,
                "telemetry sample dropped"
            );
            Ok(TelemetryResponse {
                accepted: false,
                reason: Some(translate_core_error(err).to_string()),
            })
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Files the automatic-channel report at landing: completes the session,
/// creates the PIREP, adjudicates it, and settles or rejects immediately.
///
/// # Errors
///
/// Returns an error if the session is not in flight, structural validation
/// fails, or settlement cannot be applied.
#[allow(clippy::too_many_lines)]
pub fn submit_acars_report(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
    request: AcarsReportRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<ReportOutcome, ApiError> {
    let stored = persistence
        .get_session(request.session_id)
        .map_err(translate_persistence_error)?;
    if stored.pilot_id != session.pilot_id {
        return Err(ApiError::Unauthorized {
            action: String::from("report another pilot's session"),
        });
    }

    let actor = session.to_audit_actor();
    let landing = skyops::complete_on_landing(
        &stored,
        request.landing_rate,
        now,
        actor.clone(),
        cause.clone(),
    )
    .map_err(translate_core_error)?;
    persistence
        .persist_landing(&landing, now)
        .map_err(translate_persistence_error)?;

    let bid = persistence
        .get_bid(stored.bid_id)
        .map_err(translate_persistence_error)?;

    let is_duplicate = detect_duplicate(
        persistence,
        session.pilot_id,
        &bid.spec.departure,
        &bid.spec.arrival,
        config,
        now,
    )?;

    let mut report = FlightReport {
        report_id: None,
        session_id: stored.session_id,
        bid_id: Some(stored.bid_id),
        pilot_id: session.pilot_id,
        flight_number: bid.spec.flight_number.clone(),
        callsign: bid.spec.callsign.clone(),
        departure: bid.spec.departure.clone(),
        arrival: bid.spec.arrival.clone(),
        aircraft_type: bid.spec.aircraft_type.clone(),
        aircraft_id: Some(stored.aircraft_id),
        flight_time_minutes: request.flight_time_minutes,
        landing_rate: request.landing_rate,
        channel: SubmissionChannel::Automatic,
        proof: None,
        comments: request.comments,
        is_duplicate,
        status: ApprovalStatus::Pending,
        status_reason: None,
        revenue_passenger: request.revenue_passenger,
        revenue_cargo: request.revenue_cargo,
        expense_fuel: request.expense_fuel,
        expense_airport: request.expense_airport,
        expense_pilot: request.expense_pilot,
        expense_maintenance: request.expense_maintenance,
        submitted_at: now,
        resolved_at: None,
        reviewed_by: None,
    };

    let verdict =
        skyops::adjudicate(&report, is_duplicate, config).map_err(translate_core_error)?;
    report.status_reason = Some(verdict.reason.clone());

    let file_event = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        Action::new(String::from("FileReport"), Some(verdict.reason.clone())),
        String::from("report:new"),
        StateSnapshot::new(format!("session:{} phase=completed", request.session_id)),
        StateSnapshot::new(String::from("report status=pending")),
    );
    let report_id = persistence
        .persist_report(&report, &file_event, now)
        .map_err(translate_persistence_error)?;
    report.report_id = Some(report_id);

    let reported = skyops::mark_reported(&landing.session, actor.clone(), cause.clone())
        .map_err(translate_core_error)?;
    persistence
        .persist_session_reported(&reported, now)
        .map_err(translate_persistence_error)?;

    let final_report = match verdict.outcome {
        skyops::AdjudicationOutcome::Approved => {
            let outcome = persistence
                .settle_report(report_id, &verdict.reason, None, config, &actor, &cause, now)
                .map_err(translate_persistence_error)?;
            info!(
                report_id,
                net_profit = outcome.settlement.net_profit,
                grounded = outcome.aircraft_grounded,
                "report auto-approved and settled"
            );
            outcome.report
        }
        skyops::AdjudicationOutcome::Rejected => {
            let reject_event = AuditEvent::new(
                actor,
                cause,
                Action::new(String::from("RejectReport"), Some(verdict.reason.clone())),
                format!("report:{report_id}"),
                StateSnapshot::new(format!("report:{report_id} status=pending")),
                StateSnapshot::new(format!("report:{report_id} status=rejected")),
            );
            let rejected = persistence
                .reject_report(report_id, &verdict.reason, None, &reject_event, now)
                .map_err(translate_persistence_error)?;
            warn!(report_id, reason = %verdict.reason, "report auto-rejected");
            rejected
        }
        skyops::AdjudicationOutcome::Held => {
            info!(report_id, "report held for review");
            report
        }
    };

    Ok(report_outcome(&final_report))
}

/// Submits a manual PIREP: proof required, always held Pending for staff.
///
/// # Errors
///
/// Returns an error if proof is missing/ambiguous, the tracker link is not
/// allow-listed, or the report violates fleet rules.
pub fn submit_manual_pirep(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
    request: ManualPirepRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<ReportOutcome, ApiError> {
    let proof = resolve_proof(request.tracker_link.as_deref(), request.proof_image.as_deref())?;

    let pilot = persistence
        .get_pilot(session.pilot_id)
        .map_err(translate_persistence_error)?;

    let departure = parse_station("departure", &request.departure)?;
    let arrival = parse_station("arrival", &request.arrival)?;

    let flight_number = request
        .flight_number
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(generated_flight_number);
    let callsign = request
        .callsign
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| pilot.pilot_code.clone());

    let is_duplicate =
        detect_duplicate(persistence, session.pilot_id, &departure, &arrival, config, now)?;

    let mut report = FlightReport {
        report_id: None,
        session_id: None,
        bid_id: None,
        pilot_id: session.pilot_id,
        flight_number,
        callsign,
        departure,
        arrival,
        aircraft_type: request.aircraft_type.trim().to_uppercase(),
        aircraft_id: None,
        flight_time_minutes: request.flight_time_minutes,
        landing_rate: request.landing_rate,
        channel: SubmissionChannel::Manual,
        proof: Some(proof),
        comments: request.comments,
        is_duplicate,
        status: ApprovalStatus::Pending,
        status_reason: None,
        // Manual submissions carry no client-computed economics; a staff
        // approval settles zeros into the ledger apart from hours.
        revenue_passenger: 0,
        revenue_cargo: 0,
        expense_fuel: 0,
        expense_airport: 0,
        expense_pilot: 0,
        expense_maintenance: 0,
        submitted_at: now,
        resolved_at: None,
        reviewed_by: None,
    };

    let verdict =
        skyops::adjudicate(&report, is_duplicate, config).map_err(translate_core_error)?;
    report.status_reason = Some(verdict.reason.clone());

    let file_event = AuditEvent::new(
        session.to_audit_actor(),
        cause,
        Action::new(
            String::from("FileManualReport"),
            Some(verdict.reason.clone()),
        ),
        String::from("report:new"),
        StateSnapshot::new(String::from("none")),
        StateSnapshot::new(String::from("report status=pending")),
    );
    let report_id = persistence
        .persist_report(&report, &file_event, now)
        .map_err(translate_persistence_error)?;
    report.report_id = Some(report_id);

    info!(report_id, pilot_id = session.pilot_id, is_duplicate, "manual PIREP filed");

    Ok(report_outcome(&report))
}

/// Returns the outcome view of a report.
///
/// # Errors
///
/// Returns an error if the report does not exist.
pub fn get_report_outcome(
    persistence: &mut Persistence,
    report_id: i64,
) -> Result<ReportOutcome, ApiError> {
    let report = persistence
        .get_report(report_id)
        .map_err(translate_persistence_error)?;
    Ok(report_outcome(&report))
}

/// Applies a reviewer's decision to a Pending report.
///
/// Repeating an already-applied decision is a no-op; a conflicting
/// decision on a terminal report is rejected.
///
/// # Errors
///
/// Returns an error if the caller is not staff or the transition is not
/// permitted.
pub fn review_report(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
    report_id: i64,
    request: ReviewRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<ReportOutcome, ApiError> {
    require_admin(session, "review a report")?;

    let report = persistence
        .get_report(report_id)
        .map_err(translate_persistence_error)?;
    let requested = if request.approve {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Rejected
    };

    if report.status.is_terminal() {
        if report.status == requested {
            // Single transition already happened; repeating it is a no-op.
            return Ok(report_outcome(&report));
        }
        return Err(translate_domain_error(DomainError::InvalidReportTransition {
            from: report.status.as_str().to_owned(),
            to: requested.as_str().to_owned(),
        }));
    }

    let actor = session.to_audit_actor();
    let final_report = if request.approve {
        let reason = request
            .reason
            .unwrap_or_else(|| String::from("Approved by staff review"));
        let outcome = persistence
            .settle_report(
                report_id,
                &reason,
                Some(session.pilot_id),
                config,
                &actor,
                &cause,
                now,
            )
            .map_err(translate_persistence_error)?;
        info!(report_id, reviewer = session.pilot_id, "report approved by review");
        outcome.report
    } else {
        let reason = request
            .reason
            .unwrap_or_else(|| String::from("Rejected by staff review"));
        let reject_event = AuditEvent::new(
            actor,
            cause,
            Action::new(String::from("RejectReport"), Some(reason.clone())),
            format!("report:{report_id}"),
            StateSnapshot::new(format!("report:{report_id} status=pending")),
            StateSnapshot::new(format!("report:{report_id} status=rejected")),
        );
        let rejected = persistence
            .reject_report(
                report_id,
                &reason,
                Some(session.pilot_id),
                &reject_event,
                now,
            )
            .map_err(translate_persistence_error)?;
        info!(report_id, reviewer = session.pilot_id, "report rejected by review");
        rejected
    };

    Ok(report_outcome(&final_report))
}

/// Lists the Pending review queue, oldest first.
///
/// # Errors
///
/// Returns an error if the caller is not staff.
pub fn list_pending_reports(
    persistence: &mut Persistence,
    session: &PilotSession,
) -> Result<Vec<ReportOutcome>, ApiError> {
    require_admin(session, "list the review queue")?;
    let reports = persistence
        .list_pending_reports()
        .map_err(translate_persistence_error)?;
    Ok(reports.iter().map(report_outcome).collect())
}

// ============================================================================
// Fleet & economics
// ============================================================================

/// The maintenance listing: fleet state, per-airframe FULL repair cost,
/// and the vault balance.
///
/// # Errors
///
/// Returns an error if the caller is not staff.
pub fn list_fleet(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
) -> Result<FleetListResponse, ApiError> {
    require_admin(session, "view the maintenance listing")?;

    let fleet = persistence
        .list_fleet()
        .map_err(translate_persistence_error)?;
    let vault_balance = persistence
        .vault_balance()
        .map_err(translate_persistence_error)?;

    let fleet = fleet
        .iter()
        .map(|aircraft| {
            let (_, repair_cost) = skyops::repair_cost(aircraft.condition, RepairTier::Full, config);
            FleetAircraftInfo {
                registration: aircraft.registration.value().to_owned(),
                aircraft_type: aircraft.aircraft_type.clone(),
                current_location: aircraft.current_location.value().to_owned(),
                condition: aircraft.condition,
                status: aircraft.status.as_str().to_owned(),
                repair_cost,
                is_grounded: aircraft.is_grounded(),
                total_hours: aircraft.total_hours,
                flight_count: aircraft.flight_count,
            }
        })
        .collect();

    Ok(FleetListResponse {
        fleet,
        vault_balance,
        repair_rate_per_percent: config.repair_rate_per_percent,
        grounded_threshold: config.grounded_threshold,
    })
}

/// Registers a new fleet aircraft: full condition, Available, at home.
///
/// # Errors
///
/// Returns an error if the caller is not staff, the fields are malformed,
/// the type is restricted, or the registration already exists.
pub fn register_aircraft(
    persistence: &mut Persistence,
    session: &PilotSession,
    request: RegisterAircraftRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<FleetAircraftInfo, ApiError> {
    require_admin(session, "register an aircraft")?;

    let registration =
        Registration::new(&request.registration).map_err(translate_domain_error)?;
    let aircraft_type = request.aircraft_type.trim().to_uppercase();
    validate_aircraft_type(&aircraft_type).map_err(translate_domain_error)?;
    if is_restricted_aircraft_type(&aircraft_type) {
        return Err(translate_domain_error(DomainError::FleetViolation {
            aircraft_type,
        }));
    }
    let home = parse_station("home_location", &request.home_location)?;

    let aircraft = Aircraft::new(registration.clone(), aircraft_type, home);
    persistence.insert_aircraft(&aircraft).map_err(|err| match err {
        PersistenceError::ConstraintViolation(_) => {
            translate_domain_error(DomainError::DuplicateRegistration {
                registration: registration.value().to_owned(),
            })
        }
        other => translate_persistence_error(other),
    })?;

    let event = AuditEvent::new(
        session.to_audit_actor(),
        cause,
        Action::new(String::from("RegisterAircraft"), None),
        format!("aircraft:{registration}"),
        StateSnapshot::new(String::from("none")),
        StateSnapshot::new(format!("aircraft:{registration} condition=100.0 status=available")),
    );
    persistence
        .persist_audit_event(&event, now)
        .map_err(translate_persistence_error)?;

    Ok(FleetAircraftInfo {
        registration: aircraft.registration.value().to_owned(),
        aircraft_type: aircraft.aircraft_type.clone(),
        current_location: aircraft.current_location.value().to_owned(),
        condition: aircraft.condition,
        status: aircraft.status.as_str().to_owned(),
        repair_cost: 0,
        is_grounded: false,
        total_hours: 0.0,
        flight_count: 0,
    })
}

/// Repairs an aircraft to the requested tier, paid from the vault.
///
/// # Errors
///
/// Returns an error if the caller is not staff, the tier is unknown, the
/// registration is unknown, or the vault cannot afford the repair.
pub fn repair_aircraft(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    session: &PilotSession,
    registration: &str,
    request: RepairRequest,
    now: OffsetDateTime,
    cause: Cause,
) -> Result<RepairResponse, ApiError> {
    require_admin(session, "repair an aircraft")?;

    let tier: RepairTier = request
        .repair_type
        .parse()
        .map_err(translate_domain_error)?;
    let normalized = registration.trim().to_uppercase();

    let outcome = persistence
        .repair_aircraft(
            &normalized,
            tier,
            config,
            &session.to_audit_actor(),
            &cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    info!(
        registration = %normalized,
        cost = outcome.cost,
        condition = outcome.aircraft.condition,
        "aircraft repaired"
    );

    Ok(RepairResponse {
        registration: normalized,
        condition: outcome.aircraft.condition,
        status: outcome.aircraft.status.as_str().to_owned(),
        cost: outcome.cost,
        vault_balance: outcome.vault_balance,
        message: format!(
            "{} repair complete: condition {:.1}, {} credits debited",
            tier.as_str(),
            outcome.aircraft.condition,
            outcome.cost
        ),
    })
}

// ============================================================================
// Background sweep
// ============================================================================

/// One sweep tick: expires over-TTL bids and abandons idle sessions.
///
/// List-freshness only; lazy checks at read/consume keep correctness
/// independent of this cadence.
///
/// # Errors
///
/// Returns an error if a sweep query fails; individual lost races are
/// skipped, not errors.
pub fn reap_lifecycle(
    persistence: &mut Persistence,
    config: &MaintenanceConfig,
    now: OffsetDateTime,
) -> Result<ReapResponse, ApiError> {
    let bids_expired = persistence
        .reap_expired_bids(now)
        .map_err(translate_persistence_error)?;

    let cutoff = now - config.session_idle_window;
    let candidates = persistence
        .list_idle_sessions(cutoff)
        .map_err(translate_persistence_error)?;

    let mut sessions_abandoned = 0;
    for candidate in candidates {
        let cause = Cause::new(
            String::from("session-reaper"),
            String::from("idle-session sweep"),
        );
        let Some(transition) = skyops::abandon_if_idle(&candidate, now, config, cause) else {
            continue;
        };
        match persistence.persist_abandonment(&transition, candidate.phase, now) {
            Ok(()) => sessions_abandoned += 1,
            Err(PersistenceError::InvalidState(message)) => {
                // The session advanced between the list and the sweep.
                debug!(%message, "abandonment skipped");
            }
            Err(other) => return Err(translate_persistence_error(other)),
        }
    }

    if bids_expired > 0 || sessions_abandoned > 0 {
        info!(bids_expired, sessions_abandoned, "lifecycle sweep");
    }

    Ok(ReapResponse {
        bids_expired,
        sessions_abandoned,
    })
}

// ============================================================================
// Configuration
// ============================================================================

/// The current maintenance configuration.
#[must_use]
pub fn get_config(config: &MaintenanceConfig) -> ConfigInfo {
    ConfigInfo {
        grounded_threshold: config.grounded_threshold,
        grounding_margin: config.grounding_margin,
        repair_rate_per_percent: config.repair_rate_per_percent,
        auto_reject_landing_rate: config.auto_reject_landing_rate,
        bid_ttl_hours: config.bid_ttl.whole_hours(),
        session_idle_minutes: config.session_idle_window.whole_minutes(),
        airline_timezone: config.airline_timezone.name().to_owned(),
    }
}

/// Builds the hot-reloaded configuration from an admin request.
///
/// The caller swaps the returned value into the shared config handle.
///
/// # Errors
///
/// Returns an error if the caller is not staff or a field fails to parse.
pub fn update_config(
    session: &PilotSession,
    current: &MaintenanceConfig,
    request: UpdateConfigRequest,
) -> Result<MaintenanceConfig, ApiError> {
    require_admin(session, "update the maintenance configuration")?;

    let mut updated = current.clone();
    if let Some(value) = request.grounded_threshold {
        updated.grounded_threshold = value;
    }
    if let Some(value) = request.grounding_margin {
        updated.grounding_margin = value;
    }
    if let Some(value) = request.repair_rate_per_percent {
        updated.repair_rate_per_percent = value;
    }
    if let Some(value) = request.auto_reject_landing_rate {
        updated.auto_reject_landing_rate = value;
    }
    if let Some(value) = request.bid_ttl_hours {
        updated.bid_ttl = time::Duration::hours(value);
    }
    if let Some(value) = request.session_idle_minutes {
        updated.session_idle_window = time::Duration::minutes(value);
    }
    if let Some(value) = request.airline_timezone {
        updated.airline_timezone = value
            .parse()
            .map_err(|_| translate_domain_error(DomainError::InvalidTimezone(value.clone())))?;
    }

    Ok(updated)
}

/// Generates a flight number for manual submissions without one.
fn generated_flight_number() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("MAN-{suffix}")
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the skyops virtual airline backend.
//!
//! Built on Diesel over `SQLite`. The two truly contended values, aircraft
//! condition and the vault balance, are guarded by optimistic concurrency:
//! condition writes are compare-and-swap on a version column, vault writes
//! are single-statement increments, and the repair debit is conditional on
//! affordability. Settlement applies the aircraft-side and money-side
//! effects of an approved report in ONE transaction; a report is never left
//! Approved with partial ledger effects.
//!
//! ## Testing
//!
//! Standard tests run against unique in-memory databases; names come from
//! an atomic counter so parallel tests never share state.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::debug;

use skyops::{BidTransition, SessionTransition, Settlement};
use skyops_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use skyops_domain::{
    Aircraft, AircraftStatus, ApprovalStatus, Bid, BidStatus, FlightReport, FlightSession,
    MaintenanceConfig, Pilot, RepairTier, SessionPhase,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{format_timestamp, parse_timestamp};
pub use error::PersistenceError;

/// Embedded schema migrations, applied at connection time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Atomic counter for unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a sequential id, so parallel
/// tests are isolated without time-based name collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// How many times a lost condition compare-and-swap is retried internally
/// before `ConcurrentModification` surfaces to the caller.
const CAS_RETRY_ATTEMPTS: u32 = 3;

/// The result of a completed settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOutcome {
    /// The report after settlement (Approved).
    pub report: FlightReport,
    /// The ledger numbers that were applied.
    pub settlement: Settlement,
    /// Whether the condition decay grounded the aircraft.
    pub aircraft_grounded: bool,
    /// The vault balance after the credit.
    pub vault_balance: i64,
}

/// The result of a completed repair.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// The aircraft after the repair.
    pub aircraft: Aircraft,
    /// What the repair cost in credits.
    pub cost: i64,
    /// The vault balance after the debit.
    pub vault_balance: i64,
}

/// Persistence adapter for the flight lifecycle pipeline.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter over a unique in-memory `SQLite`
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url = format!("file:skyops_memdb_{db_id}?mode=memory&cache=shared");
        let conn = initialize_database(&url)?;
        let mut persistence = Self { conn };
        persistence.verify_foreign_key_enforcement()?;
        Ok(persistence)
    }

    /// Creates a persistence adapter over a file-based `SQLite` database,
    /// with WAL mode enabled for read concurrency.
    ///
    /// # Arguments
    ///
    /// * `path` - The database file path
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;
        let mut conn = initialize_database(path_str)?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")
            .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
        let mut persistence = Self { conn };
        persistence.verify_foreign_key_enforcement()?;
        Ok(persistence)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// This is a startup-time check; referential integrity constraints must
    /// be active before any pipeline mutation runs.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyEnforcementNotEnabled` if the pragma is off.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        #[derive(QueryableByName)]
        struct PragmaRow {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            foreign_keys: i32,
        }

        let row = diesel::sql_query("PRAGMA foreign_keys;")
            .get_result::<PragmaRow>(&mut self.conn)
            .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
        if row.foreign_keys == 1 {
            Ok(())
        } else {
            Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
        }
    }

    // ========================================================================
    // Pilots
    // ========================================================================

    /// Inserts a pilot and returns their id.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` for a duplicate pilot code.
    pub fn insert_pilot(&mut self, pilot: &Pilot) -> Result<i64, PersistenceError> {
        mutations::pilots::insert_pilot(&mut self.conn, pilot)
    }

    /// Retrieves a pilot by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the pilot does not exist.
    pub fn get_pilot(&mut self, pilot_id: i64) -> Result<Pilot, PersistenceError> {
        queries::pilots::get_pilot(&mut self.conn, pilot_id)
    }

    // ========================================================================
    // Fleet
    // ========================================================================

    /// Inserts a fleet aircraft and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` for a duplicate registration.
    pub fn insert_aircraft(&mut self, entry: &Aircraft) -> Result<i64, PersistenceError> {
        mutations::fleet::insert_aircraft(&mut self.conn, entry)
    }

    /// Retrieves an aircraft by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the aircraft does not exist.
    pub fn get_aircraft(&mut self, aircraft_id: i64) -> Result<Aircraft, PersistenceError> {
        queries::fleet::get_aircraft(&mut self.conn, aircraft_id)
    }

    /// Retrieves an aircraft by registration.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the registration is unknown.
    pub fn get_aircraft_by_registration(
        &mut self,
        registration: &str,
    ) -> Result<Aircraft, PersistenceError> {
        queries::fleet::get_aircraft_by_registration(&mut self.conn, registration)
    }

    /// Lists bookable aircraft at a station for a type.
    ///
    /// # Arguments
    ///
    /// * `location` - The departure station
    /// * `aircraft_type` - The requested type code
    /// * `config` - Supplies the grounded threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_available_aircraft(
        &mut self,
        location: &str,
        aircraft_type: &str,
        config: &MaintenanceConfig,
    ) -> Result<Vec<Aircraft>, PersistenceError> {
        queries::fleet::find_available(
            &mut self.conn,
            location,
            aircraft_type,
            config.grounded_threshold,
        )
    }

    /// Lists the whole fleet ordered by registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_fleet(&mut self) -> Result<Vec<Aircraft>, PersistenceError> {
        queries::fleet::list_fleet(&mut self.conn)
    }

    /// Applies a condition delta to an aircraft: clamped to `[0, 100]`,
    /// status recomputed (auto-ground below threshold, hysteresis clear on
    /// repair deltas), compare-and-swap on the condition version with
    /// bounded internal retry.
    ///
    /// # Arguments
    ///
    /// * `registration` - The aircraft to adjust
    /// * `delta` - The signed condition change
    /// * `config` - The maintenance configuration
    /// * `event` - The audit event recording why the condition moved
    /// * `now` - The write instant
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown registration, or
    /// `ConcurrentModification` once retries are exhausted.
    pub fn apply_condition_delta(
        &mut self,
        registration: &str,
        delta: f64,
        config: &MaintenanceConfig,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<Aircraft, PersistenceError> {
        let now_str = format_timestamp(now)?;
        for _ in 0..CAS_RETRY_ATTEMPTS {
            let aircraft =
                queries::fleet::get_aircraft_by_registration(&mut self.conn, registration)?;
            let aircraft_id = aircraft.aircraft_id.ok_or_else(|| {
                PersistenceError::ReconstructionError(String::from("aircraft row without id"))
            })?;
            let new_condition = (aircraft.condition + delta).clamp(0.0, 100.0);
            let new_status = aircraft.status_after_condition_change(new_condition, config);
            let grounded_reason = grounded_reason_for(new_status, new_condition, config);

            let won = self.conn.transaction::<bool, PersistenceError, _>(|conn| {
                let won = mutations::fleet::update_condition_cas(
                    conn,
                    aircraft_id,
                    aircraft.condition_version,
                    new_condition,
                    new_status,
                    grounded_reason.as_deref(),
                )?;
                if won {
                    mutations::audit::insert_audit_event(conn, event, &now_str)?;
                }
                Ok(won)
            })?;

            if won {
                return queries::fleet::get_aircraft_by_registration(&mut self.conn, registration);
            }
            debug!(registration, "condition CAS lost, retrying");
        }
        Err(PersistenceError::ConcurrentModification {
            entity: format!("aircraft:{registration}"),
        })
    }

    // ========================================================================
    // Bids
    // ========================================================================

    /// Persists a freshly created bid with its audit event.
    ///
    /// The partial unique index enforces the single-active-bid invariant;
    /// a concurrent duplicate surfaces as `ConstraintViolation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_new_bid(
        &mut self,
        transition: &BidTransition,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let now_str = format_timestamp(now)?;
        self.conn.transaction(|conn| {
            let bid_id = mutations::bids::insert_bid(conn, &transition.bid)?;
            mutations::audit::insert_audit_event(conn, &transition.audit_event, &now_str)?;
            Ok(bid_id)
        })
    }

    /// Retrieves a bid by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the bid does not exist.
    pub fn get_bid(&mut self, bid_id: i64) -> Result<Bid, PersistenceError> {
        queries::bids::get_bid(&mut self.conn, bid_id)
    }

    /// Retrieves a pilot's stored-Active bid, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_active_bid_for_pilot(
        &mut self,
        pilot_id: i64,
    ) -> Result<Option<Bid>, PersistenceError> {
        queries::bids::find_active_bid_for_pilot(&mut self.conn, pilot_id)
    }

    /// Lazily expires one bid whose TTL has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn expire_bid_if_due(
        &mut self,
        bid_id: i64,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let now_str = format_timestamp(now)?;
        mutations::bids::expire_bid_if_due(&mut self.conn, bid_id, &now_str)
    }

    /// Persists a bid status transition (Cancelled or Expired) decided by
    /// the core rules, with its audit event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the stored bid lost the race and is no
    /// longer in a transitionable state.
    pub fn persist_bid_transition(
        &mut self,
        transition: &BidTransition,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let now_str = format_timestamp(now)?;
        let bid_id = transition.bid.bid_id.ok_or_else(|| {
            PersistenceError::ReconstructionError(String::from("bid transition without id"))
        })?;

        self.conn.transaction(|conn| {
            let won = match transition.bid.status {
                BidStatus::Cancelled => mutations::bids::cancel_bid_cas(conn, bid_id, &now_str)?,
                BidStatus::Expired => mutations::bids::expire_bid_if_due(conn, bid_id, &now_str)?,
                BidStatus::Consumed | BidStatus::Active => {
                    return Err(PersistenceError::InvalidState(format!(
                        "bid {bid_id}: persist_bid_transition cannot write status '{}'",
                        transition.bid.status
                    )));
                }
            };
            if !won {
                return Err(PersistenceError::InvalidState(format!(
                    "bid {bid_id} is no longer active"
                )));
            }
            mutations::audit::insert_audit_event(conn, &transition.audit_event, &now_str)?;
            Ok(())
        })
    }

    /// The periodic sweep: expires every over-TTL Active bid.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn reap_expired_bids(&mut self, now: OffsetDateTime) -> Result<usize, PersistenceError> {
        let now_str = format_timestamp(now)?;
        mutations::bids::reap_expired(&mut self.conn, &now_str)
    }

    // ========================================================================
    // Flight sessions
    // ========================================================================

    /// Persists a session start: consumes the bid, books the aircraft, and
    /// inserts the Booked session in one transaction.
    ///
    /// # Arguments
    ///
    /// * `bid_transition` - The Active→Consumed transition from the core
    /// * `session_transition` - The new session from the core
    /// * `now` - The start instant
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the bid or aircraft lost a race since
    /// the caller read them.
    pub fn persist_session_start(
        &mut self,
        bid_transition: &BidTransition,
        session_transition: &SessionTransition,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let now_str = format_timestamp(now)?;
        let bid_id = bid_transition.bid.bid_id.ok_or_else(|| {
            PersistenceError::ReconstructionError(String::from("bid transition without id"))
        })?;
        let aircraft_id = session_transition.session.aircraft_id;

        self.conn.transaction(|conn| {
            if !mutations::bids::consume_bid_cas(conn, bid_id, &now_str)? {
                return Err(PersistenceError::InvalidState(format!(
                    "bid {bid_id} is no longer consumable"
                )));
            }
            if !mutations::fleet::set_status_cas(
                conn,
                aircraft_id,
                AircraftStatus::Available,
                AircraftStatus::Booked,
            )? {
                return Err(PersistenceError::InvalidState(format!(
                    "aircraft {aircraft_id} is no longer available"
                )));
            }
            let session_id =
                mutations::sessions::insert_session(conn, &session_transition.session)?;
            mutations::audit::insert_audit_event(conn, &bid_transition.audit_event, &now_str)?;
            mutations::audit::insert_audit_event(conn, &session_transition.audit_event, &now_str)?;
            Ok(session_id)
        })
    }

    /// Retrieves a session by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    pub fn get_session(&mut self, session_id: i64) -> Result<FlightSession, PersistenceError> {
        queries::sessions::get_session(&mut self.conn, session_id)
    }

    /// Persists a telemetry advance.
    ///
    /// The Booked→`InFlight` advance writes the phase, moves the aircraft
    /// to `InFlight`, and records the audit event; a same-phase touch only
    /// refreshes the telemetry stamp.
    ///
    /// # Arguments
    ///
    /// * `transition` - The telemetry transition from the core
    /// * `was_booked` - Whether the session read Booked before the sample
    /// * `now` - The receipt instant
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the stored session lost a race.
    pub fn persist_telemetry(
        &mut self,
        transition: &SessionTransition,
        was_booked: bool,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let now_str = format_timestamp(now)?;
        let session_id = transition.session.session_id.ok_or_else(|| {
            PersistenceError::ReconstructionError(String::from("session transition without id"))
        })?;
        let telemetry_at = format_timestamp(transition.session.last_telemetry_at)?;

        if was_booked {
            self.conn.transaction(|conn| {
                if !mutations::sessions::update_phase_cas(
                    conn,
                    session_id,
                    SessionPhase::Booked,
                    SessionPhase::InFlight,
                    &telemetry_at,
                    None,
                )? {
                    return Err(PersistenceError::InvalidState(format!(
                        "session {session_id} is no longer booked"
                    )));
                }
                // The booked aircraft takes off with the first sample.
                mutations::fleet::set_status_cas(
                    conn,
                    transition.session.aircraft_id,
                    AircraftStatus::Booked,
                    AircraftStatus::InFlight,
                )?;
                mutations::audit::insert_audit_event(conn, &transition.audit_event, &now_str)?;
                Ok(())
            })
        } else if mutations::sessions::touch_telemetry(&mut self.conn, session_id, &telemetry_at)? {
            Ok(())
        } else {
            Err(PersistenceError::InvalidState(format!(
                "session {session_id} is no longer in flight"
            )))
        }
    }

    /// Persists a landing: `InFlight`→Completed with the captured rate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the stored session lost a race.
    pub fn persist_landing(
        &mut self,
        transition: &SessionTransition,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let now_str = format_timestamp(now)?;
        let session_id = transition.session.session_id.ok_or_else(|| {
            PersistenceError::ReconstructionError(String::from("session transition without id"))
        })?;
        let telemetry_at = format_timestamp(transition.session.last_telemetry_at)?;

        self.conn.transaction(|conn| {
            if !mutations::sessions::update_phase_cas(
                conn,
                session_id,
                SessionPhase::InFlight,
                SessionPhase::Completed,
                &telemetry_at,
                transition.session.landing_rate,
            )? {
                return Err(PersistenceError::InvalidState(format!(
                    "session {session_id} is not in flight"
                )));
            }
            mutations::audit::insert_audit_event(conn, &transition.audit_event, &now_str)?;
            Ok(())
        })
    }

    /// Persists the Completed→Reported close of a session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the stored session lost a race.
    pub fn persist_session_reported(
        &mut self,
        transition: &SessionTransition,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let now_str = format_timestamp(now)?;
        let session_id = transition.session.session_id.ok_or_else(|| {
            PersistenceError::ReconstructionError(String::from("session transition without id"))
        })?;
        let telemetry_at = format_timestamp(transition.session.last_telemetry_at)?;

        self.conn.transaction(|conn| {
            if !mutations::sessions::update_phase_cas(
                conn,
                session_id,
                SessionPhase::Completed,
                SessionPhase::Reported,
                &telemetry_at,
                transition.session.landing_rate,
            )? {
                return Err(PersistenceError::InvalidState(format!(
                    "session {session_id} is not completed"
                )));
            }
            mutations::audit::insert_audit_event(conn, &transition.audit_event, &now_str)?;
            Ok(())
        })
    }

    /// Persists an abandonment: terminal phase plus the no-penalty aircraft
    /// release, one transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the stored session lost a race.
    pub fn persist_abandonment(
        &mut self,
        transition: &SessionTransition,
        expected_phase: SessionPhase,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let now_str = format_timestamp(now)?;
        let session_id = transition.session.session_id.ok_or_else(|| {
            PersistenceError::ReconstructionError(String::from("session transition without id"))
        })?;
        let telemetry_at = format_timestamp(transition.session.last_telemetry_at)?;

        self.conn.transaction(|conn| {
            if !mutations::sessions::update_phase_cas(
                conn,
                session_id,
                expected_phase,
                SessionPhase::Abandoned,
                &telemetry_at,
                transition.session.landing_rate,
            )? {
                return Err(PersistenceError::InvalidState(format!(
                    "session {session_id} already left phase {expected_phase}"
                )));
            }
            mutations::fleet::release_aircraft(conn, transition.session.aircraft_id, None)?;
            mutations::audit::insert_audit_event(conn, &transition.audit_event, &now_str)?;
            Ok(())
        })
    }

    /// Lists Booked/`InFlight` sessions silent since the cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_idle_sessions(
        &mut self,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<FlightSession>, PersistenceError> {
        let cutoff_str = format_timestamp(cutoff)?;
        queries::sessions::list_idle_candidates(&mut self.conn, &cutoff_str)
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Persists a new report with its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_report(
        &mut self,
        report: &FlightReport,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let now_str = format_timestamp(now)?;
        self.conn.transaction(|conn| {
            let report_id = mutations::reports::insert_report(conn, report)?;
            mutations::audit::insert_audit_event(conn, event, &now_str)?;
            Ok(report_id)
        })
    }

    /// Retrieves a report by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the report does not exist.
    pub fn get_report(&mut self, report_id: i64) -> Result<FlightReport, PersistenceError> {
        queries::reports::get_report(&mut self.conn, report_id)
    }

    /// Counts Approved/Pending reports for the same pilot and route inside
    /// a submission window.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_duplicate_reports(
        &mut self,
        pilot_id: i64,
        departure: &str,
        arrival: &str,
        window: (OffsetDateTime, OffsetDateTime),
    ) -> Result<usize, PersistenceError> {
        let start = format_timestamp(window.0)?;
        let end = format_timestamp(window.1)?;
        queries::reports::count_duplicates(
            &mut self.conn,
            pilot_id,
            departure,
            arrival,
            &start,
            &end,
        )
    }

    /// Lists Pending reports oldest-first for the review queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_reports(&mut self) -> Result<Vec<FlightReport>, PersistenceError> {
        queries::reports::list_pending(&mut self.conn)
    }

    /// Rejects a Pending report: terminal status only, no ledger effect.
    /// The session's aircraft, if any, is released in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the report is no longer Pending.
    pub fn reject_report(
        &mut self,
        report_id: i64,
        reason: &str,
        reviewed_by: Option<i64>,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<FlightReport, PersistenceError> {
        let now_str = format_timestamp(now)?;
        self.conn.transaction(|conn| {
            let report = queries::reports::get_report(conn, report_id)?;
            if !mutations::reports::resolve_report_cas(
                conn,
                report_id,
                ApprovalStatus::Rejected,
                reason,
                &now_str,
                reviewed_by,
            )? {
                return Err(PersistenceError::InvalidState(format!(
                    "report {report_id} is no longer pending"
                )));
            }
            if let Some(aircraft_id) = report.aircraft_id {
                mutations::fleet::release_aircraft(
                    conn,
                    aircraft_id,
                    Some(report.arrival.value()),
                )?;
            }
            mutations::audit::insert_audit_event(conn, event, &now_str)?;
            Ok(())
        })?;
        self.get_report(report_id)
    }

    /// Settles an Approved outcome: aircraft condition decay (version
    /// compare-and-swap), aircraft totals and arrival, pilot balance and
    /// hours, vault credit, and the Pending→Approved report transition, all
    /// in ONE transaction. Either every effect applies or none does.
    ///
    /// A lost condition race retries the whole transaction a bounded number
    /// of times before surfacing `ConcurrentModification`.
    ///
    /// # Arguments
    ///
    /// * `report_id` - The report to settle
    /// * `reason` - Human-readable approval reason
    /// * `reviewed_by` - The reviewer forcing the decision, if manual
    /// * `config` - The maintenance configuration
    /// * `actor` - The actor performing this action
    /// * `cause` - The cause or reason for this action
    /// * `now` - The settlement instant
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the report is no longer Pending, `NotFound`
    /// if a referenced row is missing (the transaction rolls back), or
    /// `ConcurrentModification` once retries are exhausted.
    #[allow(clippy::too_many_arguments)]
    pub fn settle_report(
        &mut self,
        report_id: i64,
        reason: &str,
        reviewed_by: Option<i64>,
        config: &MaintenanceConfig,
        actor: &Actor,
        cause: &Cause,
        now: OffsetDateTime,
    ) -> Result<SettlementOutcome, PersistenceError> {
        let now_str = format_timestamp(now)?;

        for _ in 0..CAS_RETRY_ATTEMPTS {
            let result = self
                .conn
                .transaction::<SettlementOutcome, PersistenceError, _>(|conn| {
                    let report = queries::reports::get_report(conn, report_id)?;
                    if report.status != ApprovalStatus::Pending {
                        return Err(PersistenceError::InvalidState(format!(
                            "report {report_id} is no longer pending"
                        )));
                    }

                    let settlement = skyops::compute_settlement(&report);
                    let mut aircraft_grounded = false;

                    if let Some(aircraft_id) = report.aircraft_id {
                        let aircraft = queries::fleet::get_aircraft(conn, aircraft_id)?;
                        let new_condition =
                            (aircraft.condition + settlement.condition_delta).clamp(0.0, 100.0);
                        let new_status = if new_condition < config.grounded_threshold {
                            AircraftStatus::Grounded
                        } else {
                            AircraftStatus::Available
                        };
                        aircraft_grounded = new_status == AircraftStatus::Grounded;
                        let grounded_reason =
                            grounded_reason_for(new_status, new_condition, config);

                        if !mutations::fleet::update_condition_cas(
                            conn,
                            aircraft_id,
                            aircraft.condition_version,
                            new_condition,
                            new_status,
                            grounded_reason.as_deref(),
                        )? {
                            return Err(PersistenceError::ConcurrentModification {
                                entity: format!("aircraft:{}", aircraft.registration),
                            });
                        }
                        mutations::fleet::apply_flight_totals(
                            conn,
                            aircraft_id,
                            settlement.hours_delta,
                            report.arrival.value(),
                        )?;
                    }

                    mutations::pilots::apply_settlement_credit(
                        conn,
                        report.pilot_id,
                        settlement.net_profit,
                        settlement.hours_delta,
                        report.arrival.value(),
                    )?;
                    mutations::vault::apply_amount(conn, settlement.net_profit)?;

                    if !mutations::reports::resolve_report_cas(
                        conn,
                        report_id,
                        ApprovalStatus::Approved,
                        reason,
                        &now_str,
                        reviewed_by,
                    )? {
                        return Err(PersistenceError::InvalidState(format!(
                            "report {report_id} is no longer pending"
                        )));
                    }

                    let event = AuditEvent::new(
                        actor.clone(),
                        cause.clone(),
                        Action::new(
                            String::from("SettleReport"),
                            Some(format!(
                                "net profit {} credits, condition delta {:.1}",
                                settlement.net_profit, settlement.condition_delta
                            )),
                        ),
                        format!("report:{report_id}"),
                        StateSnapshot::new(format!("report:{report_id} status=pending")),
                        StateSnapshot::new(format!("report:{report_id} status=approved")),
                    );
                    mutations::audit::insert_audit_event(conn, &event, &now_str)?;

                    let vault_balance = queries::vault::balance(conn)?;
                    let settled = queries::reports::get_report(conn, report_id)?;

                    Ok(SettlementOutcome {
                        report: settled,
                        settlement,
                        aircraft_grounded,
                        vault_balance,
                    })
                });

            match result {
                Err(PersistenceError::ConcurrentModification { .. }) => {
                    debug!(report_id, "settlement lost a condition race, retrying");
                }
                other => return other,
            }
        }

        Err(PersistenceError::ConcurrentModification {
            entity: format!("report:{report_id}"),
        })
    }

    // ========================================================================
    // Repairs & vault
    // ========================================================================

    /// Returns the current vault balance in credits.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn vault_balance(&mut self) -> Result<i64, PersistenceError> {
        queries::vault::balance(&mut self.conn)
    }

    /// Repairs an aircraft to a tier target: conditional vault debit and
    /// condition compare-and-swap in one transaction. `InsufficientFunds`
    /// leaves the vault unchanged.
    ///
    /// # Arguments
    ///
    /// * `registration` - The aircraft to repair
    /// * `tier` - The requested repair depth
    /// * `config` - The maintenance configuration
    /// * `actor` - The actor performing this action
    /// * `cause` - The cause or reason for this action
    /// * `now` - The repair instant
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown registration,
    /// `InsufficientFunds` when the vault cannot cover the cost, or
    /// `ConcurrentModification` once retries are exhausted.
    pub fn repair_aircraft(
        &mut self,
        registration: &str,
        tier: RepairTier,
        config: &MaintenanceConfig,
        actor: &Actor,
        cause: &Cause,
        now: OffsetDateTime,
    ) -> Result<RepairOutcome, PersistenceError> {
        let now_str = format_timestamp(now)?;

        for _ in 0..CAS_RETRY_ATTEMPTS {
            let result = self
                .conn
                .transaction::<RepairOutcome, PersistenceError, _>(|conn| {
                    let aircraft =
                        queries::fleet::get_aircraft_by_registration(conn, registration)?;
                    let aircraft_id = aircraft.aircraft_id.ok_or_else(|| {
                        PersistenceError::ReconstructionError(String::from(
                            "aircraft row without id",
                        ))
                    })?;

                    let (target, cost) = skyops::repair_cost(aircraft.condition, tier, config);

                    if cost > 0 && !mutations::vault::debit_if_affordable(conn, cost)? {
                        let available = queries::vault::balance(conn)?;
                        return Err(PersistenceError::InsufficientFunds {
                            required: cost,
                            available,
                        });
                    }

                    let mut new_status = aircraft.status_after_condition_change(target, config);
                    // A repair completes any open maintenance visit.
                    if new_status == AircraftStatus::Maintenance {
                        new_status = AircraftStatus::Available;
                    }

                    if !mutations::fleet::update_condition_cas(
                        conn,
                        aircraft_id,
                        aircraft.condition_version,
                        target,
                        new_status,
                        grounded_reason_for(new_status, target, config).as_deref(),
                    )? {
                        return Err(PersistenceError::ConcurrentModification {
                            entity: format!("aircraft:{registration}"),
                        });
                    }

                    let event = AuditEvent::new(
                        actor.clone(),
                        cause.clone(),
                        Action::new(
                            String::from("RepairAircraft"),
                            Some(format!(
                                "{} repair to {target:.1} for {cost} credits",
                                tier.as_str()
                            )),
                        ),
                        format!("aircraft:{registration}"),
                        StateSnapshot::new(format!(
                            "aircraft:{registration} condition={:.1} status={}",
                            aircraft.condition, aircraft.status
                        )),
                        StateSnapshot::new(format!(
                            "aircraft:{registration} condition={target:.1} status={new_status}"
                        )),
                    );
                    mutations::audit::insert_audit_event(conn, &event, &now_str)?;

                    let vault_balance = queries::vault::balance(conn)?;
                    let repaired =
                        queries::fleet::get_aircraft_by_registration(conn, registration)?;

                    Ok(RepairOutcome {
                        aircraft: repaired,
                        cost,
                        vault_balance,
                    })
                });

            match result {
                Err(PersistenceError::ConcurrentModification { .. }) => {
                    debug!(registration, "repair lost a condition race, retrying");
                }
                other => return other,
            }
        }

        Err(PersistenceError::ConcurrentModification {
            entity: format!("aircraft:{registration}"),
        })
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_audit_event(
        &mut self,
        event: &AuditEvent,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let now_str = format_timestamp(now)?;
        mutations::audit::insert_audit_event(&mut self.conn, event, &now_str)
    }

    /// Attaches an annotation to a terminal report.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn annotate_report(
        &mut self,
        report_id: i64,
        annotation: &skyops_audit::Annotation,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let now_str = format_timestamp(now)?;
        mutations::audit::insert_annotation(&mut self.conn, report_id, annotation, &now_str)
    }

    /// Retrieves the ordered audit timeline for a subject.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(
        &mut self,
        subject: &str,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_timeline(&mut self.conn, subject)
    }
}

/// The stored grounded-reason text for a status/condition pair.
fn grounded_reason_for(
    status: AircraftStatus,
    condition: f64,
    config: &MaintenanceConfig,
) -> Option<String> {
    (status == AircraftStatus::Grounded).then(|| {
        format!(
            "condition {condition:.1} below threshold {:.1}",
            config.grounded_threshold
        )
    })
}

/// Establishes a connection, enables foreign keys, and runs migrations.
fn initialize_database(url: &str) -> Result<SqliteConnection, PersistenceError> {
    let mut conn = SqliteConnection::establish(url)?;
    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    Ok(conn)
}

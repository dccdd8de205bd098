// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the flight lifecycle pipeline.
//!
//! Handlers translate requests into core transitions, persist them, and
//! translate every error into a user-visible reason. Authentication is
//! external: callers arrive with a verified `{pilot_id, is_admin}` session
//! that this crate trusts without re-validating credentials.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod proof_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{PilotSession, require_admin};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    cancel_bid, create_bid, get_config, get_current_bid, get_report_outcome, list_fleet,
    list_pending_reports, post_telemetry, reap_lifecycle, register_aircraft, repair_aircraft,
    review_report, start_acars_session, submit_acars_report, submit_manual_pirep, update_config,
};
pub use proof_policy::{ProofPolicyError, resolve_proof};
pub use request_response::{
    AcarsReportRequest, BidInfo, CancelBidResponse, ConfigInfo, CreateBidRequest,
    CreateBidResponse, FleetAircraftInfo, FleetListResponse, ManualPirepRequest, ReapResponse,
    RegisterAircraftRequest, RepairRequest, RepairResponse, ReportOutcome, ReviewRequest,
    StartSessionRequest, StartSessionResponse, TelemetryRequest, TelemetryResponse,
    UpdateConfigRequest,
};

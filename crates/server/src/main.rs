// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP server for the skyops virtual airline backend.
//!
//! Authentication happens upstream; requests arrive with the verified
//! `X-Pilot-Id` / `X-Pilot-Admin` headers and the handlers trust them.
//! The background reaper sweeps over-TTL bids and idle sessions on a fixed
//! cadence; correctness never depends on it (lazy checks at read/consume
//! carry the TTL semantics).

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{error, info};

use live::LiveEvent;
use skyops_api::{
    AcarsReportRequest, ApiError, CreateBidRequest, ManualPirepRequest, PilotSession,
    RegisterAircraftRequest, RepairRequest, ReviewRequest, StartSessionRequest, TelemetryRequest,
    UpdateConfigRequest,
};
use skyops_audit::Cause;
use skyops_domain::MaintenanceConfig;
use skyops_persistence::Persistence;
use time::OffsetDateTime;

/// How often the background sweep runs.
const REAPER_INTERVAL: Duration = Duration::from_secs(120);

/// skyops server - HTTP server for the virtual airline backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an
    /// in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer behind a mutex for safe concurrent access.
    persistence: Arc<Mutex<Persistence>>,
    /// The hot-reloadable maintenance configuration.
    config: Arc<RwLock<MaintenanceConfig>>,
    /// The live event channel.
    live: broadcast::Sender<LiveEvent>,
}

/// Error payload returned for every rejected request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(err: &ApiError) -> Response {
    let status = match err {
        ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
        ApiError::Conflict { .. } | ApiError::InsufficientFunds { .. } => StatusCode::CONFLICT,
        ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn json_or_error<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(err) => error_response(&err),
    }
}

/// Reads the verified session headers injected by the upstream proxy.
fn session_from_headers(headers: &HeaderMap) -> Result<PilotSession, Response> {
    let pilot_id = headers
        .get("x-pilot-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    error: String::from("Missing or malformed X-Pilot-Id header"),
                }),
            )
                .into_response()
        })?;
    let is_admin = headers
        .get("x-pilot-admin")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"));
    Ok(PilotSession::new(pilot_id, is_admin))
}

fn request_cause(name: &str) -> Cause {
    Cause::new(name.to_owned(), format!("HTTP {name}"))
}

async fn health() -> &'static str {
    "ok"
}

async fn create_bid_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBidRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::create_bid(
        &mut persistence,
        &config,
        &session,
        request,
        OffsetDateTime::now_utc(),
        request_cause("create_bid"),
    );
    if let Ok(response) = &result {
        live::publish(
            &state.live,
            LiveEvent::BidCreated {
                pilot_id: session.pilot_id,
                bid_id: response.bid.bid_id,
            },
        );
    }
    json_or_error(result)
}

async fn current_bid_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut persistence = state.persistence.lock().await;
    json_or_error(skyops_api::get_current_bid(
        &mut persistence,
        &session,
        OffsetDateTime::now_utc(),
    ))
}

async fn cancel_bid_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(bid_id): Path<i64>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::cancel_bid(
        &mut persistence,
        &session,
        bid_id,
        OffsetDateTime::now_utc(),
        request_cause("cancel_bid"),
    );
    if result.is_ok() {
        live::publish(&state.live, LiveEvent::BidCancelled { bid_id });
    }
    json_or_error(result)
}

async fn acars_start_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<StartSessionRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::start_acars_session(
        &mut persistence,
        &config,
        &session,
        request,
        OffsetDateTime::now_utc(),
        request_cause("acars_start"),
    );
    if let Ok(response) = &result {
        live::publish(
            &state.live,
            LiveEvent::SessionOpened {
                session_id: response.session_id,
                registration: response.registration.clone(),
            },
        );
    }
    json_or_error(result)
}

async fn telemetry_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<TelemetryRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut persistence = state.persistence.lock().await;
    json_or_error(skyops_api::post_telemetry(
        &mut persistence,
        &session,
        request,
        OffsetDateTime::now_utc(),
        request_cause("telemetry"),
    ))
}

async fn acars_report_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<AcarsReportRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::submit_acars_report(
        &mut persistence,
        &config,
        &session,
        request,
        OffsetDateTime::now_utc(),
        request_cause("acars_report"),
    );
    if let Ok(outcome) = &result {
        live::publish(
            &state.live,
            LiveEvent::ReportFiled {
                report_id: outcome.report_id,
                status: outcome.status.clone(),
            },
        );
    }
    json_or_error(result)
}

async fn manual_pirep_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<ManualPirepRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::submit_manual_pirep(
        &mut persistence,
        &config,
        &session,
        request,
        OffsetDateTime::now_utc(),
        request_cause("manual_pirep"),
    );
    if let Ok(outcome) = &result {
        live::publish(
            &state.live,
            LiveEvent::ReportFiled {
                report_id: outcome.report_id,
                status: outcome.status.clone(),
            },
        );
    }
    json_or_error(result)
}

async fn report_outcome_route(
    AxumState(state): AxumState<AppState>,
    Path(report_id): Path<i64>,
) -> Response {
    let mut persistence = state.persistence.lock().await;
    json_or_error(skyops_api::get_report_outcome(&mut persistence, report_id))
}

async fn pending_reports_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut persistence = state.persistence.lock().await;
    json_or_error(skyops_api::list_pending_reports(&mut persistence, &session))
}

async fn review_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<i64>,
    Json(request): Json<ReviewRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::review_report(
        &mut persistence,
        &config,
        &session,
        report_id,
        request,
        OffsetDateTime::now_utc(),
        request_cause("review_report"),
    );
    if let Ok(outcome) = &result {
        live::publish(
            &state.live,
            LiveEvent::ReportResolved {
                report_id,
                status: outcome.status.clone(),
            },
        );
    }
    json_or_error(result)
}

async fn fleet_list_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    json_or_error(skyops_api::list_fleet(&mut persistence, &config, &session))
}

async fn register_aircraft_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterAircraftRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut persistence = state.persistence.lock().await;
    json_or_error(skyops_api::register_aircraft(
        &mut persistence,
        &session,
        request,
        OffsetDateTime::now_utc(),
        request_cause("register_aircraft"),
    ))
}

async fn repair_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(registration): Path<String>,
    Json(request): Json<RepairRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let config = state.config.read().await.clone();
    let mut persistence = state.persistence.lock().await;
    let result = skyops_api::repair_aircraft(
        &mut persistence,
        &config,
        &session,
        &registration,
        request,
        OffsetDateTime::now_utc(),
        request_cause("repair_aircraft"),
    );
    if let Ok(response) = &result {
        live::publish(
            &state.live,
            LiveEvent::AircraftRepaired {
                registration: response.registration.clone(),
                condition: response.condition,
            },
        );
    }
    json_or_error(result)
}

async fn get_config_route(AxumState(state): AxumState<AppState>) -> Response {
    let config = state.config.read().await.clone();
    Json(skyops_api::get_config(&config)).into_response()
}

async fn update_config_route(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateConfigRequest>,
) -> Response {
    let session = match session_from_headers(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let current = state.config.read().await.clone();
    match skyops_api::update_config(&session, &current, request) {
        Ok(updated) => {
            let info = skyops_api::get_config(&updated);
            *state.config.write().await = updated;
            info!("maintenance configuration hot-reloaded");
            Json(info).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// Builds the application router.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/bids", post(create_bid_route))
        .route("/api/bids/current", get(current_bid_route))
        .route("/api/bids/{bid_id}", axum::routing::delete(cancel_bid_route))
        .route("/api/acars/start", post(acars_start_route))
        .route("/api/acars/telemetry", post(telemetry_route))
        .route("/api/acars/report", post(acars_report_route))
        .route("/api/pireps/manual", post(manual_pirep_route))
        .route("/api/pireps/{report_id}", get(report_outcome_route))
        .route("/api/admin/pireps", get(pending_reports_route))
        .route("/api/admin/pireps/{report_id}/review", post(review_route))
        .route("/api/admin/fleet", get(fleet_list_route).post(register_aircraft_route))
        .route("/api/admin/fleet/{registration}/repair", post(repair_route))
        .route("/api/admin/config", get(get_config_route).put(update_config_route))
        .route("/api/live", get(live::ws_handler))
        .with_state(state)
}

/// The background sweep: expires over-TTL bids and abandons idle sessions
/// on a fixed cadence. List freshness only.
async fn run_reaper(state: AppState) {
    let mut ticker = tokio::time::interval(REAPER_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let config = state.config.read().await.clone();
        let mut persistence = state.persistence.lock().await;
        match skyops_api::reap_lifecycle(&mut persistence, &config, OffsetDateTime::now_utc()) {
            Ok(response) => {
                if response.bids_expired > 0 || response.sessions_abandoned > 0 {
                    live::publish(
                        &state.live,
                        LiveEvent::LifecycleSwept {
                            bids_expired: response.bids_expired,
                            sessions_abandoned: response.sessions_abandoned,
                        },
                    );
                }
            }
            Err(err) => error!(error = %err, "lifecycle sweep failed"),
        }
    }
}

fn build_state(args: &Args) -> Result<AppState, Box<dyn std::error::Error>> {
    let persistence = match &args.database {
        Some(path) => Persistence::new_with_file(path)?,
        None => Persistence::new_in_memory()?,
    };
    let config = MaintenanceConfig::from_env()?;
    info!(
        grounded_threshold = config.grounded_threshold,
        auto_reject_landing_rate = config.auto_reject_landing_rate,
        timezone = config.airline_timezone.name(),
        "maintenance configuration loaded"
    );

    Ok(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: Arc::new(RwLock::new(config)),
        live: live::channel(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = build_state(&args)?;

    tokio::spawn(run_reaper(state.clone()));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "skyops server listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}

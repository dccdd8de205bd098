// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live state streaming for dispatch and maintenance UIs.
//!
//! Read-only, non-authoritative notifications over WebSocket. Events are
//! facts about what changed in canonical state, never directives: clients
//! must still query the HTTP API for authoritative data, and no commands
//! are accepted over the socket.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::AppState;

/// Maximum number of events buffered in the broadcast channel.
/// Slow clients lose old events rather than stalling the pipeline.
pub const EVENT_BUFFER_SIZE: usize = 100;

/// Live state event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A bid was created.
    BidCreated {
        /// The pilot holding the bid.
        pilot_id: i64,
        /// The bid id.
        bid_id: i64,
    },
    /// A bid was cancelled.
    BidCancelled {
        /// The bid id.
        bid_id: i64,
    },
    /// A flight session opened from a bid.
    SessionOpened {
        /// The session id.
        session_id: i64,
        /// The reserved aircraft's registration.
        registration: String,
    },
    /// A report was filed.
    ReportFiled {
        /// The report id.
        report_id: i64,
        /// The status after adjudication.
        status: String,
    },
    /// A Pending report reached a terminal status.
    ReportResolved {
        /// The report id.
        report_id: i64,
        /// The terminal status.
        status: String,
    },
    /// An aircraft was repaired.
    AircraftRepaired {
        /// The registration.
        registration: String,
        /// Condition after the repair.
        condition: f64,
    },
    /// The background sweep expired bids or abandoned sessions.
    LifecycleSwept {
        /// How many bids expired.
        bids_expired: usize,
        /// How many sessions were abandoned.
        sessions_abandoned: usize,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
}

/// Creates the broadcast channel live events flow through.
#[must_use]
pub fn channel() -> broadcast::Sender<LiveEvent> {
    broadcast::channel(EVENT_BUFFER_SIZE).0
}

/// Publishes an event, ignoring the no-subscribers case.
pub fn publish(sender: &broadcast::Sender<LiveEvent>, event: LiveEvent) {
    if sender.send(event).is_err() {
        debug!("live event dropped: no subscribers");
    }
}

/// Upgrades a connection to the live event stream.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    AxumState(state): AxumState<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.live.subscribe();

    let connected = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
    };
    if let Ok(payload) = serde_json::to_string(&connected)
        && sink.send(Message::Text(payload.into())).await.is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(payload) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sink.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live subscriber lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                // No commands are accepted over the socket; anything but a
                // close frame is ignored.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure transition and decision logic for the flight lifecycle pipeline.
//!
//! Nothing in this crate performs I/O. Every function is a deterministic
//! map from `(current value, config, now)` to either a new value plus an
//! audit event, or a domain error. Atomicity and concurrency control live
//! in the persistence layer; this crate decides *what* should happen.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod adjudicate;
mod bids;
mod error;
mod session;
mod settlement;

#[cfg(test)]
mod tests;

pub use adjudicate::{AdjudicationOutcome, AdjudicationResult, adjudicate, grade_landing};
pub use bids::{
    BidTransition, cancel_bid, consume_bid, create_bid, expire_bid, validate_flight_spec,
};
pub use error::CoreError;
pub use session::{
    SessionTransition, abandon_if_idle, complete_on_landing, mark_reported, record_telemetry,
    start_session,
};
pub use settlement::{
    Settlement, compute_settlement, condition_delta, repair_cost,
};

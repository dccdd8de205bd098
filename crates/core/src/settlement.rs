// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Settlement and repair economics.
//!
//! Settlement is wear-only: condition deltas are always ≤ 0. Repairs are a
//! separate operator-invoked action, never implicit in settlement. The
//! functions here only compute; the persistence layer applies the numbers
//! atomically.

use skyops_domain::{FlightReport, MaintenanceConfig, RepairTier};

/// Baseline condition decay applied to every settled flight, in percent.
const BASE_DECAY_PER_FLIGHT: f64 = 1.5;

/// Landing rates harder than this (more negative) incur an extra penalty.
const HARD_LANDING_KNEE_FPM: i32 = -400;

/// Extra decay per 100 fpm beyond the knee, in percent.
const PENALTY_PER_100_FPM: f64 = 0.5;

/// Ceiling on the hard-landing penalty, in percent.
const MAX_LANDING_PENALTY: f64 = 6.0;

/// The ledger numbers for one approved report.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Condition change for the aircraft flown; always ≤ 0.
    pub condition_delta: f64,
    /// Total revenue in credits.
    pub revenue: i64,
    /// Total expense in credits.
    pub expense: i64,
    /// Net profit in credits, credited to the pilot and the vault.
    pub net_profit: i64,
    /// Flight hours credited to the pilot and the aircraft.
    pub hours_delta: f64,
}

/// Computes the condition decay for a flight.
///
/// A baseline decay applies to every flight; landings harder than the knee
/// add a penalty scaled by severity, capped so a single crash landing does
/// not zero an airframe. An absent landing rate incurs the baseline only.
///
/// # Arguments
///
/// * `landing_rate` - The touchdown rate in fpm, if present
#[must_use]
pub fn condition_delta(landing_rate: Option<i32>) -> f64 {
    let penalty = landing_rate.map_or(0.0, |rate| {
        if rate >= HARD_LANDING_KNEE_FPM {
            0.0
        } else {
            let excess_fpm = f64::from(HARD_LANDING_KNEE_FPM - rate);
            (excess_fpm / 100.0 * PENALTY_PER_100_FPM).min(MAX_LANDING_PENALTY)
        }
    });

    -(BASE_DECAY_PER_FLIGHT + penalty)
}

/// Computes the full settlement for an approved report.
///
/// Revenue and expense come from the report's component fields; nothing is
/// re-derived from route or fuel figures.
///
/// # Arguments
///
/// * `report` - The approved report
#[must_use]
pub fn compute_settlement(report: &FlightReport) -> Settlement {
    Settlement {
        condition_delta: condition_delta(report.landing_rate),
        revenue: report.revenue(),
        expense: report.expense(),
        net_profit: report.net_profit(),
        hours_delta: f64::from(report.flight_time_minutes) / 60.0,
    }
}

/// Computes the target condition and cost of a repair.
///
/// Cost is `(target − current) × repair rate`, rounded up so the vault is
/// never undercharged. A repair that would not raise condition costs
/// nothing and targets the current value.
///
/// # Arguments
///
/// * `current_condition` - The aircraft's condition before the repair
/// * `tier` - The requested repair depth
/// * `config` - The maintenance configuration
///
/// # Returns
///
/// `(target_condition, cost_in_credits)`.
#[must_use]
pub fn repair_cost(
    current_condition: f64,
    tier: RepairTier,
    config: &MaintenanceConfig,
) -> (f64, i64) {
    let target = tier.target_condition(config);
    if target <= current_condition {
        return (current_condition, 0);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let cost = ((target - current_condition) * config.repair_rate_per_percent as f64).ceil() as i64;
    (target, cost)
}

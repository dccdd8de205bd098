// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance and adjudication configuration.
//!
//! Loaded once at startup from the environment; administration may
//! hot-reload it, so consumers read it behind a shared lock rather than
//! copying values at construction time.

use crate::error::DomainError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Process-wide maintenance and adjudication settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceConfig {
    /// Condition below which an aircraft is grounded.
    pub grounded_threshold: f64,
    /// Hysteresis margin: a repair clears grounding only at
    /// `grounded_threshold + grounding_margin` or better.
    pub grounding_margin: f64,
    /// Repair cost per condition percent, in credits.
    pub repair_rate_per_percent: i64,
    /// Landing rates at or below this value (fpm, negative) auto-reject.
    pub auto_reject_landing_rate: i32,
    /// How long a bid stays Active.
    pub bid_ttl: time::Duration,
    /// Telemetry silence after which a session is abandoned.
    pub session_idle_window: time::Duration,
    /// The airline's local timezone, used for duplicate-day detection.
    pub airline_timezone: Tz,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            grounded_threshold: 20.0,
            grounding_margin: 5.0,
            repair_rate_per_percent: 100,
            auto_reject_landing_rate: -700,
            bid_ttl: time::Duration::hours(24),
            session_idle_window: time::Duration::minutes(45),
            airline_timezone: chrono_tz::Asia::Beirut,
        }
    }
}

impl MaintenanceConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for unset keys.
    ///
    /// Recognised keys: `SKYOPS_GROUNDED_THRESHOLD`,
    /// `SKYOPS_GROUNDING_MARGIN`, `SKYOPS_REPAIR_RATE_PER_PERCENT`,
    /// `SKYOPS_AUTO_REJECT_LANDING_RATE`, `SKYOPS_BID_TTL_HOURS`,
    /// `SKYOPS_SESSION_IDLE_MINUTES`, `SKYOPS_AIRLINE_TIMEZONE`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfigValue` if a set key fails to
    /// parse, or `DomainError::InvalidTimezone` for an unknown zone name.
    pub fn from_env() -> Result<Self, DomainError> {
        let mut config = Self::default();

        if let Some(value) = read_env("SKYOPS_GROUNDED_THRESHOLD") {
            config.grounded_threshold = parse_env("SKYOPS_GROUNDED_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("SKYOPS_GROUNDING_MARGIN") {
            config.grounding_margin = parse_env("SKYOPS_GROUNDING_MARGIN", &value)?;
        }
        if let Some(value) = read_env("SKYOPS_REPAIR_RATE_PER_PERCENT") {
            config.repair_rate_per_percent = parse_env("SKYOPS_REPAIR_RATE_PER_PERCENT", &value)?;
        }
        if let Some(value) = read_env("SKYOPS_AUTO_REJECT_LANDING_RATE") {
            config.auto_reject_landing_rate = parse_env("SKYOPS_AUTO_REJECT_LANDING_RATE", &value)?;
        }
        if let Some(value) = read_env("SKYOPS_BID_TTL_HOURS") {
            let hours: i64 = parse_env("SKYOPS_BID_TTL_HOURS", &value)?;
            config.bid_ttl = time::Duration::hours(hours);
        }
        if let Some(value) = read_env("SKYOPS_SESSION_IDLE_MINUTES") {
            let minutes: i64 = parse_env("SKYOPS_SESSION_IDLE_MINUTES", &value)?;
            config.session_idle_window = time::Duration::minutes(minutes);
        }
        if let Some(value) = read_env("SKYOPS_AIRLINE_TIMEZONE") {
            config.airline_timezone = value
                .parse::<Tz>()
                .map_err(|_| DomainError::InvalidTimezone(value))?;
        }

        Ok(config)
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| DomainError::InvalidConfigValue {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}

/// Repair depth requested by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairTier {
    /// Restore condition to the grounded threshold plus hysteresis margin.
    Minimum,
    /// Restore condition to 100.
    Full,
}

impl RepairTier {
    /// The condition this tier restores to.
    ///
    /// # Arguments
    ///
    /// * `config` - The maintenance configuration
    #[must_use]
    pub fn target_condition(&self, config: &MaintenanceConfig) -> f64 {
        match self {
            Self::Minimum => {
                (config.grounded_threshold + config.grounding_margin).min(100.0)
            }
            Self::Full => 100.0,
        }
    }

    /// Returns the string representation of the tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minimum => "MINIMUM",
            Self::Full => "FULL",
        }
    }
}

impl FromStr for RepairTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MINIMUM" => Ok(Self::Minimum),
            "FULL" => Ok(Self::Full),
            _ => Err(DomainError::InvalidRepairTier(s.to_owned())),
        }
    }
}

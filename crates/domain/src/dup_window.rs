// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Airline-local calendar-day window computation.
//!
//! Duplicate detection compares reports submitted on the same calendar day
//! in the airline's local timezone, not in UTC. A pilot filing at 23:30 and
//! again at 00:30 local has flown on two different days even though the
//! submissions are an hour apart.

use crate::error::DomainError;
use chrono::TimeZone;
use chrono_tz::Tz;
use time::OffsetDateTime;

/// Computes the UTC instants bounding the airline-local calendar day that
/// contains `submitted_at`.
///
/// The returned pair is `[start, end)`: the local midnight opening the day
/// and the local midnight opening the next day, both as UTC instants.
///
/// # Arguments
///
/// * `submitted_at` - The submission instant
/// * `tz` - The airline's local timezone
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the instant cannot be
/// represented in the target calendar (end-of-range dates, or a DST gap
/// swallowing local midnight).
pub fn local_day_bounds(
    submitted_at: OffsetDateTime,
    tz: Tz,
) -> Result<(OffsetDateTime, OffsetDateTime), DomainError> {
    let overflow = |operation: &str| DomainError::DateArithmeticOverflow {
        operation: operation.to_owned(),
    };

    // Convert time::OffsetDateTime to a chrono instant in the airline zone.
    let utc = chrono::DateTime::from_timestamp(submitted_at.unix_timestamp(), 0)
        .ok_or_else(|| overflow("converting submission time"))?;
    let local_date = utc.with_timezone(&tz).date_naive();

    let next_date = local_date
        .succ_opt()
        .ok_or_else(|| overflow("advancing to the next calendar day"))?;

    let start_naive = local_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| overflow("constructing local midnight"))?;
    let end_naive = next_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| overflow("constructing next local midnight"))?;

    // `earliest` resolves DST ambiguity deterministically: a repeated local
    // midnight uses its first occurrence, a skipped one has no resolution.
    let start = tz
        .from_local_datetime(&start_naive)
        .earliest()
        .ok_or_else(|| overflow("resolving local midnight in the airline timezone"))?;
    let end = tz
        .from_local_datetime(&end_naive)
        .earliest()
        .ok_or_else(|| overflow("resolving next local midnight in the airline timezone"))?;

    let start_utc = OffsetDateTime::from_unix_timestamp(start.timestamp())
        .map_err(|_| overflow("converting window start"))?;
    let end_utc = OffsetDateTime::from_unix_timestamp(end.timestamp())
        .map_err(|_| overflow("converting window end"))?;

    Ok((start_utc, end_utc))
}

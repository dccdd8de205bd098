// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::local_day_bounds;
use time::macros::datetime;

#[test]
fn test_window_covers_the_local_day() {
    // Beirut is UTC+2 in winter: 2026-01-10 21:00 UTC is 23:00 local.
    let submitted = datetime!(2026-01-10 21:00 UTC);
    let (start, end) = local_day_bounds(submitted, chrono_tz::Asia::Beirut).unwrap();

    // Local midnight 2026-01-10 00:00 +02:00 == 2026-01-09 22:00 UTC.
    assert_eq!(start, datetime!(2026-01-09 22:00 UTC));
    assert_eq!(end, datetime!(2026-01-10 22:00 UTC));
    assert!(start <= submitted && submitted < end);
}

#[test]
fn test_submissions_an_hour_apart_can_fall_on_different_days() {
    let tz = chrono_tz::Asia::Beirut;
    // 23:30 local and 00:30 local the next day.
    let first = datetime!(2026-01-10 21:30 UTC);
    let second = datetime!(2026-01-10 22:30 UTC);

    let (_, first_end) = local_day_bounds(first, tz).unwrap();
    let (second_start, _) = local_day_bounds(second, tz).unwrap();

    assert!(first < first_end);
    assert!(second >= second_start);
    assert_eq!(first_end, second_start);
}

#[test]
fn test_utc_zone_windows_align_with_utc_midnight() {
    let submitted = datetime!(2026-06-15 13:45 UTC);
    let (start, end) = local_day_bounds(submitted, chrono_tz::UTC).unwrap();

    assert_eq!(start, datetime!(2026-06-15 00:00 UTC));
    assert_eq!(end, datetime!(2026-06-16 00:00 UTC));
}

#[test]
fn test_window_is_half_open() {
    let tz = chrono_tz::UTC;
    let at_midnight = datetime!(2026-06-16 00:00 UTC);
    let (start, _) = local_day_bounds(at_midnight, tz).unwrap();

    // A submission exactly at midnight belongs to the opening day.
    assert_eq!(start, at_midnight);
}

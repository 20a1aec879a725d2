//! Period parsing, time-window math and cache key builders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::cache_keys;
use crate::error::Error;

/// Reporting period for historical reconstruction. The bucket width
/// depends on the period: daily points for a week or a month, weekly
/// points for a quarter, monthly points for a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            _ => Err(Error::InvalidOption {
                option: format!(
                    "period '{}'. Valid options: week, month, quarter, year",
                    value
                ),
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        };
        write!(f, "{}", value)
    }
}

fn sub_months(ts: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    ts.checked_sub_months(Months::new(months))
        .unwrap_or(ts - Duration::days(30 * i64::from(months)))
}

fn add_month(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    ts.checked_add_months(Months::new(1))
}

/// Bucket boundaries from `now - period` to `now`, both endpoints
/// inclusive. A week therefore yields 8 points: the series start and one
/// per elapsed day.
pub fn bucket_boundaries(
    period: Period,
    now: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    match period {
        Period::Week => stride_days(now - Duration::days(7), now, 1),
        Period::Month => stride_days(sub_months(now, 1), now, 1),
        Period::Quarter => stride_days(sub_months(now, 3), now, 7),
        Period::Year => stride_months(sub_months(now, 12), now),
    }
}

fn stride_days(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_days: i64,
) -> Vec<DateTime<Utc>> {
    let mut boundaries = Vec::new();
    let mut current = start;
    while current <= end {
        boundaries.push(current);
        current += Duration::days(step_days);
    }
    boundaries
}

fn stride_months(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut boundaries = Vec::new();
    let mut current = start;
    while current <= end {
        boundaries.push(current);
        match add_month(current) {
            Some(next) => current = next,
            None => break,
        }
    }
    boundaries
}

/// `(delta_window_start, boundary]` pairs for each bucket boundary.
/// Consecutive windows share an edge, so per-bucket deltas never double
/// count. The first window reaches one step before the series start.
pub fn bucket_windows(
    period: Period,
    now: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let boundaries = bucket_boundaries(period, now);
    let mut windows = Vec::with_capacity(boundaries.len());

    for (idx, &end) in boundaries.iter().enumerate() {
        let start = if idx == 0 {
            step_back(period, end)
        } else {
            boundaries[idx - 1]
        };
        windows.push((start, end));
    }

    windows
}

fn step_back(period: Period, ts: DateTime<Utc>) -> DateTime<Utc> {
    match period {
        Period::Week | Period::Month => ts - Duration::days(1),
        Period::Quarter => ts - Duration::days(7),
        Period::Year => sub_months(ts, 1),
    }
}

/// `(current_window_start, prior_window_start)` for engagement math: two
/// consecutive, non-overlapping windows of `window_days` each, ending now.
pub fn engagement_windows(
    now: DateTime<Utc>,
    window_days: u32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let current_start = now - Duration::days(i64::from(window_days));
    let prior_start = now - Duration::days(2 * i64::from(window_days));
    (current_start, prior_start)
}

/// `part / whole` in [0, 1]; zero when the denominator is zero.
pub fn ratio(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64
    } else {
        0.0
    }
}

/// `part / whole` in [0, 100]; zero when the denominator is zero.
pub fn percent(part: i64, whole: i64) -> f64 {
    ratio(part, whole) * 100.0
}

pub fn snapshot_cache_key(dao_id: Option<&str>) -> String {
    match dao_id {
        Some(dao_id) => format!("snapshot_{}", dao_id),
        None => cache_keys::SNAPSHOT_GLOBAL.to_string(),
    }
}

pub fn historical_cache_key(period: Period, dao_id: Option<&str>) -> String {
    format!("historical_{}_{}", period, dao_id.unwrap_or("all"))
}

pub fn engagement_cache_key(dao_id: &str) -> String {
    format!("engagement_{}", dao_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn period_parses_known_values_only() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("year".parse::<Period>().unwrap(), Period::Year);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn week_has_eight_inclusive_boundaries() {
        let boundaries = bucket_boundaries(Period::Week, fixed_now());
        assert_eq!(boundaries.len(), 8);
        assert_eq!(boundaries[0], fixed_now() - Duration::days(7));
        assert_eq!(*boundaries.last().unwrap(), fixed_now());
    }

    #[test]
    fn year_has_thirteen_monthly_boundaries() {
        let boundaries = bucket_boundaries(Period::Year, fixed_now());
        assert_eq!(boundaries.len(), 13);
        assert_eq!(*boundaries.last().unwrap(), fixed_now());
    }

    #[test]
    fn boundaries_are_strictly_increasing() {
        for period in
            [Period::Week, Period::Month, Period::Quarter, Period::Year]
        {
            let boundaries = bucket_boundaries(period, fixed_now());
            assert!(boundaries.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn delta_windows_share_edges() {
        for period in
            [Period::Week, Period::Month, Period::Quarter, Period::Year]
        {
            let windows = bucket_windows(period, fixed_now());
            for pair in windows.windows(2) {
                assert_eq!(pair[0].1, pair[1].0);
            }
            for (start, end) in &windows {
                assert!(start < end);
            }
        }
    }

    #[test]
    fn engagement_windows_are_consecutive_and_disjoint() {
        let (current_start, prior_start) = engagement_windows(fixed_now(), 30);
        assert_eq!(current_start - prior_start, Duration::days(30));
        assert_eq!(fixed_now() - current_start, Duration::days(30));
    }

    #[test]
    fn ratio_handles_zero_denominator() {
        assert_eq!(ratio(3, 10), 0.3);
        assert_eq!(ratio(5, 0), 0.0);
        assert_eq!(percent(3, 10), 30.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn cache_keys_distinguish_scopes() {
        assert_eq!(snapshot_cache_key(None), "snapshot_global");
        assert_eq!(snapshot_cache_key(Some("dao-1")), "snapshot_dao-1");
        assert_eq!(
            historical_cache_key(Period::Week, Some("dao-1")),
            "historical_week_dao-1"
        );
        assert_eq!(
            historical_cache_key(Period::Month, None),
            "historical_month_all"
        );
    }
}

/// Price-feed freshness state, recomputed on a 1-second local tick
/// independently of the poll cadence.
use chrono::{DateTime, Utc};

/// Age below which the feed counts as fresh.
pub const FRESH_SECS: i64 = 60;
/// Age below which the feed counts as aging; at or past this it is stale.
pub const AGING_SECS: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    NoData,
    Fresh,
    Aging,
    Stale,
}

/// Render-ready freshness badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessBadge {
    pub state: FreshnessState,
    /// Elapsed seconds since the last update; None only for [`FreshnessState::NoData`].
    pub seconds: Option<i64>,
    pub label: String,
}

/// Evaluate the freshness rules for one tick.
///
/// A dead price thread forces Stale with its own label, regardless of how
/// recent the last update was.
pub fn assess(
    last_update: Option<DateTime<Utc>>,
    thread_alive: bool,
    now: DateTime<Utc>,
) -> FreshnessBadge {
    let Some(last) = last_update else {
        return FreshnessBadge {
            state: FreshnessState::NoData,
            seconds: None,
            label: "no price data yet".to_string(),
        };
    };

    let sec_ago = (now - last).num_seconds();

    if !thread_alive {
        return FreshnessBadge {
            state: FreshnessState::Stale,
            seconds: Some(sec_ago),
            label: format!("price thread down · {}s", sec_ago),
        };
    }

    let state = if sec_ago < FRESH_SECS {
        FreshnessState::Fresh
    } else if sec_ago < AGING_SECS {
        FreshnessState::Aging
    } else {
        FreshnessState::Stale
    };

    FreshnessBadge {
        state,
        seconds: Some(sec_ago),
        label: format!("updated {}s ago", sec_ago),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(sec_ago: i64) -> (Option<DateTime<Utc>>, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 17, 0, 0).unwrap();
        (Some(now - Duration::seconds(sec_ago)), now)
    }

    #[test]
    fn test_no_data() {
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 17, 0, 0).unwrap();
        let badge = assess(None, true, now);
        assert_eq!(badge.state, FreshnessState::NoData);
        assert_eq!(badge.seconds, None);
    }

    #[test]
    fn test_threshold_boundaries() {
        struct TestCase {
            sec_ago: i64,
            expected: FreshnessState,
        }

        let tests = vec![
            // TC0: just inside the fresh window
            TestCase {
                sec_ago: 59,
                expected: FreshnessState::Fresh,
            },
            // TC1: fresh/aging boundary is exclusive
            TestCase {
                sec_ago: 60,
                expected: FreshnessState::Aging,
            },
            // TC2: last aging second
            TestCase {
                sec_ago: 119,
                expected: FreshnessState::Aging,
            },
            // TC3: aging/stale boundary
            TestCase {
                sec_ago: 120,
                expected: FreshnessState::Stale,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let (last, now) = at(test.sec_ago);
            let badge = assess(last, true, now);
            assert_eq!(badge.state, test.expected, "TC{} failed", index);
            assert_eq!(badge.seconds, Some(test.sec_ago), "TC{} seconds", index);
        }
    }

    #[test]
    fn test_dead_thread_forces_stale() {
        let (last, now) = at(5);
        let badge = assess(last, false, now);
        assert_eq!(badge.state, FreshnessState::Stale);
        assert_eq!(badge.seconds, Some(5));
        assert!(badge.label.contains("thread down"));
    }
}

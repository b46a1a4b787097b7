//! Time-window seed derivation
//!
//! Every player in the same UTC hour, day or week gets the same seed, and
//! therefore the same obstacle sequence. Keys are formatted date strings
//! hashed with DJB2 and mapped into a 12-digit range.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the 12-digit seed range
pub const SEED_BASE: u64 = 100_000_000_000;
/// Width of the 12-digit seed range
pub const SEED_SPAN: u64 = 900_000_000_000;

/// Which time window a seed is tied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Normal sessions: one layout per UTC hour
    Hourly,
    /// One layout per UTC calendar day
    Daily,
    /// Weekly challenge: one layout per ISO week (Monday 00:00 UTC)
    Weekly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Hourly => "hourly",
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
        }
    }

    /// Key string hashed for the window containing `at`
    pub fn key(&self, at: DateTime<Utc>) -> String {
        match self {
            Cadence::Hourly => hourly_key(at),
            Cadence::Daily => daily_key(at),
            Cadence::Weekly => weekly_key(at),
        }
    }

    /// Seed for the window containing `at`
    pub fn seed_at(&self, at: DateTime<Utc>) -> u64 {
        seed_from_key(&self.key(at))
    }

    /// Seed for the current window
    pub fn seed_now(&self) -> u64 {
        self.seed_at(Utc::now())
    }
}

/// DJB2 string hash, reduced to unsigned 32 bits.
///
/// Hashes UTF-16 code units so non-ASCII keys agree with browser builds.
pub fn djb2(key: &str) -> u32 {
    key.encode_utf16().fold(5381u32, |hash, unit| {
        hash.wrapping_mul(33).wrapping_add(unit as u32)
    })
}

/// Map a key into the 12-digit seed range
pub fn seed_from_key(key: &str) -> u64 {
    SEED_BASE + (djb2(key) as u64 % SEED_SPAN)
}

/// Narrow a derived seed to the PRNG's 32-bit state
#[inline]
pub fn to_prng_seed(seed: u64) -> u32 {
    seed as u32
}

fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// `HOUR-YYYY-MM-DD-HH` for the UTC hour containing `at`
pub fn hourly_key(at: DateTime<Utc>) -> String {
    format!("HOUR-{}-{:02}", format_date(at.date_naive()), at.hour())
}

/// `YYYY-MM-DD` for the UTC day containing `at`
pub fn daily_key(at: DateTime<Utc>) -> String {
    format_date(at.date_naive())
}

/// Most recent Monday (UTC) at or before `at`
pub fn week_start(at: DateTime<Utc>) -> NaiveDate {
    let date = at.date_naive();
    let days_since_monday = date.weekday().num_days_from_monday();
    date - Duration::days(days_since_monday as i64)
}

/// `WEEK-YYYY-MM-DD` naming the Monday that starts the week containing `at`
pub fn weekly_key(at: DateTime<Utc>) -> String {
    format!("WEEK-{}", format_date(week_start(at)))
}

pub fn hourly_seed_at(at: DateTime<Utc>) -> u64 {
    Cadence::Hourly.seed_at(at)
}

pub fn daily_seed_at(at: DateTime<Utc>) -> u64 {
    Cadence::Daily.seed_at(at)
}

pub fn weekly_seed_at(at: DateTime<Utc>) -> u64 {
    Cadence::Weekly.seed_at(at)
}

pub fn hourly_seed() -> u64 {
    Cadence::Hourly.seed_now()
}

pub fn daily_seed() -> u64 {
    Cadence::Daily.seed_now()
}

pub fn weekly_seed() -> u64 {
    Cadence::Weekly.seed_now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_keys() {
        let at = utc(2026, 1, 22, 8, 41, 5);
        assert_eq!(hourly_key(at), "HOUR-2026-01-22-08");
        assert_eq!(daily_key(at), "2026-01-22");
        // 2026-01-22 is a Thursday
        assert_eq!(weekly_key(at), "WEEK-2026-01-19");
    }

    #[test]
    fn test_golden_seeds() {
        assert_eq!(djb2("HOUR-2026-01-22-08"), 3_996_151_886);
        assert_eq!(seed_from_key("HOUR-2026-01-22-08"), 103_996_151_886);
        assert_eq!(seed_from_key("2026-01-22"), 102_771_398_062);
        assert_eq!(seed_from_key("WEEK-2026-01-19"), 102_876_448_077);
    }

    #[test]
    fn test_hourly_boundary() {
        let before = utc(2026, 1, 22, 8, 59, 59);
        let start = utc(2026, 1, 22, 8, 0, 0);
        let after = utc(2026, 1, 22, 9, 0, 0);
        assert_eq!(hourly_seed_at(before), hourly_seed_at(start));
        assert_ne!(hourly_seed_at(before), hourly_seed_at(after));
        assert_eq!(hourly_seed_at(after), 103_996_151_887);
    }

    #[test]
    fn test_daily_boundary() {
        let late = utc(2026, 1, 22, 23, 59, 59);
        let next = utc(2026, 1, 23, 0, 0, 0);
        assert_eq!(daily_seed_at(late), daily_seed_at(utc(2026, 1, 22, 0, 0, 0)));
        assert_eq!(daily_seed_at(next), 102_771_398_063);
    }

    #[test]
    fn test_weekly_boundary_is_monday_midnight() {
        let sunday_night = utc(2026, 1, 25, 23, 59, 59);
        let monday = utc(2026, 1, 26, 0, 0, 0);
        assert_eq!(weekly_seed_at(sunday_night), weekly_seed_at(utc(2026, 1, 19, 0, 0, 0)));
        assert_eq!(weekly_seed_at(monday), 102_876_448_107);
        assert_eq!(weekly_key(sunday_night), "WEEK-2026-01-19");
    }

    #[test]
    fn test_week_start_across_year_boundary() {
        // 2027-01-01 is a Friday; its week starts in 2026
        assert_eq!(weekly_key(utc(2027, 1, 1, 12, 0, 0)), "WEEK-2026-12-28");
    }

    #[test]
    fn test_to_prng_seed() {
        assert_eq!(to_prng_seed(100_000_000_042), 1_215_752_234);
    }

    proptest! {
        #[test]
        fn seeds_are_twelve_digits(secs in 0i64..4_102_444_800) {
            let at = DateTime::from_timestamp(secs, 0).unwrap();
            for cadence in [Cadence::Hourly, Cadence::Daily, Cadence::Weekly] {
                let seed = cadence.seed_at(at);
                prop_assert!((SEED_BASE..SEED_BASE + SEED_SPAN).contains(&seed));
            }
        }

        #[test]
        fn hourly_seed_stable_within_hour(hour in 0i64..1_000_000, a in 0i64..3600, b in 0i64..3600) {
            let base = hour * 3600;
            let x = DateTime::from_timestamp(base + a, 0).unwrap();
            let y = DateTime::from_timestamp(base + b, 0).unwrap();
            prop_assert_eq!(hourly_seed_at(x), hourly_seed_at(y));
        }

        #[test]
        fn daily_seed_stable_within_day(day in 0i64..40_000, a in 0i64..86_400, b in 0i64..86_400) {
            let base = day * 86_400;
            let x = DateTime::from_timestamp(base + a, 0).unwrap();
            let y = DateTime::from_timestamp(base + b, 0).unwrap();
            prop_assert_eq!(daily_seed_at(x), daily_seed_at(y));
        }

        #[test]
        fn weekly_seed_stable_within_week(week in 0i64..5_000, a in 0i64..604_800, b in 0i64..604_800) {
            // 1970-01-05 was a Monday
            let base = 4 * 86_400 + week * 604_800;
            let x = DateTime::from_timestamp(base + a, 0).unwrap();
            let y = DateTime::from_timestamp(base + b, 0).unwrap();
            prop_assert_eq!(weekly_seed_at(x), weekly_seed_at(y));
        }
    }
}

//! Shared sampling helpers.
//!
//! Everything takes `&mut StdRng`; nothing reaches for thread-local
//! randomness. The helpers here encode the statistically shaped draws the
//! stages share: the hour-of-day peak distribution, uniform dates and
//! timestamps inside a range, and 2-decimal money rounding.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::Rng;

/// Round to 2 decimals, the way every money column in the dataset is stored.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Order hour with lunch/dinner peaks:
/// 40% dinner (19-22), 25% lunch (12-15), 15% snacks (16-18),
/// 10% morning (8-11), 10% late night (23, 0, 1).
pub fn peak_order_hour(rng: &mut StdRng) -> u32 {
    let r: f64 = rng.gen();
    if r < 0.40 {
        rng.gen_range(19..=22)
    } else if r < 0.65 {
        rng.gen_range(12..=15)
    } else if r < 0.80 {
        rng.gen_range(16..=18)
    } else if r < 0.90 {
        rng.gen_range(8..=11)
    } else {
        [23, 0, 1][rng.gen_range(0..3)]
    }
}

/// Uniform date in `[start, end]` (inclusive).
pub fn date_between(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let days = (end - start).num_days();
    start + Duration::days(rng.gen_range(0..=days))
}

/// Uniform timestamp in `[start 00:00:00, end 00:00:00]` at second
/// granularity.
pub fn datetime_between(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> NaiveDateTime {
    let window_secs = (end - start).num_days() * 86_400;
    start.and_time(NaiveTime::MIN) + Duration::seconds(rng.gen_range(0..=window_secs))
}

/// Wall-clock timestamp on `date` at the given hour/minute.
pub fn at_hour_minute(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0)
        .expect("hour < 24 and minute < 60 by construction")
}

/// English day name ("Monday".."Sunday").
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

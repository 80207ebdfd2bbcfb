//! Generation parameters.
//!
//! All knobs are plain fields with defaults matching the reference dataset
//! (one calendar year, 10k users, 500 restaurants, ~300k orders). There is
//! no config file and no environment lookup; the CLI overrides a subset of
//! fields from flags and everything else is code.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// First day of the simulated year (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the simulated year (inclusive).
    pub end_date: NaiveDate,
    pub num_users: usize,
    pub num_restaurants: usize,
    /// Number of cities to take from the curated list (max 50).
    pub num_cities: usize,
    /// Orders the daily scheduler aims for across the whole range. The
    /// realized count differs slightly (growth factor, weekend boost,
    /// bot bursts, skipped empty-menu draws).
    pub target_total_orders: usize,
    /// Fraction of users sampled into the power-user cohort.
    pub power_user_pct: f64,
    /// Fraction of users sampled into the weekend-only cohort.
    pub weekend_user_pct: f64,
    /// Absolute count of bot users (capped by remaining population).
    pub bot_users_count: usize,
    /// Fraction of Delivered orders that receive a review.
    pub review_rate: f64,
    pub sessions_per_user_per_month: usize,
    /// Abandoned carts as a fraction of *all* cart rows.
    pub abandoned_cart_rate: f64,
    /// RNG seed; same seed + same inputs = byte-identical tables.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"),
            num_users: 10_000,
            num_restaurants: 500,
            num_cities: 50,
            target_total_orders: 300_000,
            power_user_pct: 0.20,
            weekend_user_pct: 0.15,
            bot_users_count: 50,
            review_rate: 0.33,
            sessions_per_user_per_month: 8,
            abandoned_cart_rate: 0.30,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Whole days between start and end (364 for a non-leap-aware year range).
    pub fn range_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// A small configuration for tests and smoke runs.
    pub fn tiny() -> Self {
        Self {
            num_users: 10,
            num_restaurants: 5,
            num_cities: 3,
            target_total_orders: 400,
            bot_users_count: 2,
            ..Self::default()
        }
    }
}

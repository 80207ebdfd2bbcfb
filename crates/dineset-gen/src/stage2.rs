//! Stage 2 — transactional tables.
//!
//! Consumes Stage 1 users/restaurants/menu and produces orders, order
//! items, delivery tracking (Delivered orders only, with 5% anomalous
//! delays), and reviews. Order volume follows the same monthly growth
//! factor as signups, with a 1.4x weekend boost and hour-of-day peaks.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;

use dineset_model::{
    DeliveryTracking, GeneratorConfig, MenuItem, Order, OrderItem, Restaurant, Review,
    Stage2Output, User,
};

use crate::sampling::{at_hour_minute, day_name, peak_order_hour, round2};

const DELIVERY_FEES: &[f64] = &[0.0, 0.0, 30.0, 40.0, 50.0, 60.0];
const DISCOUNT_RATES: &[f64] = &[0.0, 0.0, 0.10, 0.15];
/// Discounts only apply above this pre-fee subtotal.
const DISCOUNT_THRESHOLD: f64 = 500.0;
const ITEM_COUNT_WEIGHTS: [f64; 4] = [0.55, 0.30, 0.10, 0.05];
const QUANTITY_CHOICES: &[u32] = &[1, 1, 1, 2];
const PAYMENT_METHODS: &[&str] = &[
    "Credit Card",
    "Debit Card",
    "UPI",
    "UPI",
    "UPI",
    "Cash on Delivery",
];
const RATING_WEIGHTS: [f64; 5] = [0.05, 0.05, 0.15, 0.35, 0.40];
const REVIEW_COMMENTS: &[&str] = &[
    "Great food and quick delivery!",
    "Loved the taste, will order again.",
    "Food was cold when it arrived.",
    "Excellent service and quality.",
    "Not up to the mark, expected better.",
    "Amazing experience!",
    "Decent food, nothing special.",
    "Highly recommended!",
    "Won't order again.",
    "Best restaurant in the area!",
];
/// Only this many bot users actually burst.
const HEAVY_BOT_COUNT: usize = 25;

// ============================================================================
// User cohorts
// ============================================================================

/// Disjoint partition of the user population used to bias order behavior.
#[derive(Debug, Clone, Default)]
pub struct Cohorts {
    pub power: Vec<u32>,
    pub weekend: Vec<u32>,
    pub bots: Vec<u32>,
    pub regular: Vec<u32>,
}

/// Without-replacement split: 20% power, 15% weekend-only, a fixed bot
/// count (capped by what is left), remainder regular.
pub fn segment_users(config: &GeneratorConfig, users: &[User], rng: &mut StdRng) -> Cohorts {
    let mut ids: Vec<u32> = users.iter().map(|u| u.user_id).collect();
    ids.shuffle(rng);

    let num_power = (users.len() as f64 * config.power_user_pct) as usize;
    let num_weekend = (users.len() as f64 * config.weekend_user_pct) as usize;
    let num_bots = config
        .bot_users_count
        .min(ids.len().saturating_sub(num_power + num_weekend));

    let regular = ids.split_off(num_power + num_weekend + num_bots);
    let bots = ids.split_off(num_power + num_weekend);
    let weekend = ids.split_off(num_power);
    Cohorts {
        power: ids,
        weekend,
        bots,
        regular,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Target order count for one calendar day: baseline scaled by the 3%
/// monthly growth factor, 1.4x on weekends.
pub fn daily_order_target(config: &GeneratorConfig, date: NaiveDate) -> usize {
    let days_passed = (date - config.start_date).num_days();
    let month_factor = 1.0 + (days_passed as f64 / 30.0) * 0.03;
    let base = config.target_total_orders as f64 / 365.0;
    let boost = if is_weekend(date) { 1.4 } else { 1.0 };
    (base * boost * month_factor) as usize
}

// ============================================================================
// Stage entrypoint
// ============================================================================

pub fn generate(
    config: &GeneratorConfig,
    users: &[User],
    restaurants: &[Restaurant],
    menu: &[MenuItem],
    rng: &mut StdRng,
) -> Result<Stage2Output> {
    if users.is_empty() {
        return Err(anyhow!("stage2 requires at least one user"));
    }
    if restaurants.is_empty() {
        return Err(anyhow!("stage2 requires at least one restaurant"));
    }

    let user_by_id: HashMap<u32, &User> = users.iter().map(|u| (u.user_id, u)).collect();

    // Active restaurants, globally and per city, as indices into `restaurants`.
    let mut active_by_city: HashMap<u32, Vec<usize>> = HashMap::new();
    let mut active: Vec<usize> = Vec::new();
    for (i, r) in restaurants.iter().enumerate() {
        if r.is_active {
            active_by_city.entry(r.city_id).or_default().push(i);
            active.push(i);
        }
    }

    // Available menu items per restaurant, as indices into `menu`.
    let mut available_menu: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, item) in menu.iter().enumerate() {
        if item.is_available {
            available_menu.entry(item.restaurant_id).or_default().push(i);
        }
    }

    let cohorts = segment_users(config, users, rng);
    let weekday_pool: Vec<u32> = cohorts
        .power
        .iter()
        .chain(&cohorts.regular)
        .copied()
        .collect();
    let weekend_pool: Vec<u32> = cohorts
        .power
        .iter()
        .chain(&cohorts.weekend)
        .chain(&cohorts.regular)
        .copied()
        .collect();
    tracing::info!(
        power = cohorts.power.len(),
        weekend = cohorts.weekend.len(),
        bots = cohorts.bots.len(),
        regular = cohorts.regular.len(),
        "user cohorts"
    );

    let item_count_dist = WeightedIndex::new(ITEM_COUNT_WEIGHTS)?;

    let mut orders: Vec<Order> = Vec::new();
    let mut order_items: Vec<OrderItem> = Vec::new();
    let mut next_order_id = 1u32;
    let mut next_item_id = 1u32;
    let mut skipped_empty_menu = 0usize;
    let mut skipped_no_candidate = 0usize;

    // ------------------------------------------------------------------
    // Daily order loop
    // ------------------------------------------------------------------
    let mut day = config.start_date;
    while day <= config.end_date {
        let pool = if is_weekend(day) {
            &weekend_pool
        } else {
            &weekday_pool
        };

        for _ in 0..daily_order_target(config, day) {
            let Some(&user_id) = pool.choose(rng) else {
                skipped_no_candidate += 1;
                continue;
            };
            let user = user_by_id[&user_id];

            // Prefer an active restaurant in the user's city, fall back to
            // any active restaurant.
            let candidates = active_by_city
                .get(&user.city_id)
                .filter(|c| !c.is_empty())
                .unwrap_or(&active);
            let Some(&restaurant_idx) = candidates.choose(rng) else {
                skipped_no_candidate += 1;
                continue;
            };
            let restaurant = &restaurants[restaurant_idx];

            let hour = peak_order_hour(rng);
            let minute = rng.gen_range(0..60);
            let order_time = at_hour_minute(day, hour, minute);

            let Some(avail) = available_menu
                .get(&restaurant.restaurant_id)
                .filter(|a| !a.is_empty())
            else {
                skipped_empty_menu += 1;
                continue;
            };

            let want = item_count_dist.sample(rng) + 1;
            let picked = index::sample(rng, avail.len(), want.min(avail.len()));

            let mut raw_total = 0.0;
            let mut lines = Vec::with_capacity(picked.len());
            for pick in picked.iter() {
                let item = &menu[avail[pick]];
                let quantity = *QUANTITY_CHOICES.choose(rng).unwrap_or(&1);
                let subtotal = round2(item.price * quantity as f64);
                raw_total += subtotal;
                lines.push(OrderItem {
                    order_item_id: next_item_id,
                    order_id: next_order_id,
                    menu_id: item.menu_id,
                    quantity,
                    item_price: item.price,
                    subtotal,
                });
                next_item_id += 1;
            }

            let total_amount = round2(raw_total);
            let delivery_fee = *DELIVERY_FEES.choose(rng).unwrap_or(&0.0);
            let discount_amount = if total_amount > DISCOUNT_THRESHOLD {
                round2(total_amount * DISCOUNT_RATES.choose(rng).copied().unwrap_or(0.0))
            } else {
                0.0
            };
            let final_amount = round2(total_amount + delivery_fee - discount_amount);

            orders.push(Order {
                order_id: next_order_id,
                user_id,
                restaurant_id: restaurant.restaurant_id,
                order_time,
                order_date: day,
                order_day: day_name(day),
                order_hour: hour,
                total_amount,
                delivery_fee,
                discount_amount,
                final_amount,
                order_status: if rng.gen_bool(0.9) {
                    "Delivered"
                } else {
                    "Cancelled"
                }
                .to_string(),
                delivery_address: user.address.clone(),
                payment_method: (*PAYMENT_METHODS.choose(rng).unwrap_or(&"UPI")).to_string(),
            });
            order_items.extend(lines);
            next_order_id += 1;
        }

        day += Duration::days(1);
    }

    // ------------------------------------------------------------------
    // Bot burst pass: anomalous single-item order floods on one day each,
    // for outlier-detection exercises. Bypasses fee/discount/status logic.
    // ------------------------------------------------------------------
    let burst_window = config.range_days().min(300);
    for &bot_id in cohorts.bots.iter().take(HEAVY_BOT_COUNT) {
        let bot = user_by_id[&bot_id];
        let burst_day = config.start_date + Duration::days(rng.gen_range(0..=burst_window));

        for _ in 0..rng.gen_range(50..=100) {
            // Bots do not filter on activity; any restaurant will do.
            let restaurant = &restaurants[rng.gen_range(0..restaurants.len())];
            let Some(avail) = available_menu
                .get(&restaurant.restaurant_id)
                .filter(|a| !a.is_empty())
            else {
                skipped_empty_menu += 1;
                continue;
            };
            let item = &menu[avail[rng.gen_range(0..avail.len())]];

            let hour = rng.gen_range(0..24);
            let minute = rng.gen_range(0..60);
            let total = item.price;

            orders.push(Order {
                order_id: next_order_id,
                user_id: bot_id,
                restaurant_id: restaurant.restaurant_id,
                order_time: at_hour_minute(burst_day, hour, minute),
                order_date: burst_day,
                order_day: day_name(burst_day),
                order_hour: hour,
                total_amount: total,
                delivery_fee: 0.0,
                discount_amount: 0.0,
                final_amount: total,
                order_status: "Delivered".to_string(),
                delivery_address: bot.address.clone(),
                payment_method: "UPI".to_string(),
            });
            order_items.push(OrderItem {
                order_item_id: next_item_id,
                order_id: next_order_id,
                menu_id: item.menu_id,
                quantity: 1,
                item_price: item.price,
                subtotal: item.price,
            });
            next_item_id += 1;
            next_order_id += 1;
        }
    }

    let delivery_tracking = build_delivery_tracking(&orders, rng);
    let reviews = build_reviews(config, &orders, rng);

    tracing::info!(
        orders = orders.len(),
        order_items = order_items.len(),
        tracking = delivery_tracking.len(),
        reviews = reviews.len(),
        skipped_empty_menu,
        skipped_no_candidate,
        "stage2 complete"
    );

    Ok(Stage2Output {
        orders,
        order_items,
        delivery_tracking,
        reviews,
    })
}

// ============================================================================
// Tracking + reviews
// ============================================================================

/// One tracking row per Delivered order, none for Cancelled. 5% of rows
/// are outliers with the actual delay re-drawn in [60, 120] minutes.
fn build_delivery_tracking(orders: &[Order], rng: &mut StdRng) -> Vec<DeliveryTracking> {
    let mut tracking = Vec::new();
    for order in orders {
        if order.order_status != "Delivered" {
            continue;
        }
        let dispatch_time = order.order_time + Duration::minutes(rng.gen_range(5..=15));
        let estimated_minutes: i64 = rng.gen_range(20..=40);
        let estimated_delivery_time = dispatch_time + Duration::minutes(estimated_minutes);

        let mut actual_minutes = estimated_minutes + rng.gen_range(-10..=15);
        if rng.gen_bool(0.05) {
            actual_minutes = rng.gen_range(60..=120);
        }

        tracking.push(DeliveryTracking {
            delivery_id: order.order_id,
            order_id: order.order_id,
            dispatch_time,
            estimated_delivery_time,
            actual_delivery_time: dispatch_time + Duration::minutes(actual_minutes),
            actual_delivery_minutes: actual_minutes,
            delivery_partner_id: rng.gen_range(1..=1000),
            delivery_status: "Delivered".to_string(),
        });
    }
    tracking
}

/// Reviews for a `review_rate` fraction of Delivered orders, sampled
/// without replacement; ratings skew positive, comments attach 70% of the
/// time, verified-purchase is true by construction.
fn build_reviews(config: &GeneratorConfig, orders: &[Order], rng: &mut StdRng) -> Vec<Review> {
    let delivered: Vec<usize> = orders
        .iter()
        .enumerate()
        .filter(|(_, o)| o.order_status == "Delivered")
        .map(|(i, _)| i)
        .collect();
    let want = (delivered.len() as f64 * config.review_rate).round() as usize;
    if want == 0 {
        return Vec::new();
    }

    let rating_dist = match WeightedIndex::new(RATING_WEIGHTS) {
        Ok(dist) => dist,
        Err(_) => return Vec::new(),
    };

    let mut picked: Vec<usize> = index::sample(rng, delivered.len(), want).into_iter().collect();
    picked.sort_unstable();

    picked
        .iter()
        .enumerate()
        .map(|(i, &pick)| {
            let order = &orders[delivered[pick]];
            Review {
                review_id: i as u32 + 1,
                user_id: order.user_id,
                restaurant_id: order.restaurant_id,
                order_id: order.order_id,
                rating: rating_dist.sample(rng) as u8 + 1,
                comment: if rng.gen_bool(0.7) {
                    REVIEW_COMMENTS.choose(rng).map(|c| (*c).to_string())
                } else {
                    None
                },
                review_date: order.order_time + Duration::days(rng.gen_range(0..=7)),
                is_verified_purchase: true,
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

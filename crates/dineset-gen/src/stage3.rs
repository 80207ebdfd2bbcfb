//! Stage 3 — engagement tables.
//!
//! Consumes Stage 1 users and Stage 2 orders/order items and produces
//! browsing sessions and cart items. Carts come in two flavors: one
//! converted row per real order line (reconstructed exactly), plus
//! synthetic abandoned rows sized so that abandoned carts make up the
//! configured fraction of all cart rows.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use dineset_model::{
    CartItem, GeneratorConfig, MenuItem, Order, OrderItem, Restaurant, Stage3Output, User,
    UserSession,
};

const DEVICE_TYPES: &[&str] = &["Mobile", "Mobile", "Mobile", "Desktop", "Tablet"];
const CART_QUANTITIES: &[u32] = &[1, 1, 2];

pub fn generate(
    config: &GeneratorConfig,
    users: &[User],
    restaurants: &[Restaurant],
    menu: &[MenuItem],
    orders: &[Order],
    order_items: &[OrderItem],
    rng: &mut StdRng,
) -> Result<Stage3Output> {
    if users.is_empty() {
        return Err(anyhow!("stage3 requires at least one user"));
    }

    let sessions = build_sessions(config, users, orders, rng);
    let cart_items = build_cart_items(config, users, restaurants, menu, orders, order_items, rng);

    tracing::info!(
        sessions = sessions.len(),
        cart_items = cart_items.len(),
        "stage3 complete"
    );

    Ok(Stage3Output {
        sessions,
        cart_items,
    })
}

// ============================================================================
// Sessions
// ============================================================================

/// Per-user browsing sessions across the user's active window (signup to
/// dataset end). A session that contains one of the user's order
/// timestamps is marked order-placing and carries the first matching
/// order id. No order is consumed by a match: overlapping sessions may
/// each claim the same order.
fn build_sessions(
    config: &GeneratorConfig,
    users: &[User],
    orders: &[Order],
    rng: &mut StdRng,
) -> Vec<UserSession> {
    // Orders per user, in time order, for the window check.
    let mut orders_by_user: HashMap<u32, Vec<(NaiveDateTime, u32)>> = HashMap::new();
    for order in orders {
        orders_by_user
            .entry(order.user_id)
            .or_default()
            .push((order.order_time, order.order_id));
    }
    for user_orders in orders_by_user.values_mut() {
        user_orders.sort();
    }

    let end = config.end_date.and_time(NaiveTime::MIN);
    let mut sessions = Vec::new();
    let mut session_id = 1u32;

    for user in users {
        let signup = user.signup_date.and_time(NaiveTime::MIN);
        let window_secs = (end - signup).num_seconds().max(0);
        let months_active = ((window_secs / 86_400) / 30).max(1);
        let session_count = months_active as usize * config.sessions_per_user_per_month;

        let user_orders = orders_by_user.get(&user.user_id);

        for _ in 0..session_count {
            let session_start = signup + Duration::seconds(rng.gen_range(0..=window_secs));
            let session_end = session_start + Duration::minutes(rng.gen_range(2..=30));

            let matched = user_orders.and_then(|list| {
                list.iter()
                    .find(|(t, _)| *t >= session_start && *t <= session_end)
                    .map(|(_, id)| *id)
            });

            sessions.push(UserSession {
                session_id,
                user_id: user.user_id,
                session_start,
                session_end,
                order_placed: matched.is_some(),
                order_id: matched,
                pages_viewed: if matched.is_some() {
                    rng.gen_range(5..=20)
                } else {
                    rng.gen_range(1..=8)
                },
                device_type: (*DEVICE_TYPES.choose(rng).unwrap_or(&"Mobile")).to_string(),
            });
            session_id += 1;
        }
    }
    sessions
}

// ============================================================================
// Carts
// ============================================================================

/// Converted carts mirror real order lines one-to-one; abandoned carts
/// are synthetic draws sized to hit `abandoned_cart_rate` of the combined
/// total. Draws that land on a restaurant with no available menu items
/// are skipped, so the abandoned count can slightly undershoot.
fn build_cart_items(
    config: &GeneratorConfig,
    users: &[User],
    restaurants: &[Restaurant],
    menu: &[MenuItem],
    orders: &[Order],
    order_items: &[OrderItem],
    rng: &mut StdRng,
) -> Vec<CartItem> {
    let mut items_by_order: HashMap<u32, Vec<&OrderItem>> = HashMap::new();
    for item in order_items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let mut cart = Vec::with_capacity(order_items.len());
    let mut cart_id = 1u32;

    // Converted baseline: one cart row per order line, added shortly
    // before the order was placed.
    for order in orders {
        let Some(lines) = items_by_order.get(&order.order_id) else {
            continue;
        };
        for line in lines {
            cart.push(CartItem {
                cart_id,
                user_id: order.user_id,
                restaurant_id: order.restaurant_id,
                menu_id: line.menu_id,
                quantity: line.quantity,
                added_at: order.order_time - Duration::minutes(rng.gen_range(1..=10)),
                is_ordered: true,
                order_id: Some(order.order_id),
            });
            cart_id += 1;
        }
    }

    // Abandoned rows on top, sized so they form `rate` of the combined
    // total: abandoned = converted * rate / (1 - rate).
    let rate = config.abandoned_cart_rate;
    let target_abandoned = (cart.len() as f64 * rate / (1.0 - rate)) as usize;

    let active: Vec<&Restaurant> = restaurants.iter().filter(|r| r.is_active).collect();
    let mut available_menu: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, item) in menu.iter().enumerate() {
        if item.is_available {
            available_menu.entry(item.restaurant_id).or_default().push(i);
        }
    }

    let window_secs = config.range_days() * 86_400;
    let range_start = config.start_date.and_time(NaiveTime::MIN);
    let mut skipped_empty_menu = 0usize;

    for _ in 0..target_abandoned {
        let (Some(user), Some(restaurant)) = (users.choose(rng), active.choose(rng)) else {
            break;
        };
        let Some(avail) = available_menu
            .get(&restaurant.restaurant_id)
            .filter(|a| !a.is_empty())
        else {
            skipped_empty_menu += 1;
            continue;
        };
        let item = &menu[avail[rng.gen_range(0..avail.len())]];

        cart.push(CartItem {
            cart_id,
            user_id: user.user_id,
            restaurant_id: restaurant.restaurant_id,
            menu_id: item.menu_id,
            quantity: *CART_QUANTITIES.choose(rng).unwrap_or(&1),
            added_at: range_start + Duration::seconds(rng.gen_range(0..=window_secs)),
            is_ordered: false,
            order_id: None,
        });
        cart_id += 1;
    }

    if skipped_empty_menu > 0 {
        tracing::debug!(skipped_empty_menu, "abandoned-cart draws skipped");
    }
    cart
}

// ============================================================================
// Tests
// ============================================================================

//! Row types for every generated table.
//!
//! Field renames pin the exact CSV headers the downstream SQL exercises
//! were written against (PascalCase with `ID` suffixes). Rows are created
//! once by a stage builder and never mutated afterward; the only apparent
//! exception, the user referral back-fill, is modeled as a pure second
//! pass that produces a fresh `Vec<User>`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Stage 1 — reference & identity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "CityID")]
    pub city_id: u32,
    #[serde(rename = "CityName")]
    pub city_name: String,
    #[serde(rename = "State")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "ChannelID")]
    pub channel_id: u32,
    #[serde(rename = "ChannelName")]
    pub channel_name: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "PasswordHash")]
    pub password_hash: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: u32,
    #[serde(rename = "SignUpDate")]
    pub signup_date: NaiveDate,
    #[serde(rename = "AcquisitionChannelID")]
    pub acquisition_channel_id: u32,
    /// Filled by the referral-linking pass for "Referral Program" users
    /// that have at least one earlier signup to point at.
    #[serde(rename = "ReferredBy")]
    pub referred_by: Option<u32>,
    #[serde(rename = "LastLoginDate")]
    pub last_login_date: NaiveDate,
    #[serde(rename = "IsActive")]
    pub is_active: bool,
    /// JSON blob, e.g. `{"dietary":"Vegan"}`.
    #[serde(rename = "Preferences")]
    pub preferences: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    #[serde(rename = "ReferralID")]
    pub referral_id: u32,
    #[serde(rename = "ReferrerUserID")]
    pub referrer_user_id: u32,
    #[serde(rename = "ReferredUserID")]
    pub referred_user_id: u32,
    #[serde(rename = "ReferralDate")]
    pub referral_date: NaiveDate,
    #[serde(rename = "RewardAmount")]
    pub reward_amount: u32,
    #[serde(rename = "RewardStatus")]
    pub reward_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "RestaurantID")]
    pub restaurant_id: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: u32,
    #[serde(rename = "Cuisine")]
    pub cuisine: String,
    /// uniform(3.0, 5.0) + metro bonus, rounded to 2 decimals. Not clamped:
    /// metro restaurants can exceed 5.0 (kept from the reference dataset).
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "OperatingHours")]
    pub operating_hours: String,
    #[serde(rename = "ContactNumber")]
    pub contact_number: String,
    #[serde(rename = "IsActive")]
    pub is_active: bool,
    #[serde(rename = "OpeningDate")]
    pub opening_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "MenuID")]
    pub menu_id: u32,
    #[serde(rename = "RestaurantID")]
    pub restaurant_id: u32,
    #[serde(rename = "ItemName")]
    pub item_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "CuisineType")]
    pub cuisine_type: String,
    #[serde(rename = "IsVegetarian")]
    pub is_vegetarian: bool,
    #[serde(rename = "IsAvailable")]
    pub is_available: bool,
}

// ============================================================================
// Stage 2 — transactions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "OrderID")]
    pub order_id: u32,
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "RestaurantID")]
    pub restaurant_id: u32,
    #[serde(rename = "OrderTime")]
    pub order_time: NaiveDateTime,
    #[serde(rename = "OrderDate")]
    pub order_date: NaiveDate,
    /// Day name ("Monday".."Sunday"), denormalized for query practice.
    #[serde(rename = "OrderDay")]
    pub order_day: String,
    #[serde(rename = "OrderHour")]
    pub order_hour: u32,
    #[serde(rename = "TotalAmount")]
    pub total_amount: f64,
    #[serde(rename = "DeliveryFee")]
    pub delivery_fee: f64,
    #[serde(rename = "DiscountAmount")]
    pub discount_amount: f64,
    /// total + fee - discount, rounded to 2 decimals.
    #[serde(rename = "FinalAmount")]
    pub final_amount: f64,
    /// "Delivered" or "Cancelled".
    #[serde(rename = "OrderStatus")]
    pub order_status: String,
    #[serde(rename = "DeliveryAddress")]
    pub delivery_address: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "OrderItemID")]
    pub order_item_id: u32,
    #[serde(rename = "OrderID")]
    pub order_id: u32,
    #[serde(rename = "MenuID")]
    pub menu_id: u32,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "ItemPrice")]
    pub item_price: f64,
    #[serde(rename = "Subtotal")]
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTracking {
    /// Same as the order id (one tracking row per Delivered order).
    #[serde(rename = "DeliveryID")]
    pub delivery_id: u32,
    #[serde(rename = "OrderID")]
    pub order_id: u32,
    #[serde(rename = "DispatchTime")]
    pub dispatch_time: NaiveDateTime,
    #[serde(rename = "EstimatedDeliveryTime")]
    pub estimated_delivery_time: NaiveDateTime,
    #[serde(rename = "ActualDeliveryTime")]
    pub actual_delivery_time: NaiveDateTime,
    #[serde(rename = "ActualDeliveryMinutes")]
    pub actual_delivery_minutes: i64,
    #[serde(rename = "DeliveryPartnerID")]
    pub delivery_partner_id: u32,
    #[serde(rename = "DeliveryStatus")]
    pub delivery_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "ReviewID")]
    pub review_id: u32,
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "RestaurantID")]
    pub restaurant_id: u32,
    #[serde(rename = "OrderID")]
    pub order_id: u32,
    #[serde(rename = "Rating")]
    pub rating: u8,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "ReviewDate")]
    pub review_date: NaiveDateTime,
    #[serde(rename = "IsVerifiedPurchase")]
    pub is_verified_purchase: bool,
}

// ============================================================================
// Stage 3 — engagement
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(rename = "SessionID")]
    pub session_id: u32,
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "SessionStart")]
    pub session_start: NaiveDateTime,
    #[serde(rename = "SessionEnd")]
    pub session_end: NaiveDateTime,
    #[serde(rename = "OrderPlaced")]
    pub order_placed: bool,
    /// First order of the user whose timestamp falls inside the session
    /// window. Overlapping sessions may each claim the same order.
    #[serde(rename = "OrderID")]
    pub order_id: Option<u32>,
    #[serde(rename = "PagesViewed")]
    pub pages_viewed: u32,
    #[serde(rename = "DeviceType")]
    pub device_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "CartID")]
    pub cart_id: u32,
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "RestaurantID")]
    pub restaurant_id: u32,
    #[serde(rename = "MenuID")]
    pub menu_id: u32,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "AddedAt")]
    pub added_at: NaiveDateTime,
    #[serde(rename = "IsOrdered")]
    pub is_ordered: bool,
    #[serde(rename = "OrderID")]
    pub order_id: Option<u32>,
}

// ============================================================================
// Stage bundles
// ============================================================================

/// Everything Stage 1 produces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stage1Output {
    pub cities: Vec<City>,
    pub channels: Vec<Channel>,
    pub users: Vec<User>,
    pub referrals: Vec<Referral>,
    pub restaurants: Vec<Restaurant>,
    pub menu: Vec<MenuItem>,
}

/// Everything Stage 2 produces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stage2Output {
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub delivery_tracking: Vec<DeliveryTracking>,
    pub reviews: Vec<Review>,
}

/// Everything Stage 3 produces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stage3Output {
    pub sessions: Vec<UserSession>,
    pub cart_items: Vec<CartItem>,
}

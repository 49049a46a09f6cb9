//! # Domain Types
//!
//! Core domain types used throughout ShopEase POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  StockMovement  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  id (u64)       │   │  product_id     │       │
//! │  │  sku (unique)   │   │  customer_name  │   │  type in|out    │       │
//! │  │  cost/sell      │   │  total/cost     │   │  quantity > 0   │       │
//! │  │  quantity >= 0  │   │  items[]        │   │  notes          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Employee     │   │  Attendance     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  employee_id    │   │  username       │       │
//! │  │  salary         │   │  date (day)     │   │  role           │       │
//! │  └─────────────────┘   │  present|absent │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted record carries a sequential `id: u64`. A freshly built
//! record has `id == 0`; the collection assigns `max + 1` when it is added.
//!
//! Field names are the persisted JSON key names, so the document layout
//! stays readable by older snapshots.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::SESSION_TTL_HOURS;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: u64,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub category: String,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    /// What the shop paid per unit.
    pub cost_price: Money,

    /// What the customer pays per unit.
    pub sell_price: Money,

    /// Units on hand. Never negative.
    pub quantity: i64,
}

impl Product {
    /// Builds an unsaved product (id 0) with no size or color.
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        category: impl Into<String>,
        cost_price: Money,
        sell_price: Money,
        quantity: i64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            size: None,
            color: None,
            cost_price,
            sell_price,
            quantity,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Per-unit margin at current prices.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.sell_price - self.cost_price
    }

    /// Checks whether `quantity` more units can be taken off the shelf.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Low stock means strictly below the threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line of a sale.
///
/// Uses the snapshot pattern: name, price and cost are frozen at the time of
/// sale, so later catalog edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineItem {
    pub product_id: u64,
    /// Product name at time of sale (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit sell price at time of sale (frozen).
    pub price: Money,
    /// Unit cost at time of sale (frozen).
    pub cost: Money,
}

impl SaleLineItem {
    /// `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// `cost × quantity`.
    #[inline]
    pub fn line_cost(&self) -> Money {
        self.cost.multiply_quantity(self.quantity)
    }
}

/// A completed sale.
///
/// `profit == total - cost`, `total == Σ price·quantity` and
/// `cost == Σ cost·quantity` hold for every sale checkout produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: u64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub customer_name: String,
    pub total: Money,
    pub cost: Money,
    pub profit: Money,
    pub items: Vec<SaleLineItem>,
}

impl Sale {
    /// Total units across all lines.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Checks the money invariants against the line items.
    pub fn is_consistent(&self) -> bool {
        let total: Money = self.items.iter().map(SaleLineItem::line_total).sum();
        let cost: Money = self.items.iter().map(SaleLineItem::line_cost).sum();
        self.total == total && self.cost == cost && self.profit == self.total - self.cost
    }

    /// UTC calendar day the sale was made.
    #[inline]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Goods received.
    In,
    /// Goods removed (damage, returns to supplier, shrinkage).
    Out,
}

impl MovementType {
    /// Signed quantity delta for this direction.
    #[inline]
    pub const fn signed(self, quantity: i64) -> i64 {
        match self {
            MovementType::In => quantity,
            MovementType::Out => -quantity,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }
}

/// A recorded stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockMovement {
    pub id: u64,
    pub product_id: u64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Always positive; the direction lives in `movement_type`.
    pub quantity: i64,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Staff
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    /// Monthly salary.
    pub salary: Money,
}

impl Employee {
    pub fn new(name: impl Into<String>, salary: Money) -> Self {
        Self {
            id: 0,
            name: name.into(),
            salary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// present ↔ absent
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            AttendanceStatus::Present => AttendanceStatus::Absent,
            AttendanceStatus::Absent => AttendanceStatus::Present,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

/// One employee's status on one calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            phone,
        }
    }
}

// =============================================================================
// Users & Sessions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Cashier,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
        }
    }
}

/// A login account.
///
/// The password is stored as plain text so existing snapshots keep loading.
/// Never hand a `User` to presentation code; use [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub name: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password: password.into(),
            role,
            name: name.into(),
        }
    }

    /// The user without the password.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub role: Role,
    pub name: String,
}

/// A login session. Never persisted in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    #[ts(as = "String")]
    pub token: Uuid,
    pub user: UserProfile,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Issues a fresh session with a random v4 token.
    pub fn issue(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4(),
            user: user.profile(),
            issued_at: now,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::hours(SESSION_TTL_HOURS)
    }

    /// Expired once `now` reaches `issued_at + 24h`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(qty: i64, price: i64, cost: i64) -> SaleLineItem {
        SaleLineItem {
            product_id: 1,
            name: "Black Tee".to_string(),
            quantity: qty,
            price: Money::from_minor(price),
            cost: Money::from_minor(cost),
        }
    }

    #[test]
    fn test_sale_consistency() {
        let items = vec![line(3, 800, 500), line(1, 2000, 1200)];
        let sale = Sale {
            id: 1,
            date: Utc::now(),
            customer_id: None,
            customer_name: "Walk-in Customer".to_string(),
            total: Money::from_minor(4400),
            cost: Money::from_minor(2700),
            profit: Money::from_minor(1700),
            items,
        };
        assert!(sale.is_consistent());
        assert_eq!(sale.units(), 4);

        let broken = Sale {
            profit: Money::from_minor(1),
            ..sale
        };
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_movement_signed() {
        assert_eq!(MovementType::In.signed(4), 4);
        assert_eq!(MovementType::Out.signed(4), -4);
    }

    #[test]
    fn test_attendance_toggle() {
        assert_eq!(AttendanceStatus::Present.toggled(), AttendanceStatus::Absent);
        assert_eq!(AttendanceStatus::Absent.toggled(), AttendanceStatus::Present);
    }

    #[test]
    fn test_persisted_key_names() {
        let movement = StockMovement {
            id: 1,
            product_id: 7,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            movement_type: MovementType::Out,
            quantity: 2,
            notes: "damaged".to_string(),
        };
        let value = serde_json::to_value(&movement).unwrap();
        assert_eq!(value["type"], "out");
        assert_eq!(value["product_id"], 7);

        let record = AttendanceRecord {
            id: 1,
            employee_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: AttendanceStatus::Present,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2024-03-01");
        assert_eq!(value["status"], "present");
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let json = r#"{"id":3,"name":"Jeans","sku":"JN-32","category":"Bottoms",
            "cost_price":1500,"sell_price":2500,"quantity":4}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.size, None);
        assert_eq!(product.sell_price, Money::from_minor(2500));
        assert!(product.is_low_stock(5));
        assert!(!product.can_sell(5));
    }

    #[test]
    fn test_session_expiry() {
        let user = User::new("admin", "admin123", Role::Admin, "Administrator");
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let session = Session::issue(&user, issued);

        assert_eq!(session.user.username, "admin");
        assert!(!session.is_expired(issued + Duration::hours(23)));
        assert!(session.is_expired(issued + Duration::hours(24)));
    }
}

//! # Domain Types
//!
//! The records held by the Entity Store and returned to callers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Cart       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  id (0 = none)  │   │  id (u64)       │       │
//! │  │  title, author  │   │  user_id        │   │  user_id        │       │
//! │  │  price (Money)  │◄──│  lines[]        │   │  lines[]        │       │
//! │  │  stock          │   │   product_id    │   │   unit_price    │       │
//! │  │  discontinued   │   │   quantity      │   │   subtotal      │       │
//! │  │  special        │   │   unit_price?   │   │  total, status  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │  OrderStatus    │                             │
//! │  │  id, email,     │   │  PLACED         │                             │
//! │  │  name           │   │  PENDING_REVIEW │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity type has its own monotonically increasing `u64` counter
//! starting at 1. Identifiers are never reused, even after deletion. A cart
//! with id `0` is the synthesized empty cart of a user who never had one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// User identifier.
pub type UserId = u64;
/// Product identifier.
pub type ProductId = u64;
/// Cart identifier (`0` for a synthesized empty cart).
pub type CartId = u64;
/// Order identifier.
pub type OrderId = u64;

// =============================================================================
// User
// =============================================================================

/// A shopper. Referenced by id from carts and orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier, assigned by the store.
    pub id: ProductId,

    pub title: String,

    pub author: String,

    pub description: String,

    /// Live unit price.
    pub price: Money,

    /// Units available for reservation.
    pub stock: i64,

    /// Discontinued products cannot be added to carts.
    pub discontinued: bool,

    /// Special products must be ordered alone, in quantity exactly 1.
    pub special: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks if the product has at least `quantity` units in stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// The caller-supplied fields of a product, used for both create and update.
///
/// An update replaces every field and refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    pub stock: i64,
    #[serde(default)]
    pub discontinued: bool,
    #[serde(default)]
    pub special: bool,
}

impl ProductInput {
    /// Convenience constructor for a regular, in-catalog product.
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: Money, stock: i64) -> Self {
        ProductInput {
            title: title.into(),
            author: author.into(),
            description: String::new(),
            price,
            stock,
            discontinued: false,
            special: false,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the product as discontinued.
    pub fn discontinued(mut self, discontinued: bool) -> Self {
        self.discontinued = discontinued;
        self
    }

    /// Marks the product as special (must be bought alone, one unit).
    pub fn special(mut self, special: bool) -> Self {
        self.special = special;
        self
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: ProductId,

    /// Always positive.
    pub quantity: i64,

    /// Unit price captured when the line was created. `None` means unset and
    /// falls back to the live product price.
    pub unit_price: Option<Money>,
}

impl CartLine {
    /// The unit price this line is evaluated at: the captured price if set,
    /// otherwise `live_price`.
    #[inline]
    pub fn effective_price(&self, live_price: Money) -> Money {
        self.unit_price.unwrap_or(live_price)
    }

    /// `quantity × effective_price(live_price)`.
    #[inline]
    pub fn subtotal(&self, live_price: Money) -> Money {
        self.effective_price(live_price).multiply_quantity(self.quantity)
    }
}

/// A user's cart.
///
/// ## Invariants
/// - At most one line per product (adding the same product increments it)
/// - Line order is insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// The synthesized empty cart (id `0`) returned for users without one.
    pub fn empty(user_id: UserId) -> Self {
        Cart {
            id: 0,
            user_id,
            lines: Vec::new(),
        }
    }

    /// Returns the line for `product_id`, if any.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Quantity currently held for `product_id` (0 if absent).
    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    /// Returns true if the cart holds a line for `product_id`.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Number of distinct product lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// Status assigned once, when the order is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Placed,
    /// High-value order held for manual review.
    PendingReview,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Placed => write!(f, "PLACED"),
            OrderStatus::PendingReview => write!(f, "PENDING_REVIEW"),
        }
    }
}

/// A line of a committed order.
/// Snapshot of the unit price observed at reservation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub subtotal: Money,
}

impl OrderLine {
    /// Builds a line, computing its subtotal.
    pub fn new(product_id: ProductId, quantity: i64, unit_price: Money) -> Self {
        OrderLine {
            product_id,
            quantity,
            unit_price,
            subtotal: unit_price.multiply_quantity(quantity),
        }
    }
}

/// A placed order. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// Assigned by the store on creation (`0` before that).
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    /// Sum of line subtotals.
    pub total: Money,
    pub status: OrderStatus,
    /// Assigned by the store on creation.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Recomputes the sum of line subtotals.
    pub fn lines_total(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    /// Total units ordered across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

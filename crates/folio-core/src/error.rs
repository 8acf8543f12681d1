//! # Error Types
//!
//! Domain error taxonomy for folio.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core errors (this file)                                         │
//! │  ├── CoreError        - One variant per rejection kind                 │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  └── ErrorCode        - Stable, serialisable kind for transports       │
//! │                                                                         │
//! │  folio-store errors (separate crate)                                   │
//! │  └── StoreError       - Storage precondition failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← StoreError → transport layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, limit, quantities)
//! 3. The first violated rule is reported, never an aggregate
//! 4. Every variant maps to exactly one [`ErrorCode`]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{OrderId, ProductId, UserId};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and lookup failures.
///
/// Every variant is a recoverable, per-request condition. None of them is
/// retried inside the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A user, product, cart or order is missing.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist (or was deleted)
    /// - Adding to the cart of an unknown user
    /// - A product referenced by a cart line vanished before placement
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// Malformed or out-of-range create/update fields, or a non-positive
    /// quantity.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The product is discontinued and cannot be added to a cart.
    #[error("Product {product_id} is discontinued")]
    ProductUnavailable { product_id: ProductId },

    /// Delete refused because some cart still references the product.
    #[error("Product {product_id} is in an active cart")]
    ProductInUse { product_id: ProductId },

    #[error("Cart cannot hold more than {max} distinct items")]
    TooManyDistinctItems { max: usize },

    #[error("Quantity {requested} for product {product_id} exceeds the per-line maximum ({max})")]
    LineQuantityExceeded {
        product_id: ProductId,
        requested: i64,
        max: i64,
    },

    /// Scarce product (stock below 3) capped at one unit per cart.
    #[error("Product {product_id} is low on stock ({stock} left); limit one per cart")]
    LowStockCap { product_id: ProductId, stock: i64 },

    #[error("Cart would hold {requested} items, maximum is {max}")]
    TotalItemsExceeded { requested: i64, max: i64 },

    /// The monetary value of the cart reached the risk ceiling.
    #[error("Cart total {total} reaches the risk limit {limit}")]
    RiskLimitExceeded { total: Money, limit: Money },

    /// Insufficient stock to satisfy a cart line or an order line.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 2, already holding 2)
    ///      │
    ///      ▼
    /// Check stock: available=3, wanted=4
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 3, requested: 4 }
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    #[error("Cart is empty")]
    EmptyCart,

    /// A special product shares the cart with other lines.
    #[error("Special product {product_id} must be ordered alone")]
    SpecialItemMustBeAlone { product_id: ProductId },

    #[error("Special product {product_id} must be ordered in quantity 1, got {quantity}")]
    SpecialItemQuantity { product_id: ProductId, quantity: i64 },

    /// The captured cart price no longer matches the live price.
    #[error("Price of product {product_id} changed from {captured} to {current}")]
    PriceDrift {
        product_id: ProductId,
        captured: Money,
        current: Money,
    },

    #[error("Order total {total} is below the minimum {minimum}")]
    BelowMinimum { total: Money, minimum: Money },

    /// Same-day spend plus this order would pass the daily cap.
    #[error("Daily spend {spent} plus {total} exceeds the cap {cap}")]
    DailySpendCapExceeded {
        spent: Money,
        total: Money,
        cap: Money,
    },

    /// Another order was placed moments ago.
    ///
    /// ## When This Occurs
    /// - A double-submitted checkout
    /// - Any placement within the duplicate window, even with an empty cart
    #[error("Order {last_order_id} for user {user_id} was placed {elapsed_secs}s ago")]
    DuplicateOrder {
        user_id: UserId,
        last_order_id: OrderId,
        elapsed_secs: i64,
    },
}

impl CoreError {
    /// Shorthand for a missing product.
    pub fn product_not_found(id: ProductId) -> Self {
        CoreError::NotFound {
            entity: "Product",
            id,
        }
    }

    /// Shorthand for a missing user.
    pub fn user_not_found(id: UserId) -> Self {
        CoreError::NotFound { entity: "User", id }
    }

    /// Shorthand for a missing order.
    pub fn order_not_found(id: OrderId) -> Self {
        CoreError::NotFound { entity: "Order", id }
    }

    /// Returns the stable kind of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::InvalidInput(_) => ErrorCode::InvalidInput,
            CoreError::ProductUnavailable { .. } => ErrorCode::ProductUnavailable,
            CoreError::ProductInUse { .. } => ErrorCode::ProductInUse,
            CoreError::TooManyDistinctItems { .. } => ErrorCode::TooManyDistinctItems,
            CoreError::LineQuantityExceeded { .. } => ErrorCode::LineQuantityExceeded,
            CoreError::LowStockCap { .. } => ErrorCode::LowStockCap,
            CoreError::TotalItemsExceeded { .. } => ErrorCode::TotalItemsExceeded,
            CoreError::RiskLimitExceeded { .. } => ErrorCode::RiskLimitExceeded,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::SpecialItemMustBeAlone { .. } => ErrorCode::SpecialItemMustBeAlone,
            CoreError::SpecialItemQuantity { .. } => ErrorCode::SpecialItemQuantity,
            CoreError::PriceDrift { .. } => ErrorCode::PriceDrift,
            CoreError::BelowMinimum { .. } => ErrorCode::BelowMinimum,
            CoreError::DailySpendCapExceeded { .. } => ErrorCode::DailySpendCapExceeded,
            CoreError::DuplicateOrder { .. } => ErrorCode::DuplicateOrder,
        }
    }
}

// =============================================================================
// Error Code
// =============================================================================

/// Machine-readable error kind.
///
/// Transports map these to their own status codes; clients switch on them
/// instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    NotFound,
    InvalidInput,
    ProductUnavailable,
    ProductInUse,
    TooManyDistinctItems,
    LineQuantityExceeded,
    LowStockCap,
    TotalItemsExceeded,
    RiskLimitExceeded,
    InsufficientStock,
    EmptyCart,
    SpecialItemMustBeAlone,
    SpecialItemQuantity,
    PriceDrift,
    BelowMinimum,
    DailySpendCapExceeded,
    DuplicateOrder,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any lock is taken; surfaced as [`CoreError::InvalidInput`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # Store Error Types
//!
//! Error types for Entity Store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Repository precondition fails (under the lock)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Storage-level categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError (folio-core) ← Shared taxonomy, ErrorCode                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Transport layer maps ErrorCode to a status code                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use folio_core::{CoreError, ProductId, UserId, ValidationError};
use thiserror::Error;

/// Entity Store errors.
///
/// Every one is reported before any record is touched, so a failed call
/// leaves the store exactly as it found it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Record not found.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - Record was deleted
    /// - A cart line references a product deleted behind its back
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// A cart or order line quantity is zero or negative.
    #[error("Quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Reservation requested for a user without cart lines.
    #[error("Cart for user {user_id} is empty")]
    EmptyCart { user_id: UserId },

    /// Not enough stock to reserve a line.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Adding to a line would overflow its quantity.
    #[error("Line for product {product_id} holds {current}, cannot add {requested}")]
    QuantityOverflow {
        product_id: ProductId,
        current: i64,
        requested: i64,
    },

    /// Guarded delete found the product in a cart.
    #[error("Product {product_id} is referenced by a cart")]
    ProductInUse { product_id: ProductId },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::InvalidQuantity { .. } => {
                CoreError::InvalidInput(ValidationError::must_be_positive("quantity"))
            }
            StoreError::EmptyCart { .. } => CoreError::EmptyCart,
            StoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            StoreError::QuantityOverflow {
                product_id,
                current,
                ..
            } => CoreError::LineQuantityExceeded {
                product_id,
                requested: i64::MAX,
                max: i64::MAX - current,
            },
            StoreError::ProductInUse { product_id } => CoreError::ProductInUse { product_id },
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

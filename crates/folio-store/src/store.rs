//! # Entity Store
//!
//! The record set and the single lock that guards it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Entity Store                                   │
//! │                                                                         │
//! │  Process startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EntityStore::new() / with_clock(clock)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │      Arc<RwLock<Records>>               │                           │
//! │  │  users · products · carts · orders      │                           │
//! │  │  one id sequence per entity type        │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ cloned handles passed to services                               │
//! │       ▼                                                                 │
//! │  store.products()  store.carts()  store.orders()  store.users()        │
//! │  (reads share the lock, writes hold it exclusively for the whole op)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Lock, Not Four
//! Stock reservation touches a cart and several products in one step. A
//! single lock over the whole record set is what makes that step atomic, so
//! the record maps are never split behind separate locks.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use folio_core::{
    Cart, Clock, Order, OrderId, Product, ProductId, SystemClock, User, UserId,
};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::repository::cart::CartRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Records
// =============================================================================

/// Monotonic identifier source. Starts at 1, never reuses a value.
#[derive(Debug, Default)]
pub(crate) struct Sequence(u64);

impl Sequence {
    pub(crate) fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// Everything the store owns. Only reachable through the lock.
///
/// Ordered maps keep list operations in ascending identifier order.
#[derive(Debug, Default)]
pub(crate) struct Records {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) products: BTreeMap<ProductId, Product>,
    /// Carts keyed by owning user; at most one per user.
    pub(crate) carts: HashMap<UserId, Cart>,
    pub(crate) orders: BTreeMap<OrderId, Order>,

    pub(crate) user_ids: Sequence,
    pub(crate) product_ids: Sequence,
    pub(crate) cart_ids: Sequence,
    pub(crate) order_ids: Sequence,
}

impl Records {
    /// Returns true if any cart holds a line for `product_id`.
    pub(crate) fn product_in_any_cart(&self, product_id: ProductId) -> bool {
        self.carts.values().any(|cart| cart.contains(product_id))
    }
}

/// Record counts, for diagnostics and the seed binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreStats {
    pub users: usize,
    pub products: usize,
    pub carts: usize,
    pub orders: usize,
}

// =============================================================================
// EntityStore
// =============================================================================

/// Handle to the shared record set.
///
/// Cloning is cheap and every clone sees the same records. Create one at
/// startup and hand clones to each service.
///
/// ## Usage
/// ```rust,ignore
/// let store = EntityStore::new();
/// let user = store.users().create("john@email.com", "John Doe").await;
/// let book = store
///     .products()
///     .create(ProductInput::new("Clean Code", "Robert C. Martin", Money::from_cents(3999), 60))
///     .await;
///
/// let cart = store.carts().add_line(user.id, book.id, 2).await?;
/// assert_eq!(cart.quantity_of(book.id), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EntityStore {
    records: Arc<RwLock<Records>>,
    clock: Arc<dyn Clock>,
}

impl EntityStore {
    /// Creates an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamped by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        info!("Initializing entity store");
        EntityStore {
            records: Arc::new(RwLock::new(Records::default())),
            clock,
        }
    }

    /// The clock this store stamps records with.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().await
    }

    /// Returns the user repository.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.clone())
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let catalog = store.products().list().await;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Returns the cart repository.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.clone())
    }

    /// Counts records of every type under one read lock.
    pub async fn stats(&self) -> StoreStats {
        let records = self.read().await;
        StoreStats {
            users: records.users.len(),
            products: records.products.len(),
            carts: records.carts.len(),
            orders: records.orders.len(),
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Order Repository
//!
//! Stock reservation and the append-only order history.
//!
//! ## Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  reserve_stock_for_order(user)                          │
//! │                                                                         │
//! │  ┌──────────────── one write lock hold ────────────────────────────┐   │
//! │  │                                                                 │   │
//! │  │  PHASE 1: check every line (nothing mutated yet)                │   │
//! │  │    cart present and non-empty ........... else EmptyCart        │   │
//! │  │    product exists ....................... else NotFound         │   │
//! │  │    quantity > 0 ......................... else InvalidQuantity  │   │
//! │  │    stock >= quantity .................... else InsufficientStock│   │
//! │  │                                                                 │   │
//! │  │  PHASE 2: commit                                                │   │
//! │  │    stock -= quantity for every line                             │   │
//! │  │    order lines priced at the live price                         │   │
//! │  │    cart discarded                                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Either every line is reserved or none is.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use folio_core::{Cart, Money, Order, OrderId, OrderLine, OrderStatus, Product, UserId};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::{EntityStore, Records};

/// A consistent read of everything order placement validates against.
///
/// Taken under a single lock hold.
#[derive(Debug, Clone)]
pub struct CheckoutSnapshot {
    /// The user's cart (the synthesized empty cart if none).
    pub cart: Cart,
    /// The product behind each cart line, index-aligned with `cart.lines`.
    /// `None` if the product has been deleted.
    pub products: Vec<Option<Product>>,
    /// The user's orders in ascending identifier order.
    pub history: Vec<Order>,
}

/// Repository for orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    store: EntityStore,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(store: EntityStore) -> Self {
        OrderRepository { store }
    }

    /// Atomically converts the user's cart into an unsaved order.
    ///
    /// On success stock is decremented, the cart is discarded and the
    /// returned order has status `Placed`, id `0` and every line priced at
    /// the product's live price. The caller persists it with
    /// [`create`](OrderRepository::create).
    ///
    /// On failure nothing changed.
    pub async fn reserve_stock_for_order(&self, user_id: UserId) -> StoreResult<Order> {
        debug!(user_id, "Reserving stock for order");

        let now = self.store.now();
        let mut records = self.store.write().await;
        reserve(&mut records, user_id, now)
    }

    /// Stores an order, assigning its identifier and creation timestamp.
    ///
    /// ## Returns
    /// A copy of the stored order.
    pub async fn create(&self, order: Order) -> Order {
        let now = self.store.now();
        let mut records = self.store.write().await;
        insert(&mut records, order, now)
    }

    /// Checks, reserves and stores an order in one write lock hold.
    ///
    /// `guard` sees the same [`CheckoutSnapshot`] that
    /// [`checkout_snapshot`](OrderRepository::checkout_snapshot) would
    /// return, but nothing can change between the check and the
    /// reservation. `finish` may adjust the reserved order (its status)
    /// before it is stored.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The stored order
    /// * `Err(E)` - The guard's error, or the reservation's; nothing changed
    pub async fn place_guarded<E, G, F>(
        &self,
        user_id: UserId,
        guard: G,
        finish: F,
    ) -> Result<Order, E>
    where
        E: From<StoreError>,
        G: FnOnce(&CheckoutSnapshot) -> Result<(), E>,
        F: FnOnce(&mut Order),
    {
        debug!(user_id, "Placing guarded order");

        let now = self.store.now();
        let mut records = self.store.write().await;

        guard(&snapshot(&records, user_id))?;

        let mut order = reserve(&mut records, user_id, now)?;
        finish(&mut order);
        Ok(insert(&mut records, order, now))
    }

    /// Gets an order by ID.
    pub async fn get(&self, id: OrderId) -> Option<Order> {
        self.store.read().await.orders.get(&id).cloned()
    }

    /// Lists every order in ascending identifier order.
    pub async fn list(&self) -> Vec<Order> {
        self.store.read().await.orders.values().cloned().collect()
    }

    /// Lists one user's orders in ascending identifier (creation) order.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.store
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Reads the user's cart, the products it references and the user's
    /// order history under one read lock.
    pub async fn checkout_snapshot(&self, user_id: UserId) -> CheckoutSnapshot {
        snapshot(&*self.store.read().await, user_id)
    }
}

// =============================================================================
// Lock-Held Primitives
// =============================================================================

fn snapshot(records: &Records, user_id: UserId) -> CheckoutSnapshot {
    let cart = records
        .carts
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| Cart::empty(user_id));
    let products = cart
        .lines
        .iter()
        .map(|l| records.products.get(&l.product_id).cloned())
        .collect();
    let history = records
        .orders
        .values()
        .filter(|o| o.user_id == user_id)
        .cloned()
        .collect();

    CheckoutSnapshot {
        cart,
        products,
        history,
    }
}

fn reserve(records: &mut Records, user_id: UserId, now: DateTime<Utc>) -> StoreResult<Order> {
    let cart = match records.carts.get(&user_id) {
        Some(cart) if !cart.is_empty() => cart,
        _ => return Err(StoreError::EmptyCart { user_id }),
    };

    // Phase 1: validate every line before touching stock.
    let mut lines = Vec::with_capacity(cart.lines.len());
    for line in &cart.lines {
        let product = records
            .products
            .get(&line.product_id)
            .ok_or_else(|| StoreError::not_found("Product", line.product_id))?;

        if line.quantity <= 0 {
            return Err(StoreError::InvalidQuantity {
                quantity: line.quantity,
            });
        }
        if !product.has_stock_for(line.quantity) {
            return Err(StoreError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
                requested: line.quantity,
            });
        }

        lines.push(OrderLine::new(product.id, line.quantity, product.price));
    }

    // Phase 2: commit.
    for line in &lines {
        if let Some(product) = records.products.get_mut(&line.product_id) {
            product.stock -= line.quantity;
            product.updated_at = now;
        }
    }
    records.carts.remove(&user_id);

    let total: Money = lines.iter().map(|l| l.subtotal).sum();
    info!(user_id, lines = lines.len(), total = %total, "Stock reserved");

    Ok(Order {
        id: 0,
        user_id,
        lines,
        total,
        status: OrderStatus::Placed,
        created_at: now,
    })
}

fn insert(records: &mut Records, order: Order, now: DateTime<Utc>) -> Order {
    let order = Order {
        id: records.order_ids.next(),
        created_at: now,
        ..order
    };

    info!(
        order_id = order.id,
        user_id = order.user_id,
        total = %order.total,
        status = %order.status,
        "Order created"
    );
    records.orders.insert(order.id, order.clone());
    order
}

// =============================================================================
// Unit Tests
// =============================================================================

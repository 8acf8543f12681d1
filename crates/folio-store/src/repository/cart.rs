//! # Cart Repository
//!
//! Cart line primitives. Cross-line business limits live in the cart rule
//! engine, which reaches this repository through [`CartRepository::add_line_guarded`].
//!
//! ## Add Line
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_line(user, product, qty)                                          │
//! │                                                                         │
//! │  user exists? ──────── no ──► NotFound(User)                           │
//! │  product exists? ───── no ──► NotFound(Product)                        │
//! │  guard(line view)? ─── Err ─► caller's error, nothing mutated          │
//! │  qty > 0? ──────────── no ──► InvalidQuantity                          │
//! │  line + qty fits i64? ─ no ─► QuantityOverflow                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart absent? ── create it (next cart id)                              │
//! │  line present? ─ increment quantity, keep captured price               │
//! │  else ───────── append line, capture live price                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use folio_core::validation::validate_quantity;
use folio_core::{Cart, CartLine, Money, Product, ProductId, UserId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{EntityStore, Records};

// =============================================================================
// Line View
// =============================================================================

/// What a cart guard sees: the product being added, the cart as it stands,
/// and read access to every other product.
///
/// Built under the write lock, so nothing changes while the guard runs.
#[derive(Debug)]
pub struct LineView<'a> {
    /// The product being added.
    pub product: &'a Product,
    /// The user's current cart (the synthesized empty cart if none).
    pub cart: &'a Cart,
    /// Units requested by this call.
    pub quantity: i64,
    products: &'a BTreeMap<ProductId, Product>,
}

impl<'a> LineView<'a> {
    /// Units already on the line for this product (0 if none).
    pub fn current_quantity(&self) -> i64 {
        self.cart.quantity_of(self.product.id)
    }

    /// Units the line would hold after this call, saturating at `i64::MAX`.
    pub fn resulting_quantity(&self) -> i64 {
        self.current_quantity().saturating_add(self.quantity)
    }

    /// Returns true if this call would create a new distinct line.
    pub fn is_new_line(&self) -> bool {
        !self.cart.contains(self.product.id)
    }

    /// Looks up any product by id.
    pub fn product(&self, id: ProductId) -> Option<&'a Product> {
        self.products.get(&id)
    }

    /// Live price of a product, if it still exists.
    pub fn live_price(&self, id: ProductId) -> Option<Money> {
        self.product(id).map(|p| p.price)
    }
}

// =============================================================================
// Cart Repository
// =============================================================================

/// Repository for per-user carts.
#[derive(Debug, Clone)]
pub struct CartRepository {
    store: EntityStore,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(store: EntityStore) -> Self {
        CartRepository { store }
    }

    /// Gets the user's cart, or the synthesized empty cart (id `0`).
    ///
    /// Never fails: an absent cart reads as empty.
    pub async fn get(&self, user_id: UserId) -> Cart {
        self.store
            .read()
            .await
            .carts
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Cart::empty(user_id))
    }

    /// Adds `quantity` units of a product to the user's cart.
    ///
    /// Creates the cart on first use. Enforces no cross-line limits.
    ///
    /// ## Returns
    /// * `Ok(Cart)` - A copy of the resulting cart
    /// * `Err(StoreError::NotFound)` - Unknown user or product
    /// * `Err(StoreError::InvalidQuantity)` - `quantity <= 0`
    /// * `Err(StoreError::QuantityOverflow)` - The line cannot hold that many
    pub async fn add_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> StoreResult<Cart> {
        self.add_line_guarded(user_id, product_id, quantity, |_| Ok::<(), StoreError>(()))
            .await
    }

    /// Like [`add_line`](CartRepository::add_line), but runs `guard` against
    /// the live cart and product under the same write lock, before any
    /// mutation. A guard error is returned unchanged and leaves the cart as
    /// it was. The guard runs before the quantity check, so it may see a
    /// non-positive `quantity`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// store.carts().add_line_guarded(user, product, 2, |view| {
    ///     if view.product.discontinued {
    ///         return Err(CoreError::ProductUnavailable { product_id: view.product.id });
    ///     }
    ///     Ok(())
    /// }).await?;
    /// ```
    pub async fn add_line_guarded<E, G>(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
        guard: G,
    ) -> Result<Cart, E>
    where
        E: From<StoreError>,
        G: FnOnce(&LineView<'_>) -> Result<(), E>,
    {
        debug!(user_id, product_id, quantity, "Adding cart line");

        let mut records = self.store.write().await;

        if !records.users.contains_key(&user_id) {
            return Err(StoreError::not_found("User", user_id).into());
        }
        let product = records
            .products
            .get(&product_id)
            .ok_or_else(|| StoreError::not_found("Product", product_id))?;

        let empty = Cart::empty(user_id);
        let view = LineView {
            product,
            cart: records.carts.get(&user_id).unwrap_or(&empty),
            quantity,
            products: &records.products,
        };
        guard(&view)?;
        validate_quantity(quantity).map_err(|_| StoreError::InvalidQuantity { quantity })?;

        let captured_price = product.price;
        let Records {
            carts, cart_ids, ..
        } = &mut *records;
        let cart = carts.entry(user_id).or_insert_with(|| {
            let id = cart_ids.next();
            debug!(user_id, cart_id = id, "Creating cart");
            Cart {
                id,
                user_id,
                lines: Vec::new(),
            }
        });

        match cart.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or(
                    StoreError::QuantityOverflow {
                        product_id,
                        current: line.quantity,
                        requested: quantity,
                    },
                )?;
            }
            None => cart.lines.push(CartLine {
                product_id,
                quantity,
                unit_price: Some(captured_price),
            }),
        }

        Ok(cart.clone())
    }

    /// Removes the line for `product_id`.
    ///
    /// A missing cart or line is not an error; the (possibly unchanged)
    /// cart is returned either way.
    pub async fn remove_line(&self, user_id: UserId, product_id: ProductId) -> Cart {
        debug!(user_id, product_id, "Removing cart line");

        let mut records = self.store.write().await;
        match records.carts.get_mut(&user_id) {
            Some(cart) => {
                cart.lines.retain(|l| l.product_id != product_id);
                cart.clone()
            }
            None => Cart::empty(user_id),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

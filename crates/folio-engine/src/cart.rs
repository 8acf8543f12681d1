//! # Cart Rule Engine
//!
//! Gatekeeper for cart mutations.
//!
//! ## Add-to-Cart Rule Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_to_cart(user, product, qty)                                       │
//! │                                                                         │
//! │   1. discontinued      product.discontinued        → ProductUnavailable│
//! │   2. quantity          qty <= 0                    → InvalidInput      │
//! │   3. distinct_items    new line, lines == max      → TooManyDistinctItems
//! │   4. line_quantity     current + qty > max         → LineQuantityExceeded
//! │   5. stock             stock < current + qty       → InsufficientStock │
//! │   6. low_stock         stock < 3, current + qty > 1 → LowStockCap       │
//! │   7. total_items       units + qty > max           → TotalItemsExceeded│
//! │   8. risk              value + price × qty >= max  → RiskLimitExceeded │
//! │                                                                         │
//! │  Sums saturate, so an absurd qty fails a cap instead of wrapping.     │
//! │  First failure wins. The chain runs under the store's write lock,      │
//! │  against the same cart it then mutates.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order matters: the low-stock cap is a stricter cousin of the line cap and
//! the stock check, and moving it changes which error a shopper sees.

use folio_core::validation::validate_quantity;
use folio_core::{Cart, CoreError, CoreResult, Money, ProductId, UserId};
use folio_store::{EntityStore, LineView};
use tracing::{debug, warn};

use crate::config::RuleLimits;

/// Products with fewer units than this are limited to one per cart.
pub const LOW_STOCK_THRESHOLD: i64 = 3;

/// One step of the add-to-cart chain.
type CartRule = fn(&LineView<'_>, &RuleLimits) -> CoreResult<()>;

/// The add-to-cart chain, in evaluation order.
const ADD_TO_CART_RULES: &[(&str, CartRule)] = &[
    ("discontinued", reject_discontinued),
    ("quantity", require_positive_quantity),
    ("distinct_items", limit_distinct_items),
    ("line_quantity", limit_line_quantity),
    ("stock", require_stock),
    ("low_stock", cap_low_stock),
    ("total_items", limit_total_items),
    ("risk", limit_cart_value),
];

// =============================================================================
// Rules
// =============================================================================

fn reject_discontinued(view: &LineView<'_>, _: &RuleLimits) -> CoreResult<()> {
    if view.product.discontinued {
        return Err(CoreError::ProductUnavailable {
            product_id: view.product.id,
        });
    }
    Ok(())
}

fn require_positive_quantity(view: &LineView<'_>, _: &RuleLimits) -> CoreResult<()> {
    Ok(validate_quantity(view.quantity)?)
}

fn limit_distinct_items(view: &LineView<'_>, limits: &RuleLimits) -> CoreResult<()> {
    if view.is_new_line() && view.cart.line_count() >= limits.max_distinct_cart_items {
        return Err(CoreError::TooManyDistinctItems {
            max: limits.max_distinct_cart_items,
        });
    }
    Ok(())
}

fn limit_line_quantity(view: &LineView<'_>, limits: &RuleLimits) -> CoreResult<()> {
    let requested = view.resulting_quantity();
    if requested > limits.max_quantity_per_line_item {
        return Err(CoreError::LineQuantityExceeded {
            product_id: view.product.id,
            requested,
            max: limits.max_quantity_per_line_item,
        });
    }
    Ok(())
}

fn require_stock(view: &LineView<'_>, _: &RuleLimits) -> CoreResult<()> {
    let requested = view.resulting_quantity();
    if !view.product.has_stock_for(requested) {
        return Err(CoreError::InsufficientStock {
            product_id: view.product.id,
            available: view.product.stock,
            requested,
        });
    }
    Ok(())
}

fn cap_low_stock(view: &LineView<'_>, _: &RuleLimits) -> CoreResult<()> {
    if view.product.stock < LOW_STOCK_THRESHOLD && view.resulting_quantity() > 1 {
        return Err(CoreError::LowStockCap {
            product_id: view.product.id,
            stock: view.product.stock,
        });
    }
    Ok(())
}

fn limit_total_items(view: &LineView<'_>, limits: &RuleLimits) -> CoreResult<()> {
    let requested = view.cart.total_quantity().saturating_add(view.quantity);
    if requested > limits.max_total_items_in_cart {
        return Err(CoreError::TotalItemsExceeded {
            requested,
            max: limits.max_total_items_in_cart,
        });
    }
    Ok(())
}

fn limit_cart_value(view: &LineView<'_>, limits: &RuleLimits) -> CoreResult<()> {
    let addition = view.product.price.saturating_mul_quantity(view.quantity);
    let total = cart_value(view).saturating_add(addition);
    if total >= limits.cart_risk_limit_total {
        return Err(CoreError::RiskLimitExceeded {
            total,
            limit: limits.cart_risk_limit_total,
        });
    }
    Ok(())
}

/// Value of the existing lines: each at its captured price, or at its own
/// product's live price when unset.
fn cart_value(view: &LineView<'_>) -> Money {
    view.cart
        .lines
        .iter()
        .map(|line| {
            let live = view.live_price(line.product_id).unwrap_or_default();
            line.subtotal(live)
        })
        .sum()
}

/// Runs the chain; the first failing rule's error is returned.
fn evaluate(view: &LineView<'_>, limits: &RuleLimits) -> CoreResult<()> {
    for (name, rule) in ADD_TO_CART_RULES {
        if let Err(err) = rule(view, limits) {
            warn!(
                rule = *name,
                user_id = view.cart.user_id,
                product_id = view.product.id,
                quantity = view.quantity,
                error = %err,
                "Cart rule rejected add"
            );
            return Err(err);
        }
    }
    Ok(())
}

// =============================================================================
// Cart Service
// =============================================================================

/// Applies cart mutations after the rule chain approves them.
#[derive(Debug, Clone)]
pub struct CartService {
    store: EntityStore,
    limits: RuleLimits,
}

impl CartService {
    pub fn new(store: EntityStore, limits: RuleLimits) -> Self {
        CartService { store, limits }
    }

    /// Adds `quantity` units of a product to the user's cart.
    ///
    /// ## Returns
    /// * `Ok(Cart)` - The cart after the addition
    /// * `Err(CoreError::NotFound)` - Unknown user or product
    /// * `Err(CoreError::InvalidInput)` - `quantity <= 0`
    /// * `Err(..)` - The first cart rule that failed
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> CoreResult<Cart> {
        debug!(user_id, product_id, quantity, "Add to cart");

        let limits = self.limits;
        self.store
            .carts()
            .add_line_guarded(user_id, product_id, quantity, |view| {
                evaluate(view, &limits)
            })
            .await
    }

    /// Removes a product's line. No rules apply; absent lines are ignored.
    pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> Cart {
        self.store.carts().remove_line(user_id, product_id).await
    }

    /// Returns the user's cart (empty if none).
    pub async fn get_cart(&self, user_id: UserId) -> Cart {
        self.store.carts().get(user_id).await
    }

    /// The limits this service enforces.
    pub fn limits(&self) -> &RuleLimits {
        &self.limits
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

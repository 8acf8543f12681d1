//! # Order Placement Engine
//!
//! Converts a cart into a committed order.
//!
//! ## Placement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(user)                                                     │
//! │                                                                         │
//! │  one write lock hold from here to the end                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  READ-ONLY CHECKS (first failure wins)                                 │
//! │   1. duplicate_order   last order within window     → DuplicateOrder   │
//! │   2. cart_present      no lines                     → EmptyCart        │
//! │   3. special_alone     special + other lines        → SpecialItemMustBeAlone
//! │   4. lines             per line, in cart order:                        │
//! │                          product gone               → NotFound         │
//! │                          qty <= 0                   → InvalidInput     │
//! │                          special, qty != 1          → SpecialItemQuantity
//! │                          captured != live price     → PriceDrift       │
//! │                          stock < qty                → InsufficientStock│
//! │   5. minimum           total < minimum              → BelowMinimum     │
//! │   6. daily_cap         today + total > cap          → DailySpendCapExceeded
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  7. reserve_stock_for_order  (atomic: stock, lines, cart)              │
//! │  8. total >= review threshold → PENDING_REVIEW                         │
//! │  9. create order (id, timestamp) → returned                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1-6 never mutate anything, so a rejected placement leaves stock and
//! cart untouched. The whole flow runs under one write lock, so a concurrent
//! add or placement cannot slip between the checks and the reservation.

use chrono::{DateTime, Utc};
use folio_core::{
    CoreError, CoreResult, Money, Order, OrderId, OrderStatus, Product, UserId, ValidationError,
};
use folio_store::{CheckoutSnapshot, EntityStore};
use tracing::{debug, info, warn};

use crate::config::RuleLimits;

// =============================================================================
// Checkout Rules
// =============================================================================

/// Everything the checkout rules look at.
struct Checkout<'a> {
    user_id: UserId,
    now: DateTime<Utc>,
    snapshot: &'a CheckoutSnapshot,
    limits: &'a RuleLimits,
}

impl Checkout<'_> {
    fn products(&self) -> impl Iterator<Item = &Product> {
        self.snapshot.products.iter().flatten()
    }

    /// Cart value at live prices. Only meaningful once every line's product
    /// is known to exist.
    fn total(&self) -> Money {
        self.snapshot
            .cart
            .lines
            .iter()
            .zip(&self.snapshot.products)
            .filter_map(|(line, product)| {
                product
                    .as_ref()
                    .map(|p| p.price.multiply_quantity(line.quantity))
            })
            .sum()
    }
}

type CheckoutRule = fn(&Checkout<'_>) -> CoreResult<()>;

/// The checkout chain, in evaluation order.
const CHECKOUT_RULES: &[(&str, CheckoutRule)] = &[
    ("duplicate_order", reject_duplicate_order),
    ("cart_present", require_lines),
    ("special_alone", isolate_special_items),
    ("lines", validate_lines),
    ("minimum", require_minimum),
    ("daily_cap", limit_daily_spend),
];

fn reject_duplicate_order(checkout: &Checkout<'_>) -> CoreResult<()> {
    let Some(last) = checkout.snapshot.history.last() else {
        return Ok(());
    };

    let elapsed = checkout.now - last.created_at;
    if elapsed <= checkout.limits.duplicate_order_window() {
        return Err(CoreError::DuplicateOrder {
            user_id: checkout.user_id,
            last_order_id: last.id,
            elapsed_secs: elapsed.num_seconds(),
        });
    }
    Ok(())
}

fn require_lines(checkout: &Checkout<'_>) -> CoreResult<()> {
    if checkout.snapshot.cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    Ok(())
}

fn isolate_special_items(checkout: &Checkout<'_>) -> CoreResult<()> {
    if checkout.snapshot.cart.line_count() <= 1 {
        return Ok(());
    }
    match checkout.products().find(|p| p.special) {
        Some(special) => Err(CoreError::SpecialItemMustBeAlone {
            product_id: special.id,
        }),
        None => Ok(()),
    }
}

fn validate_lines(checkout: &Checkout<'_>) -> CoreResult<()> {
    let lines = checkout.snapshot.cart.lines.iter();

    for (line, product) in lines.zip(&checkout.snapshot.products) {
        let product = product
            .as_ref()
            .ok_or_else(|| CoreError::product_not_found(line.product_id))?;

        if line.quantity <= 0 {
            return Err(ValidationError::must_be_positive("quantity").into());
        }
        if product.special && line.quantity != 1 {
            return Err(CoreError::SpecialItemQuantity {
                product_id: product.id,
                quantity: line.quantity,
            });
        }
        if let Some(captured) = line.unit_price {
            if captured != product.price {
                return Err(CoreError::PriceDrift {
                    product_id: product.id,
                    captured,
                    current: product.price,
                });
            }
        }
        if !product.has_stock_for(line.quantity) {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
                requested: line.quantity,
            });
        }
    }
    Ok(())
}

fn require_minimum(checkout: &Checkout<'_>) -> CoreResult<()> {
    let total = checkout.total();
    if total < checkout.limits.min_order_amount {
        return Err(CoreError::BelowMinimum {
            total,
            minimum: checkout.limits.min_order_amount,
        });
    }
    Ok(())
}

fn limit_daily_spend(checkout: &Checkout<'_>) -> CoreResult<()> {
    let today = checkout.now.date_naive();
    let spent: Money = checkout
        .snapshot
        .history
        .iter()
        .filter(|o| o.created_at.date_naive() == today)
        .map(|o| o.total)
        .sum();

    let total = checkout.total();
    if spent + total > checkout.limits.daily_user_spend_cap {
        return Err(CoreError::DailySpendCapExceeded {
            spent,
            total,
            cap: checkout.limits.daily_user_spend_cap,
        });
    }
    Ok(())
}

fn evaluate(checkout: &Checkout<'_>) -> CoreResult<()> {
    for (name, rule) in CHECKOUT_RULES {
        if let Err(err) = rule(checkout) {
            warn!(
                rule = *name,
                user_id = checkout.user_id,
                error = %err,
                "Checkout rule rejected order"
            );
            return Err(err);
        }
    }
    Ok(())
}

// =============================================================================
// Order Service
// =============================================================================

/// Places orders and serves order history.
#[derive(Debug, Clone)]
pub struct OrderService {
    store: EntityStore,
    limits: RuleLimits,
}

impl OrderService {
    pub fn new(store: EntityStore, limits: RuleLimits) -> Self {
        OrderService { store, limits }
    }

    /// Places an order from the user's cart.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The stored order; the cart is gone and stock reduced
    /// * `Err(..)` - The first failed check; nothing was changed
    pub async fn place_order(&self, user_id: UserId) -> CoreResult<Order> {
        debug!(user_id, "Placing order");

        let now = self.store.now();
        let limits = self.limits;
        let order = self
            .store
            .orders()
            .place_guarded(
                user_id,
                |snapshot| {
                    evaluate(&Checkout {
                        user_id,
                        now,
                        snapshot,
                        limits: &limits,
                    })
                },
                |order| {
                    if order.total >= limits.high_value_review_threshold {
                        debug!(user_id, total = %order.total, "Order held for review");
                        order.status = OrderStatus::PendingReview;
                    }
                },
            )
            .await?;

        info!(
            order_id = order.id,
            user_id,
            total = %order.total,
            status = %order.status,
            "Order placed"
        );
        Ok(order)
    }

    /// Gets an order by ID.
    pub async fn get_order(&self, id: OrderId) -> CoreResult<Order> {
        self.store
            .orders()
            .get(id)
            .await
            .ok_or_else(|| CoreError::order_not_found(id))
    }

    /// The user's orders, oldest first.
    pub async fn order_history(&self, user_id: UserId) -> Vec<Order> {
        self.store.orders().list_for_user(user_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartService;
    use chrono::{Duration, TimeZone};
    use folio_core::{Clock, ErrorCode, ManualClock, OrderLine, ProductId, ProductInput};
    use std::sync::Arc;

    struct Fixture {
        clock: Arc<ManualClock>,
        store: EntityStore,
        carts: CartService,
        orders: OrderService,
        user: UserId,
    }

    async fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap(),
        ));
        let store = EntityStore::with_clock(clock.clone());
        let user = store.users().create("jane@email.com", "Jane Smith").await.id;
        Fixture {
            clock,
            carts: CartService::new(store.clone(), RuleLimits::default()),
            orders: OrderService::new(store.clone(), RuleLimits::default()),
            store,
            user,
        }
    }

    impl Fixture {
        async fn book(&self, input: ProductInput) -> ProductId {
            self.store.products().create(input).await.id
        }

        async fn priced(&self, cents: i64) -> ProductId {
            self.book(ProductInput::new("Domain-Driven Design", "Eric Evans", Money::from_cents(cents), 30))
                .await
        }

        async fn add(&self, product: ProductId, qty: i64) {
            self.carts.add_to_cart(self.user, product, qty).await.unwrap();
        }

        async fn place(&self) -> CoreResult<Order> {
            self.orders.place_order(self.user).await
        }

        fn wait_out_window(&self) {
            self.clock.advance(Duration::seconds(6));
        }
    }

    #[tokio::test]
    async fn test_place_order_commits() {
        let f = fixture().await;
        let book = f.priced(7499).await;
        f.add(book, 2).await;

        let order = f.place().await.unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.lines, vec![OrderLine::new(book, 2, Money::from_cents(7499))]);
        assert_eq!(order.total.cents(), 14998);
        assert_eq!(order.created_at, f.clock.now());

        assert!(f.carts.get_cart(f.user).await.is_empty());
        assert_eq!(f.store.products().get(book).await.unwrap().stock, 28);
        assert_eq!(f.orders.get_order(order.id).await.unwrap(), order);
        assert_eq!(f.orders.order_history(f.user).await, vec![order]);
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let f = fixture().await;
        assert_eq!(f.place().await.unwrap_err(), CoreError::EmptyCart);
    }

    #[tokio::test]
    async fn test_below_minimum() {
        let f = fixture().await;
        let cheap = f.priced(100).await;
        f.add(cheap, 1).await;

        assert_eq!(f.place().await.unwrap_err().code(), ErrorCode::BelowMinimum);
        assert_eq!(f.carts.get_cart(f.user).await.quantity_of(cheap), 1);
        assert_eq!(f.store.products().get(cheap).await.unwrap().stock, 30);
    }

    #[tokio::test]
    async fn test_review_threshold_is_inclusive() {
        let f = fixture().await;
        let book = f.priced(150_000).await;
        f.add(book, 2).await;

        let order = f.place().await.unwrap();
        assert_eq!(order.total.cents(), 300_000);
        assert_eq!(order.status, OrderStatus::PendingReview);
    }

    #[tokio::test]
    async fn test_special_item_rules() {
        let f = fixture().await;
        let special = f
            .book(ProductInput::new("Signed First Edition", "Eric Evans", Money::from_cents(50_000), 5).special(true))
            .await;
        let normal = f.priced(4500).await;

        f.add(special, 1).await;
        f.add(normal, 1).await;
        assert_eq!(
            f.place().await.unwrap_err(),
            CoreError::SpecialItemMustBeAlone { product_id: special }
        );

        f.carts.remove_from_cart(f.user, normal).await;
        f.add(special, 1).await;
        assert_eq!(
            f.place().await.unwrap_err(),
            CoreError::SpecialItemQuantity {
                product_id: special,
                quantity: 2
            }
        );

        f.carts.remove_from_cart(f.user, special).await;
        f.add(special, 1).await;
        assert!(f.place().await.is_ok());
    }

    #[tokio::test]
    async fn test_price_drift() {
        let f = fixture().await;
        let book = f.priced(4500).await;
        f.add(book, 1).await;

        f.store
            .products()
            .update(book, ProductInput::new("Domain-Driven Design", "Eric Evans", Money::from_cents(4999), 30))
            .await
            .unwrap();

        assert_eq!(
            f.place().await.unwrap_err(),
            CoreError::PriceDrift {
                product_id: book,
                captured: Money::from_cents(4500),
                current: Money::from_cents(4999),
            }
        );
    }

    #[tokio::test]
    async fn test_stock_shortfall_after_add() {
        let f = fixture().await;
        let book = f.priced(4500).await;
        f.add(book, 4).await;

        f.store
            .products()
            .update(book, ProductInput::new("Domain-Driven Design", "Eric Evans", Money::from_cents(4500), 3))
            .await
            .unwrap();

        assert_eq!(f.place().await.unwrap_err().code(), ErrorCode::InsufficientStock);
        assert_eq!(f.carts.get_cart(f.user).await.quantity_of(book), 4);
    }

    #[tokio::test]
    async fn test_deleted_product_is_not_found() {
        let f = fixture().await;
        let book = f.priced(4500).await;
        f.add(book, 1).await;
        f.store.products().delete(book).await.unwrap();

        assert_eq!(f.place().await.unwrap_err().code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_duplicate_window() {
        let f = fixture().await;
        let book = f.priced(4500).await;
        f.add(book, 1).await;
        let first = f.place().await.unwrap();

        f.add(book, 1).await;
        f.clock.advance(Duration::seconds(5));
        assert_eq!(
            f.place().await.unwrap_err(),
            CoreError::DuplicateOrder {
                user_id: f.user,
                last_order_id: first.id,
                elapsed_secs: 5
            }
        );

        f.clock.advance(Duration::seconds(1));
        assert!(f.place().await.is_ok());
    }

    #[tokio::test]
    async fn test_daily_cap_counts_same_utc_day_only() {
        let f = fixture().await;
        let book = f.priced(250_000).await;

        // Two $5,000 orders fill today's $10,000 cap.
        for _ in 0..2 {
            f.add(book, 2).await;
            f.place().await.unwrap();
            f.wait_out_window();
        }

        let cheap = f.priced(1000).await;
        f.add(cheap, 1).await;
        let err = f.place().await.unwrap_err();
        assert_eq!(
            err,
            CoreError::DailySpendCapExceeded {
                spent: Money::from_cents(1_000_000),
                total: Money::from_cents(1000),
                cap: Money::from_cents(1_000_000),
            }
        );

        f.clock.set(Utc.with_ymd_and_hms(2026, 6, 16, 0, 0, 0).unwrap());
        assert!(f.place().await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_place_one_order_per_window() {
        let f = fixture().await;
        let book = f.priced(4500).await;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let carts = f.carts.clone();
                let orders = f.orders.clone();
                let user = f.user;
                tokio::spawn(async move {
                    let _ = carts.add_to_cart(user, book, 1).await;
                    orders.place_order(user).await
                })
            })
            .collect();

        let mut placed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => placed += 1,
                Err(err) => assert!(matches!(
                    err.code(),
                    ErrorCode::DuplicateOrder | ErrorCode::EmptyCart
                )),
            }
        }

        // The clock never moves, so every later placement is a duplicate.
        assert_eq!(placed, 1);
        assert_eq!(f.orders.order_history(f.user).await.len(), 1);
    }
}

//! End-to-end flows over a seeded store.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use folio_core::{
    Clock, CoreError, ErrorCode, ManualClock, Money, OrderStatus, ProductId, ProductInput, UserId,
};
use crate::{Commerce, RuleLimits};
use folio_store::{seed_demo_data, EntityStore};

struct Shop {
    clock: Arc<ManualClock>,
    commerce: Commerce,
}

async fn seeded_shop() -> Shop {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap(),
    ));
    let store = EntityStore::with_clock(clock.clone());
    seed_demo_data(&store).await;

    Shop {
        clock,
        commerce: Commerce::new(store, RuleLimits::default()),
    }
}

impl Shop {
    async fn product(&self, input: ProductInput) -> ProductId {
        self.commerce.catalog().create_product(input).await.unwrap().id
    }

    async fn priced(&self, cents: i64, stock: i64) -> ProductId {
        self.product(ProductInput::new(
            "Introduction to Algorithms",
            "Thomas H. Cormen",
            Money::from_cents(cents),
            stock,
        ))
        .await
    }

    async fn stock_of(&self, product: ProductId) -> i64 {
        self.commerce.catalog().get_product(product).await.unwrap().stock
    }
}

const JOHN: UserId = 1;
const JANE: UserId = 2;

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_scenario_a_add_seeded_product() {
    let shop = seeded_shop().await;
    assert_eq!(shop.commerce.catalog().list_products().await.len(), 10);

    shop.commerce.carts().add_to_cart(JOHN, 1, 2).await.unwrap();

    let cart = shop.commerce.carts().get_cart(JOHN).await;
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.lines[0].product_id, 1);
    assert_eq!(cart.lines[0].quantity, 2);
}

#[tokio::test]
async fn test_scenario_b_risk_cap_reached() {
    let shop = seeded_shop().await;
    let pricey = shop.priced(200_000, 10).await;
    let carts = shop.commerce.carts();

    let cart = carts.add_to_cart(JOHN, pricey, 2).await.unwrap();
    assert_eq!(cart.quantity_of(pricey), 2);

    let err = carts.add_to_cart(JOHN, pricey, 1).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RiskLimitExceeded);
    assert_eq!(carts.get_cart(JOHN).await.quantity_of(pricey), 2);
}

#[tokio::test]
async fn test_scenario_c_high_value_order_held_for_review() {
    let shop = seeded_shop().await;
    let pricey = shop.priced(150_000, 10).await;

    shop.commerce.carts().add_to_cart(JOHN, pricey, 2).await.unwrap();
    let order = shop.commerce.orders().place_order(JOHN).await.unwrap();

    assert_eq!(order.total.cents(), 300_000);
    assert_eq!(order.status, OrderStatus::PendingReview);
}

#[tokio::test]
async fn test_scenario_d_duplicate_order_even_with_empty_cart() {
    let shop = seeded_shop().await;
    let orders = shop.commerce.orders();

    shop.commerce.carts().add_to_cart(JOHN, 2, 1).await.unwrap();
    orders.place_order(JOHN).await.unwrap();

    shop.clock.advance(Duration::seconds(1));
    let err = orders.place_order(JOHN).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicateOrder);

    // Once the window passes the empty cart is what gets reported.
    shop.clock.advance(Duration::seconds(10));
    assert_eq!(orders.place_order(JOHN).await.unwrap_err(), CoreError::EmptyCart);
}

#[tokio::test]
async fn test_scenario_e_special_item_must_be_alone() {
    let shop = seeded_shop().await;
    let special = shop
        .product(
            ProductInput::new("Collector's Box Set", "Donald Knuth", Money::from_cents(45_000), 4)
                .special(true),
        )
        .await;

    shop.commerce.carts().add_to_cart(JOHN, special, 1).await.unwrap();
    shop.commerce.carts().add_to_cart(JOHN, 3, 1).await.unwrap();

    let err = shop.commerce.orders().place_order(JOHN).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SpecialItemMustBeAlone);
    assert_eq!(shop.stock_of(special).await, 4);
}

#[tokio::test]
async fn test_scenario_f_price_drift() {
    let shop = seeded_shop().await;
    let book = shop.priced(3000, 20).await;
    shop.commerce.carts().add_to_cart(JOHN, book, 1).await.unwrap();

    shop.commerce
        .catalog()
        .update_product(
            book,
            ProductInput::new("Introduction to Algorithms", "Thomas H. Cormen", Money::from_cents(3500), 20),
        )
        .await
        .unwrap();

    let err = shop.commerce.orders().place_order(JOHN).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PriceDrift);
    assert_eq!(shop.stock_of(book).await, 20);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn test_created_product_reads_back_unchanged() {
    let shop = seeded_shop().await;
    let input = ProductInput::new("Structure and Interpretation", "Harold Abelson", Money::from_cents(5500), 12)
        .description("Wizard book");

    let created = shop.commerce.catalog().create_product(input.clone()).await.unwrap();
    let fetched = shop.commerce.catalog().get_product(created.id).await.unwrap();

    assert_eq!(fetched.id, 11);
    assert_eq!(fetched.title, input.title);
    assert_eq!(fetched.author, input.author);
    assert_eq!(fetched.description, input.description);
    assert_eq!(fetched.price, input.price);
    assert_eq!(fetched.stock, input.stock);
    assert_eq!(fetched.created_at, shop.clock.now());
}

#[tokio::test]
async fn test_repeated_adds_accumulate_on_one_line() {
    let shop = seeded_shop().await;
    for _ in 0..3 {
        shop.commerce.carts().add_to_cart(JANE, 7, 1).await.unwrap();
    }

    let cart = shop.commerce.carts().get_cart(JANE).await;
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.quantity_of(7), 3);
}

#[tokio::test]
async fn test_cart_limits_hold_under_any_add_sequence() {
    let shop = seeded_shop().await;
    let limits = RuleLimits::default();

    // Deterministic spread of products 1-10, quantities 1-4 and the odd
    // extreme value.
    let extremes = [i64::MAX, i64::MIN, 0, -1];
    for step in 0..60u64 {
        let product = step * 7 % 10 + 1;
        let quantity = match step % 5 {
            4 => extremes[(step / 5 % 4) as usize],
            _ => (step * 3 % 4 + 1) as i64,
        };
        let _ = shop.commerce.carts().add_to_cart(JOHN, product, quantity).await;

        let cart = shop.commerce.carts().get_cart(JOHN).await;
        assert!(cart.line_count() <= limits.max_distinct_cart_items);
        assert!(cart.total_quantity() <= limits.max_total_items_in_cart);
        assert!(cart
            .lines
            .iter()
            .all(|l| l.quantity > 0 && l.quantity <= limits.max_quantity_per_line_item));
    }
}

#[tokio::test]
async fn test_placement_clears_cart_and_moves_exact_stock() {
    let shop = seeded_shop().await;
    let carts = shop.commerce.carts();
    carts.add_to_cart(JANE, 1, 2).await.unwrap();
    carts.add_to_cart(JANE, 5, 3).await.unwrap();
    carts.add_to_cart(JANE, 9, 1).await.unwrap();

    let before: i64 = shop
        .commerce
        .catalog()
        .list_products()
        .await
        .iter()
        .map(|p| p.stock)
        .sum();

    let order = shop.commerce.orders().place_order(JANE).await.unwrap();

    let after: i64 = shop
        .commerce
        .catalog()
        .list_products()
        .await
        .iter()
        .map(|p| p.stock)
        .sum();

    assert!(carts.get_cart(JANE).await.is_empty());
    assert_eq!(before - after, order.total_quantity());
    assert_eq!(order.total_quantity(), 6);
    assert_eq!(order.total, order.lines_total());
    assert_eq!(order.total.cents(), 2 * 4500 + 3 * 4999 + 7499);
}

#[tokio::test]
async fn test_rejected_placement_changes_nothing() {
    let shop = seeded_shop().await;
    let cheap = shop.priced(199, 10).await;
    shop.commerce.carts().add_to_cart(JOHN, cheap, 2).await.unwrap();
    let cart_before = shop.commerce.carts().get_cart(JOHN).await;

    let err = shop.commerce.orders().place_order(JOHN).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::BelowMinimum);
    assert_eq!(shop.commerce.carts().get_cart(JOHN).await, cart_before);
    assert_eq!(shop.stock_of(cheap).await, 10);
    assert!(shop.commerce.orders().order_history(JOHN).await.is_empty());
}

#[tokio::test]
async fn test_daily_spend_cap_spans_orders() {
    let shop = seeded_shop().await;
    let pricey = shop.priced(250_000, 10).await;
    let carts = shop.commerce.carts();
    let orders = shop.commerce.orders();

    carts.add_to_cart(JANE, pricey, 2).await.unwrap();
    orders.place_order(JANE).await.unwrap();
    shop.clock.advance(Duration::seconds(30));

    carts.add_to_cart(JANE, pricey, 2).await.unwrap();
    orders.place_order(JANE).await.unwrap();
    shop.clock.advance(Duration::seconds(30));

    carts.add_to_cart(JANE, 6, 1).await.unwrap();
    let err = orders.place_order(JANE).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DailySpendCapExceeded);

    // Another shopper is unaffected.
    carts.add_to_cart(JOHN, 6, 1).await.unwrap();
    assert!(orders.place_order(JOHN).await.is_ok());
}

#[tokio::test]
async fn test_special_item_quantity_must_be_one() {
    let shop = seeded_shop().await;
    let special = shop
        .product(
            ProductInput::new("Signed Manuscript", "Grace Hopper", Money::from_cents(90_000), 5)
                .special(true),
        )
        .await;

    shop.commerce.carts().add_to_cart(JOHN, special, 2).await.unwrap();
    let err = shop.commerce.orders().place_order(JOHN).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SpecialItemQuantity);
}

#[tokio::test]
async fn test_product_in_cart_cannot_be_deleted() {
    let shop = seeded_shop().await;
    let catalog = shop.commerce.catalog();
    shop.commerce.carts().add_to_cart(JANE, 4, 1).await.unwrap();

    assert_eq!(
        catalog.delete_product(4).await.unwrap_err().code(),
        ErrorCode::ProductInUse
    );

    shop.commerce.carts().remove_from_cart(JANE, 4).await;
    catalog.delete_product(4).await.unwrap();
    assert_eq!(catalog.list_products().await.len(), 9);

    // Identifiers are not recycled.
    let next = shop.priced(1000, 1).await;
    assert_eq!(next, 11);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_never_oversell() {
    let shop = seeded_shop().await;
    let limited = shop.priced(2000, 6).await;

    let mut shoppers = Vec::new();
    for i in 0..10 {
        let user = shop
            .commerce
            .store()
            .users()
            .create(format!("reader{i}@email.com"), format!("Reader {i}"))
            .await
            .id;
        shoppers.push(user);
    }

    // Everyone gets a unit in the cart while stock still shows 6.
    for &user in &shoppers {
        shop.commerce.carts().add_to_cart(user, limited, 1).await.unwrap();
    }

    let handles: Vec<_> = shoppers
        .iter()
        .map(|&user| {
            let commerce = shop.commerce.clone();
            tokio::spawn(async move { commerce.orders().place_order(user).await })
        })
        .collect();

    let mut placed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(err) => assert_eq!(err.code(), ErrorCode::InsufficientStock),
        }
    }

    assert_eq!(placed, 6);
    assert_eq!(shop.stock_of(limited).await, 0);
}

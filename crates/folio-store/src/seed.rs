//! # Demo Data
//!
//! Populates a fresh store with a small book catalog and three shoppers.
//!
//! ## Generated Records
//! - Users: John Doe, Jane Smith, Admin User (ids 1-3)
//! - Products: ten well-known programming books (ids 1-10), none
//!   discontinued or special, prices $25.00 - $120.00
//!
//! Identifiers are deterministic only on an empty store.

use folio_core::{Money, ProductInput};
use tracing::info;

use crate::store::{EntityStore, StoreStats};

/// (email, display name)
const USERS: &[(&str, &str)] = &[
    ("john@email.com", "John Doe"),
    ("jane@email.com", "Jane Smith"),
    ("admin@email.com", "Admin User"),
];

/// (title, author, description, price in cents, stock)
const BOOKS: &[(&str, &str, &str, i64, i64)] = &[
    (
        "The Pragmatic Programmer",
        "Andrew Hunt",
        "Your journey to mastery",
        4500,
        50,
    ),
    (
        "Clean Code",
        "Robert C. Martin",
        "A handbook of agile software craftsmanship",
        3999,
        60,
    ),
    (
        "Design Patterns",
        "Erich Gamma",
        "Elements of reusable object-oriented software",
        5999,
        40,
    ),
    (
        "Introduction to Algorithms",
        "Thomas H. Cormen",
        "The standard algorithms reference",
        8950,
        35,
    ),
    (
        "Refactoring",
        "Martin Fowler",
        "Improving the design of existing code",
        4999,
        45,
    ),
    (
        "You Don't Know JS Yet",
        "Kyle Simpson",
        "Get started with JavaScript",
        2999,
        70,
    ),
    (
        "Operating Systems: Three Easy Pieces",
        "Remzi Arpaci-Dusseau",
        "Virtualization, concurrency and persistence",
        2500,
        80,
    ),
    (
        "Deep Learning",
        "Ian Goodfellow",
        "Foundations of modern neural networks",
        12000,
        20,
    ),
    (
        "Domain-Driven Design",
        "Eric Evans",
        "Tackling complexity in the heart of software",
        7499,
        30,
    ),
    (
        "Computer Networks",
        "Andrew S. Tanenbaum",
        "Protocols from the physical layer up",
        6500,
        55,
    ),
];

/// Creates the demo users and books.
///
/// ## Returns
/// Record counts after seeding.
pub async fn seed_demo_data(store: &EntityStore) -> StoreStats {
    let users = store.users();
    for (email, name) in USERS {
        users.create(*email, *name).await;
    }

    let products = store.products();
    for (title, author, description, price, stock) in BOOKS {
        products
            .create(
                ProductInput::new(*title, *author, Money::from_cents(*price), *stock)
                    .description(*description),
            )
            .await;
    }

    let stats = store.stats().await;
    info!(
        users = stats.users,
        products = stats.products,
        "Demo data seeded"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_creates_catalog() {
        let store = EntityStore::new();
        let stats = seed_demo_data(&store).await;

        assert_eq!(stats.users, 3);
        assert_eq!(stats.products, 10);

        let first = store.products().get(1).await.unwrap();
        assert_eq!(first.title, "The Pragmatic Programmer");
        assert_eq!(first.price.cents(), 4500);

        let catalog = store.products().list().await;
        assert!(catalog.iter().all(|p| !p.discontinued && !p.special));
        assert_eq!(store.users().get(3).await.unwrap().name, "Admin User");
    }
}

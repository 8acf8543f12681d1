//! # Seed Demo Store
//!
//! Builds an in-memory store, fills it with the demo catalog and prints a
//! summary. Useful for eyeballing the seed data and the store's logging.
//!
//! ## Usage
//! ```bash
//! cargo run -p folio-store --bin seed
//!
//! # More detail
//! RUST_LOG=trace cargo run -p folio-store --bin seed
//! ```

use folio_store::{seed_demo_data, EntityStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,folio=debug")),
        )
        .init();

    info!("Seeding demo store");

    let store = EntityStore::new();
    let stats = seed_demo_data(&store).await;

    println!();
    println!("Catalog:");
    for product in store.products().list().await {
        println!(
            "  #{:<3} {:<40} {:<22} {:>9}  stock {}",
            product.id,
            product.title,
            product.author,
            product.price.to_string(),
            product.stock
        );
    }

    println!();
    println!("Users:");
    for user in store.users().list().await {
        println!("  #{:<3} {:<12} {}", user.id, user.name, user.email);
    }

    println!();
    println!(
        "✓ Seeded {} users and {} products",
        stats.users, stats.products
    );
}

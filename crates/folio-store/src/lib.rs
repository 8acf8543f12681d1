//! # folio-store: Entity Store for Folio
//!
//! Sole owner of every mutable record: users, products, carts and orders.
//! State is process-lifetime only.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Folio Data Flow                                │
//! │                                                                         │
//! │  CartService / OrderService / CatalogService (folio-engine)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   folio-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  EntityStore  │    │ Repositories  │    │    Seed      │  │   │
//! │  │   │  (store.rs)   │    │               │    │  (seed.rs)   │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ Arc<RwLock<   │◄───│ ProductRepo   │    │ 3 users      │  │   │
//! │  │   │   Records>>   │    │ CartRepo      │    │ 10 books     │  │   │
//! │  │   │ Clock         │    │ OrderRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The locked record set and its handle
//! - [`error`] - Store error types
//! - [`repository`] - Per-entity repositories
//! - [`seed`] - Demo catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_store::EntityStore;
//!
//! let store = EntityStore::new();
//! folio_store::seed_demo_data(&store).await;
//!
//! let books = store.products().list().await;
//! let cart = store.carts().add_line(1, books[0].id, 2).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use seed::seed_demo_data;
pub use store::{EntityStore, StoreStats};

// Repository re-exports for convenience
pub use repository::cart::{CartRepository, LineView};
pub use repository::order::{CheckoutSnapshot, OrderRepository};
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;

//! # folio-engine: Rule Engines for Folio
//!
//! The business layer over the Entity Store: cart limits, order placement
//! and catalog management. Every service here is stateless apart from its
//! store handle and limits.
//!
//! ## Service Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Commerce                                     │
//! │                                                                         │
//! │   catalog()                carts()                 orders()            │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ CatalogService   │   │ CartService      │   │ OrderService     │    │
//! │  │ create / update  │   │ add_to_cart      │   │ place_order      │    │
//! │  │ delete (guarded) │   │ remove_from_cart │   │ get_order        │    │
//! │  │ get / list       │   │ get_cart         │   │ order_history    │    │
//! │  └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘    │
//! │           └──────────────────────┼──────────────────────┘              │
//! │                                  ▼                                      │
//! │                    EntityStore (one shared handle)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use folio_engine::{Commerce, RuleLimits};
//! use folio_store::{seed_demo_data, EntityStore};
//!
//! let store = EntityStore::new();
//! seed_demo_data(&store).await;
//!
//! let commerce = Commerce::new(store, RuleLimits::default());
//! commerce.carts().add_to_cart(1, 1, 2).await?;
//! let order = commerce.orders().place_order(1).await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod order;

#[cfg(test)]
mod scenarios;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use config::{EngineConfig, RuleLimits};
pub use error::{ConfigError, ConfigResult};
pub use order::OrderService;

use folio_store::EntityStore;

/// All three services over one store.
#[derive(Debug, Clone)]
pub struct Commerce {
    store: EntityStore,
    catalog: CatalogService,
    carts: CartService,
    orders: OrderService,
}

impl Commerce {
    /// Wires the services to `store` with the given limits.
    pub fn new(store: EntityStore, limits: RuleLimits) -> Self {
        Commerce {
            catalog: CatalogService::new(store.clone()),
            carts: CartService::new(store.clone(), limits),
            orders: OrderService::new(store.clone(), limits),
            store,
        }
    }

    /// Wires the services using a loaded configuration.
    pub fn from_config(store: EntityStore, config: &EngineConfig) -> Self {
        Self::new(store, config.limits)
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn carts(&self) -> &CartService {
        &self.carts
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// The underlying store, for user management and diagnostics.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }
}

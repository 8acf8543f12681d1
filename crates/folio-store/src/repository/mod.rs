//! # Repository Module
//!
//! Per-entity views over the shared record set.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service (folio-engine)                                                │
//! │       │                                                                 │
//! │       │  store.carts().add_line(user, product, 2)                      │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── get(&self, user)                                                  │
//! │  ├── add_line / add_line_guarded                                       │
//! │  └── remove_line                                                       │
//! │       │                                                                 │
//! │       │  one lock acquisition per call                                  │
//! │       ▼                                                                 │
//! │  Arc<RwLock<Records>>                                                  │
//! │                                                                         │
//! │  Every record leaving a repository is a clone; callers can never       │
//! │  reach the stored value through what they were handed.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Shopper accounts
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD
//! - [`CartRepository`](cart::CartRepository) - Cart lines
//! - [`OrderRepository`](order::OrderRepository) - Reservation and order history

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

//! # folio-core: Pure Domain Types for Folio
//!
//! Records, money, the error taxonomy and input validation shared by the
//! store and the rule engines. Nothing here locks, allocates handles, or
//! touches I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Folio Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Transport layer (external collaborator)             │   │
//! │  │        routes, payload decoding, status-code mapping           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain ids & quantities                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-engine (rules)                         │   │
//! │  │     CartService • OrderService • CatalogService • RuleLimits    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 folio-store (Entity Store)                      │   │
//! │  │          one RwLock over users, products, carts, orders         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │    types • money • error • validation • clock                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Product, Cart, Order, User)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Error taxonomy shared by every layer
//! - [`validation`] - Catalog input validation
//! - [`clock`] - Injectable wall clock
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_cents(4500); // $45.00
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.cents(), 9000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ErrorCode, ValidationError};
pub use money::Money;
pub use types::*;

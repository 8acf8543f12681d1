//! # Product Repository
//!
//! Catalog records.
//!
//! ## Key Operations
//! - CRUD with store-assigned identifiers and timestamps
//! - Ordered listing
//! - The in-cart reference scan behind the delete guard
//!
//! ## Delete Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    delete_if_unreferenced(7)                            │
//! │                                                                         │
//! │  write lock ──► product 7 exists?  ── no ──► NotFound                  │
//! │                       │ yes                                             │
//! │                       ▼                                                 │
//! │                 any cart holds 7?  ── yes ─► ProductInUse              │
//! │                       │ no                                              │
//! │                       ▼                                                 │
//! │                 remove product 7 ──► unlock                            │
//! │                                                                         │
//! │  Scan and removal share one lock hold, so no add can slip between.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here validates field ranges; the catalog service does that before
//! calling in.

use folio_core::{Product, ProductId, ProductInput};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::EntityStore;

/// Repository for catalog records.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let book = repo.create(input).await;
/// let same = repo.get(book.id).await;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: EntityStore,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(store: EntityStore) -> Self {
        ProductRepository { store }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// The stored product with its assigned id and timestamps.
    pub async fn create(&self, input: ProductInput) -> Product {
        let now = self.store.now();
        let mut records = self.store.write().await;

        let product = Product {
            id: records.product_ids.next(),
            title: input.title,
            author: input.author,
            description: input.description,
            price: input.price,
            stock: input.stock,
            discontinued: input.discontinued,
            special: input.special,
            created_at: now,
            updated_at: now,
        };

        info!(product_id = product.id, title = %product.title, "Product created");
        records.products.insert(product.id, product.clone());
        product
    }

    /// Replaces every caller-supplied field and refreshes `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(StoreError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: ProductId, input: ProductInput) -> StoreResult<Product> {
        debug!(product_id = id, "Updating product");

        let now = self.store.now();
        let mut records = self.store.write().await;

        let product = records
            .products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        product.title = input.title;
        product.author = input.author;
        product.description = input.description;
        product.price = input.price;
        product.stock = input.stock;
        product.discontinued = input.discontinued;
        product.special = input.special;
        product.updated_at = now;

        Ok(product.clone())
    }

    /// Removes a product unconditionally.
    ///
    /// Carts still referencing it keep their lines; those lines fail with
    /// `NotFound` at reservation time. Use [`delete_if_unreferenced`] to
    /// refuse instead.
    ///
    /// [`delete_if_unreferenced`]: ProductRepository::delete_if_unreferenced
    pub async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let mut records = self.store.write().await;

        records
            .products
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Removes a product only if no cart references it.
    ///
    /// ## Returns
    /// * `Err(StoreError::NotFound)` - Product doesn't exist
    /// * `Err(StoreError::ProductInUse)` - Some cart holds a line for it
    pub async fn delete_if_unreferenced(&self, id: ProductId) -> StoreResult<()> {
        let mut records = self.store.write().await;

        if !records.products.contains_key(&id) {
            return Err(StoreError::not_found("Product", id));
        }
        if records.product_in_any_cart(id) {
            return Err(StoreError::ProductInUse { product_id: id });
        }

        records.products.remove(&id);
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Some(Product)` - A copy of the stored product
    /// * `None` - Product not found
    pub async fn get(&self, id: ProductId) -> Option<Product> {
        self.store.read().await.products.get(&id).cloned()
    }

    /// Lists every product in ascending identifier order.
    pub async fn list(&self) -> Vec<Product> {
        let records = self.store.read().await;
        let products: Vec<Product> = records.products.values().cloned().collect();

        debug!(count = products.len(), "Listed products");
        products
    }

    /// Returns true if any cart holds a line for `id`.
    pub async fn is_in_any_cart(&self, id: ProductId) -> bool {
        self.store.read().await.product_in_any_cart(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

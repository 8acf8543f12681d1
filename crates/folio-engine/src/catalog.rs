//! # Catalog Service
//!
//! Product CRUD with input validation and the in-cart delete guard.

use folio_core::validation::validate_product_input;
use folio_core::{CoreError, CoreResult, Product, ProductId, ProductInput};
use folio_store::EntityStore;
use tracing::{debug, warn};

/// Product CRUD for the catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: EntityStore,
}

impl CatalogService {
    pub fn new(store: EntityStore) -> Self {
        CatalogService { store }
    }

    /// Validates and stores a new product.
    ///
    /// Title and author are stored trimmed.
    pub async fn create_product(&self, input: ProductInput) -> CoreResult<Product> {
        let input = validate_product_input(input)?;
        Ok(self.store.products().create(input).await)
    }

    /// Validates and replaces a product's fields.
    pub async fn update_product(&self, id: ProductId, input: ProductInput) -> CoreResult<Product> {
        let input = validate_product_input(input)?;
        Ok(self.store.products().update(id, input).await?)
    }

    /// Deletes a product unless some cart still holds it.
    ///
    /// ## Returns
    /// * `Err(CoreError::ProductInUse)` - Referenced by a cart
    /// * `Err(CoreError::NotFound)` - No such product
    pub async fn delete_product(&self, id: ProductId) -> CoreResult<()> {
        debug!(product_id = id, "Deleting product");

        self.store
            .products()
            .delete_if_unreferenced(id)
            .await
            .map_err(|err| {
                warn!(product_id = id, error = %err, "Product delete refused");
                CoreError::from(err)
            })
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: ProductId) -> CoreResult<Product> {
        self.store
            .products()
            .get(id)
            .await
            .ok_or_else(|| CoreError::product_not_found(id))
    }

    /// Lists every product in ascending identifier order.
    pub async fn list_products(&self) -> Vec<Product> {
        self.store.products().list().await
    }
}

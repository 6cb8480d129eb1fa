//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::repository::ProductRepository;

/// Product operations on top of a [`ProductRepository`].
///
/// Inputs are validated at the HTTP boundary before they get here.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Stores `product` as a new record; any client-supplied id is discarded.
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn add_product(&self, mut product: Product) -> ProductResult<Product> {
        product.id = 0;
        self.repository.save(product).await
    }

    /// Merges `product` into the stored product `id` (see [`Product::update`]).
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: i32, product: Product) -> ProductResult<Product> {
        let mut existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        existing.update(&product);
        self.repository.save(existing).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        self.repository.delete_by_id(id).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

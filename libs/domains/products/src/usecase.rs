//! Product usecase - mediates between the transfer types and the collection

use chrono::SubsecRound;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{Operation, ProductError, ProductResult};
use crate::models::{
    Product, ProductFilter, ProductIn, ProductOut, ProductUpdate, ProductUpdateOut, now_millis,
};
use crate::repository::ProductRepository;

/// Create/get/query/update/delete for products
///
/// Holds no state besides the injected collection accessor; every operation
/// issues at most one storage mutation.
pub struct ProductUsecase<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductUsecase<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a product from the creation payload
    ///
    /// The returned value is built from the inserted document, not re-read.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: ProductIn) -> ProductResult<ProductOut> {
        let product = Product::new(input);
        ensure_quantity(product.quantity)?;

        self.repository.insert_one(product.clone()).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ProductResult<ProductOut> {
        self.repository
            .find_one(id)
            .await?
            .map(ProductOut::from)
            .ok_or(ProductError::not_found(id, Operation::Get))
    }

    /// All products, or only those priced strictly between 5000 and 8000
    #[instrument(skip(self))]
    pub async fn query(&self, apply_filter: bool) -> ProductResult<Vec<ProductOut>> {
        self.query_with(ProductFilter::from_flag(apply_filter)).await
    }

    /// Products matching a caller-supplied price range and page
    #[instrument(skip(self))]
    pub async fn query_with(&self, filter: ProductFilter) -> ProductResult<Vec<ProductOut>> {
        filter.check()?;

        let products = self.repository.find(filter).await?;
        Ok(products.into_iter().map(ProductOut::from).collect())
    }

    /// Like [`query_with`](Self::query_with), but pulled lazily from the store
    #[instrument(skip(self))]
    pub async fn query_stream(
        &self,
        filter: ProductFilter,
    ) -> ProductResult<BoxStream<'static, ProductResult<ProductOut>>> {
        filter.check()?;

        let stream = self.repository.find_stream(filter).await?;
        Ok(stream.map_ok(ProductOut::from).boxed())
    }

    /// Merge-patch the product and return its state after the write
    ///
    /// `updated_at` defaults to now and is kept to millisecond precision.
    /// No version check: concurrent patches are last-write-wins per field.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: Uuid, mut body: ProductUpdate) -> ProductResult<ProductUpdateOut> {
        if let Some(quantity) = body.quantity {
            ensure_quantity(quantity)?;
        }

        body.updated_at = Some(match body.updated_at {
            Some(updated_at) => updated_at.trunc_subsecs(3),
            None => now_millis(),
        });

        let product = self
            .repository
            .find_one_and_update(id, body)
            .await?
            .ok_or(ProductError::not_found(id, Operation::Update))?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(product.into())
    }

    /// Delete the product, failing with NotFound when nothing was removed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let deleted = self.repository.delete_one(id).await?;

        if deleted == 0 {
            return Err(ProductError::not_found(id, Operation::Delete));
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(true)
    }

    /// Number of products matching the price predicate of `filter`
    #[instrument(skip(self))]
    pub async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        self.repository.count(filter).await
    }
}

impl<R: ProductRepository> Clone for ProductUsecase<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Quantity must never be negative, on create and on update
fn ensure_quantity(quantity: i32) -> ProductResult<()> {
    if quantity < 0 {
        return Err(ProductError::Validation(
            "quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}

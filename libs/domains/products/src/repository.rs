use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductFilter, ProductUpdate};

/// Accessor for the single collection holding product documents
///
/// Every method maps to exactly one storage round trip. Implementations
/// must be safe to share between concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert one new document
    async fn insert_one(&self, product: Product) -> ProductResult<()>;

    /// Find the document whose `id` equals `id`
    async fn find_one(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// All documents matching `filter`, in natural order, collected in memory
    async fn find(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Documents matching `filter`, pulled lazily
    async fn find_stream(
        &self,
        filter: ProductFilter,
    ) -> ProductResult<BoxStream<'static, ProductResult<Product>>>;

    /// Set the present fields of `update` and return the document after the write
    ///
    /// `None` when no document has this `id`.
    async fn find_one_and_update(
        &self,
        id: Uuid,
        update: ProductUpdate,
    ) -> ProductResult<Option<Product>>;

    /// Remove the document with this `id`, returning how many were removed
    async fn delete_one(&self, id: Uuid) -> ProductResult<u64>;

    /// Count documents matching the price predicate of `filter`
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;
}

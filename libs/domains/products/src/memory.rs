//! In-memory implementation of ProductRepository
//!
//! Keeps documents in insertion order behind a tokio `RwLock`. Used by the
//! integration tests and for running the usecase without a MongoDB server.

use async_trait::async_trait;
use futures::{StreamExt, stream::BoxStream};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, ProductUpdate};
use crate::repository::ProductRepository;

/// Thread-safe, cloneable in-memory product collection
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    documents: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collection with existing documents
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(products)),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Matching documents after offset and limit are applied
    fn select(documents: &[Product], filter: &ProductFilter) -> Vec<Product> {
        let skip = filter.offset.unwrap_or(0) as usize;
        let take = filter
            .limit
            .map(|limit| limit.max(0) as usize)
            .unwrap_or(usize::MAX);

        documents
            .iter()
            .filter(|product| filter.matches(product))
            .skip(skip)
            .take(take)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert_one(&self, product: Product) -> ProductResult<()> {
        let mut documents = self.documents.write().await;

        // Mirrors the unique index on `id`
        if documents.iter().any(|existing| existing.id == product.id) {
            return Err(ProductError::Database(format!(
                "duplicate key error: id {}",
                product.id
            )));
        }

        documents.push(product);
        Ok(())
    }

    async fn find_one(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|product| product.id == id).cloned())
    }

    async fn find(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let documents = self.documents.read().await;
        Ok(Self::select(&documents, &filter))
    }

    async fn find_stream(
        &self,
        filter: ProductFilter,
    ) -> ProductResult<BoxStream<'static, ProductResult<Product>>> {
        let snapshot = {
            let documents = self.documents.read().await;
            Self::select(&documents, &filter)
        };

        Ok(futures::stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }

    async fn find_one_and_update(
        &self,
        id: Uuid,
        update: ProductUpdate,
    ) -> ProductResult<Option<Product>> {
        let mut documents = self.documents.write().await;

        Ok(documents
            .iter_mut()
            .find(|product| product.id == id)
            .map(|product| {
                product.apply_update(&update);
                product.clone()
            }))
    }

    async fn delete_one(&self, id: Uuid) -> ProductResult<u64> {
        let mut documents = self.documents.write().await;

        match documents.iter().position(|product| product.id == id) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|product| filter.matches(product)).count() as u64)
    }
}

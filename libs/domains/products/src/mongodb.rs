//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_document, to_raw_document_buf},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, ProductUpdate, bson_datetime};
use crate::repository::ProductRepository;

/// Default collection name
pub const PRODUCTS_COLLECTION: &str = "products";

#[derive(Serialize)]
struct IdKey {
    id: Uuid,
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Bind to the `products` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Bind to a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Create the unique `id` index and the `price` index used by range queries
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_product_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(
            collection = %self.collection.name(),
            "Product indexes created successfully"
        );
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Equality filter on the `id` field
    ///
    /// Encoded the way the driver encodes inserted documents, so the uuid
    /// lands in the same BSON type as the stored one.
    fn id_filter(id: Uuid) -> ProductResult<Document> {
        to_raw_document_buf(&IdKey { id })?
            .to_document()
            .map_err(|e| ProductError::Serialization(e.to_string()))
    }

    /// Price predicate of a ProductFilter as a MongoDB filter document
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut price = doc! {};
        if let Some(above) = filter.price_above {
            price.insert("$gt", above);
        }
        if let Some(below) = filter.price_below {
            price.insert("$lt", below);
        }

        if price.is_empty() {
            doc! {}
        } else {
            doc! { "price": price }
        }
    }

    /// Pagination part of a ProductFilter; no sort, so natural order is kept
    fn find_options(filter: &ProductFilter) -> FindOptions {
        let mut options = FindOptions::default();
        options.limit = filter.limit;
        options.skip = filter.offset;
        options
    }

    /// `$set` document for the present fields of `update`
    fn build_update(update: &ProductUpdate) -> ProductResult<Document> {
        let mut set = to_document(update)?;
        if let Some(ref updated_at) = update.updated_at {
            set.insert("updated_at", bson_datetime::to_bson(updated_at));
        }
        Ok(doc! { "$set": set })
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert_one(&self, product: Product) -> ProductResult<()> {
        self.collection.insert_one(&product).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_one(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::id_filter(id)?).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(Self::find_options(&filter))
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_stream(
        &self,
        filter: ProductFilter,
    ) -> ProductResult<BoxStream<'static, ProductResult<Product>>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(Self::find_options(&filter))
            .await?;

        Ok(cursor.map_err(ProductError::from).boxed())
    }

    #[instrument(skip(self, update))]
    async fn find_one_and_update(
        &self,
        id: Uuid,
        update: ProductUpdate,
    ) -> ProductResult<Option<Product>> {
        let filter = Self::id_filter(id)?;
        let set = Self::build_update(&update)?;

        // An empty $set is rejected by the server; nothing to write means a plain read
        if set.get_document("$set").map(Document::is_empty).unwrap_or(true) {
            return self.find_one(id).await;
        }

        let product = self
            .collection
            .find_one_and_update(filter, set)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, id: Uuid) -> ProductResult<u64> {
        let result = self.collection.delete_one(Self::id_filter(id)?).await?;
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::all());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_default_band_is_exclusive() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::default_price_band());
        assert_eq!(
            doc,
            doc! { "price": { "$gt": 5000.0, "$lt": 8000.0 } }
        );
    }

    #[test]
    fn test_build_filter_open_upper_bound() {
        let filter = ProductFilter {
            price_above: Some(100.0),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc, doc! { "price": { "$gt": 100.0 } });
    }

    #[test]
    fn test_find_options_pagination() {
        let options =
            MongoProductRepository::find_options(&ProductFilter::all().with_limit(20).with_offset(40));
        assert_eq!(options.limit, Some(20));
        assert_eq!(options.skip, Some(40));
        assert!(options.sort.is_none());
    }

    #[test]
    fn test_build_update_sets_only_present_fields() {
        let now = Utc::now();
        let update = ProductUpdate {
            quantity: Some(3),
            updated_at: Some(now),
            ..Default::default()
        };

        let doc = MongoProductRepository::build_update(&update).unwrap();
        let set = doc.get_document("$set").unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get_i32("quantity").unwrap(), 3);
        assert_eq!(
            set.get_datetime("updated_at").unwrap().timestamp_millis(),
            now.timestamp_millis()
        );
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("price"));
    }

    #[test]
    fn test_id_filter_uses_id_field() {
        let id = Uuid::now_v7();
        let doc = MongoProductRepository::id_filter(id).unwrap();
        assert!(doc.contains_key("id"));
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn test_id_filter_matches_stored_encoding() {
        let product = Product::new(crate::models::ProductIn {
            name: "Widget".to_string(),
            price: 6000.0,
            quantity: 10,
        });
        let stored = to_raw_document_buf(&product)
            .unwrap()
            .to_document()
            .unwrap();

        let filter = MongoProductRepository::id_filter(product.id).unwrap();
        assert_eq!(filter.get("id"), stored.get("id"));
    }
}

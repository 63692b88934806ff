//! Products Domain
//!
//! Data-access layer for the `products` collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Usecase   │  ← Validation, filters, NotFound mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Collection accessor (trait + MongoDB / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Document, transfer types, filters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{MongoProductRepository, ProductIn, ProductUsecase};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("store");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let usecase = ProductUsecase::new(repository);
//! let created = usecase
//!     .create(ProductIn {
//!         name: "Widget".to_string(),
//!         price: 6000.0,
//!         quantity: 10,
//!     })
//!     .await?;
//! assert!(usecase.delete(created.id).await?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod usecase;

// Re-export commonly used types
pub use error::{Operation, ProductError, ProductResult};
pub use memory::InMemoryProductRepository;
pub use models::{
    DEFAULT_PRICE_ABOVE, DEFAULT_PRICE_BELOW, Product, ProductFilter, ProductIn, ProductOut,
    ProductUpdate, ProductUpdateOut,
};
pub use self::mongodb::{MongoProductRepository, PRODUCTS_COLLECTION};
pub use repository::ProductRepository;
pub use usecase::ProductUsecase;

//! Shared test utilities for the products workspace
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic test data (always available)
//! - `assertions`: assertion helpers (always available)
//!
//! # MongoDB Testing
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestMongo, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let db = mongo.database(&builder.database_name());
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// Seeded from the test name so reruns see the same values.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic identifier that no product will be created with
    pub fn unknown_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Product name unique to this test, e.g. `test-product-12345-main`
    pub fn product_name(&self, suffix: &str) -> String {
        format!("test-product-{}-{}", self.seed, suffix)
    }

    /// Database name unique to this test (MongoDB limits names to 63 bytes)
    pub fn database_name(&self) -> String {
        format!("products_test_{:x}", self.seed)
    }

    /// Price strictly inside the 5000..8000 band, derived from the seed
    pub fn price_in_band(&self) -> f64 {
        5001.0 + (self.seed % 2998) as f64
    }

    /// Price outside the 5000..8000 band, derived from the seed
    pub fn price_out_of_band(&self) -> f64 {
        if self.seed % 2 == 0 {
            (self.seed % 5000) as f64
        } else {
            8000.0 + (self.seed % 1000) as f64
        }
    }
}

/// Test assertion helpers
pub mod assertions {
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `timestamp` lies within `tolerance` of now
    pub fn assert_recent(timestamp: DateTime<Utc>, tolerance: Duration, context: &str) {
        let drift = (Utc::now() - timestamp).abs();
        assert!(
            drift <= tolerance,
            "{}: timestamp {} is {}ms away from now",
            context,
            timestamp,
            drift.num_milliseconds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.unknown_id(), builder2.unknown_id());
        assert_eq!(builder1.product_name("a"), builder2.product_name("a"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.unknown_id(), builder2.unknown_id());
        assert_ne!(builder1.database_name(), builder2.database_name());
    }

    #[test]
    fn test_prices_respect_band() {
        for seed in [0, 1, 2, 4999, 5000, 7999, 8000, u64::MAX] {
            let builder = TestDataBuilder::new(seed);

            let inside = builder.price_in_band();
            assert!(inside > 5000.0 && inside < 8000.0, "seed {}: {}", seed, inside);

            let outside = builder.price_out_of_band();
            assert!(outside <= 5000.0 || outside >= 8000.0, "seed {}: {}", seed, outside);
        }
    }

    #[test]
    fn test_database_name_fits_mongo_limit() {
        let builder = TestDataBuilder::new(u64::MAX);
        assert!(builder.database_name().len() <= 63);
    }

    #[test]
    fn test_assert_recent() {
        assertions::assert_recent(chrono::Utc::now(), chrono::Duration::seconds(1), "now");
    }
}

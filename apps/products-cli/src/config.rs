//! Configuration for the products CLI

use core_config::{Environment, FromEnv, env_or_default};
use database::mongodb::MongoConfig;
use domain_products::PRODUCTS_COLLECTION;
use eyre::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub mongodb: MongoConfig,
    /// Collection holding product documents
    pub collection: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            mongodb: MongoConfig::from_env()?,
            collection: env_or_default("PRODUCTS_COLLECTION", PRODUCTS_COLLECTION),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_collection() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGO_URL", None),
                ("MONGODB_DATABASE", Some("store")),
                ("PRODUCTS_COLLECTION", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.collection, "products");
                assert_eq!(config.mongodb.url(), "mongodb://localhost:27017");
                assert_eq!(config.mongodb.database(), "store");
            },
        );
    }

    #[test]
    fn test_config_collection_override() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("store")),
                ("PRODUCTS_COLLECTION", Some("products_archive")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.collection, "products_archive");
            },
        );
    }

    #[test]
    fn test_config_requires_mongo_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }
}

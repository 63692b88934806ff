use mongodb::{Client, options::ClientOptions};
use tracing::{info, instrument};

use super::MongoConfig;
use super::health::ping;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Connect to MongoDB at `url` using default pool and timeout settings
///
/// ```ignore
/// let client = database::mongodb::connect("mongodb://localhost:27017").await?;
/// ```
pub async fn connect(url: &str) -> DatabaseResult<Client> {
    connect_from_config(&MongoConfig::new(url)).await
}

/// Build a client from `config` without contacting the server
///
/// The driver connects lazily, so an unreachable server only shows up on
/// the first operation.
pub async fn client_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    Ok(Client::with_options(client_options(config).await?)?)
}

/// Build a client from `config` and verify the server answers a ping
#[instrument(skip(config), fields(url = %config.redacted_url(), database = %config.database))]
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!("Connecting to MongoDB");

    let client = client_from_config(config).await?;

    ping(&client)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] retried with exponential backoff.
///
/// `None` uses [`RetryConfig::default`] (3 retries starting at 100ms).
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect_from_config(config), policy).await,
        None => retry(|| connect_from_config(config)).await,
    }
}

async fn client_options(config: &MongoConfig) -> DatabaseResult<ClientOptions> {
    let mut options = ClientOptions::parse(config.url()).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout());
    options.server_selection_timeout = Some(config.server_selection_timeout());

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mongodb::{check_health, check_health_detailed};

    #[tokio::test]
    async fn test_client_options_apply_config() {
        let config = MongoConfig::with_database("mongodb://localhost:27017", "store")
            .with_pool_size(8, 1)
            .with_app_name("products-test");

        let options = client_options(&config).await.unwrap();
        assert_eq!(options.max_pool_size, Some(8));
        assert_eq!(options.min_pool_size, Some(1));
        assert_eq!(options.app_name.as_deref(), Some("products-test"));
        assert_eq!(options.connect_timeout, Some(config.connect_timeout()));
    }

    #[tokio::test]
    async fn test_client_options_rejects_bad_scheme() {
        let config = MongoConfig::new("postgres://localhost:5432");
        let result = client_options(&config).await;
        assert!(matches!(result, Err(DatabaseError::Mongo(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unhealthy_not_an_error() {
        let config = MongoConfig {
            server_selection_timeout_secs: 1,
            ..MongoConfig::with_database("mongodb://127.0.0.1:1", "store")
        };

        let client = client_from_config(&config).await.unwrap();
        assert!(!check_health(&client).await);

        let status = check_health_detailed(&client).await;
        assert!(!status.healthy);
        assert!(status.message.is_some());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        assert!(connect(&url).await.is_ok());
    }
}

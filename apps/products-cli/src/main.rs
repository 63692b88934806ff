//! Products CLI
//!
//! Operator tool for the products collection. Each invocation connects to
//! MongoDB, runs one command and prints the result as JSON.

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{
    check_health_detailed, client_from_config, connect_from_config_with_retry,
};
use domain_products::{MongoProductRepository, ProductUsecase};
use eyre::Result;
use serde::Serialize;
use tracing::info;

mod cli;
mod config;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    // Parsed before any config is read, so --help works without a database
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Health reports an unreachable server instead of failing on connect
    if let Commands::Health = cli.command {
        let client = client_from_config(&config.mongodb).await?;
        let status = check_health_detailed(&client).await;
        return print_json(&serde_json::json!({
            "healthy": status.healthy,
            "message": status.message,
            "response_time_ms": status.response_time_ms,
        }));
    }

    info!(url = %config.mongodb.redacted_url(), "Connecting to MongoDB...");
    let client = connect_from_config_with_retry(&config.mongodb, None)
        .await
        .map_err(|e| eyre::eyre!("MongoDB connection failed: {}", e))?;

    let db = client.database(config.mongodb.database());
    let repository = MongoProductRepository::with_collection(&db, &config.collection);
    repository.init_indexes().await?;

    let usecase = ProductUsecase::new(repository);

    match cli.command {
        Commands::Create {
            name,
            price,
            quantity,
        } => print_json(&usecase.create(cli::product_in(name, price, quantity)).await?),

        Commands::Get { id } => print_json(&usecase.get(id).await?),

        Commands::Query(args) => print_json(&usecase.query_with(args.filter()).await?),

        Commands::Update {
            id,
            name,
            price,
            quantity,
        } => print_json(
            &usecase
                .update(id, cli::product_update(name, price, quantity))
                .await?,
        ),

        Commands::Delete { id } => {
            let deleted = usecase.delete(id).await?;
            print_json(&serde_json::json!({ "id": id, "deleted": deleted }))
        }

        Commands::Health => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_help_needs_no_environment() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL", "MONGODB_DATABASE"], || {
            let err = Cli::try_parse_from(["products", "--help"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        });
    }

    #[tokio::test]
    async fn test_run_reports_missing_config() {
        let cli = Cli::try_parse_from(["products", "health"]).unwrap();
        let result = temp_env::async_with_vars(
            [("MONGODB_URL", None::<&str>), ("MONGO_URL", None)],
            run(cli),
        )
        .await;
        assert!(result.is_err());
    }
}

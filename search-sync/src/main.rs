//! Search Sync Main Entry Point
//!
//! Builds the index schema from the configuration file and registers the
//! index with OpenSearch.

use dotenv::dotenv;
use search_sync::{Dependencies, SetupError};
use std::env;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_sync=info,search_sync_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), SetupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting search sync setup");

    let deps = match Dependencies::new().await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    for type_config in &deps.index_config.types {
        debug!(
            index = %deps.index_config.name,
            type_name = %type_config.name,
            model = ?type_config.model,
            mapped = deps.mapping.type_mapping(&type_config.name).is_some(),
            "Type registered"
        );
    }

    info!(index = %deps.index_config.name, "Search sync setup completed successfully");
    Ok(())
}

use std::sync::Arc;

use vista_bridge::api::{ApiServer, ApiServerConfig, AppState};
use vista_bridge::config::AppConfig;
use vista_bridge::database;
use vista_bridge::logging::init_logging;
use vista_bridge::services::ServiceContainer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env_or_default();

    let logging_config = init_logging(&config.log_dir)?;

    tracing::info!("Starting vista-bridge v{}", env!("CARGO_PKG_VERSION"));

    let pool = database::init_pool(&config.database_url).await?;
    let write_pool = database::init_write_pool(&config.database_url).await?;
    database::run_migrations(&pool).await?;

    let container = Arc::new(ServiceContainer::new(pool, write_pool, &config));
    let cancel_token = container.cancellation_token();

    logging_config.start_retention_cleanup(cancel_token.clone());

    let state = AppState::from_container(&container).with_logging_config(logging_config);
    let server = ApiServer::new(ApiServerConfig::from_env_or_default(), state)
        .with_cancel_token(cancel_token.clone());

    let signal_token = cancel_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
        signal_token.cancel();
    });

    let result = server.run().await;

    container.shutdown().await;
    tracing::info!("vista-bridge stopped");

    result?;
    Ok(())
}

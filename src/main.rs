use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leadgate::adapters::auth::JwtSessionValidator;
use leadgate::adapters::http::{build_app_router, ApiServices};
use leadgate::adapters::postgres::{migrator, PostgresCreditLedger, PostgresProfileRepository};
use leadgate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --- Configuration ---
    let config = AppConfig::load()?;
    config.validate()?;

    // --- Tracing ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        environment = ?config.server.environment,
        port = config.server.port,
        "Starting leadgate"
    );

    // --- Database ---
    let pool = config.database.connect().await?;
    tracing::info!("Database connection pool created");

    if config.database.run_migrations {
        migrator().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    // --- Services ---
    let validator = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.as_deref(),
        config.auth.audience.as_deref(),
    ));
    let services = ApiServices::build(
        validator,
        Arc::new(PostgresProfileRepository::new(pool.clone())),
        Arc::new(PostgresCreditLedger::new(pool)),
        &config.navigation,
        &config.credits,
    )?;

    // --- HTTP ---
    let app = build_app_router(services, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

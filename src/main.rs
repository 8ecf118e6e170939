//! account_ledger - Account Ledger Backend API
//!
//! Holds named accounts with non-negative balances and exposes deposits,
//! withdrawals, transfers, search and currency conversion over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_ledger::api::{self, ApiKeyRegistry, AppState};
use account_ledger::db;
use account_ledger::rates::HttpRateLookup;
use account_ledger::service::LedgerService;
use account_ledger::store::{AccountStore, InMemoryAccountStore, PgAccountStore};
use account_ledger::Config;

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "account_ledger=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Pick the account store: Postgres when a database is configured, memory otherwise
async fn open_store(config: &Config) -> anyhow::Result<(Arc<dyn AccountStore>, Option<PgPool>)> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
        let store: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
        return Ok((store, None));
    };

    tracing::info!("Connecting to database...");
    let pool = db::connect(config, database_url).await?;
    db::verify_connection(&pool).await?;

    if config.database_auto_migrate {
        tracing::info!("Applying database migrations");
        db::run_migrations(&pool).await?;
    }

    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");
    let store: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(pool.clone()));
    Ok((store, Some(pool)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(environment = %config.environment, "Starting account_ledger server");

    let (store, pool) = open_store(&config).await?;

    let rates = HttpRateLookup::new(
        &config.rates_api_url,
        config.rates_api_key.clone(),
        config.rates_api_timeout,
    )?;
    if config.rates_api_key.is_none() {
        tracing::warn!("RATES_API_KEY not set, currency conversion requests may be rejected");
    }

    let ledger = LedgerService::new(store, Arc::new(rates));
    let api_keys = ApiKeyRegistry::new(&config.api_key_hashes);
    tracing::info!(api_keys = api_keys.len(), "API keys loaded");

    let app = api::build_app(AppState::new(ledger, api_keys));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connections closed");
    }
    tracing::info!("Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

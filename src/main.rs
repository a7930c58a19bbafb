use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use fos_users_api::auth::TokenValidator;
use fos_users_api::database::{DatabaseManager, PgRepository};
use fos_users_api::identity::TokenServerClient;
use fos_users_api::{app, config, services, AppState};

#[derive(Parser)]
#[command(name = "fos-users-api")]
#[command(about = "User management API")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides FOS_API_PORT / PORT)
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, IDENTITY_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting FOS Users API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).context("database pool")?;
    let repository = Arc::new(PgRepository::new(pool.clone()));
    let identity = Arc::new(TokenServerClient::new(&config.identity).context("identity client")?);

    let dispatcher = services::dispatcher(repository.clone(), repository, identity)
        .context("handler registration")?;

    if config.identity.token_secret.is_empty() {
        tracing::warn!("IDENTITY_TOKEN_SECRET is not set; guarded routes will reject every request");
    }
    let tokens = TokenValidator::from_config(&config.identity);

    let state = AppState::new(dispatcher, tokens)
        .with_pool(pool)
        .with_cors_origins(config.security.cors_origins.clone());

    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("FOS Users API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}

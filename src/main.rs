use agora::logging::{init_tracing, shutdown_tracer};
use agora::router::init_router;
use agora::state::AppState;
use agora_config::{AppConfig, Cli, ConfigError, failure_banner};
use agora_db::{init_db_pool, run_migrations};
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

fn load_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load(cli)?;
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", failure_banner(&e.to_string(), &e.remedy()));
            std::process::exit(1);
        }
    };

    init_tracing(&config).context("failed to initialize tracing")?;

    if config.harden_secret() {
        warn!(
            "No secret configured outside debug mode, generated a random one. \
             Tokens will not survive a restart."
        );
    }
    info!(config = ?config, "Configuration loaded");

    let pool = match init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!(
                "{}",
                failure_banner(
                    &format!("Could not connect to the database: {}", e),
                    "Check that PostgreSQL is running and that database_url points at it."
                )
            );
            shutdown_tracer();
            std::process::exit(1);
        }
    };

    run_migrations(&pool, &config.migration_source)
        .await
        .with_context(|| format!("failed to apply migrations from {}", config.migration_source))?;

    let state = AppState::new(&config, pool);
    let app = init_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!(address = %address, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown_tracer();
    Ok(())
}

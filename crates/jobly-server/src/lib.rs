//! HTTP API and command-line entry point for jobly.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod validate;

use anyhow::Context;
use auth::StaticTokens;
use config::Config;
use state::AppState;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Serve(args) => serve(args).await,
        cli::Command::Migrate(args) => migrate(args).await,
    }
}

async fn serve(args: cli::ServeArgs) -> anyhow::Result<()> {
    let mut config = Config::resolve(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
        config.validate()?;
    }
    telemetry::init(config.logging.filter.as_deref())?;

    let pool = jobly::create_pool_with_config(&config.database.url, config.database.max_connections)
        .context("failed to create connection pool")?;
    if config.database.run_migrations {
        jobly::migrate::run_pool(&pool)
            .await
            .context("failed to apply migrations")?;
    }

    let tokens = StaticTokens::from_config(&config.auth);
    if !tokens.has_admin() {
        tracing::warn!("no admin tokens configured; mutating routes will always return 401");
    }
    let app = routes::router(AppState::new(pool, tokens));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn migrate(args: cli::MigrateArgs) -> anyhow::Result<()> {
    let config = Config::resolve(&args.config)?;
    telemetry::init(config.logging.filter.as_deref())?;

    let pool = jobly::create_pool_with_config(&config.database.url, 1)
        .context("failed to create connection pool")?;
    let report = jobly::migrate::run_pool(&pool)
        .await
        .context("failed to apply migrations")?;

    println!(
        "applied {} migration(s)",
        report.applied_migrations().len()
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

//! pscat-api - Problem statement catalog service
//!
//! Serves the catalog REST API and provides an admin command for issuing
//! user API tokens.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pscat_api::db::{init_database, users::create_user};
use pscat_api::{build_router, AppState};
use pscat_common::auth::Role;
use pscat_common::config::{CliOverrides, ConfigResolver};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for pscat-api
#[derive(Parser, Debug)]
#[command(name = "pscat-api")]
#[command(about = "Problem statement catalog service")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(short, long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create a user and print its API token
    CreateUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// admin, faculty or student
        #[arg(long, default_value = "faculty")]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (bind_address, port) = match &cli.command {
        Some(Command::Serve { bind, port }) => (bind.clone(), *port),
        _ => (None, None),
    };

    let resolution = ConfigResolver::new(CliOverrides {
        config_file: cli.config.clone(),
        database_path: cli.database.clone(),
        bind_address,
        port,
        log_level: cli.log_level.clone(),
    })
    .resolve()
    .context("Failed to resolve configuration")?;
    let config = resolution.config;

    // RUST_LOG wins over the configured level
    let default_filter = format!("{},tower_http=info", config.log_level);
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pscat-api v{}", env!("CARGO_PKG_VERSION"));
    for warning in &resolution.warnings {
        warn!("{}", warning);
    }

    info!("Database path: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    match cli.command {
        Some(Command::CreateUser { name, email, role }) => {
            let (user, token) = create_user(&pool, &name, &email, role)
                .await
                .context("Failed to create user")?;
            info!(user = %user.id, role = %user.role, "Created user");
            println!("{}", token);
            Ok(())
        }
        Some(Command::Serve { .. }) | None => {
            let app = build_router(AppState::new(pool, config.max_upload_bytes));

            let addr = config.listen_address();
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind to {}", addr))?;
            info!("pscat-api listening on http://{}", addr);
            info!("Health check: http://{}/health", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("Server error")?;

            info!("Server shutdown complete");
            Ok(())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

//! yoko-api - applicant tracking service
//!
//! Serves the application wizard and the recruiter dashboard over a single
//! SQLite database in the root folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yoko_common::config::{
    CliOverrides, RootFolderInitializer, ServiceConfig, TomlConfig, ROOT_FOLDER_ENV,
};

use yoko_api::mailer::Mailer;
use yoko_api::AppState;

/// Command-line arguments for yoko-api
#[derive(Parser, Debug)]
#[command(name = "yoko-api")]
#[command(about = "Applicant tracking API for TheYoko")]
#[command(version)]
struct Args {
    /// Folder holding the database
    #[arg(short, long, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "YOKO_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "YOKO_HOST")]
    host: Option<String>,

    /// Config file (defaults to ~/.config/yoko/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mailchimp Transactional API key; mail is disabled without one
    #[arg(long, env = "MAILCHIMP_API_KEY", hide_env_values = true)]
    mail_api_key: Option<String>,

    /// Sender address for confirmation emails
    #[arg(long, env = "MAILCHIMP_FROM_EMAIL")]
    mail_from_email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yoko_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting yoko-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref());
    let config = ServiceConfig::resolve(
        CliOverrides {
            root_folder: args.root_folder,
            host: args.host,
            port: args.port,
            mail_api_key: args.mail_api_key,
            mail_from_email: args.mail_from_email,
        },
        &toml_config,
    );

    info!("Root folder: {}", config.root_folder.display());
    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    if initializer.database_exists() {
        info!("Database: {}", config.db_path.display());
    } else {
        info!("Creating new database: {}", config.db_path.display());
    }
    let db = yoko_common::db::init_database(&config.db_path)
        .await
        .context("Failed to open database")?;

    let mailer = Mailer::from_settings(&config.mail).context("Failed to build mail client")?;
    let app = yoko_api::build_router(AppState::new(db.clone(), mailer));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

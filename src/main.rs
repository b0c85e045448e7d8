//! Application entry point for the `firewatch` fire-risk service.
//!
//! This binary orchestrates the startup sequence:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Opening the SQLite reading log and creating its schema
//! - Loading the classifier model, or falling back to the rule evaluator
//! - Mounting all API routes via the `routes` gateway
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `DATABASE_URL` (**required**) – SQLite connection string
//! - `DB_POOL_MAX` (optional) – maximum number of DB connections (default: 5)
//! - `MODEL_DIR` (optional) – classifier artifact directory (default: `models`)
//! - `PORT` (optional) – HTTP listen port (default: 5000)
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

mod classifier;
mod config;
mod error;
mod models;
mod pipeline;
mod routes;
mod schema;
mod stats;
mod store;
mod validate;

use classifier::{ClassifierLoader, LoaderStatus};
use store::ReadingStore;

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let store = ReadingStore::connect(&cfg.db_url, cfg.db_pool_max)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database '{}': {}", cfg.db_url, e))?;

    tracing::info!("Database ready: {}", cfg.db_url);

    schema::create_schema(store.pool()).await?;

    let classifier = Arc::new(ClassifierLoader::startup_blocking(cfg.model_dir.clone()).await?);
    match classifier.status() {
        LoaderStatus::Loaded { generation } => {
            tracing::info!("Classifying with trained model (generation {generation})");
        }
        LoaderStatus::NotLoaded => {
            tracing::info!(
                "Classifying with rule-based thresholds until a model is placed in {} and reloaded",
                classifier.model_dir().display()
            );
        }
    }

    let app: Router = routes::router(store, classifier);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// - Color output follows `FORCE_COLOR` (`1|true|yes` on, `0|false|no` off),
///   otherwise TTY detection
/// - `AXUM_SPAN_EVENTS`: `"full"` for ENTER, EXIT and CLOSE, `"enter_exit"`
///   for ENTER and EXIT, anything else for CLOSE only
/// - `RUST_LOG` wins when set; otherwise `AXUM_LOG_LEVEL` picks the level
///
/// Call once, before any logging.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},sqlx::query=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

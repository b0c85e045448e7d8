//! Configuration loader for the `firewatch` service.
//!
//! All runtime configuration values and their defaults are loaded here from
//! environment variables (with optional `.env` file support provided by the
//! caller), so nothing else in the crate reads `env::var` for settings.
//!
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Parse an optional numeric environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// SQLite connection string, e.g. `sqlite://fire_detection.db`.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Directory holding the classifier artifacts.
    pub model_dir: PathBuf,

    /// TCP port the HTTP server listens on.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – SQLite connection string
///
/// Optional:
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `MODEL_DIR` – classifier artifact directory (default: `models`)
/// - `PORT` – HTTP listen port (default: 5000)
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = require_env!("DATABASE_URL");
    let db_pool_max = parse_env!("DB_POOL_MAX", u32, 5);
    let model_dir = env::var("MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("models"));
    let port = parse_env!("PORT", u16, 5000);

    if db_pool_max == 0 {
        return Err(anyhow!("Invalid DB_POOL_MAX: must be at least 1"));
    }

    Ok(Config {
        db_url,
        db_pool_max,
        model_dir,
        port,
    })
}

impl Config {
    /// Log the loaded configuration.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL : {}", self.db_url);
        tracing::info!("  DB_POOL_MAX  : {}", self.db_pool_max);
        tracing::info!("  MODEL_DIR    : {}", self.model_dir.display());
        tracing::info!("  PORT         : {}", self.port);
    }
}

//! Server configuration read from the environment.

use std::time::Duration;

use grapevine_clients::datamuse::DEFAULT_DATAMUSE_URL;

use crate::error::AppError;
use crate::state::Timeouts;

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// PostgreSQL URL. `None` selects the in-memory blob store.
    pub database_url: Option<String>,
    /// Rhyme dictionary endpoint.
    pub rhyme_api_url: String,
    /// Outbound call budgets.
    pub timeouts: Timeouts,
    /// OTLP collector endpoint. `None` disables span export.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value
    /// if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Timeouts::default();

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: non_empty("DATABASE_URL"),
            rhyme_api_url: non_empty("RHYME_API_URL")
                .unwrap_or_else(|| DEFAULT_DATAMUSE_URL.to_string()),
            timeouts: Timeouts {
                rhyme_lookup: millis(non_empty("RHYME_TIMEOUT_MS"), "RHYME_TIMEOUT_MS")?
                    .unwrap_or(defaults.rhyme_lookup),
                delivery: millis(non_empty("DELIVERY_TIMEOUT_MS"), "DELIVERY_TIMEOUT_MS")?
                    .unwrap_or(defaults.delivery),
            },
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn millis(raw: Option<String>, key: &str) -> Result<Option<Duration>, AppError> {
    raw.map(|raw| {
        raw.parse()
            .map(Duration::from_millis)
            .map_err(|e| AppError::Config(format!("{key} must be a whole number of milliseconds: {e}")))
    })
    .transpose()
}

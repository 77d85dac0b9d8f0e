//! Configuration for the taskdeck server.
//!
//! Configuration can be set via environment variables:
//! - `TASKDECK_WIDGET_BASE_URL` - Optional. Base URL for widget deep links in
//!   search/fetch results. Defaults to `http://127.0.0.1:3000`.
//! - `TASKDECK_SEED` - Optional. Set to `false` or `0` to start with an empty
//!   store instead of the demo records. Defaults to `true`.

use thiserror::Error;

const DEFAULT_WIDGET_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for widget deep links embedded in connector documents.
    pub widget_base_url: String,

    /// Whether to preload the demo records at startup.
    pub seed: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let widget_base_url = std::env::var("TASKDECK_WIDGET_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_WIDGET_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let seed = match std::env::var("TASKDECK_SEED") {
            Err(_) => true,
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("TASKDECK_SEED".to_string(), raw))?,
        };

        Ok(Self {
            widget_base_url,
            seed,
        })
    }

    /// Fixed defaults for tests, independent of the environment.
    pub fn for_tests() -> Self {
        Self {
            widget_base_url: DEFAULT_WIDGET_BASE_URL.to_string(),
            seed: true,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

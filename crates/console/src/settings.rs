//! Configuration for the console front-end

use crate::error::Result;
use keystone_core::{CoreError, CoreResult, tracing::InstrumentationConfig};
use keystone_http::{ClientError, ConsoleClient};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main console configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Backend API access
    #[serde(default)]
    pub api: ApiSettings,

    /// Log output
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the console backend
    pub base_url: String,

    /// Bearer token for the backend
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Overrides the default user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Emit JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: None,
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn,keystone_console=info".to_string(),
            json: false,
        }
    }
}

impl ConsoleSettings {
    /// Load settings from defaults, an optional file, and `KEYSTONE_*` variables.
    ///
    /// Nested keys use a double underscore, e.g. `KEYSTONE_API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting settings are invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }

        let settings: Self = builder
            .add_source(
                ::config::Environment::with_prefix("KEYSTONE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the console cannot work with
    pub fn validate(&self) -> CoreResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CoreError::invalid_config("api.base_url must not be empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(CoreError::invalid_config(
                "api.timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Build an API client from these settings
    pub fn client(&self) -> std::result::Result<ConsoleClient, ClientError> {
        let mut builder = ConsoleClient::builder()
            .base_url(&self.api.base_url)
            .timeout(Duration::from_secs(self.api.timeout_secs));

        if let Some(api_key) = &self.api.api_key {
            builder = builder.api_key(api_key);
        }
        if let Some(user_agent) = &self.api.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder.build()
    }

    /// Instrumentation config derived from the logging section
    pub fn instrumentation(&self) -> InstrumentationConfig {
        let env = InstrumentationConfig::from_env();
        InstrumentationConfig {
            service_name: "keystone-console".to_string(),
            log_level: self.logging.level.clone(),
            json: self.logging.json || env.json,
            ..env
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::errors::ConfigError;

/// Deployment of the benchmark service the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Staging,
    Prod,
}

impl Environment {
    /// Service base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Local => "http://localhost:5000",
            Environment::Dev => "https://api-dev.lollllz.com",
            Environment::Staging => "https://api-staging.lollllz.com",
            Environment::Prod => "https://api-prod.lollllz.com",
        }
    }

    /// Dataset subdirectory holding the splits this environment serves.
    pub fn working_dir(&self) -> &'static str {
        match self {
            Environment::Prod => "evaluation",
            _ => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        })
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigError::ValidationFailed {
                field: "environment".into(),
                message: format!("unknown environment `{other}`"),
            }),
        }
    }
}

/// Backoff schedule applied to replayable requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay_secs: u64,
    /// Factor applied to the delay after each failed attempt.
    pub backoff_multiplier: u32,
    /// Ceiling on the delay between attempts.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_delay_secs: defaults::DEFAULT_INITIAL_DELAY_SECS,
            backoff_multiplier: defaults::DEFAULT_BACKOFF_MULTIPLIER,
            max_delay_secs: defaults::DEFAULT_MAX_DELAY_SECS,
        }
    }
}

/// Transport-level settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub environment: Environment,
    /// Team credential sent in the `user_secret` header.
    pub team_secret: String,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            team_secret: String::new(),
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
            retry: RetryConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Fail when no team secret is configured. Called right before a
    /// client is built; offline commands skip it.
    pub fn ensure_secret(&self) -> Result<(), ConfigError> {
        if self.team_secret.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "api.team_secret".into(),
                message: "team secret is required (set LOWSHOT_TEAM_SECRET or --team-secret)"
                    .into(),
            });
        }
        Ok(())
    }
}

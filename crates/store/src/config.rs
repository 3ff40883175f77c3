use std::time::Duration;

use crate::retry::RetryPolicy;

/// Errors raised while reading store configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set when STORE_BACKEND=baas")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Which backing store to talk to.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Hosted BaaS reached over HTTP.
    Baas {
        base_url: String,
        api_key: Option<String>,
    },
    /// In-process store; data is lost on restart.
    Memory,
}

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Retry policy for reads against the BaaS.
    pub retry: RetryPolicy,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default  |
    /// |-----------------------------|----------|
    /// | `STORE_BACKEND`             | `baas`   |
    /// | `BAAS_URL`                  | required for `baas` |
    /// | `BAAS_API_KEY`              | unset    |
    /// | `BAAS_MAX_ATTEMPTS`         | `4`      |
    /// | `BAAS_INITIAL_DELAY_MS`     | `500`    |
    /// | `BAAS_MAX_DELAY_MS`         | `8000`   |
    /// | `BAAS_INITIAL_TIMEOUT_SECS` | `10`     |
    /// | `BAAS_TIMEOUT_STEP_SECS`    | `5`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("STORE_BACKEND").as_deref().unwrap_or("baas") {
            "memory" => StoreBackend::Memory,
            "baas" => {
                let base_url = lookup("BAAS_URL")
                    .filter(|v| !v.trim().is_empty())
                    .ok_or(ConfigError::Missing("BAAS_URL"))?;
                StoreBackend::Baas {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    api_key: lookup("BAAS_API_KEY").filter(|v| !v.is_empty()),
                }
            }
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse_or(&lookup, "BAAS_MAX_ATTEMPTS", defaults.max_attempts)?,
            initial_delay: Duration::from_millis(parse_or(
                &lookup,
                "BAAS_INITIAL_DELAY_MS",
                defaults.initial_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse_or(
                &lookup,
                "BAAS_MAX_DELAY_MS",
                defaults.max_delay.as_millis() as u64,
            )?),
            initial_timeout: Duration::from_secs(parse_or(
                &lookup,
                "BAAS_INITIAL_TIMEOUT_SECS",
                defaults.initial_timeout.as_secs(),
            )?),
            timeout_step: Duration::from_secs(parse_or(
                &lookup,
                "BAAS_TIMEOUT_STEP_SECS",
                defaults.timeout_step.as_secs(),
            )?),
            ..defaults
        };

        Ok(Self { backend, retry })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

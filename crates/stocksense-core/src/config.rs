//! Configuration for the StockSense client core

use crate::error::{Result, SenseError};
use std::time::Duration;
use url::Url;

/// Default backend base URL used by the dashboard
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "STOCKSENSE_BACKEND_URL";

/// What happens to the previously displayed result slots while a new
/// fetch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Keep the prior slots visible (read-only) until the new outcomes
    /// settle, so the display never flashes empty between selections.
    #[default]
    RetainPrevious,
    /// Clear all slots as soon as the fetch is dispatched.
    ClearOnFetch,
}

/// Configuration for the remote gateway and view-state controller
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the prediction backend
    pub base_url: Url,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Slot handling while a fetch is outstanding
    pub stale_policy: StalePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            request_timeout: Duration::from_secs(30),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(SenseError::Config(format!(
                "backend URL must be http or https, got `{}`",
                self.base_url.scheme()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(SenseError::Config(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    stale_policy: Option<StalePolicy>,
}

impl ClientConfigBuilder {
    /// Set the backend base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the stale-slot policy
    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = Some(policy);
        self
    }

    /// Load the backend base URL from the environment, if set.
    ///
    /// A URL passed explicitly via [`Self::base_url`] afterwards still
    /// wins.
    pub fn with_env_backend_url(mut self) -> Self {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            self.base_url = Some(url);
        }
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let base_url = match self.base_url {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| SenseError::Config(format!("invalid backend URL `{raw}`: {e}")))?,
            None => defaults.base_url,
        };

        let config = ClientConfig {
            base_url,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            stale_policy: self.stale_policy.unwrap_or(defaults.stale_policy),
        };

        config.validate()?;
        Ok(config)
    }
}

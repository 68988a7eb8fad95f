// src/config.rs - Suite configuration with environment overrides

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, SuiteError};
use crate::models::TestData;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base URL of the service under test
    pub base_url: String,
    /// Per-request timeout (in seconds)
    pub request_timeout_secs: u64,
    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
    /// Upper bound for the p95 login latency check (in milliseconds)
    pub latency_budget_ms: u64,
    /// Number of logins sampled by the latency check
    pub latency_samples: usize,
    /// Credentials fixture; the built-in test account is used when unset
    pub test_data_path: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            accept_invalid_certs: true,
            latency_budget_ms: 800,
            latency_samples: 5,
            test_data_path: None,
        }
    }
}

impl SuiteConfig {
    /// Configuration pointing at a different base URL, other values default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = SuiteConfig::default();
        let mut parse_errors = Vec::new();

        debug!("Loading suite configuration from environment variables");

        if let Ok(base_url) = std::env::var("DUMMYJSON_BASE_URL") {
            debug!("Found DUMMYJSON_BASE_URL: {}", base_url);
            config.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("DUMMYJSON_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(t) => {
                    debug!("Found DUMMYJSON_TIMEOUT_SECS: {}", t);
                    config.request_timeout_secs = t;
                }
                Err(e) => {
                    parse_errors.push(format!(
                        "Invalid DUMMYJSON_TIMEOUT_SECS '{}': {}",
                        timeout, e
                    ));
                }
            }
        }

        if let Ok(lenient) = std::env::var("DUMMYJSON_ACCEPT_INVALID_CERTS") {
            match lenient.parse() {
                Ok(enabled) => {
                    debug!("Found DUMMYJSON_ACCEPT_INVALID_CERTS: {}", enabled);
                    config.accept_invalid_certs = enabled;
                }
                Err(e) => {
                    parse_errors.push(format!(
                        "Invalid DUMMYJSON_ACCEPT_INVALID_CERTS '{}': {}",
                        lenient, e
                    ));
                }
            }
        }

        if let Ok(budget) = std::env::var("DUMMYJSON_LATENCY_BUDGET_MS") {
            match budget.parse() {
                Ok(ms) => {
                    debug!("Found DUMMYJSON_LATENCY_BUDGET_MS: {}", ms);
                    config.latency_budget_ms = ms;
                }
                Err(e) => {
                    parse_errors.push(format!(
                        "Invalid DUMMYJSON_LATENCY_BUDGET_MS '{}': {}",
                        budget, e
                    ));
                }
            }
        }

        if let Ok(path) = std::env::var("DUMMYJSON_TEST_DATA") {
            debug!("Found DUMMYJSON_TEST_DATA: {}", path);
            config.test_data_path = Some(PathBuf::from(path));
        }

        if !parse_errors.is_empty() {
            return Err(SuiteError::Configuration(parse_errors.join("; ")));
        }

        config.validate()?;
        info!(base_url = %config.base_url, "Suite configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SuiteError::Configuration(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(SuiteError::Configuration(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.latency_budget_ms == 0 {
            return Err(SuiteError::Configuration(
                "latency_budget_ms must be greater than 0".to_string(),
            ));
        }

        if self.latency_samples == 0 {
            return Err(SuiteError::Configuration(
                "latency_samples must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn latency_budget(&self) -> Duration {
        Duration::from_millis(self.latency_budget_ms)
    }

    /// Credentials fixture for this run.
    pub fn test_data(&self) -> Result<TestData> {
        match &self.test_data_path {
            Some(path) => TestData::from_file(path),
            None => Ok(TestData::default()),
        }
    }
}

//! Runtime options for the bridge.

use std::collections::BTreeMap;
use std::time::Duration;

use ca_payments_core::{EnvironmentName, PaymentsError, Result};
use serde::{Deserialize, Serialize};

/// Default time allowed for the SDK script to load.
pub const DEFAULT_LOAD_TIMEOUT_SECONDS: u64 = 30;

/// Options for customization.
///
/// Can be built in code or parsed from JSON embedded in the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsOptions {
    /// Seconds to wait for the SDK script (default: 30, `None` waits forever).
    pub load_timeout_seconds: Option<u64>,

    /// Script URL overrides per environment (e.g. a locally served bundle).
    pub script_urls: BTreeMap<EnvironmentName, String>,
}

impl Default for PaymentsOptions {
    fn default() -> Self {
        Self {
            load_timeout_seconds: Some(DEFAULT_LOAD_TIMEOUT_SECONDS),
            script_urls: BTreeMap::new(),
        }
    }
}

impl PaymentsOptions {
    /// Parse and validate options from JSON.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the JSON is malformed or invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| PaymentsError::Configuration(format!("invalid options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Set the script load timeout.
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout_seconds = Some(timeout.as_secs().max(1));
        self
    }

    /// Wait for the script indefinitely.
    #[must_use]
    pub fn without_load_timeout(mut self) -> Self {
        self.load_timeout_seconds = None;
        self
    }

    /// Override the script URL for one environment.
    #[must_use]
    pub fn with_script_url(mut self, env: EnvironmentName, url: impl Into<String>) -> Self {
        self.script_urls.insert(env, url.into());
        self
    }

    /// Script URL to load for `env`.
    #[must_use]
    pub fn script_url(&self, env: EnvironmentName) -> &str {
        self.script_urls
            .get(&env)
            .map_or_else(|| env.script_url(), String::as_str)
    }

    /// Script load timeout, if any.
    #[must_use]
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_seconds.map(Duration::from_secs)
    }

    /// Check the options for values that can never work.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero timeout or an empty URL.
    pub fn validate(&self) -> Result<()> {
        if self.load_timeout_seconds == Some(0) {
            return Err(PaymentsError::Configuration(
                "load_timeout_seconds must be greater than zero".into(),
            ));
        }
        if let Some((env, _)) = self.script_urls.iter().find(|(_, url)| url.trim().is_empty()) {
            return Err(PaymentsError::Configuration(format!(
                "empty script URL for environment {env}"
            )));
        }
        Ok(())
    }
}

//! Environment selection and vendor script URLs.
//!
//! Each environment maps to exactly one CDN bundle. The mapping is a pure
//! lookup; overrides for local testing live in the bridge's runtime options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Script URLs
// ============================================================================

/// Production CDN bundle.
pub const PRODUCTION_SCRIPT_URL: &str = "https://cdn.chargeafter.com/web/v2/chargeafter.min.js";

/// QA CDN bundle.
pub const QA_SCRIPT_URL: &str = "https://cdn-qa.ca-dev.co/web/v2/chargeafter.min.js";

/// Sandbox CDN bundle.
pub const SANDBOX_SCRIPT_URL: &str = "https://cdn-sandbox.ca-dev.co/web/v2/chargeafter.min.js";

/// Demo CDN bundle.
pub const DEMO_SCRIPT_URL: &str = "https://cdn-demo.ca-dev.co/web/v2/chargeafter.min.js";

/// Develop CDN bundle.
pub const DEVELOP_SCRIPT_URL: &str = "https://cdn-develop.ca-dev.co/web/v2/chargeafter.min.js";

/// Symbolic environment name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentName {
    /// Live merchant traffic.
    #[default]
    Production,
    /// Internal QA.
    Qa,
    /// Merchant integration sandbox.
    Sandbox,
    /// Sales demo.
    Demo,
    /// Development builds.
    Develop,
}

impl EnvironmentName {
    /// All known environments.
    pub const ALL: [Self; 5] = [
        Self::Production,
        Self::Qa,
        Self::Sandbox,
        Self::Demo,
        Self::Develop,
    ];

    /// Return the vendor script URL for this environment.
    #[must_use]
    pub const fn script_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_SCRIPT_URL,
            Self::Qa => QA_SCRIPT_URL,
            Self::Sandbox => SANDBOX_SCRIPT_URL,
            Self::Demo => DEMO_SCRIPT_URL,
            Self::Develop => DEVELOP_SCRIPT_URL,
        }
    }

    /// Return the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Qa => "qa",
            Self::Sandbox => "sandbox",
            Self::Demo => "demo",
            Self::Develop => "develop",
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentName {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEnvironment(s.to_string()))
    }
}

/// Returned when parsing an environment name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment: {0}")]
pub struct UnknownEnvironment(pub String);

/// Merchant environment credentials.
///
/// Immutable once handed to a flow; `name` selects the script URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Environment to load the SDK from (default: production).
    #[serde(default)]
    pub name: EnvironmentName,

    /// Public merchant API key.
    pub api_key: String,

    /// Merchant acting on behalf of another merchant, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated_merchant_id: Option<String>,

    /// Browser session tracking id forwarded to the vendor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_session_id: Option<String>,
}

impl Environment {
    /// Create credentials for the production environment.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: EnvironmentName::default(),
            api_key: api_key.into(),
            delegated_merchant_id: None,
            browser_session_id: None,
        }
    }

    /// Set the environment name.
    #[must_use]
    pub fn with_name(mut self, name: EnvironmentName) -> Self {
        self.name = name;
        self
    }

    /// Set the delegated merchant id.
    #[must_use]
    pub fn with_delegated_merchant_id(mut self, id: impl Into<String>) -> Self {
        self.delegated_merchant_id = Some(id.into());
        self
    }

    /// Set the browser session id.
    #[must_use]
    pub fn with_browser_session_id(mut self, id: impl Into<String>) -> Self {
        self.browser_session_id = Some(id.into());
        self
    }
}

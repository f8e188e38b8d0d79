//! Error types for the payments bridge.

use crate::{CallbackStatus, StatusCode};

/// Result type for payments operations.
pub type Result<T> = std::result::Result<T, PaymentsError>;

/// Errors that can settle a flow.
///
/// Cloneable because a single in-flight SDK load is shared by every flow
/// waiting on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentsError {
    /// The browser reported an error loading the SDK script.
    #[error("failed to load payments SDK script: {url}")]
    ScriptLoad {
        /// Script URL, including the cache-busting query.
        url: String,
    },

    /// The SDK script did not finish loading in time.
    #[error("timed out after {timeout_ms}ms loading payments SDK script: {url}")]
    ScriptLoadTimeout {
        /// Script URL, including the cache-busting query.
        url: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The script loaded but did not expose the SDK object.
    #[error("ChargeAfter not initialized")]
    NotInitialized,

    /// The SDK's own `init` call failed.
    #[error("payments SDK init failed: {0}")]
    VendorInit(String),

    /// The widget reported an error through the terminal callback.
    #[error("payments flow failed: {code} - {message}")]
    Flow {
        /// Vendor status code.
        code: StatusCode,
        /// Vendor message.
        message: String,
        /// Partial data the widget sent along with the error.
        data: Option<serde_json::Value>,
    },

    /// The widget released the flow without ever calling back.
    #[error("payments flow abandoned without a result")]
    Abandoned,

    /// A value could not be converted to or from JSON. Flow results never
    /// produce this; they decode leniently.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PaymentsError {
    /// Build a flow error from the vendor status and any partial data.
    #[must_use]
    pub fn flow(status: CallbackStatus, data: Option<serde_json::Value>) -> Self {
        Self::Flow {
            code: status.code,
            message: status.message,
            data,
        }
    }

    /// Stable error code.
    ///
    /// Vendor flow errors keep the vendor code; local failures use
    /// lower-snake-case codes of their own.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::ScriptLoad { .. } => "script_load_failed",
            Self::ScriptLoadTimeout { .. } => "script_load_timeout",
            Self::NotInitialized => "not_initialized",
            Self::VendorInit(_) => "vendor_init_failed",
            Self::Flow { code, .. } => code.as_str(),
            Self::Abandoned => "abandoned",
            Self::Serialization(_) => "serialization_error",
            Self::Configuration(_) => "configuration_error",
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Flow { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Vendor status code, for flow errors.
    #[must_use]
    pub fn status_code(&self) -> Option<&StatusCode> {
        match self {
            Self::Flow { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PaymentsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

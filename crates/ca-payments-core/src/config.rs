//! Per-flow session configuration.

use serde::{Deserialize, Serialize};

use crate::Environment;

/// Sales channel the flow is launched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Online storefront.
    ECommerce,
    /// Physical store / point of sale.
    InStore,
    /// Agent-assisted call center.
    CallCenter,
}

/// Consumer-facing presentation preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Unicode LDML locale identifier (e.g. `en-US`, `es-AR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Session configuration owned by the caller for one flow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Environment and merchant credentials.
    pub env: Environment,

    /// Sales channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,

    /// Merchant store id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    /// Presentation preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl SessionConfig {
    /// Create a session config for the given environment.
    #[must_use]
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            channel: None,
            store_id: None,
            preferences: None,
        }
    }

    /// Set the sales channel.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Set the store id.
    #[must_use]
    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    /// Set the preferred language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.preferences = Some(Preferences {
            language: Some(language.into()),
        });
        self
    }
}

//! The vendor SDK seam.

use std::fmt;

use async_trait::async_trait;
use ca_payments_core::{
    CartDetails, Channel, ConsumerDetails, Preferences, Result, SessionConfig,
};
use serde::Serialize;

use crate::callbacks::{DataUpdateAdapter, TerminalCallback};
use crate::hooks::{Hook, ValueHook};

/// Flow presented by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// Prequalification (apply for credit).
    Apply,
    /// Purchase, optionally resuming a prequalification.
    Checkout,
    /// Consumer identification.
    Identify,
}

impl FlowKind {
    /// Name passed to `present`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Checkout => "checkout",
            Self::Identify => "identify",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration the SDK reads during bootstrap and `init`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorConfig {
    /// Merchant API key.
    pub api_key: String,

    /// Merchant store id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    /// Delegated merchant id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegated_merchant_id: Option<String>,

    /// Browser session tracking id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_session_id: Option<String>,

    /// "Modal about to open" hook, published as `onLoaded`.
    #[serde(skip)]
    pub on_loaded: Option<Hook>,
}

impl VendorConfig {
    /// Build the SDK config for a session.
    #[must_use]
    pub fn from_session(config: &SessionConfig, on_loaded: Option<Hook>) -> Self {
        Self {
            api_key: config.env.api_key.clone(),
            store_id: config.store_id.clone(),
            delegated_merchant_id: config.env.delegated_merchant_id.clone(),
            browser_session_id: config.env.browser_session_id.clone(),
            on_loaded,
        }
    }

    /// Invoke the `on_loaded` hook, if any.
    pub fn notify_loaded(&self) {
        if let Some(on_loaded) = &self.on_loaded {
            on_loaded();
        }
    }
}

impl fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorConfig")
            .field("api_key", &"<redacted>")
            .field("store_id", &self.store_id)
            .field("delegated_merchant_id", &self.delegated_merchant_id)
            .field("browser_session_id", &self.browser_session_id)
            .field("on_loaded", &self.on_loaded.is_some())
            .finish()
    }
}

/// Serializable option bag handed to `present`.
///
/// Callbacks travel separately in [`PresentRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantOptions {
    /// Consumer pre-fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_details: Option<ConsumerDetails>,
    /// Sales channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    /// Presentation preferences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    /// Lender/offer filter, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
    /// ISO 4217 currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Browser session tracking id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_session_id: Option<String>,
    /// Point-of-sale id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_id: Option<String>,
    /// Point-of-sale type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_type: Option<String>,
    /// Promotion code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    /// Cart (checkout only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_details: Option<CartDetails>,
    /// Prequalification token to resume from (checkout only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

/// Everything `present` receives for one flow.
pub struct PresentRequest {
    /// Flow to present.
    pub flow: FlowKind,
    /// Serializable options.
    pub options: MerchantOptions,
    /// Data-update adapter (checkout only).
    pub on_data_update: Option<DataUpdateAdapter>,
    /// Confirmation hook.
    pub on_confirm: Option<ValueHook>,
    /// Approval status hook.
    pub on_approval_status_change: Option<ValueHook>,
    /// Terminal callback settling the flow.
    pub callback: TerminalCallback,
}

impl fmt::Debug for PresentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentRequest")
            .field("flow", &self.flow)
            .field("options", &self.options)
            .field("on_data_update", &self.on_data_update.is_some())
            .field("on_confirm", &self.on_confirm.is_some())
            .field(
                "on_approval_status_change",
                &self.on_approval_status_change.is_some(),
            )
            .finish_non_exhaustive()
    }
}

/// The loaded SDK entry object.
///
/// Only reachable through the coordinator once `init` has completed, so
/// call sites never see a partially loaded SDK.
#[async_trait(?Send)]
pub trait VendorSdk {
    /// Run the SDK's own initialization.
    async fn init(&self, config: &VendorConfig) -> Result<()>;

    /// Present a flow. Returns immediately; the outcome arrives later through
    /// `request.callback`.
    fn present(&self, request: PresentRequest);
}

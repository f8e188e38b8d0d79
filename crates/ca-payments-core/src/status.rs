//! Status codes reported by the vendor through the terminal callback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor flow status code.
///
/// Codes the widget may add later are preserved in [`StatusCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusCode {
    /// Consumer chose to go back to the store.
    BackToStore,
    /// Consumer closed the widget.
    ConsumerCancelled,
    /// Consumer asked to change the shipping address.
    ChangeAddress,
    /// The lender rejected or failed to create the checkout.
    CreateCheckoutFailed,
    /// The application could not be created.
    CreateApplicationFailed,
    /// Billing and shipping addresses do not match the lender's rules.
    BillingShippingMismatch,
    /// The configured container element was not found on the page.
    MerchantContainerNotFound,
    /// Catch-all vendor failure.
    General,
    /// A code this crate does not know about.
    Other(String),
}

impl StatusCode {
    /// Return the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::BackToStore => "BACK_TO_STORE",
            Self::ConsumerCancelled => "CONSUMER_CANCELLED",
            Self::ChangeAddress => "CHANGE_ADDRESS",
            Self::CreateCheckoutFailed => "CREATE_CHECKOUT_FAILED",
            Self::CreateApplicationFailed => "CREATE_APPLICATION_FAILED",
            Self::BillingShippingMismatch => "BILLING_SHIPPING_MISMATCH",
            Self::MerchantContainerNotFound => "MERCHANT_CONTAINER_NOT_FOUND",
            Self::General => "GENERAL",
            Self::Other(code) => code,
        }
    }

    /// Whether the consumer left the flow on purpose.
    #[must_use]
    pub fn is_user_exit(&self) -> bool {
        matches!(
            self,
            Self::ConsumerCancelled | Self::BackToStore | Self::ChangeAddress
        )
    }
}

impl From<String> for StatusCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "BACK_TO_STORE" => Self::BackToStore,
            "CONSUMER_CANCELLED" => Self::ConsumerCancelled,
            "CHANGE_ADDRESS" => Self::ChangeAddress,
            "CREATE_CHECKOUT_FAILED" => Self::CreateCheckoutFailed,
            "CREATE_APPLICATION_FAILED" => Self::CreateApplicationFailed,
            "BILLING_SHIPPING_MISMATCH" => Self::BillingShippingMismatch,
            "MERCHANT_CONTAINER_NOT_FOUND" => Self::MerchantContainerNotFound,
            "GENERAL" => Self::General,
            _ => Self::Other(code),
        }
    }
}

impl From<&str> for StatusCode {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<StatusCode> for String {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error object passed as the last argument of the terminal callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackStatus {
    /// Status code.
    pub code: StatusCode,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl CallbackStatus {
    /// Create a status.
    #[must_use]
    pub fn new(code: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

//! Typed flow results.
//!
//! Every field is optional on the way in: the widget is free to send a
//! partial payload, and anything not modelled here is kept in `extra`.
//! Fields with an unexpected shape decode to their defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{lenient, ConsumerDetails};

/// Financing lender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lender {
    /// Lender id.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

/// Credit line granted by a lender during prequalification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableCredit {
    /// Granting lender.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub lender: Lender,
    /// Approved amount, as formatted by the vendor.
    #[serde(default, deserialize_with = "lenient::string")]
    pub credit_amount: String,
}

/// Result of a successful prequalification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrequalifyResult {
    /// Vendor consumer id, used by the post-sale consumers API.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_id: Option<String>,

    /// Consumer details as confirmed in the widget.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_details: Option<ConsumerDetails>,

    /// Credit lines granted.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub available_credit: Vec<AvailableCredit>,

    /// Confirmation token; pass it as `application_id` to resume in checkout.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data reported by the widget when a checkout completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutData {
    /// Consumer details as confirmed in the widget.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_details: Option<ConsumerDetails>,

    /// Lender that financed the purchase.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub lender: Option<Lender>,

    /// Financed total.
    #[serde(
        default,
        deserialize_with = "lenient::opt_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_amount: Option<f64>,

    /// Tax portion.
    #[serde(
        default,
        deserialize_with = "lenient::opt_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_amount: Option<f64>,

    /// Shipping portion.
    #[serde(
        default,
        deserialize_with = "lenient::opt_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping_amount: Option<f64>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a successful checkout: the widget data merged with the
/// post-sale token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    /// Token used for post-sale operations (charges, refunds).
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    /// Completion data.
    #[serde(flatten)]
    pub data: CheckoutData,
}

/// Result of a successful identify flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResult {
    /// Vendor consumer id.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_id: Option<String>,

    /// Consumer details as confirmed in the widget.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_details: Option<ConsumerDetails>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoding of a flow's success payload. Never fails: the consumer has
/// already completed the flow by the time the payload arrives.
pub trait FromPayload: DeserializeOwned + Default {
    /// Fields not modelled by the type.
    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    /// Decode `payload`.
    ///
    /// A missing or `null` payload gives the default. A payload that is not
    /// an object is kept whole under `extra["data"]`.
    #[must_use]
    fn from_payload(payload: Option<Value>) -> Self {
        match payload {
            None | Some(Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|_| {
                let mut result = Self::default();
                result.extra_mut().insert("data".into(), value);
                result
            }),
        }
    }
}

impl FromPayload for PrequalifyResult {
    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl FromPayload for CheckoutData {
    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl FromPayload for IdentifyResult {
    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

//! Cart shapes for the checkout flow.
//!
//! Amounts are decimal currency units as the widget expects them, not cents.

use serde::{Deserialize, Serialize};

use crate::{lenient, ConsumerDetails};

/// Extended warranty attached to a cart line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warranty {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Price per unit.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
    /// Merchant SKU.
    #[serde(default, deserialize_with = "lenient::string")]
    pub sku: String,
}

/// A single cart line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Price per unit.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
    /// Merchant SKU.
    #[serde(default, deserialize_with = "lenient::string")]
    pub sku: String,
    /// Units ordered.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub quantity: u32,
    /// Whether the item can be leased rather than financed.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub leasable: Option<bool>,
    /// Merchant product category.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_category: Option<String>,
    /// Attached warranty.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub warranty: Option<Warranty>,
}

/// A cart-level discount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Discount amount.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
}

/// Cart submitted to a checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDetails {
    /// Merchant order id, passed to the lender when supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_order_id: Option<String>,
    /// Cart lines.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Discounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<Discount>,
    /// Grand total including tax and shipping.
    pub total_amount: f64,
    /// Tax portion.
    #[serde(default)]
    pub tax_amount: f64,
    /// Shipping portion.
    #[serde(default)]
    pub shipping_amount: f64,
}

impl CartDetails {
    /// Create a cart with only a total.
    #[must_use]
    pub fn with_total(total_amount: f64) -> Self {
        Self {
            merchant_order_id: None,
            items: Vec::new(),
            discounts: Vec::new(),
            total_amount,
            tax_amount: 0.0,
            shipping_amount: 0.0,
        }
    }

    /// Append a cart line.
    #[must_use]
    pub fn with_item(mut self, item: CartItem) -> Self {
        self.items.push(item);
        self
    }
}

/// Cart state reported by the widget while the consumer edits the order
/// (for example after choosing a shipping address).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatedData {
    /// Current total.
    #[serde(deserialize_with = "lenient::amount")]
    pub total_amount: f64,
    /// Current tax.
    #[serde(deserialize_with = "lenient::amount")]
    pub tax_amount: f64,
    /// Current shipping.
    #[serde(deserialize_with = "lenient::amount")]
    pub shipping_amount: f64,
    /// Current cart lines.
    #[serde(deserialize_with = "lenient::or_default")]
    pub items: Vec<CartItem>,
    /// Current discounts.
    #[serde(deserialize_with = "lenient::or_default")]
    pub discounts: Vec<Discount>,
    /// Consumer details as entered so far.
    #[serde(
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_details: Option<ConsumerDetails>,
}

/// Merchant reply to an [`UpdatedData`] notification.
///
/// An empty reply tells the widget nothing changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUpdateReply {
    /// Recalculated shipping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_amount: Option<f64>,
    /// Recalculated tax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,
    /// Recalculated total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

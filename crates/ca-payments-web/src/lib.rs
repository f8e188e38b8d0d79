//! Browser bindings for `ca-payments`.
//!
//! [`WebPage`] implements [`ca_payments::PageHost`] on top of `web-sys`, and
//! [`JsVendor`] drives the `window.ChargeAfter` object the SDK script
//! installs. Both only exist on `wasm32-unknown-unknown`.
//!
//! ```ignore
//! let payments = ca_payments_web::payments().expect("running in a browser");
//! let result = payments.prequalify(props).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::future_not_send)]

pub mod status;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod convert;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod page;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod vendor;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use page::WebPage;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use vendor::JsVendor;

/// A [`ca_payments::Payments`] bridge for the current window, or `None`
/// outside a document context (e.g. in a worker).
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
#[must_use]
pub fn payments() -> Option<ca_payments::Payments> {
    payments_with(ca_payments::PaymentsOptions::default())
}

/// Like [`payments`], with custom options.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
#[must_use]
pub fn payments_with(options: ca_payments::PaymentsOptions) -> Option<ca_payments::Payments> {
    let page = WebPage::new()?;
    Some(ca_payments::Payments::with_options(
        std::rc::Rc::new(page),
        options,
    ))
}

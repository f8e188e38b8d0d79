//! ChargeAfter payments bridge.
//!
//! This crate loads the vendor payments SDK into a page at most once and
//! turns its callback-based flows into futures:
//!
//! - **Script loading**: `loader` appends the SDK script with a cache-busting query
//! - **Initialization**: `Coordinator` shares a single in-flight load between callers
//! - **Flows**: `FlowLauncher` builds the option bag, presents the flow and
//!   settles on the SDK's terminal callback
//! - **Entry points**: `Payments::prequalify`, `Payments::checkout`, `Payments::identify`
//!
//! The page itself is abstracted behind [`PageHost`]; `ca-payments-web`
//! provides the browser implementation.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use ca_payments::{CheckoutProps, PageHost, Payments};
//! use ca_payments_core::{CartDetails, Environment, EnvironmentName, SessionConfig};
//!
//! # async fn example(host: Rc<dyn PageHost>) -> Result<(), ca_payments_core::PaymentsError> {
//! let payments = Payments::new(host);
//! let config = SessionConfig::new(Environment::new("public-api-key").with_name(EnvironmentName::Sandbox));
//!
//! let result = payments
//!     .checkout(
//!         CheckoutProps::new(config, CartDetails::with_total(100.0))
//!             .map_base(|base| base.with_currency("USD").on_modal_open(|| {})),
//!     )
//!     .await?;
//!
//! println!("post-sale token: {:?}", result.token);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Single-threaded by construction: everything runs on the page's event loop.
#![allow(clippy::future_not_send)]

pub mod api;
pub mod callbacks;
pub mod completion;
pub mod coordinator;
pub mod hooks;
pub mod host;
pub mod launcher;
pub mod loader;
pub mod options;
pub mod vendor;

pub use api::{CheckoutProps, IdentifyProps, Payments, PrequalifyProps};
pub use callbacks::{Continuation, DataUpdateAdapter, FlowOutcome, TerminalCallback};
pub use coordinator::{Coordinator, VendorHandle};
pub use hooks::{FlowHooks, Hook, OnDataUpdate, ValueHook};
pub use host::{PageHost, ScriptCallback, ScriptLoad, ScriptTag, SCRIPT_ELEMENT_ID};
pub use launcher::{FlowLauncher, FlowRequest};
pub use options::PaymentsOptions;
pub use vendor::{FlowKind, MerchantOptions, PresentRequest, VendorConfig, VendorSdk};

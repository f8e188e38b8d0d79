//! Core types for the ChargeAfter payments bridge.
//!
//! This crate provides the plain data types shared by the bridge and its
//! browser backend:
//!
//! - **Environments**: `EnvironmentName`, `Environment` and the CDN script URLs
//! - **Session config**: `SessionConfig`, `Channel`, `Preferences`
//! - **Flow inputs**: `ConsumerDetails`, `CartDetails`, `UpdatedData`, `DataUpdateReply`
//! - **Flow outputs**: `PrequalifyResult`, `CheckoutResult`, `IdentifyResult`,
//!   decoded leniently through `FromPayload`
//! - **Errors**: `PaymentsError`, `CallbackStatus`, `StatusCode`
//!
//! Wire names are camelCase because the vendor widget reads these values
//! directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cart;
pub mod config;
pub mod consumer;
pub mod environment;
pub mod error;
pub mod ids;
pub mod lenient;
pub mod results;
pub mod status;

pub use cart::{CartDetails, CartItem, DataUpdateReply, Discount, UpdatedData, Warranty};
pub use config::{Channel, Preferences, SessionConfig};
pub use consumer::{Address, ConsumerDetails};
pub use environment::{
    Environment, EnvironmentName, UnknownEnvironment, DEMO_SCRIPT_URL, DEVELOP_SCRIPT_URL,
    PRODUCTION_SCRIPT_URL, QA_SCRIPT_URL, SANDBOX_SCRIPT_URL,
};
pub use error::{PaymentsError, Result};
pub use ids::{FlowId, IdError};
pub use results::{
    AvailableCredit, CheckoutData, CheckoutResult, FromPayload, IdentifyResult, Lender,
    PrequalifyResult,
};
pub use status::{CallbackStatus, StatusCode};
